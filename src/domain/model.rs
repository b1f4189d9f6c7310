use std::collections::HashMap;
use std::fmt;

/// One raw record decoded from a source, before domain mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn from_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: object.into_iter().collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|value| value.as_str())
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }
}

/// Stable key a record is exposed under: its position among records, or a declared identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Index(usize),
    Id(String),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Index(index) => write!(f, "#{}", index),
            RecordKey::Id(id) => write!(f, "'{}'", id),
        }
    }
}

impl From<usize> for RecordKey {
    fn from(index: usize) -> Self {
        RecordKey::Index(index)
    }
}

impl From<&str> for RecordKey {
    fn from(id: &str) -> Self {
        RecordKey::Id(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecord {
    pub key: RecordKey,
    pub record: Record,
}

impl KeyedRecord {
    pub fn new(key: RecordKey, record: Record) -> Self {
        Self { key, record }
    }
}
