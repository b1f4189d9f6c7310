use crate::domain::model::Record;
use crate::domain::ports::{ParsedStream, Parser, StreamingParser};
use crate::utils::error::{IngestError, Result};
use serde_json::Value;
use tracing::{debug, error};

/// Whole-document JSON parser.
///
/// A root array yields one record per element; a root object is the single record at position 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    fn decode(&self, raw: &str) -> Result<Value> {
        serde_json::from_str::<Value>(raw).map_err(|e| {
            error!("Failed to parse JSON document: {}", e);
            IngestError::ParseError { source: e }
        })
    }
}

impl Parser for JsonParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, raw: &str) -> Result<Vec<Record>> {
        debug!("Parsing {} bytes of JSON", raw.len());
        let records = top_level_elements(self.decode(raw)?)
            .enumerate()
            .map(|(position, value)| record_from_value(position, value))
            .collect::<Result<Vec<_>>>()?;
        debug!("JSON parsing complete: {} records", records.len());
        Ok(records)
    }
}

impl StreamingParser for JsonParser {
    fn parse_stream(&self, raw: String) -> ParsedStream {
        // The document is decoded once up front; only the walk over its elements is lazy.
        let root = match self.decode(&raw) {
            Ok(root) => root,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };
        drop(raw);

        Box::new(
            top_level_elements(root)
                .enumerate()
                .map(|(position, value)| record_from_value(position, value).map(|r| (position, r))),
        )
    }
}

fn top_level_elements(root: Value) -> Box<dyn Iterator<Item = Value>> {
    match root {
        Value::Array(items) => Box::new(items.into_iter()),
        other => Box::new(std::iter::once(other)),
    }
}

/// Turns one decoded top-level value into a record, rejecting anything but objects.
pub(crate) fn record_from_value(position: usize, value: Value) -> Result<Record> {
    match value {
        Value::Object(object) => Ok(Record::from_object(object)),
        other => Err(IngestError::UnexpectedShapeError {
            position,
            found: json_type_name(&other).to_string(),
        }),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
