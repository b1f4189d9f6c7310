use crate::domain::model::{KeyedRecord, Record, RecordKey};
use crate::domain::order::{Order, OrderCollection};
use crate::utils::error::Result;

/// Lazily decoded records paired with their 0-based position.
pub type ParsedStream = Box<dyn Iterator<Item = Result<(usize, Record)>>>;

/// Lazily produced records paired with the key a data source exposes them under.
pub type RecordStream = Box<dyn Iterator<Item = Result<KeyedRecord>>>;

/// Reads the complete raw text of one resource.
pub trait Fetcher: Send + Sync {
    fn fetch(&self) -> Result<String>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}

/// Decodes raw text into an ordered sequence of records.
pub trait Parser: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(&self, raw: &str) -> Result<Vec<Record>>;
}

/// A parser that can also hand out records one at a time.
///
/// `parse_stream` must yield the same records, in the same order and under the same
/// positions, as `parse`. The returned iterator owns `raw`, so dropping it early
/// releases everything it holds.
pub trait StreamingParser: Parser {
    fn parse_stream(&self, raw: String) -> ParsedStream;
}

/// A parser together with the capabilities it offers.
pub enum ParserHandle {
    Basic(Box<dyn Parser>),
    Streaming(Box<dyn StreamingParser>),
}

impl ParserHandle {
    pub fn basic(parser: impl Parser + 'static) -> Self {
        ParserHandle::Basic(Box::new(parser))
    }

    pub fn streaming(parser: impl StreamingParser + 'static) -> Self {
        ParserHandle::Streaming(Box::new(parser))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParserHandle::Basic(parser) => parser.name(),
            ParserHandle::Streaming(parser) => parser.name(),
        }
    }

    pub fn parse(&self, raw: &str) -> Result<Vec<Record>> {
        match self {
            ParserHandle::Basic(parser) => parser.parse(raw),
            ParserHandle::Streaming(parser) => parser.parse(raw),
        }
    }

    pub fn as_streaming(&self) -> Option<&dyn StreamingParser> {
        match self {
            ParserHandle::Basic(_) => None,
            ParserHandle::Streaming(parser) => Some(parser.as_ref()),
        }
    }

    pub fn supports_streaming(&self) -> bool {
        self.as_streaming().is_some()
    }
}

impl std::fmt::Debug for ParserHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.supports_streaming() {
            "Streaming"
        } else {
            "Basic"
        };
        write!(f, "{}({})", kind, self.name())
    }
}

/// Uniform record access over one fetcher and one parser.
pub trait DataSource {
    /// Fetches and parses the whole source. Nothing is cached between calls.
    fn get_all(&self) -> Result<Vec<Record>>;

    /// The record stored under `key`, or `None` when there is none.
    fn get_one(&self, key: &RecordKey) -> Result<Option<Record>>;

    /// A fresh, single-pass sequence over the source.
    fn stream(&self) -> Result<RecordStream>;

    /// Whether `stream` decodes lazily rather than materializing every record first.
    fn supports_streaming(&self) -> bool;
}

pub trait OrderRepository {
    fn find_all(&self) -> Result<OrderCollection>;

    fn find_by_id(&self, id: &str) -> Result<Option<Order>>;
}
