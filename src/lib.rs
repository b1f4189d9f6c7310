pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FileFetcher, JsonLinesParser, JsonParser};
pub use config::{IngestConfig, SourceFormat};
pub use self::core::{DataSourceFactory, FileDataSource, LookupStrategy, SourceOrderRepository};
pub use domain::model::{KeyedRecord, Record, RecordKey};
pub use domain::order::{Address, LineItem, LineItemCollection, Order, OrderCollection, Titled};
pub use domain::ports::{
    DataSource, Fetcher, OrderRepository, ParsedStream, Parser, ParserHandle, RecordStream,
    StreamingParser,
};
pub use utils::error::{ErrorCategory, IngestError, Result};
