pub mod toml_config;

pub use toml_config::{IngestConfig, LogFormat, LoggingConfig, RepositoryConfig, SourceConfig, SourceFormat};
