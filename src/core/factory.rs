use crate::adapters::{FileFetcher, JsonLinesParser, JsonParser};
use crate::config::toml_config::{SourceConfig, SourceFormat};
use crate::core::data_source::FileDataSource;
use crate::domain::ports::ParserHandle;
use crate::utils::error::Result;
use std::path::Path;

/// Builds file-backed data sources for the supported formats.
pub struct DataSourceFactory;

impl DataSourceFactory {
    /// A whole-document JSON file: an array of records or a single record object.
    pub fn json_file(path: impl AsRef<Path>) -> Result<FileDataSource> {
        Self::for_format(path, SourceFormat::Json)
    }

    /// A JSON-Lines file: one record object per non-blank line.
    pub fn json_lines_file(path: impl AsRef<Path>) -> Result<FileDataSource> {
        Self::for_format(path, SourceFormat::JsonLines)
    }

    pub fn for_format(path: impl AsRef<Path>, format: SourceFormat) -> Result<FileDataSource> {
        let fetcher = FileFetcher::new(path)?;
        Ok(FileDataSource::new(fetcher, Self::parser_for(format)))
    }

    pub fn from_config(config: &SourceConfig) -> Result<FileDataSource> {
        let source = Self::for_format(&config.path, config.format)?;
        Ok(match &config.key_field {
            Some(field) => source.with_key_field(field.clone()),
            None => source,
        })
    }

    pub fn parser_for(format: SourceFormat) -> ParserHandle {
        match format {
            SourceFormat::Json => ParserHandle::streaming(JsonParser),
            SourceFormat::JsonLines => ParserHandle::streaming(JsonLinesParser),
        }
    }
}
