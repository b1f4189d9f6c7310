use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Source not found: {path}")]
    SourceNotFound { path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {source}")]
    ParseError {
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON parse error on line {line} ({content}): {source}")]
    LineParseError {
        line: usize,
        content: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected record shape at position {position}: expected object, found {found}")]
    UnexpectedShapeError { position: usize, found: String },

    #[error("Mapping error in record {record}, field '{field}': {reason}")]
    MappingError {
        record: String,
        field: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Parse,
    Mapping,
    Config,
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IngestError::SourceNotFound { .. } | IngestError::IoError(_) => ErrorCategory::Source,
            IngestError::ParseError { .. }
            | IngestError::LineParseError { .. }
            | IngestError::UnexpectedShapeError { .. } => ErrorCategory::Parse,
            IngestError::MappingError { .. } => ErrorCategory::Mapping,
            IngestError::ConfigError { .. }
            | IngestError::InvalidConfigValueError { .. }
            | IngestError::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn is_not_found_source(&self) -> bool {
        matches!(self, IngestError::SourceNotFound { .. })
    }

    pub(crate) fn mapping(
        record: impl ToString,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        IngestError::MappingError {
            record: record.to_string(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
