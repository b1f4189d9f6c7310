use crate::domain::ports::Fetcher;
use crate::utils::error::{IngestError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a local file. The file must exist when the fetcher is created.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            tracing::debug!("Source file missing: {}", path.display());
            return Err(IngestError::SourceNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path)?;
        tracing::debug!("Fetched {} bytes from {}", content.len(), self.path.display());
        Ok(content)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
