use super::{BlobStore, StateBlob};
use crate::error::DocReviewError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// State blob kept as one JSON file.
///
/// Writes go to a temp file in the same directory which then replaces the
/// target, so a crash never leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, reason: impl ToString) -> DocReviewError {
        DocReviewError::Storage {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl BlobStore for JsonFileRepository {
    fn load(&self) -> Result<StateBlob, DocReviewError> {
        if !self.path.exists() {
            return Ok(StateBlob::default());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.storage_error(e))?;
        if content.trim().is_empty() {
            return Ok(StateBlob::default());
        }
        serde_json::from_str(&content).map_err(|e| self.storage_error(e))
    }

    fn save(&mut self, blob: &StateBlob) -> Result<(), DocReviewError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| self.storage_error(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.storage_error(e))?;
        serde_json::to_writer_pretty(&mut tmp, blob)?;
        tmp.write_all(b"\n").map_err(|e| self.storage_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.storage_error(e.error))?;
        Ok(())
    }
}
