use super::{BlobStore, StateBlob};
use crate::error::DocReviewError;

/// In-process store, used by tests and short-lived sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    blob: StateBlob,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(blob: StateBlob) -> Self {
        Self { blob }
    }

    pub fn snapshot(&self) -> &StateBlob {
        &self.blob
    }
}

impl BlobStore for MemoryRepository {
    fn load(&self) -> Result<StateBlob, DocReviewError> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &StateBlob) -> Result<(), DocReviewError> {
        self.blob = blob.clone();
        Ok(())
    }
}
