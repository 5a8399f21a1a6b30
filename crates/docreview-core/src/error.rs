use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocReviewError {
    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load document: {0}")]
    DocumentLoad(String),

    #[error("could not resolve destination: {0}")]
    Destination(String),

    #[error("page labels unavailable: {0}")]
    PageLabels(String),

    #[error("outline unavailable: {0}")]
    Outline(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not logged in. Run `docreview login <email>` first")]
    NotLoggedIn,

    #[error("unknown file '{0}'")]
    UnknownFile(String),

    #[error("unknown section '{0}'")]
    UnknownSection(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("storage error at {path}: {reason}")]
    Storage { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
