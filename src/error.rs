use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rawfetch operations.
#[derive(Debug, Error)]
pub enum RawfetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("Hash verification failed for {path}: expected {expected}, got {actual}")]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("Refusing to extract '{entry}' from {archive}: path escapes the destination")]
    UnsafeArchiveEntry { archive: PathBuf, entry: String },

    #[error("Failed to read archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("Could not provision hub client '{hub}': {message}")]
    Provisioning { hub: String, message: String },

    #[error("Failed to serialize report: {0}")]
    ReportJson(#[from] serde_json::Error),

    #[error("Downloaded path {0} not found")]
    PathNotFound(PathBuf),

    #[error("Hub '{hub}' failed for dataset '{dataset}': {message}")]
    Hub {
        hub: String,
        dataset: String,
        message: String,
    },
}
