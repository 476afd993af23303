use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to write '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsafe archive entry '{entry}': {reason}")]
    UnsafeEntry { entry: String, reason: &'static str },

    #[error("Archive is corrupted: {0}")]
    Corrupted(#[from] zip::result::ZipError),

    #[error("Refusing to overwrite existing file '{0}'")]
    AlreadyExists(PathBuf),

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreation { path: PathBuf, source: io::Error },

    #[error("Failed to extract '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Extraction worker failed: {0}")]
    Worker(String),

    #[error("Extraction cancelled")]
    Cancelled,
}
