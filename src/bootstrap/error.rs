use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::acquire::error::{ExtractError, FetchError};
use crate::version::error::ResolveError;

/// Terminal failure of a bootstrap run
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Could not determine version: {0}")]
    Resolution(#[source] ResolveError),

    #[error("Could not acquire build tool: {0}")]
    Download(#[source] FetchError),

    #[error("Could not acquire build tool: {0}")]
    UnsafeArchiveEntry(#[source] ExtractError),

    #[error("Could not acquire build tool: {0}")]
    Extraction(#[source] ExtractError),

    #[error("Could not acquire build tool: no bin directory in {0}")]
    IncompleteInstallation(PathBuf),

    #[error("No project found: {0} does not exist")]
    MissingProject(PathBuf),

    #[error("Could not launch {script}: {source}")]
    Launch { script: PathBuf, source: io::Error },

    #[error("Failed to read build output: {0}")]
    Output(#[source] io::Error),

    #[error("Build interrupted")]
    Interrupted,
}

impl BootstrapError {
    /// Process exit code for this failure class
    pub fn exit_code(&self) -> u8 {
        match self {
            BootstrapError::Resolution(_) => 2,
            BootstrapError::Download(_) => 3,
            BootstrapError::UnsafeArchiveEntry(_) => 4,
            BootstrapError::Extraction(_) | BootstrapError::IncompleteInstallation(_) => 5,
            BootstrapError::MissingProject(_) => 6,
            BootstrapError::Launch { .. } => 7,
            BootstrapError::Output(_) => 8,
            BootstrapError::Interrupted => 130,
        }
    }
}

impl From<ExtractError> for BootstrapError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::UnsafeEntry { .. } => Self::UnsafeArchiveEntry(e),
            ExtractError::Cancelled => Self::Interrupted,
            other => Self::Extraction(other),
        }
    }
}
