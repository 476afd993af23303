use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No candidate versions found")]
    NoCandidates,

    #[error("Invalid version: {0:?}")]
    InvalidVersion(String),
}
