//! Source of distribution archives

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::acquire::error::FetchError;
use crate::version::types::ResolvedVersion;

/// Trait for downloading the distribution archive of a version
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Downloads the archive for `version` into `destination`
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the downloaded archive file
    /// * `Err(FetchError)` - If the download fails; no partial file is left behind
    async fn fetch(
        &self,
        version: &ResolvedVersion,
        destination: &Path,
    ) -> Result<PathBuf, FetchError>;
}
