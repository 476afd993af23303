//! Source of the latest available build tool version

#[cfg(test)]
use mockall::automock;

use crate::version::error::ResolveError;
use crate::version::types::VersionString;

/// Trait for discovering the latest stable release
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionSource: Send + Sync {
    /// Lists the available versions and returns the highest one
    ///
    /// # Returns
    /// * `Ok(VersionString)` - The latest stable version
    /// * `Err(ResolveError)` - If the listing cannot be fetched or holds no versions
    async fn latest_version(&self) -> Result<VersionString, ResolveError>;
}
