//! Shared HTTP client construction

use crate::config::BootstrapConfig;

const USER_AGENT: &str = concat!("mvn-bootstrap/", env!("CARGO_PKG_VERSION"));

/// Builds the client used for both the index page and the archive download
pub fn build_client(config: &BootstrapConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(config.connect_timeout())
        .timeout(config.fetch_timeout())
        .build()
}
