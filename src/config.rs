use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

// =============================================================================
// Remote endpoints
// =============================================================================

/// Directory listing that enumerates the Maven 3 release folders
pub const DEFAULT_INDEX_URL: &str = "https://dlcdn.apache.org/maven/maven-3";

/// Download location of a binary distribution.
/// `{major}` and `{version}` are substituted before the request.
pub const DEFAULT_DOWNLOAD_URL_TEMPLATE: &str =
    "https://dlcdn.apache.org/maven/maven-{major}/{version}/binaries/apache-maven-{version}-bin.zip";

/// Marker that identifies a folder row in an Apache directory listing
pub const DEFAULT_LISTING_MARKER: &str = "/icons/folder.gif";

// =============================================================================
// Local file names
// =============================================================================

pub const DEFAULT_PRODUCT_PREFIX: &str = "apache-maven";
pub const DEFAULT_ARCHIVE_FILE_NAME: &str = "mvn.zip";
pub const DEFAULT_PROJECT_DESCRIPTOR: &str = "pom.xml";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target";

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for establishing a connection in milliseconds (10 seconds)
pub const CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Timeout for a whole request, body included, in milliseconds (10 minutes)
pub const FETCH_TIMEOUT_MS: u64 = 600_000;

/// Lifecycle goal run after `clean`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    #[default]
    Package,
    Install,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Package => "package",
            Goal::Install => "install",
        }
    }
}

/// Bootstrap configuration, as read from the optional JSON config file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BootstrapConfig {
    pub index_url: String,
    pub download_url_template: String,
    pub listing_marker: String,
    pub product_prefix: String,
    pub archive_file_name: String,
    pub project_descriptor: String,
    pub output_directory: String,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Overall request timeout in milliseconds
    pub fetch_timeout_ms: u64,
    /// Replace files that already exist at an extraction target
    pub overwrite_existing: bool,
    /// Pinned version; the index is not consulted when set
    pub version: Option<String>,
    pub goal: Option<Goal>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            download_url_template: DEFAULT_DOWNLOAD_URL_TEMPLATE.to_string(),
            listing_marker: DEFAULT_LISTING_MARKER.to_string(),
            product_prefix: DEFAULT_PRODUCT_PREFIX.to_string(),
            archive_file_name: DEFAULT_ARCHIVE_FILE_NAME.to_string(),
            project_descriptor: DEFAULT_PROJECT_DESCRIPTOR.to_string(),
            output_directory: DEFAULT_OUTPUT_DIRECTORY.to_string(),
            connect_timeout_ms: CONNECT_TIMEOUT_MS,
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            overwrite_existing: false,
            version: None,
            goal: None,
        }
    }
}

impl BootstrapConfig {
    /// Reads a config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Per-run settings after merging CLI flags over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub work_dir: PathBuf,
    pub pinned_version: Option<String>,
    pub goal: Goal,
}

impl Invocation {
    /// CLI values win over config file values, which win over defaults.
    pub fn resolve(
        config: &BootstrapConfig,
        work_dir: PathBuf,
        cli_version: Option<String>,
        cli_goal: Option<Goal>,
    ) -> Self {
        Self {
            work_dir,
            pinned_version: cli_version.or_else(|| config.version.clone()),
            goal: cli_goal.or(config.goal).unwrap_or_default(),
        }
    }
}

/// Returns the path to the data directory for mvn-bootstrap.
/// Uses $XDG_DATA_HOME/mvn-bootstrap if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/mvn-bootstrap,
/// or ./mvn-bootstrap if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("mvn-bootstrap.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("mvn-bootstrap")
}
