use std::path::{Path, PathBuf};

use crate::version::types::ResolvedVersion;

/// Entry script inside the installation's `bin` directory
pub fn script_name() -> &'static str {
    if cfg!(windows) { "mvn.cmd" } else { "mvn" }
}

/// A build tool installation at `<work_dir>/<product>-<version>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    root: PathBuf,
}

impl Installation {
    pub fn new(work_dir: &Path, product_prefix: &str, version: &ResolvedVersion) -> Self {
        Self {
            root: work_dir.join(format!("{}-{}", product_prefix, version)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// An existing `bin` directory is the only cache-hit signal
    pub fn is_cached(&self) -> bool {
        self.bin_dir().is_dir()
    }

    pub fn script(&self) -> PathBuf {
        self.bin_dir().join(script_name())
    }
}
