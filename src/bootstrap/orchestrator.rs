//! Bootstrap pipeline: resolve, acquire, validate, launch
//!
//! ```text
//! ResolvingVersion ─▶ CheckingCache ─┬─▶ CacheHit ──────────────┬─▶ ValidatingProject ─▶ Launching ─▶ Streaming ─▶ Done
//!                                    └─▶ Fetching ─▶ Extracting ┘
//! ```
//!
//! Any stage may end in `Failed`.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, warn};

use crate::acquire::error::ExtractError;
use crate::acquire::extractor::{ExtractOptions, extract};
use crate::acquire::fetcher::ArchiveFetcher;
use crate::acquire::source::ArchiveSource;
use crate::bootstrap::error::BootstrapError;
use crate::bootstrap::install::Installation;
use crate::bootstrap::launcher::{BuildOutcome, Interrupt, ctrl_c_interrupt, launch};
use crate::config::{BootstrapConfig, Invocation};
use crate::http::build_client;
use crate::version::index::IndexScraper;
use crate::version::source::VersionSource;
use crate::version::types::ResolvedVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingVersion,
    CheckingCache,
    CacheHit,
    Fetching,
    Extracting,
    ValidatingProject,
    Launching,
    Streaming,
    Done,
    Failed,
}

/// Everything needed to launch the build, once acquisition is done
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub version: ResolvedVersion,
    pub installation: Installation,
}

/// Drives one bootstrap run
pub struct Bootstrapper {
    config: BootstrapConfig,
    versions: Arc<dyn VersionSource>,
    archives: Arc<dyn ArchiveSource>,
    interrupt: Interrupt,
}

impl Bootstrapper {
    pub fn new(
        config: BootstrapConfig,
        versions: Arc<dyn VersionSource>,
        archives: Arc<dyn ArchiveSource>,
    ) -> Self {
        Self {
            config,
            versions,
            archives,
            interrupt: ctrl_c_interrupt(),
        }
    }

    /// Replaces the Ctrl-C signal that stops downloading, extraction and the build
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Wires the index scraper and archive fetcher from configuration
    pub fn from_config(config: BootstrapConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(&config)?;
        let versions = Arc::new(IndexScraper::new(client.clone(), &config));
        let archives = Arc::new(ArchiveFetcher::new(client, &config));
        Ok(Self::new(config, versions, archives))
    }

    fn enter(&self, stage: Stage) {
        debug!(?stage, "Entering stage");
    }

    /// Runs the whole pipeline and relays the build output
    pub async fn run(&self, invocation: &Invocation) -> Result<BuildOutcome, BootstrapError> {
        match self.execute(invocation).await {
            Ok(outcome) => {
                self.enter(Stage::Done);
                println!("See \"{}\" directory.", self.config.output_directory);
                Ok(outcome)
            }
            Err(e) => {
                self.enter(Stage::Failed);
                error!("Bootstrap failed: {}", e);
                Err(e)
            }
        }
    }

    async fn execute(&self, invocation: &Invocation) -> Result<BuildOutcome, BootstrapError> {
        let prepared = self.prepare(invocation).await?;

        self.enter(Stage::Launching);
        println!("Building project...");
        let script = prepared.installation.script();

        self.enter(Stage::Streaming);
        launch(
            &script,
            invocation.goal,
            &invocation.work_dir,
            self.interrupt.clone(),
        )
        .await
    }

    /// Every stage up to, but excluding, the launch
    pub async fn prepare(&self, invocation: &Invocation) -> Result<Prepared, BootstrapError> {
        let version = self.resolve_version(invocation).await?;

        self.enter(Stage::CheckingCache);
        let installation = Installation::new(
            &invocation.work_dir,
            &self.config.product_prefix,
            &version,
        );

        if installation.is_cached() {
            self.enter(Stage::CacheHit);
            info!("Using cached installation {:?}", installation.root());
        } else {
            self.acquire(&version, &installation, &invocation.work_dir)
                .await?;
        }

        self.enter(Stage::ValidatingProject);
        let descriptor = invocation.work_dir.join(&self.config.project_descriptor);
        if !descriptor.exists() {
            return Err(BootstrapError::MissingProject(descriptor));
        }

        Ok(Prepared {
            version,
            installation,
        })
    }

    async fn resolve_version(
        &self,
        invocation: &Invocation,
    ) -> Result<ResolvedVersion, BootstrapError> {
        self.enter(Stage::ResolvingVersion);

        let version = match &invocation.pinned_version {
            Some(pinned) => {
                debug!("Using pinned version {}", pinned);
                ResolvedVersion::pinned(pinned)
            }
            None => self.versions.latest_version().await.map(ResolvedVersion::from),
        };

        version.map_err(BootstrapError::Resolution)
    }

    async fn acquire(
        &self,
        version: &ResolvedVersion,
        installation: &Installation,
        work_dir: &Path,
    ) -> Result<(), BootstrapError> {
        if installation.root().exists() {
            warn!(
                "Removing incomplete installation {:?} left by an earlier run",
                installation.root()
            );
            discard_installation(installation.root()).await;
        }

        let result = self.fetch_and_extract(version, installation, work_dir).await;

        if result.is_err() {
            discard_installation(installation.root()).await;
        }
        result
    }

    async fn fetch_and_extract(
        &self,
        version: &ResolvedVersion,
        installation: &Installation,
        work_dir: &Path,
    ) -> Result<(), BootstrapError> {
        self.enter(Stage::Fetching);
        let fetched = tokio::select! {
            biased;
            () = self.interrupt.clone() => None,
            fetched = self.archives.fetch(version, work_dir) => Some(fetched),
        };
        let Some(fetched) = fetched else {
            warn!("Interrupted while downloading {}", version);
            discard_file(&work_dir.join(&self.config.archive_file_name)).await;
            return Err(BootstrapError::Interrupted);
        };
        let archive = fetched.map_err(BootstrapError::Download)?;

        self.enter(Stage::Extracting);
        let options = ExtractOptions {
            overwrite: self.config.overwrite_existing,
        };
        let cancel = Arc::new(AtomicBool::new(false));
        let extraction = extract(
            archive.clone(),
            work_dir.to_path_buf(),
            options,
            Arc::clone(&cancel),
        );
        tokio::pin!(extraction);

        let extracted = tokio::select! {
            biased;
            () = self.interrupt.clone() => {
                warn!("Interrupted while extracting {}", version);
                cancel.store(true, Ordering::Relaxed);
                match (&mut extraction).await {
                    Ok(_) | Err(ExtractError::Cancelled) => {}
                    Err(e) => warn!("Extraction stopped with an error: {}", e),
                }
                discard_file(&archive).await;
                return Err(BootstrapError::Interrupted);
            }
            extracted = &mut extraction => extracted,
        };
        extracted?;

        if !installation.is_cached() {
            return Err(BootstrapError::IncompleteInstallation(
                installation.root().to_path_buf(),
            ));
        }

        info!("Installed {} into {:?}", version, installation.root());
        Ok(())
    }
}

async fn discard_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed {:?}", path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {:?}: {}", path, e),
    }
}

async fn discard_installation(root: &Path) {
    match tokio::fs::remove_dir_all(root).await {
        Ok(()) => debug!("Removed partial installation {:?}", root),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial installation {:?}: {}", root, e),
    }
}
