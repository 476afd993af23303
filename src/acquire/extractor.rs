//! Zip extraction with zip-slip protection

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::acquire::error::ExtractError;
use crate::acquire::sanitize::resolve_entry_path;

/// Extraction behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Replace files that already exist instead of failing
    pub overwrite: bool,
}

/// Summary of a completed extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub directories: usize,
    pub files: usize,
}

/// Extracts `archive_path` into `destination` on a blocking worker thread.
///
/// The archive file is deleted afterwards, whether extraction succeeded or not.
/// Setting `cancel` stops the worker before its next entry with
/// [`ExtractError::Cancelled`].
pub async fn extract(
    archive_path: PathBuf,
    destination: PathBuf,
    options: ExtractOptions,
    cancel: Arc<AtomicBool>,
) -> Result<ExtractReport, ExtractError> {
    tokio::task::spawn_blocking(move || {
        extract_archive_until(&archive_path, &destination, &options, &cancel)
    })
    .await
    .map_err(|e| ExtractError::Worker(e.to_string()))?
}

/// Synchronous counterpart of [`extract`] without cancellation
pub fn extract_archive(
    archive_path: &Path,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport, ExtractError> {
    extract_archive_until(archive_path, destination, options, &AtomicBool::new(false))
}

/// Like [`extract_archive`], checking `cancel` before every entry
pub fn extract_archive_until(
    archive_path: &Path,
    destination: &Path,
    options: &ExtractOptions,
    cancel: &AtomicBool,
) -> Result<ExtractReport, ExtractError> {
    let result = extract_entries(archive_path, destination, options, cancel);

    match fs::remove_file(archive_path) {
        Ok(()) => debug!("Removed archive {:?}", archive_path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove archive {:?}: {}", archive_path, e),
    }

    result
}

fn extract_entries(
    archive_path: &Path,
    destination: &Path,
    options: &ExtractOptions,
    cancel: &AtomicBool,
) -> Result<ExtractReport, ExtractError> {
    let file = File::open(archive_path).map_err(|source| ExtractError::Io {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut report = ExtractReport::default();

    for index in 0..archive.len() {
        if cancel.load(Ordering::Relaxed) {
            warn!("Extraction cancelled after {} entries", index);
            return Err(ExtractError::Cancelled);
        }

        let mut entry = archive.by_index(index)?;
        let target = resolve_entry_path(entry.name(), destination)?;

        if entry.is_dir() {
            create_dir_all(&target)?;
            report.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            create_dir_all(parent)?;
        }
        write_file(&mut entry, &target, options)?;

        #[cfg(unix)]
        {
            if let Some(mode) = entry.unix_mode() {
                apply_mode(&target, mode)?;
            }
        }

        report.files += 1;
    }

    info!(
        "Extracted {} files and {} directories into {:?}",
        report.files, report.directories, destination
    );
    Ok(report)
}

fn create_dir_all(path: &Path) -> Result<(), ExtractError> {
    fs::create_dir_all(path).map_err(|source| ExtractError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(
    reader: &mut impl Read,
    target: &Path,
    options: &ExtractOptions,
) -> Result<(), ExtractError> {
    let io_error = |source: io::Error| ExtractError::Io {
        path: target.to_path_buf(),
        source,
    };

    let opened = if options.overwrite {
        File::create(target)
    } else {
        OpenOptions::new().write(true).create_new(true).open(target)
    };

    let mut out = opened.map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            ExtractError::AlreadyExists(target.to_path_buf())
        } else {
            io_error(source)
        }
    })?;

    io::copy(reader, &mut out).map_err(io_error)?;
    Ok(())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<(), ExtractError> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = fs::Permissions::from_mode(mode & 0o777);
    fs::set_permissions(path, permissions).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}
