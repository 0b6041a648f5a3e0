//! Flat directory listing and candidate selection.
//!
//! Only the direct children of the scan root are considered. A child is a
//! candidate when it is a regular file and its extension matches
//! [`ScanConfig`]. Symlinks are never followed or listed, so a link can
//! neither survive in place of its target nor be deleted as a copy of it.
//! Everything else is ignored silently. Entries are returned sorted by file
//! name so repeated scans of an unchanged directory list files identically.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{FileRecord, ScanConfig, ScanError};

/// List candidate files directly inside `root`.
///
/// # Errors
///
/// - [`ScanError::NotFound`] if `root` does not exist
/// - [`ScanError::NotADirectory`] if `root` is not a directory
/// - [`ScanError::PermissionDenied`] / [`ScanError::Io`] if the root cannot be read
///
/// Failures on individual entries are logged and the entry is skipped.
pub fn list_candidates(root: &Path, config: &ScanConfig) -> Result<Vec<FileRecord>, ScanError> {
    validate_root(root)?;

    let mut records = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // depth 0 is the root itself; a failure there means we cannot list at all
                if e.depth() == 0 {
                    return Err(walk_error_to_scan_error(root, e));
                }
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.path_is_symlink() {
            log::debug!("Ignoring symlink: {}", entry.path().display());
            continue;
        }

        if !entry.file_type().is_file() {
            log::trace!("Ignoring non-file entry: {}", entry.path().display());
            continue;
        }

        if !config.matches(entry.path()) {
            log::trace!("Ignoring unselected file: {}", entry.path().display());
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => {
                let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                records.push(FileRecord::new(
                    entry.path().to_path_buf(),
                    metadata.len(),
                    modified,
                ));
            }
            Err(e) => {
                log::warn!(
                    "Skipping {}: cannot read metadata: {}",
                    entry.path().display(),
                    e
                );
            }
        }
    }

    log::debug!(
        "Listed {} candidate(s) with extension '{}' in {}",
        records.len(),
        config.extension(),
        root.display()
    );

    Ok(records)
}

/// Check that the scan root exists and is a directory.
fn validate_root(root: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(root).map_err(|e| io_to_scan_error(root.to_path_buf(), e))?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(ScanError::NotADirectory(root.to_path_buf()))
    }
}

fn io_to_scan_error(path: PathBuf, err: io::Error) -> ScanError {
    match err.kind() {
        io::ErrorKind::NotFound => ScanError::NotFound(path),
        io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
        _ => ScanError::Io { path, source: err },
    }
}

fn walk_error_to_scan_error(root: &Path, err: walkdir::Error) -> ScanError {
    let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    match err.into_io_error() {
        Some(io_err) => io_to_scan_error(path, io_err),
        None => ScanError::Io {
            path,
            source: io::Error::other("filesystem loop detected"),
        },
    }
}
