//! Scanner module for candidate discovery and content hashing.
//!
//! This module provides functionality for:
//! - Flat (non-recursive) listing of a single directory
//! - Extension-based candidate selection (`.pdf` by default)
//! - Streaming content hashing with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`lister`]: Directory listing and candidate selection
//! - [`hasher`]: BLAKE3 file hashing (streaming, bounded buffer)
//!
//! # Example
//!
//! ```no_run
//! use pdfdupe::scanner::{list_candidates, Hasher, ScanConfig};
//! use std::path::Path;
//!
//! let records = list_candidates(Path::new("."), &ScanConfig::default()).unwrap();
//! let hasher = Hasher::new();
//! for record in &records {
//!     match hasher.hash(&record.path) {
//!         Ok(digest) => {
//!             let hex = pdfdupe::scanner::digest_to_hex(&digest);
//!             println!("{}  {}", hex, record.path.display());
//!         }
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod lister;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// Re-export main types
pub use hasher::{digest_to_hex, Digest, Hasher, DEFAULT_BUFFER_SIZE};
pub use lister::list_candidates;

/// The extension selected when nothing else is configured.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// One candidate file discovered during a scan.
///
/// Created by the lister, enriched with a digest by the hasher and never
/// mutated afterwards. The path is the unique key within a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file (root joined with the entry name)
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Content digest, `None` until hashed or if hashing failed
    pub digest: Option<Digest>,
}

impl FileRecord {
    /// Create a new record without a digest.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
            digest: None,
        }
    }

    /// Return this record with its content digest attached.
    #[must_use]
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Final path component, lossily converted for display and ranking.
    #[must_use]
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map_or(Cow::Borrowed(""), |n| n.to_string_lossy())
    }

    /// Length of the file name in characters (not bytes).
    #[must_use]
    pub fn name_len(&self) -> usize {
        self.file_name().chars().count()
    }

    /// Whether the underlying file is still present on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Configuration for candidate selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Extension that selects candidates, stored lower-case without a leading dot.
    extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ScanConfig {
    /// Create a configuration selecting files with the given extension.
    ///
    /// A leading dot is ignored and matching is case-insensitive, so
    /// `".PDF"`, `"pdf"` and `"Pdf"` are equivalent.
    #[must_use]
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: normalize_extension(extension),
        }
    }

    /// The normalized extension (lower-case, no leading dot).
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Check whether a path carries the selected extension.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.extension)
            .unwrap_or(false)
    }
}

/// Normalize a user-supplied extension: trim, drop leading dots, lower-case.
#[must_use]
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// Errors that can occur while listing the scan directory.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Permission was denied when listing the directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while listing the directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file disappeared before or while it was read.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Path of the file that failed to hash.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
