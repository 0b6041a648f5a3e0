//! Duplicate finder orchestrating the scan pipeline.
//!
//! # Overview
//!
//! [`DuplicateFinder::find`] runs the detection steps in order:
//! 1. **List** - flat listing of candidate files (see [`crate::scanner::lister`])
//! 2. **Hash** - stream each candidate through the [`Hasher`], one at a time
//! 3. **Group** - group by digest (see [`crate::duplicates::groups`])
//! 4. **Revalidate** - drop members that vanished since hashing
//!
//! A file that fails to hash is excluded from grouping and reported in
//! [`ScanSummary::hash_errors`]; the scan carries on with the rest.
//!
//! # Example
//!
//! ```no_run
//! use pdfdupe::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (sets, summary) = finder.find(Path::new("/home/user/Papers")).unwrap();
//!
//! println!("{} candidate(s), {} duplicate set(s)", summary.candidates, sets.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::groups::{group_by_digest, revalidate, DuplicateSet};
use crate::progress::ProgressCallback;
use crate::scanner::{list_candidates, FileRecord, HashError, Hasher, ScanConfig, ScanError};

/// Phase name reported to progress callbacks while hashing.
pub const HASH_PHASE: &str = "hashing";

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Candidate selection
    pub scan: ScanConfig,
    /// Read buffer size for hashing; `None` uses the hasher default
    pub buffer_size: Option<usize>,
    /// Optional shutdown flag checked between files while hashing
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("scan", &self.scan)
            .field("buffer_size", &self.buffer_size)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the candidate selection.
    #[must_use]
    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    /// Set the hashing buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics and per-file failures from a scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Candidate files found by the listing
    pub candidates: usize,
    /// Candidates hashed successfully
    pub hashed: usize,
    /// Candidates that could not be hashed, in scan order
    pub hash_errors: Vec<HashError>,
    /// Duplicate sets remaining after revalidation
    pub duplicate_sets: usize,
    /// Files across those sets
    pub duplicate_files: usize,
    /// Files dropped by revalidation because they vanished after hashing
    pub vanished: usize,
    /// Bytes held by redundant copies
    pub reclaimable_space: u64,
    /// Wall-clock time of the scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Whether any candidate failed to hash.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.hash_errors.is_empty()
    }
}

/// Errors that end a scan early.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Folder not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Any other listing failure.
    #[error(transparent)]
    Scan(ScanError),
}

impl From<ScanError> for FinderError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotFound(p) => Self::PathNotFound(p),
            ScanError::NotADirectory(p) => Self::NotADirectory(p),
            other => Self::Scan(other),
        }
    }
}

impl FinderError {
    /// Whether this error means the scan root was unusable.
    #[must_use]
    pub fn is_directory_error(&self) -> bool {
        matches!(self, Self::PathNotFound(_) | Self::NotADirectory(_))
    }
}

/// Runs the list → hash → group → revalidate pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(size) = config.buffer_size {
            hasher = hasher.with_buffer_size(size);
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    fn is_shutdown_requested(&self) -> bool {
        self.config
            .shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Scan `root` and return the duplicate sets that still exist on disk.
    ///
    /// An empty candidate list is not an error: the summary reports
    /// `candidates == 0` and no sets are returned.
    ///
    /// # Errors
    ///
    /// - [`FinderError::PathNotFound`] / [`FinderError::NotADirectory`] for a bad root
    /// - [`FinderError::Interrupted`] if the shutdown flag is raised while hashing
    /// - [`FinderError::Scan`] if the root cannot be listed
    pub fn find(&self, root: &Path) -> Result<(Vec<DuplicateSet>, ScanSummary), FinderError> {
        let start = Instant::now();
        let records = list_candidates(root, &self.config.scan)?;
        self.find_in_records(records, start)
    }

    /// Run hashing, grouping and revalidation over an already-listed set of records.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if the shutdown flag is raised.
    pub fn find_from_records(
        &self,
        records: Vec<FileRecord>,
    ) -> Result<(Vec<DuplicateSet>, ScanSummary), FinderError> {
        self.find_in_records(records, Instant::now())
    }

    fn find_in_records(
        &self,
        records: Vec<FileRecord>,
        start: Instant,
    ) -> Result<(Vec<DuplicateSet>, ScanSummary), FinderError> {
        let mut summary = ScanSummary {
            candidates: records.len(),
            ..ScanSummary::default()
        };

        if records.is_empty() {
            summary.scan_duration = start.elapsed();
            return Ok((Vec::new(), summary));
        }

        let (hashed, errors) = self.hash_records(records)?;
        summary.hashed = hashed.len();
        summary.hash_errors = errors;

        let (sets, stats) = group_by_digest(hashed);
        let sets = revalidate(sets);

        let remaining: usize = sets.iter().map(DuplicateSet::len).sum();
        summary.vanished = stats.duplicate_files - remaining;
        summary.duplicate_sets = sets.len();
        summary.duplicate_files = remaining;
        summary.reclaimable_space = sets.iter().map(DuplicateSet::wasted_space).sum();
        summary.scan_duration = start.elapsed();

        log::debug!(
            "Scan complete: {} candidate(s), {} hashed, {} failed, {} duplicate set(s) in {:?}",
            summary.candidates,
            summary.hashed,
            summary.hash_errors.len(),
            summary.duplicate_sets,
            summary.scan_duration
        );

        Ok((sets, summary))
    }

    /// Hash records sequentially, returning the hashed records and the failures.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if the shutdown flag is raised.
    pub fn hash_records(
        &self,
        records: Vec<FileRecord>,
    ) -> Result<(Vec<FileRecord>, Vec<HashError>), FinderError> {
        let total = records.len();
        let callback = self.config.progress_callback.as_deref();
        if let Some(cb) = callback {
            cb.on_phase_start(HASH_PHASE, total);
        }

        let mut hashed = Vec::with_capacity(total);
        let mut errors = Vec::new();

        for (i, record) in records.into_iter().enumerate() {
            if self.is_shutdown_requested() {
                log::debug!("Hashing: shutdown requested after {} file(s)", i);
                if let Some(cb) = callback {
                    cb.on_phase_end(HASH_PHASE);
                }
                return Err(FinderError::Interrupted);
            }

            if let Some(cb) = callback {
                cb.on_progress(i + 1, &record.file_name());
            }

            match self.hasher.hash(&record.path) {
                Ok(digest) => {
                    if let Some(cb) = callback {
                        cb.on_item_completed(record.size);
                    }
                    hashed.push(record.with_digest(digest));
                }
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", record.path.display(), e);
                    errors.push(e);
                }
            }
        }

        if let Some(cb) = callback {
            cb.on_phase_end(HASH_PHASE);
        }

        Ok((hashed, errors))
    }
}
