//! Plan execution.
//!
//! # Overview
//!
//! Each delete candidate moves through an explicit state machine:
//!
//! ```text
//! Planned --absent--> Finished(SkippedAlreadyGone)
//! Planned --present--> Present --removed--> Finished(Deleted)
//!                              --vanished-> Finished(SkippedAlreadyGone)
//!                              --error----> Finished(Failed(reason))
//! ```
//!
//! A failure on one file never stops the batch. Keep files are only checked
//! for existence (for the kept count) and are never touched.
//!
//! Filesystem access goes through [`FileRemover`] so the race and failure
//! transitions can be driven in tests; [`FsRemover`] is the real one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::confirm::ConfirmationGate;
use super::DeletionPlan;
use crate::scanner::FileRecord;

/// Error type for a single removal.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (deleted or moved since planning).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O error raised while removing `path`.
    #[must_use]
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Filesystem operations needed by the executor.
pub trait FileRemover {
    /// Whether `path` currently exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError`] if the file could not be removed.
    fn remove(&self, path: &Path) -> Result<(), DeleteError>;
}

/// Removes files from the real filesystem, permanently.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl FileRemover for FsRemover {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove(&self, path: &Path) -> Result<(), DeleteError> {
        fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))
    }
}

/// Terminal result of one delete candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The file was removed.
    Deleted,
    /// The file was already gone when execution reached it.
    SkippedAlreadyGone,
    /// Removal failed; the reason is the OS error text.
    Failed(String),
}

/// Per-candidate execution state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateState {
    /// Not yet examined.
    Planned,
    /// Confirmed present; removal not yet attempted.
    Present,
    /// Terminal.
    Finished(ExecutionOutcome),
}

impl CandidateState {
    /// Advance one transition. Terminal states are returned unchanged.
    #[must_use]
    pub fn step<R: FileRemover + ?Sized>(self, path: &Path, remover: &R) -> Self {
        match self {
            Self::Planned => {
                if remover.exists(path) {
                    Self::Present
                } else {
                    Self::Finished(ExecutionOutcome::SkippedAlreadyGone)
                }
            }
            Self::Present => match remover.remove(path) {
                Ok(()) => Self::Finished(ExecutionOutcome::Deleted),
                Err(DeleteError::NotFound(_)) => {
                    log::debug!("Vanished before removal: {}", path.display());
                    Self::Finished(ExecutionOutcome::SkippedAlreadyGone)
                }
                Err(e) => {
                    log::warn!("Failed to delete {}: {}", path.display(), e);
                    Self::Finished(ExecutionOutcome::Failed(e.to_string()))
                }
            },
            finished @ Self::Finished(_) => finished,
        }
    }

    /// Whether this state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// Drive one candidate from `Planned` to a terminal outcome.
pub fn execute_candidate<R: FileRemover + ?Sized>(path: &Path, remover: &R) -> ExecutionOutcome {
    let mut state = CandidateState::Planned;
    loop {
        state = match state {
            CandidateState::Finished(outcome) => return outcome,
            other => other.step(path, remover),
        };
    }
}

/// Outcome for one file of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    /// Path that was processed
    pub path: PathBuf,
    /// Size recorded at scan time
    pub size: u64,
    /// What happened
    pub outcome: ExecutionOutcome,
}

/// Results of executing a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// One entry per delete candidate, in plan order
    pub outcomes: Vec<ItemOutcome>,
    /// Keep files still present after execution
    pub kept_count: usize,
    /// Files removed
    pub deleted_count: usize,
    /// Files already gone
    pub skipped_count: usize,
    /// Files that could not be removed
    pub failed_count: usize,
    /// Bytes freed by removed files (scan-time sizes)
    pub bytes_freed: u64,
}

impl ExecutionReport {
    fn record(&mut self, item: ItemOutcome) {
        match item.outcome {
            ExecutionOutcome::Deleted => {
                self.deleted_count += 1;
                self.bytes_freed += item.size;
            }
            ExecutionOutcome::SkippedAlreadyGone => self.skipped_count += 1,
            ExecutionOutcome::Failed(_) => self.failed_count += 1,
        }
        self.outcomes.push(item);
    }

    /// Check if no removal failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed_count == 0
    }

    /// Human-readable summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Deletion complete. {} file(s) deleted.", self.deleted_count)
    }
}

/// Callback for per-item execution reporting.
pub trait ExecuteCallback {
    /// Called before a candidate is processed.
    fn on_before_delete(&self, _path: &Path, _index: usize, _total: usize) {}

    /// Called once a candidate reaches its terminal outcome.
    fn on_outcome(&self, item: &ItemOutcome);
}

/// Execute a plan against the real filesystem.
#[must_use]
pub fn execute_plan(
    plan: &DeletionPlan,
    callback: Option<&dyn ExecuteCallback>,
) -> ExecutionReport {
    execute_plan_with(plan, &FsRemover, callback)
}

/// Execute a plan with a caller-supplied [`FileRemover`].
#[must_use]
pub fn execute_plan_with<R: FileRemover + ?Sized>(
    plan: &DeletionPlan,
    remover: &R,
    callback: Option<&dyn ExecuteCallback>,
) -> ExecutionReport {
    let mut report = ExecutionReport::default();
    let total = plan.total_to_delete;
    let mut index = 0;

    for entry in &plan.entries {
        if remover.exists(&entry.keep.path) {
            report.kept_count += 1;
        } else {
            log::warn!("Keep file is missing: {}", entry.keep.path.display());
        }

        for candidate in &entry.delete {
            if let Some(cb) = callback {
                cb.on_before_delete(&candidate.path, index, total);
            }
            index += 1;

            let item = run_item(candidate, remover);
            if let Some(cb) = callback {
                cb.on_outcome(&item);
            }
            report.record(item);
        }
    }

    log::debug!(
        "Execution finished: {} deleted, {} already gone, {} failed",
        report.deleted_count,
        report.skipped_count,
        report.failed_count
    );

    report
}

fn run_item<R: FileRemover + ?Sized>(candidate: &FileRecord, remover: &R) -> ItemOutcome {
    let outcome = execute_candidate(&candidate.path, remover);
    if outcome == ExecutionOutcome::Deleted {
        log::debug!("Deleted: {} ({} bytes)", candidate.path.display(), candidate.size);
    }
    ItemOutcome {
        path: candidate.path.clone(),
        size: candidate.size,
        outcome,
    }
}

/// What became of a plan after the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// The plan had nothing to delete; the gate was not consulted.
    NothingToDo,
    /// The operator declined; nothing was touched.
    Cancelled,
    /// The operator approved and the plan ran.
    Executed(ExecutionReport),
}

/// Consult the gate once and, on approval, execute the whole plan.
///
/// # Errors
///
/// Returns an I/O error if the gate cannot ask the operator.
pub fn execute_if_confirmed<G, R>(
    plan: &DeletionPlan,
    gate: &mut G,
    remover: &R,
    callback: Option<&dyn ExecuteCallback>,
) -> io::Result<GateResult>
where
    G: ConfirmationGate + ?Sized,
    R: FileRemover + ?Sized,
{
    if !plan.is_actionable() {
        return Ok(GateResult::NothingToDo);
    }

    if !gate.confirm(plan)? {
        log::debug!("Plan with {} deletion(s) cancelled", plan.total_to_delete);
        return Ok(GateResult::Cancelled);
    }

    Ok(GateResult::Executed(execute_plan_with(plan, remover, callback)))
}
