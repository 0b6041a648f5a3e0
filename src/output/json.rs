//! JSON output for scripting.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "sets": [
//!     {
//!       "hash": "abc123...",
//!       "keep": { "path": "/d/a.pdf", "size": 1024, "modified": "2024-01-01 10:00:00" },
//!       "delete": [ { "path": "/d/b.pdf", "size": 1024, "modified": "2024-02-01 10:00:00" } ]
//!     }
//!   ],
//!   "total_to_delete": 1,
//!   "reclaimable_bytes": 1024,
//!   "hash_errors": [],
//!   "executed": false,
//!   "report": null,
//!   "exit_code": 4,
//!   "exit_code_name": "PD004"
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use pdfdupe::actions::DeletionPlan;
//! use pdfdupe::error::ExitCode;
//! use pdfdupe::output::json::JsonOutput;
//!
//! let output = JsonOutput::new(&DeletionPlan::default(), &[], None, ExitCode::NothingToDo);
//! let json = output.to_json().unwrap();
//! assert!(json.contains("\"total_to_delete\":0"));
//! ```

use std::io::Write;

use serde::Serialize;

use super::format_modified;
use crate::actions::{
    DeletionPlan, DeletionPlanEntry, ExecutionOutcome, ExecutionReport, ItemOutcome,
};
use crate::error::ExitCode;
use crate::scanner::{FileRecord, HashError};

/// One file in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as scanned
    pub path: String,
    /// Size in bytes at scan time
    pub size: u64,
    /// Local modification time, `YYYY-MM-DD HH:MM:SS`
    pub modified: String,
}

impl From<&FileRecord> for JsonFile {
    fn from(record: &FileRecord) -> Self {
        Self {
            path: record.path.to_string_lossy().into_owned(),
            size: record.size,
            modified: format_modified(record.modified),
        }
    }
}

/// One duplicate set with its decision.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSet {
    /// BLAKE3 digest as hexadecimal string (64 characters)
    pub hash: String,
    /// The survivor
    pub keep: JsonFile,
    /// Copies to delete, in rank order
    pub delete: Vec<JsonFile>,
}

impl From<&DeletionPlanEntry> for JsonSet {
    fn from(entry: &DeletionPlanEntry) -> Self {
        Self {
            hash: entry.digest_hex(),
            keep: JsonFile::from(&entry.keep),
            delete: entry.delete.iter().map(JsonFile::from).collect(),
        }
    }
}

/// A file that could not be hashed.
#[derive(Debug, Clone, Serialize)]
pub struct JsonHashError {
    /// Path of the unreadable file
    pub path: String,
    /// Reason
    pub error: String,
}

/// Result for one delete candidate.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutcome {
    /// Path that was processed
    pub path: String,
    /// `deleted`, `skipped_already_gone` or `failed`
    pub status: &'static str,
    /// Failure reason, for `failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ItemOutcome> for JsonOutcome {
    fn from(item: &ItemOutcome) -> Self {
        let (status, error) = match &item.outcome {
            ExecutionOutcome::Deleted => ("deleted", None),
            ExecutionOutcome::SkippedAlreadyGone => ("skipped_already_gone", None),
            ExecutionOutcome::Failed(reason) => ("failed", Some(reason.clone())),
        };
        Self {
            path: item.path.to_string_lossy().into_owned(),
            status,
            error,
        }
    }
}

/// Execution results in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// Files removed
    pub deleted: usize,
    /// Files already gone at execution time
    pub skipped_already_gone: usize,
    /// Files that could not be removed
    pub failed: usize,
    /// Keep files still present
    pub kept: usize,
    /// Bytes freed
    pub bytes_freed: u64,
    /// Per-candidate results, in plan order
    pub outcomes: Vec<JsonOutcome>,
}

impl From<&ExecutionReport> for JsonReport {
    fn from(report: &ExecutionReport) -> Self {
        Self {
            deleted: report.deleted_count,
            skipped_already_gone: report.skipped_count,
            failed: report.failed_count,
            kept: report.kept_count,
            bytes_freed: report.bytes_freed,
            outcomes: report.outcomes.iter().map(JsonOutcome::from).collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// One entry per duplicate set
    pub sets: Vec<JsonSet>,
    /// Number of files the plan deletes
    pub total_to_delete: usize,
    /// Bytes freed if every deletion succeeds
    pub reclaimable_bytes: u64,
    /// Files excluded because they could not be read
    pub hash_errors: Vec<JsonHashError>,
    /// Whether the plan was executed
    pub executed: bool,
    /// Execution results, when executed
    pub report: Option<JsonReport>,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "PD000")
    pub exit_code_name: String,
}

impl JsonOutput {
    /// Create the output for a plan and, if it ran, its report.
    #[must_use]
    pub fn new(
        plan: &DeletionPlan,
        hash_errors: &[HashError],
        report: Option<&ExecutionReport>,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            sets: plan.entries.iter().map(JsonSet::from).collect(),
            total_to_delete: plan.total_to_delete,
            reclaimable_bytes: plan.reclaimable_bytes(),
            hash_errors: hash_errors
                .iter()
                .map(|e| JsonHashError {
                    path: e.path().to_string_lossy().into_owned(),
                    error: e.to_string(),
                })
                .collect(),
            executed: report.is_some(),
            report: report.map(JsonReport::from),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
