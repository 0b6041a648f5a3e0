//! Human-readable terminal output.
//!
//! All writers take an explicit [`Write`] so the exact text can be checked
//! in tests; `run_app` passes stdout.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;

use yansi::{Color, Paint};

use super::describe;
use crate::actions::{DeletionPlan, ExecuteCallback, ExecutionOutcome, ExecutionReport, ItemOutcome};
use crate::scanner::HashError;

/// Text renderer.
#[derive(Debug, Clone)]
pub struct TextOutput {
    color: bool,
    kind: String,
}

impl Default for TextOutput {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TextOutput {
    /// Create a renderer, optionally colouring labels.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self {
            color,
            kind: "PDF".to_string(),
        }
    }

    /// Name the kind of file in messages after its extension (`txt` prints as `TXT`).
    #[must_use]
    pub fn with_kind(mut self, extension: &str) -> Self {
        self.kind = extension.to_uppercase();
        self
    }

    fn label(&self, text: &str, color: Color) -> String {
        if self.color {
            text.paint(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Print the count of candidates about to be hashed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_scan_header<W: Write>(&self, w: &mut W, candidates: usize) -> io::Result<()> {
        writeln!(w, "Found {} {} files. Calculating hashes...", candidates, self.kind)
    }

    /// Report an empty listing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_no_candidates<W: Write>(&self, w: &mut W, root: &Path) -> io::Result<()> {
        writeln!(w, "No {} files found in '{}'.", self.kind, root.display())
    }

    /// Report files that could not be read, one line each.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_hash_errors<W: Write>(&self, w: &mut W, errors: &[HashError]) -> io::Result<()> {
        for err in errors {
            writeln!(
                w,
                "{} {}: {}",
                self.label("Error reading file", Color::Red),
                err.path().display(),
                err
            )?;
        }
        Ok(())
    }

    /// Mark the end of hashing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_hash_complete<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "Hash calculation complete.")
    }

    /// Report that no duplicate set survived.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_no_duplicates<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "\nNo duplicate {} files found needing action.", self.kind)
    }

    /// Print the full plan, set by set, followed by the summary line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_plan<W: Write>(&self, w: &mut W, plan: &DeletionPlan) -> io::Result<()> {
        writeln!(w, "\n--- Deletion Plan ---")?;
        writeln!(
            w,
            "For each set of duplicates, one file will be kept \
             (oldest modification, then shortest name)."
        )?;

        for (i, entry) in plan.entries.iter().enumerate() {
            writeln!(w, "\nSet {} (Hash: {}):", i + 1, entry.digest_hex())?;
            writeln!(
                w,
                "  {} {} {}",
                self.label("KEEPING:", Color::Green),
                entry.keep.path.display(),
                describe(&entry.keep)
            )?;
            if entry.delete.is_empty() {
                writeln!(w, "  (No other files in this set to delete)")?;
                continue;
            }
            writeln!(w, "  {}", self.label("WILL DELETE:", Color::Red))?;
            for record in &entry.delete {
                writeln!(w, "    - {} {}", record.path.display(), describe(record))?;
            }
        }

        if !plan.is_actionable() {
            writeln!(
                w,
                "\nNo files are marked for deletion based on the criteria \
                 (e.g., duplicates already managed)."
            )?;
            return Ok(());
        }

        writeln!(
            w,
            "\n{} {} file(s) will be deleted.",
            self.label("SUMMARY:", Color::Yellow),
            plan.total_to_delete
        )
    }

    /// Mark the start of execution.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_execution_header<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "\n--- Performing Deletions ---")
    }

    /// One line per executed candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_outcome<W: Write>(&self, w: &mut W, item: &ItemOutcome) -> io::Result<()> {
        match &item.outcome {
            ExecutionOutcome::Deleted => writeln!(
                w,
                "  {} {}",
                self.label("DELETED:", Color::Green),
                item.path.display()
            ),
            ExecutionOutcome::SkippedAlreadyGone => writeln!(
                w,
                "  {} {}",
                self.label("SKIPPED (already gone):", Color::Yellow),
                item.path.display()
            ),
            ExecutionOutcome::Failed(reason) => writeln!(
                w,
                "  {} {}: {}",
                self.label("ERROR deleting", Color::Red),
                item.path.display(),
                reason
            ),
        }
    }

    /// Final count after execution.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_report<W: Write>(&self, w: &mut W, report: &ExecutionReport) -> io::Result<()> {
        writeln!(w, "\n{}", report.summary())?;
        if report.failed_count > 0 {
            writeln!(
                w,
                "{} file(s) could not be deleted.",
                self.label(&report.failed_count.to_string(), Color::Red)
            )?;
        }
        Ok(())
    }

    /// Report a declined plan.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_cancelled<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "Deletion cancelled. No files were changed.")
    }
}

/// Prints each outcome as execution reaches it, under a header printed
/// before the first candidate.
pub struct OutcomePrinter<W: Write> {
    output: TextOutput,
    out: RefCell<W>,
}

impl<W: Write> OutcomePrinter<W> {
    /// Print through `output` into `out`.
    pub fn new(output: TextOutput, out: W) -> Self {
        Self {
            output,
            out: RefCell::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> ExecuteCallback for OutcomePrinter<W> {
    fn on_before_delete(&self, _path: &Path, index: usize, _total: usize) {
        if index == 0 {
            if let Err(e) = self.output.write_execution_header(&mut *self.out.borrow_mut()) {
                log::warn!("Failed to print execution header: {}", e);
            }
        }
    }

    fn on_outcome(&self, item: &ItemOutcome) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = self.output.write_outcome(&mut *out, item) {
            log::warn!("Failed to print outcome for {}: {}", item.path.display(), e);
        }
    }
}
