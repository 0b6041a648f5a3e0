//! Plan, confirm, execute.
//!
//! This module provides the destructive half of the tool:
//! - [`plan`](mod@plan): one keep/delete decision per duplicate set
//! - [`confirm`]: the single yes/no gate in front of the whole batch
//! - [`execute`]: per-file removal with tolerance for files that vanished
//!
//! Deletion is permanent; there is no trash or undo.
//!
//! ```no_run
//! use pdfdupe::actions::{execute_if_confirmed, plan, FsRemover, GateResult, PromptGate};
//! use pdfdupe::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let (sets, _summary) = DuplicateFinder::with_defaults().find(Path::new(".")).unwrap();
//! let plan = plan(sets);
//! let mut gate = PromptGate::stdio();
//! match execute_if_confirmed(&plan, &mut gate, &FsRemover, None).unwrap() {
//!     GateResult::Executed(report) => println!("{}", report.summary()),
//!     GateResult::Cancelled => println!("Deletion cancelled. No files were changed."),
//!     GateResult::NothingToDo => println!("Nothing to delete."),
//! }
//! ```

pub mod confirm;
pub mod execute;
pub mod plan;

// Re-export commonly used types
pub use confirm::{is_affirmative, prompt_text, AssumeNo, AssumeYes, ConfirmationGate, PromptGate};
pub use execute::{
    execute_candidate, execute_if_confirmed, execute_plan, execute_plan_with, CandidateState,
    DeleteError, ExecuteCallback, ExecutionOutcome, ExecutionReport, FileRemover, FsRemover,
    GateResult, ItemOutcome,
};
pub use plan::{plan, DeletionPlan, DeletionPlanEntry};
