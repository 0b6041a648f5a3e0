//! The single batch confirmation gate.
//!
//! Execution of a plan is all-or-nothing at the batch level: the operator
//! sees the total deletion count and answers once. Only `yes` (any case,
//! surrounding whitespace ignored) proceeds; any other answer, including an
//! empty line or end of input, cancels.

use std::io::{self, BufRead, Write};

use super::DeletionPlan;

/// The only accepted affirmative response.
pub const AFFIRMATIVE: &str = "yes";

/// Check whether a response to the prompt is affirmative.
///
/// # Examples
///
/// ```
/// use pdfdupe::actions::is_affirmative;
///
/// assert!(is_affirmative("YES\n"));
/// assert!(!is_affirmative("y"));
/// assert!(!is_affirmative("no"));
/// ```
#[must_use]
pub fn is_affirmative(response: &str) -> bool {
    response.trim().eq_ignore_ascii_case(AFFIRMATIVE)
}

/// Build the prompt shown for a plan.
#[must_use]
pub fn prompt_text(plan: &DeletionPlan) -> String {
    format!(
        "Proceed with deleting these {} files? (yes/no): ",
        plan.total_to_delete
    )
}

/// Something that can approve or refuse a whole plan.
pub trait ConfirmationGate {
    /// Ask once whether `plan` may be executed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the operator cannot be asked.
    fn confirm(&mut self, plan: &DeletionPlan) -> io::Result<bool>;
}

/// Prompts on a writer and reads one line from a reader.
pub struct PromptGate<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptGate<R, W> {
    /// Create a gate over arbitrary input and output streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptGate<io::StdinLock<'static>, io::Stdout> {
    /// Create a gate on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for PromptGate<R, W> {
    fn confirm(&mut self, plan: &DeletionPlan) -> io::Result<bool> {
        write!(self.output, "{}", prompt_text(plan))?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            log::debug!("No response on input, treating as cancellation");
            // keep the terminal tidy after an EOF at the prompt
            writeln!(self.output)?;
            return Ok(false);
        }

        let approved = is_affirmative(&line);
        log::debug!("Confirmation response {:?} -> {}", line.trim(), approved);
        Ok(approved)
    }
}

/// Approves every plan without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ConfirmationGate for AssumeYes {
    fn confirm(&mut self, plan: &DeletionPlan) -> io::Result<bool> {
        log::debug!(
            "Confirmation skipped: approving {} deletion(s)",
            plan.total_to_delete
        );
        Ok(true)
    }
}

/// Refuses every plan without asking (`--dry-run`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl ConfirmationGate for AssumeNo {
    fn confirm(&mut self, _plan: &DeletionPlan) -> io::Result<bool> {
        Ok(false)
    }
}
