//! Application driver: CLI settings in, exit code out.
//!
//! [`run_app`] resolves configuration, the folder and the confirmation gate,
//! then hands off to [`Pipeline::run`], which does the list → hash → plan →
//! confirm → execute sequence against injectable I/O.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::actions::{
    execute_if_confirmed, plan, AssumeNo, AssumeYes, ConfirmationGate, DeletionPlan,
    ExecuteCallback, ExecutionReport, FileRemover, FsRemover, GateResult, PromptGate,
};
use crate::cli::{clean_prompted_path, Cli, OutputFormat};
use crate::config::{require_config_path, Config};
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use crate::error::ExitCode;
use crate::output::{JsonOutput, OutcomePrinter, TextOutput};
use crate::progress::Progress;
use crate::scanner::{list_candidates, HashError, ScanConfig};
use crate::signal;

/// A configured scan-and-delete run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Candidate selection, hashing, progress and interrupt settings
    pub finder_config: FinderConfig,
    /// Renderer used for text output
    pub text: TextOutput,
    /// Text or JSON
    pub format: OutputFormat,
}

impl Pipeline {
    /// Run against `root`, asking `gate` once and deleting through `remover`.
    ///
    /// Everything meant for the operator goes to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable folder, an interrupted scan, or a
    /// failure to write output or read the confirmation.
    pub fn run<G, R, W>(
        &self,
        root: &Path,
        gate: &mut G,
        remover: &R,
        out: &mut W,
    ) -> Result<ExitCode>
    where
        G: ConfirmationGate + ?Sized,
        R: FileRemover + ?Sized,
        W: Write,
    {
        let text = self.format == OutputFormat::Text;

        let records =
            list_candidates(root, &self.finder_config.scan).map_err(FinderError::from)?;
        if records.is_empty() {
            log::info!("No candidates in {}", root.display());
            if text {
                self.text.write_no_candidates(out, root)?;
            }
            let empty = DeletionPlan::default();
            return self.finish_json(out, &empty, &[], None, ExitCode::NothingToDo);
        }

        if text {
            self.text.write_scan_header(out, records.len())?;
        }

        let finder = DuplicateFinder::new(self.finder_config.clone());
        let (sets, summary) = finder.find_from_records(records)?;

        if text {
            self.text.write_hash_complete(out)?;
            self.text.write_hash_errors(out, &summary.hash_errors)?;
        }

        if sets.is_empty() {
            if text {
                self.text.write_no_duplicates(out)?;
            }
            return self.finish_json(
                out,
                &DeletionPlan::default(),
                &summary.hash_errors,
                None,
                ExitCode::NothingToDo,
            );
        }

        let plan = plan(sets);
        if text {
            self.text.write_plan(out, &plan)?;
            out.flush()?;
        }

        let printer = if text {
            Some(OutcomePrinter::new(self.text.clone(), &mut *out))
        } else {
            None
        };
        let callback = printer.as_ref().map(|p| p as &dyn ExecuteCallback);
        let mut guarded = InterruptGuard {
            inner: gate,
            flag: self.finder_config.shutdown_flag.as_deref(),
            tripped: false,
        };
        let result = execute_if_confirmed(&plan, &mut guarded, remover, callback)
            .context("Failed to read confirmation")?;
        let interrupted = guarded.tripped;
        drop(printer);

        if interrupted {
            log::info!("Interrupted at confirmation, nothing deleted");
            return Err(FinderError::Interrupted.into());
        }

        let partial = summary.has_errors();
        match result {
            GateResult::NothingToDo => {
                self.finish_json(out, &plan, &summary.hash_errors, None, ExitCode::NothingToDo)
            }
            GateResult::Cancelled => {
                if text {
                    self.text.write_cancelled(out)?;
                }
                self.finish_json(out, &plan, &summary.hash_errors, None, ExitCode::Cancelled)
            }
            GateResult::Executed(report) => {
                let code = if report.all_succeeded() && !partial {
                    ExitCode::Success
                } else {
                    ExitCode::PartialSuccess
                };
                log::info!(
                    "Deleted {} file(s), {} already gone, {} failed",
                    report.deleted_count,
                    report.skipped_count,
                    report.failed_count
                );
                if text {
                    self.text.write_report(out, &report)?;
                }
                self.finish_json(out, &plan, &summary.hash_errors, Some(&report), code)
            }
        }
    }

    fn finish_json<W: Write>(
        &self,
        out: &mut W,
        plan: &DeletionPlan,
        hash_errors: &[HashError],
        report: Option<&ExecutionReport>,
        code: ExitCode,
    ) -> Result<ExitCode> {
        if self.format == OutputFormat::Json {
            JsonOutput::new(plan, hash_errors, report, code).write_to(out, true)?;
        }
        Ok(code)
    }
}

/// Refuses the plan when Ctrl+C arrived before or during the prompt, even
/// if the operator then answered `yes`.
struct InterruptGuard<'a, G: ?Sized> {
    inner: &'a mut G,
    flag: Option<&'a AtomicBool>,
    tripped: bool,
}

impl<G: ConfirmationGate + ?Sized> InterruptGuard<'_, G> {
    fn raised(&self) -> bool {
        self.flag.is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

impl<G: ConfirmationGate + ?Sized> ConfirmationGate for InterruptGuard<'_, G> {
    fn confirm(&mut self, plan: &DeletionPlan) -> io::Result<bool> {
        if self.raised() {
            self.tripped = true;
            return Ok(false);
        }
        let approved = self.inner.confirm(plan)?;
        if self.raised() {
            self.tripped = true;
            return Ok(false);
        }
        Ok(approved)
    }
}

/// Ask for the folder to scan on `output` and read it from `input`.
///
/// # Errors
///
/// Returns an error if nothing usable is entered.
pub fn prompt_for_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    kind: &str,
) -> Result<PathBuf> {
    write!(output, "Enter the path to the folder containing {} files: ", kind)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("No folder path given");
    }
    let path = clean_prompted_path(&line);
    if path.as_os_str().is_empty() {
        bail!("No folder path given");
    }
    Ok(path)
}

/// Run the application with parsed CLI arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unusable folder, an
/// interrupted scan, or failed terminal I/O.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    crate::logging::init_logging(cli.verbose, cli.quiet, !cli.no_color);

    let mut config = Config::load(cli.config.as_deref());
    config.merge_cli(&cli);
    let config = config.validate().context("Invalid configuration")?;
    log::debug!("Effective configuration: {:?}", config);

    if cli.write_config {
        let path = match cli.config.clone() {
            Some(path) => path,
            None => require_config_path()?,
        };
        config.save(&path)?;
        log::info!("Configuration written to {}", path.display());
        return Ok(ExitCode::Success);
    }

    let kind = config.extension.to_uppercase();
    let root = match cli.path.clone() {
        Some(path) => path,
        None => prompt_for_path(&mut io::stdin().lock(), &mut io::stdout(), &kind)?,
    };

    let handler = signal::install_handler()?;
    let json = cli.output == OutputFormat::Json;
    let progress = Progress::new(cli.quiet || json).plain(!config.color);

    let finder_config = FinderConfig::default()
        .with_scan_config(ScanConfig::with_extension(&config.extension))
        .with_buffer_size(config.buffer_size)
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(Arc::new(progress));

    let pipeline = Pipeline {
        finder_config,
        text: TextOutput::new(config.color).with_kind(&config.extension),
        format: cli.output,
    };

    // JSON without --yes never prompts, so scripted runs cannot hang.
    let mut gate: Box<dyn ConfirmationGate> = if cli.dry_run || (json && !cli.yes) {
        Box::new(AssumeNo)
    } else if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(PromptGate::stdio())
    };

    let mut out = io::stdout();
    let code = pipeline.run(&root, gate.as_mut(), &FsRemover, &mut out)?;
    out.flush()?;
    Ok(code)
}
