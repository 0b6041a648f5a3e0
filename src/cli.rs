//! Command-line interface definitions for pdfdupe.
//!
//! # Example
//!
//! ```bash
//! # Scan a folder, review the plan, answer "yes" to delete
//! pdfdupe ~/Papers
//!
//! # No path: the folder is asked for interactively
//! pdfdupe
//!
//! # Show the plan as JSON without deleting anything
//! pdfdupe ~/Papers --output json --dry-run
//!
//! # Deduplicate text files instead of PDFs, no prompt
//! pdfdupe ~/notes --extension txt --yes
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find duplicate PDF files by content and delete the extra copies.
///
/// Files directly inside PATH are hashed; for each set of identical files the
/// oldest (then shortest-named) copy is kept and the rest are deleted after a
/// single confirmation.
#[derive(Debug, Parser)]
#[command(name = "pdfdupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to scan (prompted for when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress and log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// File extension that selects candidates (default: pdf)
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Read buffer used while hashing (e.g. 64KiB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_buffer_size)]
    pub buffer_size: Option<usize>,

    /// Output format for the plan and results
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Show the plan but never prompt or delete
    #[arg(long, conflicts_with = "yes")]
    pub dry_run: bool,

    /// Approve the plan without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Configuration file to read instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub write_config: bool,
}

/// Output format for the plan and execution results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB (case-insensitive).
/// Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use pdfdupe::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("64KiB").unwrap(), 65536);
/// ```
///
/// # Errors
///
/// Returns an error for an empty string, an invalid or negative number,
/// or an unknown suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1 << 10,
        "MB" | "M" => 1_000_000,
        "MIB" => 1 << 20,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1 << 30,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

/// [`parse_size`] for the hashing buffer: non-zero and fits in `usize`.
///
/// # Errors
///
/// Returns an error if the size is zero or does not parse.
pub fn parse_buffer_size(s: &str) -> Result<usize, String> {
    let bytes = parse_size(s)?;
    if bytes == 0 {
        return Err("Buffer size must be at least 1 byte".to_string());
    }
    usize::try_from(bytes).map_err(|_| format!("Buffer size too large: {bytes}"))
}

/// Clean up a folder path typed at the prompt: trim whitespace and one
/// pair of surrounding quotes (as left by drag-and-drop into a terminal).
#[must_use]
pub fn clean_prompted_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);
    PathBuf::from(unquoted)
}
