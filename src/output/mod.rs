//! Rendering of scans, plans and execution results.
//!
//! - [`text`] for the interactive terminal flow
//! - [`json`] for scripting
//!
//! The helpers here format file metadata the same way for both.
//!
//! # Example
//!
//! ```
//! use pdfdupe::output::format_size;
//!
//! assert_eq!(format_size(512), "512 B");
//! assert_eq!(format_size(1536), "1.50 KB");
//! ```

pub mod json;
pub mod text;

use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::scanner::FileRecord;

pub use json::{JsonOutput, JsonOutputError};
pub use text::{OutcomePrinter, TextOutput};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Format a byte count with 1024-based units and two decimals above bytes.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    }
}

/// Format a modification time in local time as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// One-line metadata summary shown next to a path in the plan.
#[must_use]
pub fn describe(record: &FileRecord) -> String {
    format!(
        "(Size: {}, Mod: {}, Name: '{}')",
        format_size(record.size),
        format_modified(record.modified),
        record.file_name()
    )
}
