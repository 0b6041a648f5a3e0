//! pdfdupe - Duplicate PDF Remover
//!
//! Finds files with identical content in a single folder using BLAKE3
//! hashing, keeps the oldest copy of each (shortest name on ties) and
//! deletes the rest after one confirmation for the whole batch.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

pub use app::{run_app, Pipeline};
