//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Digest-based grouping with existence revalidation
//! - Deterministic survivor selection
//! - The scan pipeline tying listing, hashing and grouping together

pub mod finder;
pub mod groups;
pub mod selector;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary, HASH_PHASE};
pub use groups::{group_by_digest, revalidate, revalidate_with, DuplicateSet, GroupingStats};
pub use selector::{compare_for_survival, rank, select_survivor, Selection};
