//! Survivor selection within a duplicate set.
//!
//! Members are ranked by [`compare_for_survival`], a strict total order:
//!
//! 1. Last-modified time, oldest first (the oldest copy is taken as the original)
//! 2. File name length in characters, shortest first
//! 3. Full path, lexicographic by bytes
//!
//! Paths are unique within a scan, so the last key always separates two
//! distinct records. The first record in this order is kept; the rest, in
//! the same order, are slated for deletion.

use std::cmp::Ordering;

use super::DuplicateSet;
use crate::scanner::FileRecord;

/// Outcome of ranking one duplicate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The single survivor
    pub keep: FileRecord,
    /// Every other member, in rank order
    pub delete: Vec<FileRecord>,
}

/// Compare two records for survival ranking. `Less` means `a` is the
/// better candidate to keep.
#[must_use]
pub fn compare_for_survival(a: &FileRecord, b: &FileRecord) -> Ordering {
    a.modified
        .cmp(&b.modified)
        .then_with(|| a.name_len().cmp(&b.name_len()))
        .then_with(|| a.path.as_os_str().cmp(b.path.as_os_str()))
}

/// Sort records in place into survival rank order.
pub fn rank(files: &mut [FileRecord]) {
    files.sort_by(compare_for_survival);
}

/// Pick the survivor of a duplicate set.
#[must_use]
pub fn select_survivor(set: DuplicateSet) -> Selection {
    let mut files = set.into_files();
    rank(&mut files);

    // DuplicateSet guarantees at least two members.
    let keep = files.remove(0);
    log::trace!(
        "Keeping {} over {} other copy(ies)",
        keep.path.display(),
        files.len()
    );

    Selection {
        keep,
        delete: files,
    }
}
