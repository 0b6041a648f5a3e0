//! Deletion planning.
//!
//! # Overview
//!
//! [`plan`] runs the survivor selector over every duplicate set and gathers
//! the results into a [`DeletionPlan`]: one [`DeletionPlanEntry`] per set,
//! each holding exactly one keep and the ranked list of copies to delete.
//! Planning does no I/O; everything it needs was captured in the records.
//!
//! A plan with `total_to_delete == 0` is still returned so it can be shown,
//! but [`DeletionPlan::is_actionable`] is `false` and callers skip the
//! confirmation gate.
//!
//! # Example
//!
//! ```
//! use pdfdupe::actions::plan;
//! use pdfdupe::duplicates::DuplicateSet;
//! use pdfdupe::scanner::FileRecord;
//! use std::path::PathBuf;
//! use std::time::{Duration, SystemTime};
//!
//! let t0 = SystemTime::UNIX_EPOCH;
//! let t1 = t0 + Duration::from_secs(60);
//! let set = DuplicateSet::new([1; 32], vec![
//!     FileRecord::new(PathBuf::from("/d/b.pdf"), 1, t1).with_digest([1; 32]),
//!     FileRecord::new(PathBuf::from("/d/a.pdf"), 1, t0).with_digest([1; 32]),
//! ]).unwrap();
//!
//! let plan = plan(vec![set]);
//! assert_eq!(plan.total_to_delete, 1);
//! assert_eq!(plan.entries[0].keep.path, PathBuf::from("/d/a.pdf"));
//! ```

use std::path::PathBuf;

use crate::duplicates::{select_survivor, DuplicateSet};
use crate::scanner::{digest_to_hex, Digest, FileRecord};

/// The resolved decision for one duplicate set.
///
/// `keep` plus `delete` is exactly the set's membership, with no overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlanEntry {
    /// Digest shared by every member
    pub digest: Digest,
    /// The survivor
    pub keep: FileRecord,
    /// Copies to remove, in rank order
    pub delete: Vec<FileRecord>,
}

impl DeletionPlanEntry {
    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }

    /// Bytes freed if every planned deletion in this entry succeeds.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.delete.iter().map(|f| f.size).sum()
    }
}

/// The full set of keep/delete decisions for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    /// One entry per duplicate set
    pub entries: Vec<DeletionPlanEntry>,
    /// Sum of the delete-list lengths across all entries
    pub total_to_delete: usize,
}

impl DeletionPlan {
    /// Whether the plan has anything to delete.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.total_to_delete > 0
    }

    /// Whether the plan has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes freed if every planned deletion succeeds.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.entries.iter().map(DeletionPlanEntry::reclaimable_bytes).sum()
    }

    /// Every path slated for deletion, in plan order.
    #[must_use]
    pub fn delete_paths(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .flat_map(|e| e.delete.iter().map(|f| f.path.clone()))
            .collect()
    }
}

/// Build a deletion plan from duplicate sets, preserving their order.
#[must_use]
pub fn plan(sets: Vec<DuplicateSet>) -> DeletionPlan {
    let mut entries = Vec::with_capacity(sets.len());
    let mut total_to_delete = 0;

    for set in sets {
        let digest = *set.digest();
        let selection = select_survivor(set);
        total_to_delete += selection.delete.len();
        entries.push(DeletionPlanEntry {
            digest,
            keep: selection.keep,
            delete: selection.delete,
        });
    }

    log::debug!(
        "Planned {} deletion(s) across {} set(s)",
        total_to_delete,
        entries.len()
    );

    DeletionPlan {
        entries,
        total_to_delete,
    }
}
