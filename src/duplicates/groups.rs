//! Duplicate grouping by content digest.
//!
//! # Overview
//!
//! Hashed [`FileRecord`]s are grouped strictly by digest equality. Groups
//! with a single member are unique files and are dropped; the rest become
//! [`DuplicateSet`]s. Sets come out in the order their first member was
//! hashed, and members keep hashing order. That order carries no meaning:
//! the survivor selector re-derives the final ranking.
//!
//! Before the sets are planned, [`revalidate`] re-checks that every member
//! still exists, since time passes between hashing and deciding.
//!
//! # Example
//!
//! ```
//! use pdfdupe::duplicates::group_by_digest;
//! use pdfdupe::scanner::FileRecord;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let records = vec![
//!     FileRecord::new(PathBuf::from("/a.pdf"), 3, SystemTime::UNIX_EPOCH).with_digest([1; 32]),
//!     FileRecord::new(PathBuf::from("/b.pdf"), 3, SystemTime::UNIX_EPOCH).with_digest([1; 32]),
//!     FileRecord::new(PathBuf::from("/c.pdf"), 3, SystemTime::UNIX_EPOCH).with_digest([2; 32]),
//! ];
//!
//! let (sets, stats) = group_by_digest(records);
//!
//! assert_eq!(sets.len(), 1);
//! assert_eq!(sets[0].len(), 2);
//! assert_eq!(stats.unique_files, 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{digest_to_hex, Digest, FileRecord};

/// Files sharing one content digest, with at least two members.
///
/// The two-member minimum is enforced by [`DuplicateSet::new`], so code
/// holding a `DuplicateSet` can rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSet {
    digest: Digest,
    files: Vec<FileRecord>,
}

impl DuplicateSet {
    /// Build a set, or `None` if fewer than two files are given.
    #[must_use]
    pub fn new(digest: Digest, files: Vec<FileRecord>) -> Option<Self> {
        if files.len() < 2 {
            return None;
        }
        debug_assert!(
            files.iter().all(|f| f.digest.map_or(true, |d| d == digest)),
            "all members must share the set digest"
        );
        Some(Self { digest, files })
    }

    /// Shared content digest.
    #[must_use]
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }

    /// Members in hashing order.
    #[must_use]
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Consume the set, yielding its members.
    #[must_use]
    pub fn into_files(self) -> Vec<FileRecord> {
        self.files
    }

    /// Number of members (always at least 2).
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Member paths in hashing order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// Bytes held by every copy beyond the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        let size = self.files.first().map_or(0, |f| f.size);
        size * (self.files.len() as u64 - 1)
    }
}

/// Statistics from the grouping step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Records offered to the grouper
    pub total_records: usize,
    /// Records skipped because they carried no digest
    pub unhashed: usize,
    /// Records whose digest no other record shares
    pub unique_files: usize,
    /// Number of duplicate sets produced
    pub duplicate_sets: usize,
    /// Number of records across all duplicate sets
    pub duplicate_files: usize,
}

/// Group hashed records by digest.
///
/// Records without a digest are skipped. Returns only sets with two or more
/// members, ordered by first appearance.
pub fn group_by_digest<I>(records: I) -> (Vec<DuplicateSet>, GroupingStats)
where
    I: IntoIterator<Item = FileRecord>,
{
    let mut stats = GroupingStats::default();
    let mut index: HashMap<Digest, usize> = HashMap::new();
    let mut buckets: Vec<(Digest, Vec<FileRecord>)> = Vec::new();

    for record in records {
        stats.total_records += 1;
        let Some(digest) = record.digest else {
            log::trace!("Not grouping unhashed file: {}", record.path.display());
            stats.unhashed += 1;
            continue;
        };

        let slot = *index.entry(digest).or_insert_with(|| {
            buckets.push((digest, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(record);
    }

    let mut sets = Vec::new();
    for (digest, files) in buckets {
        let count = files.len();
        match DuplicateSet::new(digest, files) {
            Some(set) => {
                stats.duplicate_files += count;
                sets.push(set);
            }
            None => stats.unique_files += count,
        }
    }
    stats.duplicate_sets = sets.len();

    log::debug!(
        "Grouping: {} record(s), {} duplicate set(s), {} unique, {} unhashed",
        stats.total_records,
        stats.duplicate_sets,
        stats.unique_files,
        stats.unhashed
    );

    (sets, stats)
}

/// Drop members whose files no longer exist, then drop sets left with
/// fewer than two members.
#[must_use]
pub fn revalidate(sets: Vec<DuplicateSet>) -> Vec<DuplicateSet> {
    revalidate_with(sets, FileRecord::exists)
}

/// [`revalidate`] with a caller-supplied existence check.
#[must_use]
pub fn revalidate_with<F>(sets: Vec<DuplicateSet>, mut exists: F) -> Vec<DuplicateSet>
where
    F: FnMut(&FileRecord) -> bool,
{
    sets.into_iter()
        .filter_map(|set| {
            let digest = set.digest;
            let before = set.len();
            let present: Vec<FileRecord> = set
                .into_files()
                .into_iter()
                .filter(|f| {
                    let alive = exists(f);
                    if !alive {
                        log::debug!("Dropping vanished file from set: {}", f.path.display());
                    }
                    alive
                })
                .collect();

            if present.len() < before {
                log::debug!(
                    "Set {} shrank from {} to {} member(s)",
                    &digest_to_hex(&digest)[..12],
                    before,
                    present.len()
                );
            }
            DuplicateSet::new(digest, present)
        })
        .collect()
}
