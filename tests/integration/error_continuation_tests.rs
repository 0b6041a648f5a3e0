use pdfdupe::actions::{ConfirmationGate, DeletionPlan, FsRemover};
use pdfdupe::cli::OutputFormat;
use pdfdupe::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use pdfdupe::error::{exit_code_for, ExitCode};
use pdfdupe::output::TextOutput;
use pdfdupe::scanner::{FileRecord, HashError};
use pdfdupe::Pipeline;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::tempdir;

#[test]
fn test_unreadable_files_are_excluded_and_reported() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    fs::write(&a, b"dup").unwrap();
    fs::write(&b, b"dup").unwrap();

    let records = vec![
        FileRecord::new(dir.path().join("missing_1.pdf"), 3, SystemTime::now()),
        FileRecord::new(a, 3, SystemTime::now()),
        FileRecord::new(dir.path().join("missing_2.pdf"), 3, SystemTime::now()),
        FileRecord::new(b, 3, SystemTime::now()),
    ];

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_from_records(records)
        .unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
    assert_eq!(summary.candidates, 4);
    assert_eq!(summary.hashed, 2);
    assert!(summary.has_errors());
    assert_eq!(summary.hash_errors.len(), 2);

    for err in &summary.hash_errors {
        match err {
            HashError::NotFound(_) => {}
            other => panic!("Expected NotFound HashError, got: {:?}", other),
        }
    }
    assert!(summary.hash_errors[0].path().ends_with("missing_1.pdf"));
    assert!(summary.hash_errors[1].path().ends_with("missing_2.pdf"));
}

#[test]
fn test_all_files_unreadable_yields_no_sets() {
    let records = vec![
        FileRecord::new(PathBuf::from("nonexistent_1.pdf"), 100, SystemTime::now()),
        FileRecord::new(PathBuf::from("nonexistent_2.pdf"), 100, SystemTime::now()),
    ];

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_from_records(records)
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.hash_errors.len(), 2);
}

#[test]
fn test_directory_named_like_candidate_fails_to_hash() {
    let dir = tempdir().unwrap();
    let fake = dir.path().join("folder.pdf");
    fs::create_dir(&fake).unwrap();

    let records = vec![FileRecord::new(fake, 0, SystemTime::now())];
    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_from_records(records)
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.hash_errors.len(), 1);
}

#[test]
fn test_shutdown_flag_interrupts_hashing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), b"x").unwrap();
    fs::write(dir.path().join("b.pdf"), b"x").unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(flag));

    let err = finder.find(dir.path()).unwrap_err();
    assert!(matches!(err, FinderError::Interrupted));

    let exit = exit_code_for(&anyhow::Error::new(err));
    assert_eq!(exit, ExitCode::Interrupted);
}

/// Raises the shutdown flag while "waiting" for the operator, then says yes.
struct CtrlCThenYes(Arc<AtomicBool>);

impl ConfirmationGate for CtrlCThenYes {
    fn confirm(&mut self, _plan: &DeletionPlan) -> io::Result<bool> {
        self.0.store(true, Ordering::SeqCst);
        Ok(true)
    }
}

#[test]
fn test_ctrl_c_at_confirmation_deletes_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), b"same").unwrap();
    fs::write(dir.path().join("b.pdf"), b"same").unwrap();

    let flag = Arc::new(AtomicBool::new(false));
    let pipeline = Pipeline {
        finder_config: FinderConfig::default().with_shutdown_flag(flag.clone()),
        text: TextOutput::new(false),
        format: OutputFormat::Text,
    };

    let mut out = Vec::new();
    let err = pipeline
        .run(dir.path(), &mut CtrlCThenYes(flag), &FsRemover, &mut out)
        .unwrap_err();

    assert_eq!(exit_code_for(&err), ExitCode::Interrupted);
    assert!(dir.path().join("a.pdf").exists());
    assert!(dir.path().join("b.pdf").exists());
    assert!(!String::from_utf8(out).unwrap().contains("DELETED:"));
}
