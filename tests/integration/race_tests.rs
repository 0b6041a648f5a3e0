use filetime::{set_file_mtime, FileTime};
use pdfdupe::actions::{
    execute_if_confirmed, execute_plan, execute_plan_with, plan, AssumeYes, DeleteError,
    ExecutionOutcome, FileRemover, FsRemover, GateResult,
};
use pdfdupe::cli::OutputFormat;
use pdfdupe::duplicates::{revalidate, DuplicateFinder, FinderConfig};
use pdfdupe::error::ExitCode;
use pdfdupe::output::TextOutput;
use pdfdupe::Pipeline;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn three_copies(dir: &Path) {
    for (i, name) in ["a.pdf", "bb.pdf", "ccc.pdf"].into_iter().enumerate() {
        let path = dir.join(name);
        fs::write(&path, b"identical").unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(1_000 + i as i64, 0)).unwrap();
    }
}

/// Real filesystem, except that some paths refuse to be removed.
struct Refusing(Vec<PathBuf>);

impl FileRemover for Refusing {
    fn exists(&self, path: &Path) -> bool {
        FsRemover.exists(path)
    }

    fn remove(&self, path: &Path) -> Result<(), DeleteError> {
        if self.0.iter().any(|p| p == path) {
            return Err(DeleteError::PermissionDenied(path.to_path_buf()));
        }
        FsRemover.remove(path)
    }
}

#[test]
fn test_file_removed_between_plan_and_execute_is_skipped() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());

    let (sets, _) = DuplicateFinder::with_defaults().find(dir.path()).unwrap();
    let plan = plan(sets);
    assert_eq!(plan.total_to_delete, 2);

    // someone else gets there first
    fs::remove_file(dir.path().join("bb.pdf")).unwrap();

    let report = execute_plan(&plan, None);
    assert_eq!(report.deleted_count, 1);
    assert_eq!(report.skipped_count, 1);
    assert_eq!(report.failed_count, 0);
    assert!(report.all_succeeded());
    assert_eq!(report.outcomes[0].outcome, ExecutionOutcome::SkippedAlreadyGone);
    assert_eq!(report.outcomes[1].outcome, ExecutionOutcome::Deleted);
    assert!(dir.path().join("a.pdf").exists());
}

#[test]
fn test_executing_twice_is_at_most_once() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());

    let (sets, _) = DuplicateFinder::with_defaults().find(dir.path()).unwrap();
    let plan = plan(sets);

    let first = execute_plan(&plan, None);
    let second = execute_plan(&plan, None);

    assert_eq!(first.deleted_count, 2);
    assert_eq!(second.deleted_count, 0);
    assert_eq!(second.skipped_count, 2);
    assert!(dir.path().join("a.pdf").exists());
}

#[test]
fn test_vanished_member_dropped_by_revalidation() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), b"pair").unwrap();
    fs::write(dir.path().join("b.pdf"), b"pair").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let records = pdfdupe::scanner::list_candidates(dir.path(), &Default::default()).unwrap();
    let (hashed, errors) = finder.hash_records(records).unwrap();
    assert!(errors.is_empty());

    fs::remove_file(dir.path().join("b.pdf")).unwrap();

    let (sets, _) = pdfdupe::duplicates::group_by_digest(hashed);
    assert_eq!(sets.len(), 1);
    assert!(revalidate(sets).is_empty());
}

#[test]
fn test_failed_deletion_does_not_abort_batch() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());
    let locked = dir.path().join("bb.pdf");

    let (sets, _) = DuplicateFinder::with_defaults().find(dir.path()).unwrap();
    let plan = plan(sets);
    let report = execute_plan_with(&plan, &Refusing(vec![locked.clone()]), None);

    assert_eq!(report.deleted_count, 1);
    assert_eq!(report.failed_count, 1);
    assert_eq!(report.skipped_count, 0);
    assert!(locked.exists());
    assert!(!dir.path().join("ccc.pdf").exists());
    match &report.outcomes[0].outcome {
        ExecutionOutcome::Failed(reason) => assert!(reason.contains("permission denied")),
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[test]
fn test_failed_deletion_reported_as_partial_success() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());
    let locked = dir.path().join("ccc.pdf");

    let pipeline = Pipeline {
        finder_config: FinderConfig::default(),
        text: TextOutput::new(false),
        format: OutputFormat::Text,
    };
    let mut out = Vec::new();
    let code = pipeline
        .run(dir.path(), &mut AssumeYes, &Refusing(vec![locked.clone()]), &mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(text.contains(&format!("DELETED: {}", dir.path().join("bb.pdf").display())));
    assert!(text.contains(&format!("ERROR deleting {}: permission denied", locked.display())));
    assert!(text.contains("Deletion complete. 1 file(s) deleted."));
    assert!(text.contains("1 file(s) could not be deleted."));
}

#[test]
fn test_gate_approves_then_executes_on_disk() {
    let dir = tempdir().unwrap();
    three_copies(dir.path());

    let (sets, _) = DuplicateFinder::with_defaults().find(dir.path()).unwrap();
    let plan = plan(sets);

    match execute_if_confirmed(&plan, &mut AssumeYes, &FsRemover, None).unwrap() {
        GateResult::Executed(report) => {
            assert_eq!(report.deleted_count, 2);
            assert_eq!(report.kept_count, 1);
            assert_eq!(report.bytes_freed, 18);
        }
        other => panic!("Expected Executed, got {:?}", other),
    }
}
