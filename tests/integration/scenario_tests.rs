use filetime::{set_file_mtime, FileTime};
use pdfdupe::actions::{AssumeNo, AssumeYes, ConfirmationGate, DeletionPlan, FsRemover, PromptGate};
use pdfdupe::cli::OutputFormat;
use pdfdupe::duplicates::FinderConfig;
use pdfdupe::error::ExitCode;
use pdfdupe::output::TextOutput;
use pdfdupe::Pipeline;
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;
use tempfile::tempdir;

fn write_at(dir: &Path, name: &str, content: &[u8], mtime: i64) {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

fn pipeline(format: OutputFormat) -> Pipeline {
    Pipeline {
        finder_config: FinderConfig::default(),
        text: TextOutput::new(false),
        format,
    }
}

fn run<G: ConfirmationGate>(root: &Path, format: OutputFormat, gate: &mut G) -> (ExitCode, String) {
    let mut out = Vec::new();
    let code = pipeline(format)
        .run(root, gate, &FsRemover, &mut out)
        .unwrap();
    (code, String::from_utf8(out).unwrap())
}

/// Fails the test if the run ever asks for confirmation.
struct NeverAsked;

impl ConfirmationGate for NeverAsked {
    fn confirm(&mut self, _plan: &DeletionPlan) -> io::Result<bool> {
        panic!("confirmation must not be requested");
    }
}

#[test]
fn test_scenario_a_oldest_is_kept() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "a.pdf", b"X", 1_000);
    write_at(dir.path(), "b.pdf", b"X", 2_000);

    let (code, text) = run(dir.path(), OutputFormat::Text, &mut AssumeYes);

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("a.pdf").exists());
    assert!(!dir.path().join("b.pdf").exists());

    assert!(text.starts_with("Found 2 PDF files. Calculating hashes...\n"));
    assert!(text.contains(&format!("KEEPING: {}", dir.path().join("a.pdf").display())));
    assert!(text.contains("SUMMARY: 1 file(s) will be deleted."));
    assert!(text.contains(&format!("DELETED: {}", dir.path().join("b.pdf").display())));
    assert!(text.contains("Deletion complete. 1 file(s) deleted."));
}

#[test]
fn test_scenario_a_json_plan() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "a.pdf", b"X", 1_000);
    write_at(dir.path(), "b.pdf", b"X", 2_000);

    let (code, json) = run(dir.path(), OutputFormat::Json, &mut AssumeNo);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(code, ExitCode::Cancelled);
    assert_eq!(value["total_to_delete"], 1);
    assert_eq!(value["sets"].as_array().unwrap().len(), 1);
    assert_eq!(value["sets"][0]["hash"], blake3::hash(b"X").to_hex().as_str());
    assert!(value["sets"][0]["keep"]["path"]
        .as_str()
        .unwrap()
        .ends_with("a.pdf"));
    assert!(value["sets"][0]["delete"][0]["path"]
        .as_str()
        .unwrap()
        .ends_with("b.pdf"));
    assert_eq!(value["executed"], false);
    assert!(dir.path().join("b.pdf").exists());
}

#[test]
fn test_scenario_b_shortest_name_then_order() {
    let dir = tempdir().unwrap();
    for name in ["zzz.pdf", "a.pdf", "bb.pdf"] {
        write_at(dir.path(), name, b"same bytes", 5_000);
    }

    let (code, json) = run(dir.path(), OutputFormat::Json, &mut AssumeNo);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let set = &value["sets"][0];

    assert_eq!(code, ExitCode::Cancelled);
    let name = |v: &serde_json::Value| {
        Path::new(v["path"].as_str().unwrap())
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned()
    };
    assert_eq!(name(&set["keep"]), "a.pdf");
    assert_eq!(name(&set["delete"][0]), "bb.pdf");
    assert_eq!(name(&set["delete"][1]), "zzz.pdf");
    assert_eq!(value["total_to_delete"], 2);
}

#[test]
fn test_scenario_c_no_candidates() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "notes.txt", b"X", 0);
    write_at(dir.path(), "copy.txt", b"X", 0);

    let (code, text) = run(dir.path(), OutputFormat::Text, &mut NeverAsked);

    assert_eq!(code, ExitCode::NothingToDo);
    assert_eq!(
        text,
        format!("No PDF files found in '{}'.\n", dir.path().display())
    );
    assert!(!text.contains("Deletion Plan"));
}

#[test]
fn test_scenario_d_no_duplicates() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "a.pdf", b"one", 0);
    write_at(dir.path(), "b.pdf", b"two", 0);
    write_at(dir.path(), "c.pdf", b"three", 0);

    let (code, text) = run(dir.path(), OutputFormat::Text, &mut NeverAsked);

    assert_eq!(code, ExitCode::NothingToDo);
    assert!(text.contains("No duplicate PDF files found needing action."));
    assert!(!text.contains("Deletion Plan"));
}

#[test]
fn test_scenario_e_answer_no_cancels() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "a.pdf", b"X", 1_000);
    write_at(dir.path(), "b.pdf", b"X", 2_000);
    write_at(dir.path(), "c.pdf", b"X", 3_000);

    let mut prompt = Vec::new();
    let mut gate = PromptGate::new(Cursor::new(b"no\n".to_vec()), &mut prompt);
    let (code, text) = run(dir.path(), OutputFormat::Text, &mut gate);

    assert_eq!(code, ExitCode::Cancelled);
    assert_eq!(
        String::from_utf8(prompt).unwrap(),
        "Proceed with deleting these 2 files? (yes/no): "
    );
    assert!(text.contains("Deletion cancelled. No files were changed."));
    assert!(!text.contains("Performing Deletions"));
    for name in ["a.pdf", "b.pdf", "c.pdf"] {
        assert!(dir.path().join(name).exists());
    }
}

#[test]
fn test_prompt_accepts_yes_in_any_case() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "a.pdf", b"X", 1_000);
    write_at(dir.path(), "b.pdf", b"X", 2_000);

    let mut gate = PromptGate::new(Cursor::new(b"  YeS \n".to_vec()), io::sink());
    let (code, _) = run(dir.path(), OutputFormat::Text, &mut gate);

    assert_eq!(code, ExitCode::Success);
    assert!(!dir.path().join("b.pdf").exists());
}

#[test]
fn test_prompt_eof_cancels() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "a.pdf", b"X", 1_000);
    write_at(dir.path(), "b.pdf", b"X", 2_000);

    let mut gate = PromptGate::new(Cursor::new(Vec::new()), io::sink());
    let (code, _) = run(dir.path(), OutputFormat::Text, &mut gate);

    assert_eq!(code, ExitCode::Cancelled);
    assert!(dir.path().join("b.pdf").exists());
}

#[test]
fn test_cancelled_runs_produce_identical_plans() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "a.pdf", b"X", 1_000);
    write_at(dir.path(), "bb.pdf", b"X", 1_000);
    write_at(dir.path(), "c.pdf", b"Y", 2_000);
    write_at(dir.path(), "d.pdf", b"Y", 1_500);
    write_at(dir.path(), "e.pdf", b"Z", 0);

    let (_, first) = run(dir.path(), OutputFormat::Json, &mut AssumeNo);
    let (_, second) = run(dir.path(), OutputFormat::Json, &mut AssumeNo);

    assert_eq!(first, second);
}

#[test]
fn test_second_run_finds_nothing_after_execution() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "a.pdf", b"X", 1_000);
    write_at(dir.path(), "b.pdf", b"X", 2_000);
    write_at(dir.path(), "c.pdf", b"X", 3_000);

    let (code, _) = run(dir.path(), OutputFormat::Text, &mut AssumeYes);
    assert_eq!(code, ExitCode::Success);

    let (code, text) = run(dir.path(), OutputFormat::Text, &mut NeverAsked);
    assert_eq!(code, ExitCode::NothingToDo);
    assert!(text.contains("Found 1 PDF files."));
}

#[cfg(unix)]
#[test]
fn test_symlink_never_outlives_its_target() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "real.pdf", b"only copy", 1_000);
    std::os::unix::fs::symlink(dir.path().join("real.pdf"), dir.path().join("link.pdf")).unwrap();

    let (code, out) = run(dir.path(), OutputFormat::Text, &mut NeverAsked);

    assert_eq!(code, ExitCode::NothingToDo);
    assert!(out.contains("Found 1 PDF files."));
    assert_eq!(fs::read(dir.path().join("real.pdf")).unwrap(), b"only copy");
    assert_eq!(fs::read(dir.path().join("link.pdf")).unwrap(), b"only copy");
}
