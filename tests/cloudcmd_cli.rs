use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use journal::JOURNAL_FILE_NAME;

fn cloudcmd(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cloudcmd"));
    // keep the ambient environment from steering the log level
    command.env_remove("RUST_LOG");
    command.args(args);
    for (key, value) in envs {
        command.env(key, value);
    }
    command
        .output()
        .unwrap_or_else(|error| panic!("failed to run cloudcmd: {error}"))
}

fn stdout_utf8(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is valid UTF-8")
}

fn stderr_utf8(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("stderr is valid UTF-8")
}

fn write_lines(path: &Path, lines: &[&str]) {
    fs::write(path, lines.join("\n") + "\n").expect("write file");
}

#[test]
fn without_operands_the_usage_is_shown_successfully() {
    let output = cloudcmd(&[], &[]);
    assert!(output.status.success(), "usage fallback should exit zero");
    let stdout = stdout_utf8(&output);
    assert!(stdout.contains("Usage: cloudcmd"));
    assert!(stdout.contains("--unsyncedfolders"));
}

#[test]
fn unknown_flags_also_fall_back_to_the_usage() {
    let output = cloudcmd(&["--definitely-not-a-flag"], &[]);
    assert!(output.status.success());
    assert!(stdout_utf8(&output).contains("Usage: cloudcmd"));
}

#[test]
fn version_is_reported() {
    let output = cloudcmd(&["--version"], &[]);
    assert!(output.status.success());
    assert!(stdout_utf8(&output).starts_with("cloudcmd version "));
}

#[test]
fn a_missing_source_dir_fails_the_run() {
    let output = cloudcmd(
        &[
            "--non-interactive",
            "/nonexistent/sync-source",
            "https://cloud.example.com/",
        ],
        &[],
    );
    assert_eq!(output.status.code(), Some(1));
    // the diagnostic shows the separator-normalized form
    assert!(stderr_utf8(&output).contains("'/nonexistent/sync-source/' does not exist"));
}

#[test]
fn the_run_aborts_when_no_exclude_list_is_usable() {
    let source = tempfile::tempdir().expect("temp dir");
    let output = cloudcmd(
        &[
            "--non-interactive",
            source.path().to_str().expect("utf8 path"),
            "https://cloud.example.com/",
        ],
        &[("CLOUDCMD_SYSTEM_EXCLUDES", "/nonexistent/sync-exclude.lst")],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_utf8(&output).contains("cannot load system exclude list"));
    // the run stopped before any engine pass could touch the tree
    assert!(!source.path().join(JOURNAL_FILE_NAME).exists());
}

#[test]
fn a_clean_run_scans_the_tree_and_creates_the_journal() {
    let source = tempfile::tempdir().expect("temp dir");
    fs::write(source.path().join("report.txt"), b"data").expect("write file");
    let excludes = source.path().join("excludes.lst");
    write_lines(&excludes, &["*.tmp"]);

    let output = cloudcmd(
        &[
            "--non-interactive",
            "-u",
            "alice",
            "-p",
            "secret",
            "--exclude",
            excludes.to_str().expect("utf8 path"),
            source.path().to_str().expect("utf8 path"),
            "https://cloud.example.com/",
        ],
        &[("CLOUDCMD_SYSTEM_EXCLUDES", "")],
    );
    assert!(
        output.status.success(),
        "run failed: {}",
        stderr_utf8(&output)
    );
    assert!(stderr_utf8(&output).contains("discovery pass finished"));
    assert!(source.path().join(JOURNAL_FILE_NAME).exists());
}

#[test]
fn silent_runs_keep_the_diagnostics_down() {
    let source = tempfile::tempdir().expect("temp dir");
    let excludes = source.path().join("excludes.lst");
    write_lines(&excludes, &["*.tmp"]);

    let output = cloudcmd(
        &[
            "--silent",
            "--non-interactive",
            "--exclude",
            excludes.to_str().expect("utf8 path"),
            source.path().to_str().expect("utf8 path"),
            "https://cloud.example.com/",
        ],
        &[("CLOUDCMD_SYSTEM_EXCLUDES", "")],
    );
    assert!(output.status.success());
    assert!(!stderr_utf8(&output).contains("discovery pass finished"));
}

#[test]
fn selective_sync_changes_reconcile_against_the_journal() {
    let source = tempfile::tempdir().expect("temp dir");
    fs::create_dir_all(source.path().join("A")).expect("mkdir");
    fs::create_dir_all(source.path().join("B")).expect("mkdir");
    fs::create_dir_all(source.path().join("C")).expect("mkdir");
    let excludes = source.path().join("excludes.lst");
    write_lines(&excludes, &["*.tmp"]);

    let unsynced = source.path().join("unsynced.lst");
    write_lines(&unsynced, &["A", "B/"]);

    let base_args = |unsynced: &str| {
        vec![
            "--non-interactive".to_owned(),
            "--exclude".to_owned(),
            excludes.to_str().expect("utf8 path").to_owned(),
            "--unsyncedfolders".to_owned(),
            unsynced.to_owned(),
            source.path().to_str().expect("utf8 path").to_owned(),
            "https://cloud.example.com/".to_owned(),
        ]
    };

    let first_args = base_args(unsynced.to_str().expect("utf8 path"));
    let first_refs: Vec<&str> = first_args.iter().map(String::as_str).collect();
    let first = cloudcmd(&first_refs, &[("CLOUDCMD_SYSTEM_EXCLUDES", "")]);
    assert!(first.status.success(), "first run: {}", stderr_utf8(&first));

    // the first run only seeded the journal (no prior baseline existed), so
    // this run reconciles the new list against an empty baseline
    write_lines(&unsynced, &["B", "C/"]);
    let second_args = base_args(unsynced.to_str().expect("utf8 path"));
    let second_refs: Vec<&str> = second_args.iter().map(String::as_str).collect();
    let second = cloudcmd(&second_refs, &[("CLOUDCMD_SYSTEM_EXCLUDES", "")]);
    assert!(
        second.status.success(),
        "second run: {}",
        stderr_utf8(&second)
    );
    assert!(stderr_utf8(&second).contains("cached state invalidated"));

    let journal_text =
        fs::read_to_string(source.path().join(JOURNAL_FILE_NAME)).expect("read journal");
    let journal: serde_json::Value = serde_json::from_str(&journal_text).expect("parse journal");
    let baseline: Vec<&str> = journal["selective_sync"]
        .as_array()
        .expect("baseline array")
        .iter()
        .map(|entry| entry.as_str().expect("string entry"))
        .collect();
    assert_eq!(baseline, vec!["B/", "C/"]);
}
