mod common;

use common::{baseline_json, fileward_cmd, init, temp_with_files};
use predicates::prelude::*;
use std::fs;

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

#[test]
fn init_writes_baseline_and_prints_nothing() {
    let temp = temp_with_files(&[("a.txt", "hello")]);

    fileward_cmd(temp.path())
        .arg("init")
        .arg("a.txt")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        baseline_json(temp.path()),
        serde_json::json!({ "a.txt": HELLO_SHA256 })
    );
}

#[test]
fn init_requires_at_least_one_path() {
    let temp = temp_with_files(&[]);

    fileward_cmd(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<PATH>"));
}

#[test]
fn init_skips_missing_paths_with_warning() {
    let temp = temp_with_files(&[("a.txt", "hello")]);

    fileward_cmd(temp.path())
        .arg("init")
        .arg("a.txt")
        .arg("nope.txt")
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipped nope.txt (does not exist)"));

    assert_eq!(
        baseline_json(temp.path()),
        serde_json::json!({ "a.txt": HELLO_SHA256 })
    );
}

#[test]
fn init_strict_fails_on_missing_paths() {
    let temp = temp_with_files(&[("a.txt", "hello")]);

    fileward_cmd(temp.path())
        .arg("init")
        .arg("--strict")
        .arg("a.txt")
        .arg("nope.txt")
        .assert()
        .code(255)
        .stderr(predicate::str::contains("would be skipped: nope.txt"));

    assert!(!temp.path().join(".fileward.json").exists());
}

#[test]
fn init_dry_run_skips_writes() {
    let temp = temp_with_files(&[("a.txt", "hello")]);

    fileward_cmd(temp.path())
        .arg("init")
        .arg("--dry-run")
        .arg("a.txt")
        .assert()
        .success();

    assert!(!temp.path().join(".fileward.json").exists());
}

#[test]
fn baseline_flag_and_env_choose_location() {
    let temp = temp_with_files(&[("a.txt", "hello")]);

    fileward_cmd(temp.path())
        .arg("--baseline")
        .arg("custom.json")
        .arg("init")
        .arg("a.txt")
        .assert()
        .success();
    assert!(temp.path().join("custom.json").exists());
    assert!(!temp.path().join(".fileward.json").exists());

    fileward_cmd(temp.path())
        .env("FILEWARD_BASELINE", "custom.json")
        .arg("check")
        .arg("--all")
        .assert()
        .success()
        .stdout(predicate::str::contains(".  a.txt"));
}

#[test]
fn add_appends_and_rebaselines() {
    let temp = temp_with_files(&[("a.txt", "alpha"), ("c.txt", "hello!")]);
    init(temp.path(), &["c.txt"]);
    fs::write(temp.path().join("c.txt"), "hello").unwrap();

    fileward_cmd(temp.path())
        .arg("add")
        .arg("a.txt")
        .arg("c.txt")
        .assert()
        .success();

    let json = baseline_json(temp.path());
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(json["c.txt"], HELLO_SHA256);

    fileward_cmd(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn remove_untracks_file() {
    let temp = temp_with_files(&[("a.txt", "alpha"), ("b.txt", "beta")]);
    init(temp.path(), &["a.txt", "b.txt"]);
    fs::remove_file(temp.path().join("a.txt")).unwrap();

    fileward_cmd(temp.path())
        .arg("remove")
        .arg("a.txt")
        .assert()
        .success();

    fileward_cmd(temp.path())
        .arg("check")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("b.txt"))
        .stdout(predicate::str::contains("a.txt").not());
}

#[test]
fn remove_untracked_warns_but_succeeds() {
    let temp = temp_with_files(&[("a.txt", "alpha")]);
    init(temp.path(), &["a.txt"]);

    fileward_cmd(temp.path())
        .arg("remove")
        .arg("other.txt")
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipped other.txt (not tracked)"));
}

#[test]
fn add_refuses_corrupt_baseline() {
    let temp = temp_with_files(&[("a.txt", "alpha")]);
    fs::write(temp.path().join(".fileward.json"), "{ not json").unwrap();

    fileward_cmd(temp.path())
        .arg("add")
        .arg("a.txt")
        .assert()
        .code(255)
        .stderr(predicate::str::contains("is corrupt"));

    assert_eq!(
        fs::read_to_string(temp.path().join(".fileward.json")).unwrap(),
        "{ not json"
    );
}
