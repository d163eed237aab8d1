use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn fileward_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("fileward");
    cmd.env_remove("FILEWARD_BASELINE")
        .env_remove("RUST_LOG")
        .arg("-C")
        .arg(cwd);
    cmd
}

/// A temp dir containing the given files.
pub fn temp_with_files(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(temp.path().join(name), content).unwrap();
    }
    temp
}

// Not every integration test crate initializes a baseline through the CLI.
#[allow(dead_code)]
pub fn init(cwd: &Path, paths: &[&str]) {
    fileward_cmd(cwd).arg("init").args(paths).assert().success();
}

#[allow(dead_code)]
pub fn baseline_json(cwd: &Path) -> serde_json::Value {
    let content = fs::read_to_string(cwd.join(".fileward.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}
