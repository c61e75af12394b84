#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch working directory for running `bt`
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join(".bugtrack").join("bugs.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(".bugtrack.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_store(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.store_path()).expect("read store");
        serde_json::from_str(&content).expect("parse store")
    }

    /// `bt` running in this directory with a clean environment
    pub fn bt(&self) -> Command {
        let mut cmd = Command::cargo_bin("bt").expect("binary");
        cmd.current_dir(self.path())
            .env_remove("BT_ACTOR")
            .env_remove("BT_STORE")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `bt --json <args>` successfully and parse its envelope
    pub fn bt_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .bt()
            .arg("--json")
            .args(args)
            .output()
            .expect("run bt");
        assert!(
            output.status.success(),
            "bt {:?} failed: {}{}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("json output")
    }
}
