#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use assert_cmd::Command;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use todoapp::clock::ManualClock;
use todoapp::config::{Config, LatencyConfig, CONFIG_FILENAME};
use todoapp::model::Task;
use todoapp::storage::MemoryStore;

pub const PASSWORD: &str = "secret1";

/// Temporary data directory with zero simulated latency
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let mut config = Config::default();
        config.latency = LatencyConfig::zero();
        config.save(&dir.path().join(CONFIG_FILENAME))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_file(&self, file_name: &str) -> PathBuf {
        self.dir.path().join("store").join(file_name)
    }

    pub fn write_store_file(&self, file_name: &str, contents: &str) -> std::io::Result<()> {
        let path = self.store_file(file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }

    pub fn read_tasks(&self, file_name: &str) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.store_file(file_name))?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = todo_cmd();
        cmd.env("TODO_DATA_DIR", self.path());
        cmd
    }

    pub fn login(&self, email: &str) {
        self.cmd()
            .args(["login", email, "--password", PASSWORD])
            .assert()
            .success();
    }
}

pub fn todo_cmd() -> Command {
    let mut cmd = Command::cargo_bin("todo").expect("todo binary");
    cmd.env_remove("TODO_DATA_DIR")
        .env_remove("TODO_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Shared in-memory backend plus a virtual clock, for library-level tests
pub fn memory_fixture() -> (Arc<MemoryStore>, Arc<ManualClock>) {
    let backend = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    ));
    (backend, clock)
}
