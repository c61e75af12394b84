//! Storage layer for bugtrack
//!
//! A tracker is persisted as a single JSON snapshot of [`BugRecord`]s:
//!
//! ```text
//! .bugtrack/                    # default store directory
//!   bugs.json                   # { "generated_at": ..., "bugs": [...] }
//!   bugs.json.lock              # sidecar lock taken for reads and writes
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bug::BugRecord;
use crate::error::Result;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::tracker::BugList;

/// Default location of the store, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = ".bugtrack/bugs.json";

/// On-disk shape of a saved tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugSnapshot {
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub bugs: Vec<BugRecord>,
}

impl BugSnapshot {
    pub fn new(bugs: Vec<BugRecord>) -> Self {
        Self {
            generated_at: Utc::now(),
            bugs,
        }
    }
}

/// File-backed store for one bug collection
#[derive(Debug, Clone)]
pub struct BugStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl BugStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the persisted records; a missing file yields none
    pub fn read_records(&self) -> Result<Vec<BugRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = lock::read_locked_str(&self.path, self.lock_timeout_ms)?;
        decode(&content)
    }

    /// Load the stored collection for reading, moving its counter past loaded ids
    pub fn load(&self) -> Result<BugList> {
        BugList::from_records(self.read_records()?)
    }

    /// Take the store lock for a load-modify-save sequence
    pub fn lock(&self) -> Result<LockedStore<'_>> {
        let lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
        Ok(LockedStore {
            store: self,
            _lock: lock,
        })
    }
}

/// A [`BugStore`] whose lock is held until this value is dropped
pub struct LockedStore<'a> {
    store: &'a BugStore,
    _lock: FileLock,
}

impl LockedStore<'_> {
    pub fn exists(&self) -> bool {
        self.store.exists()
    }

    pub fn load(&self) -> Result<BugList> {
        let path = self.store.path();
        if !path.exists() {
            return Ok(BugList::new());
        }
        BugList::from_records(decode(&lock::read_str(path)?)?)
    }

    /// Write `list` as a fresh snapshot
    pub fn save(&self, list: &BugList) -> Result<()> {
        let snapshot = BugSnapshot::new(list.to_records());
        let json = serde_json::to_string_pretty(&snapshot)?;
        lock::write_atomic(self.store.path(), json.as_bytes())?;
        info!(path = %self.store.path().display(), bugs = list.len(), "bug store saved");
        Ok(())
    }
}

fn decode(content: &str) -> Result<Vec<BugRecord>> {
    let snapshot: BugSnapshot = serde_json::from_str(content)?;
    Ok(snapshot.bugs)
}
