//! Durable key-value snapshot storage.
//!
//! The ledger persists as one serialized snapshot per key. `save` must be
//! atomic: a crash mid-write leaves either the prior or the new complete
//! snapshot, never a torn one.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

/// Key-value snapshot persistence scoped to the application
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot stored under `key`, `None` when absent
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Atomically replace the snapshot stored under `key`
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Arc<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

/// File-backed snapshot store, one file per key under an app data directory
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|error| Error::Persistence(format!("create {}: {error}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(Error::Persistence(format!(
                "read {}: {error}",
                path.display()
            ))),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Write-then-rename keeps the previous snapshot intact on failure
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)
            .map_err(|error| Error::Persistence(format!("write {}: {error}", tmp.display())))?;
        fs::rename(&tmp, &path)
            .map_err(|error| Error::Persistence(format!("rename {}: {error}", path.display())))?;
        Ok(())
    }
}

/// In-memory snapshot store with save-failure injection, for tests and
/// embedders that manage durability elsewhere
#[derive(Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<HashMap<String, String>>,
    fail_saves: AtomicBool,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail with a persistence error
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|error| Error::Persistence(error.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Persistence("storage quota exceeded".to_string()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|error| Error::Persistence(error.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Resolve the snapshot file path a key maps to, for diagnostics
pub fn snapshot_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}
