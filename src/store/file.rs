//! File-backed store implementation
//!
//! Persists the bookkeeping map as a single JSON file so the
//! requested-before flag survives process restarts. All I/O faults degrade:
//! a failed load starts from an empty map, a failed write is logged and the
//! in-memory state stays authoritative for the rest of the process.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::core::PermissionStatus;

use super::backend::{PermissionStore, StoreEntry};

/// JSON-file backed store
///
/// Layout: one object mapping the namespaced permission key to its entry
/// (`cached_status` + `requested_before`). The whole map is rewritten on
/// each mutation; permission bookkeeping is small enough that this never
/// matters.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl FileStore {
    /// Open a store at the given path, loading any existing state
    ///
    /// A missing file starts empty; an unreadable or corrupt file is logged
    /// and also starts empty rather than failing the caller.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn load(path: &Path) -> HashMap<String, StoreEntry> {
        if !path.exists() {
            return HashMap::new();
        }

        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!("Failed to open permission store {:?}: {}", path, err);
                return HashMap::new();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("Failed to parse permission store {:?}: {}", path, err);
                HashMap::new()
            }
        }
    }

    /// Rewrite the backing file from the in-memory map
    fn persist(&self, entries: &HashMap<String, StoreEntry>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    tracing::warn!("Failed to create store directory {:?}: {}", parent, err);
                    return;
                }
            }
        }

        let file = match File::create(&self.path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!("Failed to write permission store {:?}: {}", self.path, err);
                return;
            }
        };

        if let Err(err) = serde_json::to_writer_pretty(BufWriter::new(file), entries) {
            tracing::warn!("Failed to serialize permission store {:?}: {}", self.path, err);
        }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PermissionStore for FileStore {
    fn status(&self, key: &str) -> Option<PermissionStatus> {
        self.entries
            .read()
            .unwrap()
            .get(key)
            .and_then(|e| e.cached_status)
    }

    fn set_status(&self, key: &str, status: PermissionStatus) {
        let mut entries = self.entries.write().unwrap();
        entries.entry(key.to_string()).or_default().cached_status = Some(status);
        self.persist(&entries);
    }

    fn is_requested_before(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap()
            .get(key)
            .map(|e| e.requested_before)
            .unwrap_or(false)
    }

    fn set_requested(&self, key: &str) {
        let mut entries = self.entries.write().unwrap();
        let entry = entries.entry(key.to_string()).or_default();
        if !entry.requested_before {
            tracing::debug!("Marking permission as requested: {}", key);
            entry.requested_before = true;
            self.persist(&entries);
        }
    }

    fn clear(&self, key: &str) {
        let mut entries = self.entries.write().unwrap();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }

    fn clear_all(&self) {
        let mut entries = self.entries.write().unwrap();
        entries.clear();
        self.persist(&entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(temp: &TempDir) -> PathBuf {
        temp.path().join("permissions.json")
    }

    #[test]
    fn test_requested_flag_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = store_path(&temp);

        {
            let store = FileStore::open(&path);
            store.set_requested("known:camera");
            store.set_status("known:camera", PermissionStatus::Denied);
        }

        // Simulates a process restart
        let store = FileStore::open(&path);
        assert!(store.is_requested_before("known:camera"));
        assert_eq!(store.status("known:camera"), Some(PermissionStatus::Denied));
    }

    #[test]
    fn test_clear_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = store_path(&temp);

        {
            let store = FileStore::open(&path);
            store.set_requested("known:camera");
            store.clear("known:camera");
        }

        let store = FileStore::open(&path);
        assert!(!store.is_requested_before("known:camera"));
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = store_path(&temp);
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path);
        assert!(!store.is_requested_before("known:camera"));

        // Writes still work after a bad load
        store.set_requested("known:camera");
        let reopened = FileStore::open(&path);
        assert!(reopened.is_requested_before("known:camera"));
    }

    #[test]
    fn test_missing_parent_directory_created() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("permissions.json");

        let store = FileStore::open(&path);
        store.set_requested("known:camera");

        let reopened = FileStore::open(&path);
        assert!(reopened.is_requested_before("known:camera"));
    }
}
