//! In-memory store implementation

use std::collections::HashMap;
use std::sync::RwLock;

use crate::core::PermissionStatus;

use super::backend::{PermissionStore, StoreEntry};

/// Session-scoped store, the default
///
/// State lives for the lifetime of the owning manager. Constructed with the
/// manager, torn down with it; there is no hidden global.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of an entry (for diagnostics)
    pub fn entry(&self, key: &str) -> Option<StoreEntry> {
        self.entries.read().unwrap().get(key).cloned()
    }
}

impl PermissionStore for InMemoryStore {
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
        }
    }

    fn clear(&self, key: &str) {
        self.entries.write().unwrap().remove(key);
    }

    fn clear_all(&self) {
        self.entries.write().unwrap().clear();
    }
}
