//! Store trait and entry type

use serde::{Deserialize, Serialize};

use crate::core::PermissionStatus;

/// Per-permission bookkeeping entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreEntry {
    /// Last known resolved status, absent if never resolved
    pub cached_status: Option<PermissionStatus>,
    /// Whether the native prompt has ever been shown for this permission.
    /// Monotonic: once true it stays true until an explicit clear.
    pub requested_before: bool,
}

/// Bookkeeping store consulted by the permission manager
///
/// Keys are the namespaced identifiers produced by
/// [`PermissionDescriptor::storage_key`](crate::core::PermissionDescriptor::storage_key).
/// None of the operations return errors: implementations backed by fallible
/// I/O must degrade to "unknown / never requested" on read faults and log
/// write faults rather than propagating them.
pub trait PermissionStore: Send + Sync {
    /// Cached status for a key, or `None` if never cached
    fn status(&self, key: &str) -> Option<PermissionStatus>;

    /// Overwrite the cached status; last-write-wins, no merging
    fn set_status(&self, key: &str, status: PermissionStatus);

    /// Whether the native prompt has been shown before for this key.
    /// Defaults to false for a key never seen.
    fn is_requested_before(&self, key: &str) -> bool;

    /// Mark the key as requested. Idempotent; permanent until `clear`.
    fn set_requested(&self, key: &str);

    /// Reset one permission's state. Intended for logout and testing, and
    /// used by the manager when a permission turns out to be granted and
    /// the bookkeeping is no longer needed.
    fn clear(&self, key: &str);

    /// Reset all state
    fn clear_all(&self);
}
