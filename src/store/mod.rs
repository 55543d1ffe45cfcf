//! Permission bookkeeping store
//!
//! The store tracks two facts per permission identifier:
//! - the last known resolved status (cache, can be absent)
//! - whether the permission's native prompt has been shown before
//!
//! The requested-before flag is what lets the manager distinguish "never
//! asked" from "permanently denied" on platforms whose native API cannot
//! tell the two apart. It is set **before** the platform prompt is shown so
//! a process kill during the prompt cannot erase the fact that a request
//! was attempted.
//!
//! Two implementations are provided:
//! - [`InMemoryStore`] - the default, session-scoped
//! - [`FileStore`] - JSON-file backed, survives process restarts
//!
//! Store operations never fail: `FileStore` degrades to in-memory behavior
//! on I/O faults so a storage problem cannot crash the request flow.

mod backend;
mod file;
mod memory;

pub use backend::{PermissionStore, StoreEntry};
pub use file::FileStore;
pub use memory::InMemoryStore;
