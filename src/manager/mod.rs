//! Permission manager
//!
//! The manager is the facade the rest of an application talks to:
//! - `check_status` - resolve the current status, no UI, no side effects
//!   beyond bookkeeping
//! - `request` - trigger the native prompt when needed and await the answer
//! - `open_settings` - fire-and-forget redirect to the OS settings surface
//!
//! It owns the ambiguity-resolution algorithm that combines a live platform
//! read with the store's requested-before flag to produce one of the four
//! statuses.

mod manager;

pub use manager::PermissionManager;
