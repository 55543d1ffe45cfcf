//! Core types for the permission SDK
//!
//! This module provides the fundamental types used throughout the crate:
//! - `PermissionStatus` - The four-state authorization outcome
//! - `PermissionDescriptor` - Identity of a requestable capability
//! - `PermissionError` - Error types

pub mod descriptor;
pub mod error;
pub mod status;

pub use descriptor::{CustomPermission, PermissionDescriptor, WellKnownPermission};
pub use error::{PermissionError, PermissionResult, PlatformError};
pub use status::PermissionStatus;
