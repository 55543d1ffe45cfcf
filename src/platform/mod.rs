//! Platform delegate boundary
//!
//! The delegate is the external collaborator that actually reads OS
//! authorization state and shows the native prompt. The SDK consumes it
//! through the [`PlatformDelegate`] trait; per-target implementations are
//! supplied by the host application (dependency injection rather than
//! compile-time switching).
//!
//! [`ScriptedDelegate`] is an in-process fake with a programmable response
//! script, used by this crate's own tests and useful for host integration
//! tests.

mod delegate;
mod scripted;

pub use delegate::PlatformDelegate;
pub use scripted::{ScriptedDelegate, ScriptedResponse};
