//! Error types

use thiserror::Error;

/// Errors surfaced by a platform delegate
///
/// Every variant is recoverable from the manager's point of view: a failed
/// request leaves the permission re-requestable and is never escalated to
/// a permanent denial.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A platform service backing the permission is transiently unavailable
    /// (e.g. the Bluetooth service is off)
    #[error("Platform service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The native prompt did not resolve within the delegate's own bounded
    /// timeout
    #[error("Permission request timed out after {0}ms")]
    Timeout(u64),

    /// The delegate failed to construct its underlying platform handle
    #[error("Delegate initialization failed: {0}")]
    InitFailed(String),

    /// A required platform-side declaration is missing (e.g. a usage
    /// description string). Delegates that can detect this up front should
    /// resolve the permission as denied-always instead of the OS crashing
    /// the process; this variant covers late detection.
    #[error("Missing platform declaration: {0}")]
    MissingDeclaration(String),

    /// Any other delegate-specific failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlatformError {
    /// Create a service-unavailable error
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        PlatformError::ServiceUnavailable(msg.into())
    }

    /// Create an initialization error
    pub fn init_failed(msg: impl Into<String>) -> Self {
        PlatformError::InitFailed(msg.into())
    }
}

/// Errors that can occur in the permission SDK
#[derive(Error, Debug)]
pub enum PermissionError {
    /// The platform delegate failed while checking or requesting
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl PermissionError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        PermissionError::Other(msg.into())
    }
}

/// Result type alias for SDK operations
pub type PermissionResult<T> = Result<T, PermissionError>;
