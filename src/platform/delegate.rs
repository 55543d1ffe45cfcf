//! Platform delegate trait

use async_trait::async_trait;

use crate::core::{PermissionDescriptor, PermissionStatus, PlatformError};

/// Contract for platform-specific permission operations
///
/// Implementations map the native authorization primitives of one platform
/// onto the four-state model. The manager owns all disambiguation and
/// bookkeeping; a delegate only reports what the platform can actually say:
///
/// - `check_status` must be side-effect free and must map every
///   platform-native authorization value to a [`PermissionStatus`]. Any
///   value the delegate does not recognize (e.g. a state introduced by a
///   newer OS release) maps to `NotDetermined`, never an error. On
///   platforms that cannot distinguish "never asked" from "permanently
///   denied", the ambiguous reading is reported as `NotDetermined` and the
///   manager resolves it against its store. `DeniedAlways` is reported only
///   when the platform itself confirms permanence.
/// - `request` triggers the OS-native prompt if and only if necessary and
///   suspends until the user responds. The manager serializes calls
///   per identifier, so a delegate is never asked to prompt twice
///   concurrently for the same descriptor.
/// - A grouped permission (several platform strings behind one descriptor)
///   is fully granted only if every constituent is granted; it is `Denied`
///   (recoverable) if at least one constituent still permits a rationale,
///   and `DeniedAlways` only if none do.
/// - A custom permission with no platform strings applicable to the current
///   platform resolves as `Granted`: the permission is a no-op there. This
///   is deliberate policy, not a fallback.
/// - Transient failures (service unavailable, bounded prompt timeout,
///   initialization failure) surface as [`PlatformError`]; they are
///   retryable and are never folded into `DeniedAlways`. A missing build
///   declaration the delegate can detect up front (e.g. an absent usage
///   description) should resolve to `DeniedAlways` with a clear diagnostic
///   instead of letting the OS kill the process.
#[async_trait]
pub trait PlatformDelegate: Send + Sync {
    /// Read the live OS authorization state for a permission
    async fn check_status(
        &self,
        descriptor: &PermissionDescriptor,
    ) -> Result<PermissionStatus, PlatformError>;

    /// Show the OS-native prompt if necessary and await the user's answer
    async fn request(
        &self,
        descriptor: &PermissionDescriptor,
    ) -> Result<PermissionStatus, PlatformError>;

    /// Navigate to the OS settings surface for this application
    ///
    /// Best-effort, fire-and-forget.
    async fn open_settings(&self);
}
