//! Permission status model

use serde::{Deserialize, Serialize};

/// Resolved authorization state of a permission
///
/// This is a closed enumeration: every platform-native authorization value
/// maps to exactly one of these four states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// Usable immediately
    Granted,

    /// Soft refusal; re-asking is legitimate after showing a rationale
    Denied,

    /// Hard refusal; the platform will not show its native prompt again and
    /// only a settings redirect can recover
    DeniedAlways,

    /// Never resolved; the native prompt should be shown with no preceding
    /// rationale
    NotDetermined,
}

impl PermissionStatus {
    /// Check if the permission is usable right now
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }

    /// Check if the native prompt can still be shown (possibly after a
    /// rationale)
    pub fn can_prompt(&self) -> bool {
        matches!(
            self,
            PermissionStatus::Denied | PermissionStatus::NotDetermined
        )
    }

    /// Check if only a settings redirect can recover this permission
    pub fn needs_settings(&self) -> bool {
        matches!(self, PermissionStatus::DeniedAlways)
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::DeniedAlways => write!(f, "denied always"),
            PermissionStatus::NotDetermined => write!(f, "not determined"),
        }
    }
}
