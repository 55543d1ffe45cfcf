//! Permission descriptors
//!
//! A descriptor is the identity of a requestable capability. Two kinds exist:
//! - `WellKnownPermission` - a closed set of common permissions with their
//!   platform mappings baked in
//! - `CustomPermission` - an open variant carrying caller-supplied platform
//!   permission strings
//!
//! Identity for storage and logging purposes is the string identifier, which
//! must be unique within a process. Well-known and custom permissions are
//! keyed in separate storage namespaces so a custom permission named
//! "camera" cannot collide with the built-in one.

/// A well-known permission with platform mappings baked in
///
/// The identifier of each variant is stable and equal to its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownPermission {
    Camera,
    Microphone,
    /// Fine (precise) location while the app is in use
    Location,
    /// Coarse location while the app is in use
    CoarseLocation,
    /// Location while the app is in the background
    BackgroundLocation,
    /// Read access to the photo library
    Gallery,
    /// Read/write access to shared storage
    Storage,
    Contacts,
    Notifications,
    Bluetooth,
    Motion,
}

impl WellKnownPermission {
    /// Stable string identifier, equal to the variant name
    pub fn identifier(&self) -> &'static str {
        match self {
            WellKnownPermission::Camera => "camera",
            WellKnownPermission::Microphone => "microphone",
            WellKnownPermission::Location => "location",
            WellKnownPermission::CoarseLocation => "coarse_location",
            WellKnownPermission::BackgroundLocation => "background_location",
            WellKnownPermission::Gallery => "gallery",
            WellKnownPermission::Storage => "storage",
            WellKnownPermission::Contacts => "contacts",
            WellKnownPermission::Notifications => "notifications",
            WellKnownPermission::Bluetooth => "bluetooth",
            WellKnownPermission::Motion => "motion",
        }
    }

    /// Android manifest permission strings backing this permission
    ///
    /// A logical permission may be backed by several platform strings
    /// (e.g. Bluetooth). The delegate applies AND-for-grant across them.
    pub fn android_permissions(&self) -> &'static [&'static str] {
        match self {
            WellKnownPermission::Camera => &["android.permission.CAMERA"],
            WellKnownPermission::Microphone => &["android.permission.RECORD_AUDIO"],
            WellKnownPermission::Location => &["android.permission.ACCESS_FINE_LOCATION"],
            WellKnownPermission::CoarseLocation => &["android.permission.ACCESS_COARSE_LOCATION"],
            WellKnownPermission::BackgroundLocation => {
                &["android.permission.ACCESS_BACKGROUND_LOCATION"]
            }
            WellKnownPermission::Gallery => &["android.permission.READ_EXTERNAL_STORAGE"],
            WellKnownPermission::Storage => &[
                "android.permission.READ_EXTERNAL_STORAGE",
                "android.permission.WRITE_EXTERNAL_STORAGE",
            ],
            WellKnownPermission::Contacts => &["android.permission.READ_CONTACTS"],
            WellKnownPermission::Notifications => &["android.permission.POST_NOTIFICATIONS"],
            WellKnownPermission::Bluetooth => &[
                "android.permission.BLUETOOTH_SCAN",
                "android.permission.BLUETOOTH_CONNECT",
            ],
            WellKnownPermission::Motion => &["android.permission.ACTIVITY_RECOGNITION"],
        }
    }

    /// The Info.plist usage-description key required on iOS, if any
    pub fn ios_usage_key(&self) -> Option<&'static str> {
        match self {
            WellKnownPermission::Camera => Some("NSCameraUsageDescription"),
            WellKnownPermission::Microphone => Some("NSMicrophoneUsageDescription"),
            WellKnownPermission::Location | WellKnownPermission::CoarseLocation => {
                Some("NSLocationWhenInUseUsageDescription")
            }
            WellKnownPermission::BackgroundLocation => {
                Some("NSLocationAlwaysAndWhenInUseUsageDescription")
            }
            WellKnownPermission::Gallery => Some("NSPhotoLibraryUsageDescription"),
            WellKnownPermission::Storage => None,
            WellKnownPermission::Contacts => Some("NSContactsUsageDescription"),
            WellKnownPermission::Notifications => None,
            WellKnownPermission::Bluetooth => Some("NSBluetoothAlwaysUsageDescription"),
            WellKnownPermission::Motion => Some("NSMotionUsageDescription"),
        }
    }
}

/// A caller-defined permission the SDK treats opaquely
///
/// The SDK never interprets the platform strings; an invalid string simply
/// results in the OS denying the request. A custom permission with no
/// platform strings applicable to the current platform resolves as granted
/// by convention (it is a no-op there).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomPermission {
    /// Caller-chosen identifier, unique within the process
    pub identifier: String,
    /// Android manifest permission strings
    pub android_permissions: Vec<String>,
    /// iOS Info.plist usage-description key
    pub ios_usage_key: Option<String>,
}

impl CustomPermission {
    /// Create a custom permission with no platform strings
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            android_permissions: Vec::new(),
            ios_usage_key: None,
        }
    }

    /// Set the Android permission strings
    pub fn with_android_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.android_permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the iOS usage-description key
    pub fn with_ios_usage_key(mut self, key: impl Into<String>) -> Self {
        self.ios_usage_key = Some(key.into());
        self
    }
}

/// Identity of a requestable capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDescriptor {
    /// One of the built-in permissions
    WellKnown(WellKnownPermission),
    /// A caller-defined permission
    Custom(CustomPermission),
}

impl PermissionDescriptor {
    /// The permission's string identifier (used for logging)
    pub fn identifier(&self) -> &str {
        match self {
            PermissionDescriptor::WellKnown(p) => p.identifier(),
            PermissionDescriptor::Custom(p) => &p.identifier,
        }
    }

    /// The namespaced key used by the permission store
    ///
    /// Well-known and custom permissions live in separate namespaces so the
    /// open identifier space cannot collide with the enumerated names.
    pub fn storage_key(&self) -> String {
        match self {
            PermissionDescriptor::WellKnown(p) => format!("known:{}", p.identifier()),
            PermissionDescriptor::Custom(p) => format!("custom:{}", p.identifier),
        }
    }

    /// Android manifest permission strings backing this permission
    pub fn android_permissions(&self) -> Vec<String> {
        match self {
            PermissionDescriptor::WellKnown(p) => p
                .android_permissions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            PermissionDescriptor::Custom(p) => p.android_permissions.clone(),
        }
    }

    /// The iOS usage-description key, if any
    pub fn ios_usage_key(&self) -> Option<&str> {
        match self {
            PermissionDescriptor::WellKnown(p) => p.ios_usage_key(),
            PermissionDescriptor::Custom(p) => p.ios_usage_key.as_deref(),
        }
    }
}

impl From<WellKnownPermission> for PermissionDescriptor {
    fn from(permission: WellKnownPermission) -> Self {
        PermissionDescriptor::WellKnown(permission)
    }
}

impl From<CustomPermission> for PermissionDescriptor {
    fn from(permission: CustomPermission) -> Self {
        PermissionDescriptor::Custom(permission)
    }
}

impl std::fmt::Display for PermissionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
