//! Scripted in-process delegate for tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{PermissionDescriptor, PermissionStatus, PlatformError};

use super::delegate::PlatformDelegate;

/// One scripted answer from the fake platform
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Resolve with a status
    Status(PermissionStatus),
    /// Fail with a service-unavailable error
    Unavailable(String),
    /// Fail with a timeout error
    Timeout(u64),
}

impl ScriptedResponse {
    fn into_result(self) -> Result<PermissionStatus, PlatformError> {
        match self {
            ScriptedResponse::Status(status) => Ok(status),
            ScriptedResponse::Unavailable(msg) => Err(PlatformError::ServiceUnavailable(msg)),
            ScriptedResponse::Timeout(ms) => Err(PlatformError::Timeout(ms)),
        }
    }
}

/// Fake platform with a programmable response script
///
/// Responses are enqueued per permission identifier and consumed in order;
/// when a queue runs dry the configured default answers. The defaults model
/// a fresh install: checks read `NotDetermined`, requests come back
/// `Denied`.
///
/// Call counts are tracked so tests can assert how often the "OS" was
/// actually consulted.
pub struct ScriptedDelegate {
    check_script: Mutex<HashMap<String, VecDeque<ScriptedResponse>>>,
    request_script: Mutex<HashMap<String, VecDeque<ScriptedResponse>>>,
    default_check: Mutex<ScriptedResponse>,
    default_request: Mutex<ScriptedResponse>,
    check_calls: AtomicUsize,
    request_calls: AtomicUsize,
    settings_calls: AtomicUsize,
}

impl ScriptedDelegate {
    /// Create a delegate with fresh-install defaults
    pub fn new() -> Self {
        Self {
            check_script: Mutex::new(HashMap::new()),
            request_script: Mutex::new(HashMap::new()),
            default_check: Mutex::new(ScriptedResponse::Status(PermissionStatus::NotDetermined)),
            default_request: Mutex::new(ScriptedResponse::Status(PermissionStatus::Denied)),
            check_calls: AtomicUsize::new(0),
            request_calls: AtomicUsize::new(0),
            settings_calls: AtomicUsize::new(0),
        }
    }

    /// Enqueue one answer for `check_status` on the given identifier
    pub fn enqueue_check(&self, identifier: &str, response: ScriptedResponse) {
        self.check_script
            .lock()
            .unwrap()
            .entry(identifier.to_string())
            .or_default()
            .push_back(response);
    }

    /// Enqueue one answer for `request` on the given identifier
    pub fn enqueue_request(&self, identifier: &str, response: ScriptedResponse) {
        self.request_script
            .lock()
            .unwrap()
            .entry(identifier.to_string())
            .or_default()
            .push_back(response);
    }

    /// Replace the fallback answer for `check_status`
    pub fn set_default_check(&self, response: ScriptedResponse) {
        *self.default_check.lock().unwrap() = response;
    }

    /// Replace the fallback answer for `request`
    pub fn set_default_request(&self, response: ScriptedResponse) {
        *self.default_request.lock().unwrap() = response;
    }

    /// Number of `check_status` calls seen
    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    /// Number of `request` calls seen
    pub fn request_calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }

    /// Number of `open_settings` calls seen
    pub fn settings_calls(&self) -> usize {
        self.settings_calls.load(Ordering::SeqCst)
    }

    fn next_response(
        script: &Mutex<HashMap<String, VecDeque<ScriptedResponse>>>,
        default: &Mutex<ScriptedResponse>,
        identifier: &str,
    ) -> ScriptedResponse {
        let mut script = script.lock().unwrap();
        script
            .get_mut(identifier)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| default.lock().unwrap().clone())
    }

    /// A custom permission with nothing to request on this platform is a
    /// no-op and resolves as granted, mirroring the documented delegate
    /// convention.
    fn vacuous_grant(descriptor: &PermissionDescriptor) -> bool {
        match descriptor {
            PermissionDescriptor::Custom(custom) => {
                custom.android_permissions.is_empty() && custom.ios_usage_key.is_none()
            }
            PermissionDescriptor::WellKnown(_) => false,
        }
    }
}

impl Default for ScriptedDelegate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformDelegate for ScriptedDelegate {
    async fn check_status(
        &self,
        descriptor: &PermissionDescriptor,
    ) -> Result<PermissionStatus, PlatformError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);

        if Self::vacuous_grant(descriptor) {
            return Ok(PermissionStatus::Granted);
        }

        Self::next_response(&self.check_script, &self.default_check, descriptor.identifier())
            .into_result()
    }

    async fn request(
        &self,
        descriptor: &PermissionDescriptor,
    ) -> Result<PermissionStatus, PlatformError> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);

        if Self::vacuous_grant(descriptor) {
            return Ok(PermissionStatus::Granted);
        }

        Self::next_response(
            &self.request_script,
            &self.default_request,
            descriptor.identifier(),
        )
        .into_result()
    }

    async fn open_settings(&self) {
        self.settings_calls.fetch_add(1, Ordering::SeqCst);
    }
}
