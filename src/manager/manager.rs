//! Permission manager implementation

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;

use crate::core::{PermissionDescriptor, PermissionResult, PermissionStatus};
use crate::platform::PlatformDelegate;
use crate::store::{InMemoryStore, PermissionStore};

/// Facade over the platform delegate and the bookkeeping store
///
/// One manager per process/session is the intended shape. The manager is
/// `Send + Sync` and is shared by any number of handlers via `Arc`;
/// operations on different permission identifiers run independently, while
/// store mutation for one identifier is serialized through a per-identifier
/// lock so a read-modify-write on the requested flag can never interleave.
pub struct PermissionManager {
    delegate: Arc<dyn PlatformDelegate>,
    store: Arc<dyn PermissionStore>,
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PermissionManager {
    /// Create a manager with the default session-scoped store
    pub fn new(delegate: Arc<dyn PlatformDelegate>) -> Self {
        Self::with_store(delegate, Arc::new(InMemoryStore::new()))
    }

    /// Create a manager with a caller-supplied store (e.g. [`FileStore`]
    /// for bookkeeping that survives process restarts)
    ///
    /// [`FileStore`]: crate::store::FileStore
    pub fn with_store(delegate: Arc<dyn PlatformDelegate>, store: Arc<dyn PermissionStore>) -> Self {
        Self {
            delegate,
            store,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// The bookkeeping store
    ///
    /// Exposed for lifecycle operations (`clear_all` on logout) and for
    /// diagnostics; normal request flow never needs it.
    pub fn store(&self) -> &Arc<dyn PermissionStore> {
        &self.store
    }

    /// Resolve the current status of a permission
    ///
    /// No UI is shown and no prompt is triggered. The live platform read is
    /// disambiguated against the requested-before flag:
    ///
    /// - a live `Granted` clears the stored bookkeeping for the permission
    ///   (no longer needed) and resolves `Granted`
    /// - a live `Denied` (the platform's own rationale-eligibility signal)
    ///   resolves `Denied`
    /// - a live `DeniedAlways` (the platform confirms permanence) resolves
    ///   `DeniedAlways`
    /// - a live `NotDetermined` is ambiguous between "never asked" and
    ///   "permanently denied": it resolves `Denied` if the prompt was ever
    ///   shown before, otherwise `NotDetermined`. The ambiguous reading is
    ///   never escalated to `DeniedAlways`, however many times it repeats;
    ///   the user keeps a recoverable path through the rationale flow.
    pub async fn check_status(
        &self,
        descriptor: &PermissionDescriptor,
    ) -> PermissionResult<PermissionStatus> {
        let key = descriptor.storage_key();
        let lock = self.id_lock(&key);
        let _guard = lock.lock().await;

        self.resolve(descriptor, &key).await
    }

    /// Request a permission, prompting the user if needed
    ///
    /// Returns immediately when the permission already resolves as granted.
    /// Otherwise the requested-before flag is written **before** the
    /// delegate shows the prompt, so a process kill mid-dialog cannot erase
    /// the fact that a request was attempted. The delegate's answer is
    /// cached and returned.
    ///
    /// Delegate failures propagate as recoverable errors; the permission
    /// stays re-requestable.
    pub async fn request(
        &self,
        descriptor: &PermissionDescriptor,
    ) -> PermissionResult<PermissionStatus> {
        let key = descriptor.storage_key();
        let lock = self.id_lock(&key);
        let _guard = lock.lock().await;

        let current = self.resolve(descriptor, &key).await?;
        if current.is_granted() {
            return Ok(current);
        }

        // Flag first, prompt second. The ordering is load-bearing: the
        // flag must survive a process kill during the dialog.
        self.store.set_requested(&key);

        let outcome = self.delegate.request(descriptor).await?;
        self.store.set_status(&key, outcome);

        tracing::info!("Permission request for {} resolved: {}", descriptor, outcome);
        Ok(outcome)
    }

    /// Open the OS settings surface for this application
    pub async fn open_settings(&self) {
        tracing::info!("Opening OS settings surface");
        self.delegate.open_settings().await;
    }

    async fn resolve(
        &self,
        descriptor: &PermissionDescriptor,
        key: &str,
    ) -> PermissionResult<PermissionStatus> {
        let live = self.delegate.check_status(descriptor).await?;

        let resolved = match live {
            PermissionStatus::Granted => {
                self.store.clear(key);
                PermissionStatus::Granted
            }
            PermissionStatus::Denied => PermissionStatus::Denied,
            PermissionStatus::DeniedAlways => PermissionStatus::DeniedAlways,
            PermissionStatus::NotDetermined => {
                if self.store.is_requested_before(key) {
                    PermissionStatus::Denied
                } else {
                    PermissionStatus::NotDetermined
                }
            }
        };

        tracing::debug!(
            "Resolved {}: live read {}, resolved {}",
            descriptor,
            live,
            resolved
        );
        Ok(resolved)
    }

    fn id_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(key.to_string()).or_default().clone()
    }
}
