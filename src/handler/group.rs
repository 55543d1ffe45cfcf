//! Multi-permission group coordinator

use std::sync::Arc;

use futures::future::join_all;

use crate::core::{PermissionDescriptor, PermissionStatus};
use crate::manager::PermissionManager;

/// Outcome of one permission inside a group request
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    /// The permission resolved to a status
    Resolved(PermissionStatus),
    /// A recoverable platform error; counts as not granted
    Failed(String),
}

impl RequestOutcome {
    /// Check if the permission ended up granted
    pub fn is_granted(&self) -> bool {
        matches!(self, RequestOutcome::Resolved(PermissionStatus::Granted))
    }

    /// Check if the permission is permanently denied
    pub fn is_denied_always(&self) -> bool {
        matches!(
            self,
            RequestOutcome::Resolved(PermissionStatus::DeniedAlways)
        )
    }
}

/// Aggregate result of a group request
#[derive(Debug, Clone)]
pub struct GroupResult {
    /// Per-permission outcomes, keyed by identifier
    pub outcomes: Vec<(String, RequestOutcome)>,
    /// True iff every permission resolved granted
    pub all_granted: bool,
    /// True iff every permission resolved permanently denied
    pub all_denied_always: bool,
}

impl GroupResult {
    fn from_outcomes(outcomes: Vec<(String, RequestOutcome)>) -> Self {
        let all_granted = outcomes.iter().all(|(_, o)| o.is_granted());
        let all_denied_always = outcomes.iter().all(|(_, o)| o.is_denied_always());
        Self {
            outcomes,
            all_granted,
            all_denied_always,
        }
    }

    /// Neither uniformly granted nor uniformly hard-denied
    pub fn is_mixed(&self) -> bool {
        !self.all_granted && !self.all_denied_always
    }
}

/// Coordinator for flows that need several permissions together
///
/// `request_all` drives each permission through the shared manager and
/// surfaces only the aggregate; per-permission UI flow (rationale, settings
/// guidance) stays with the caller, which can fall back to individual
/// [`PermissionHandler`](super::PermissionHandler)s for the permissions
/// that did not come back granted.
pub struct PermissionGroupHandler {
    manager: Arc<PermissionManager>,
    descriptors: Vec<PermissionDescriptor>,
}

impl PermissionGroupHandler {
    /// Create a group over the given permissions
    pub fn new(
        manager: Arc<PermissionManager>,
        descriptors: impl IntoIterator<Item = PermissionDescriptor>,
    ) -> Self {
        Self {
            manager,
            descriptors: descriptors.into_iter().collect(),
        }
    }

    /// The permissions in this group
    pub fn descriptors(&self) -> &[PermissionDescriptor] {
        &self.descriptors
    }

    /// Request every permission in the group and aggregate the results
    ///
    /// Requests run concurrently with no ordering guarantee; outcomes are
    /// independent. A recoverable platform error on one permission is
    /// recorded as that permission's outcome and treated as not granted in
    /// the aggregate.
    pub async fn request_all(&self) -> GroupResult {
        let requests = self.descriptors.iter().map(|descriptor| async move {
            let outcome = match self.manager.request(descriptor).await {
                Ok(status) => RequestOutcome::Resolved(status),
                Err(err) => {
                    tracing::warn!("Group request for {} failed: {}", descriptor, err);
                    RequestOutcome::Failed(err.to_string())
                }
            };
            (descriptor.identifier().to_string(), outcome)
        });

        let result = GroupResult::from_outcomes(join_all(requests).await);
        tracing::debug!(
            "Group request finished: all_granted={}, all_denied_always={}",
            result.all_granted,
            result.all_denied_always
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WellKnownPermission;
    use crate::platform::{ScriptedDelegate, ScriptedResponse};

    fn group_with(delegate: Arc<ScriptedDelegate>) -> PermissionGroupHandler {
        let manager = Arc::new(PermissionManager::new(delegate));
        PermissionGroupHandler::new(
            manager,
            [
                PermissionDescriptor::from(WellKnownPermission::Camera),
                PermissionDescriptor::from(WellKnownPermission::Microphone),
            ],
        )
    }

    #[tokio::test]
    async fn test_all_granted() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.set_default_request(ScriptedResponse::Status(PermissionStatus::Granted));
        let group = group_with(delegate);

        let result = group.request_all().await;

        assert!(result.all_granted);
        assert!(!result.all_denied_always);
        assert!(!result.is_mixed());
        assert_eq!(result.outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_all_denied_always() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.set_default_request(ScriptedResponse::Status(PermissionStatus::DeniedAlways));
        let group = group_with(delegate);

        let result = group.request_all().await;

        assert!(!result.all_granted);
        assert!(result.all_denied_always);
    }

    #[tokio::test]
    async fn test_mixed_outcomes() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.enqueue_request("camera", ScriptedResponse::Status(PermissionStatus::Granted));
        delegate.enqueue_request(
            "microphone",
            ScriptedResponse::Status(PermissionStatus::Denied),
        );
        let group = group_with(delegate);

        let result = group.request_all().await;

        assert!(!result.all_granted);
        assert!(!result.all_denied_always);
        assert!(result.is_mixed());
    }

    #[tokio::test]
    async fn test_error_counts_as_not_granted() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.set_default_request(ScriptedResponse::Status(PermissionStatus::Granted));
        delegate.enqueue_request(
            "microphone",
            ScriptedResponse::Unavailable("audio service down".into()),
        );
        let group = group_with(delegate);

        let result = group.request_all().await;

        assert!(!result.all_granted);
        assert!(result.is_mixed());

        let microphone = result
            .outcomes
            .iter()
            .find(|(id, _)| id == "microphone")
            .unwrap();
        assert!(matches!(microphone.1, RequestOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_outcomes_cover_every_descriptor() {
        let delegate = Arc::new(ScriptedDelegate::new());
        let group = group_with(delegate);

        let result = group.request_all().await;

        let ids: Vec<&str> = result.outcomes.iter().map(|(id, _)| id.as_str()).collect();
        assert!(ids.contains(&"camera"));
        assert!(ids.contains(&"microphone"));
    }
}
