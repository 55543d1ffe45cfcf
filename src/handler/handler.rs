//! Single-permission handler state machine

use std::sync::Arc;

use futures::stream::Stream;
use tokio::sync::watch;

use crate::core::{PermissionDescriptor, PermissionResult, PermissionStatus};
use crate::manager::PermissionManager;

use super::ui_state::HandlerUiState;

/// Phase of the handler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerPhase {
    /// Nothing in flight
    Idle,
    /// Resolving status / waiting on the native prompt
    Checking,
    /// Rationale prompt shown, waiting for the user's answer
    AwaitingRationale,
    /// Settings-guide prompt shown, waiting for the user's answer
    AwaitingSettings,
}

impl HandlerPhase {
    /// Check if the handler can accept a new request immediately
    pub fn is_idle(&self) -> bool {
        matches!(self, HandlerPhase::Idle)
    }

    /// Check if the handler is waiting for a prompt confirmation
    pub fn is_waiting(&self) -> bool {
        matches!(
            self,
            HandlerPhase::AwaitingRationale | HandlerPhase::AwaitingSettings
        )
    }
}

impl std::fmt::Display for HandlerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerPhase::Idle => write!(f, "Idle"),
            HandlerPhase::Checking => write!(f, "Checking"),
            HandlerPhase::AwaitingRationale => write!(f, "Awaiting rationale confirmation"),
            HandlerPhase::AwaitingSettings => write!(f, "Awaiting settings confirmation"),
        }
    }
}

/// Prompt texts supplied per request call
#[derive(Debug, Clone, Default)]
pub struct PromptTexts {
    /// Message for the rationale prompt
    pub rationale: Option<String>,
    /// Message for the settings-guide prompt
    pub settings: Option<String>,
}

impl PromptTexts {
    /// No messages; the rendering layer falls back to its own defaults
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the rationale message
    pub fn with_rationale(mut self, message: impl Into<String>) -> Self {
        self.rationale = Some(message.into());
        self
    }

    /// Set the settings-guide message
    pub fn with_settings(mut self, message: impl Into<String>) -> Self {
        self.settings = Some(message.into());
        self
    }
}

type GrantedCallback = Box<dyn FnOnce() + Send>;

/// Per-permission request state machine
///
/// Owned and driven by exactly one caller context (a screen, a view model);
/// all transitions happen sequentially through `&mut self`. The handler
/// holds a shared [`PermissionManager`] and publishes its UI state through
/// a watch channel: [`ui_state`](Self::ui_state) reads the current value,
/// [`subscribe`](Self::subscribe) / [`ui_updates`](Self::ui_updates)
/// observe changes.
///
/// The suppression contract: a denial or permanent denial that is the
/// direct, synchronous result of this call's own native prompt never shows
/// a dialog. Only a denial discovered on a subsequent call, meaning the
/// state was established earlier, produces a rationale or settings prompt.
pub struct PermissionHandler {
    descriptor: PermissionDescriptor,
    manager: Arc<PermissionManager>,
    phase: HandlerPhase,
    prompts: PromptTexts,
    pending: Option<GrantedCallback>,
    ui_tx: watch::Sender<HandlerUiState>,
}

impl PermissionHandler {
    /// Create a handler for one permission
    pub fn new(descriptor: impl Into<PermissionDescriptor>, manager: Arc<PermissionManager>) -> Self {
        let (ui_tx, _) = watch::channel(HandlerUiState::hidden());
        Self {
            descriptor: descriptor.into(),
            manager,
            phase: HandlerPhase::Idle,
            prompts: PromptTexts::default(),
            pending: None,
            ui_tx,
        }
    }

    /// The permission this handler drives
    pub fn descriptor(&self) -> &PermissionDescriptor {
        &self.descriptor
    }

    /// Current phase of the state machine
    pub fn phase(&self) -> HandlerPhase {
        self.phase
    }

    /// Current UI state snapshot
    pub fn ui_state(&self) -> HandlerUiState {
        self.ui_tx.borrow().clone()
    }

    /// Subscribe to UI state changes
    pub fn subscribe(&self) -> watch::Receiver<HandlerUiState> {
        self.ui_tx.subscribe()
    }

    /// UI state changes as a stream
    ///
    /// Yields each state published after the call; read
    /// [`ui_state`](Self::ui_state) for the current value. The stream ends
    /// when the handler is dropped.
    pub fn ui_updates(&self) -> impl Stream<Item = HandlerUiState> {
        let mut rx = self.ui_tx.subscribe();
        async_stream::stream! {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                yield state;
            }
        }
    }

    /// Entry point: resolve the permission, prompting as needed
    ///
    /// - already granted: `on_granted` runs, nothing is shown
    /// - never determined: the native prompt is shown right away, with no
    ///   rationale preceding a first-ever ask; a denial coming straight
    ///   back from that prompt is suppressed
    /// - previously denied: the rationale prompt is requested via UI state;
    ///   [`on_rationale_confirmed`](Self::on_rationale_confirmed) re-asks
    /// - permanently denied: the settings-guide prompt is requested;
    ///   [`on_settings_confirmed`](Self::on_settings_confirmed) redirects
    ///
    /// A new call while a previous one is still pending supersedes it: the
    /// old callback is dropped, last caller wins. Delegate failures are
    /// logged and treated as a denial, so the handler always returns to
    /// `Idle` rather than sticking mid-flight.
    pub async fn request<F>(&mut self, prompts: PromptTexts, on_granted: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Supersede any pending flow before starting over
        self.reset();
        self.prompts = prompts;
        self.pending = Some(Box::new(on_granted));
        self.phase = HandlerPhase::Checking;

        let status = match self.manager.check_status(&self.descriptor).await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!("Status check for {} failed: {}", self.descriptor, err);
                self.reset();
                return;
            }
        };

        match status {
            PermissionStatus::Granted => self.grant(),
            PermissionStatus::NotDetermined => {
                // First-ever ask: straight to the native prompt
                let outcome = self.manager.request(&self.descriptor).await;
                self.apply_outcome(outcome, true);
            }
            other => self.apply(other, false),
        }
    }

    /// The user accepted the rationale; re-ask via the native prompt
    ///
    /// The answer to this prompt is again a first-hand result, so a denial
    /// here is suppressed just like one on the initial ask.
    pub async fn on_rationale_confirmed(&mut self) {
        if self.phase != HandlerPhase::AwaitingRationale {
            return;
        }

        self.publish(HandlerUiState::hidden());
        self.phase = HandlerPhase::Checking;

        let outcome = self.manager.request(&self.descriptor).await;
        self.apply_outcome(outcome, true);
    }

    /// The user accepted the settings redirect
    ///
    /// Opens the OS settings surface and resets; the caller re-invokes
    /// [`request`](Self::request) when the app resumes.
    pub async fn on_settings_confirmed(&mut self) {
        if self.phase != HandlerPhase::AwaitingSettings {
            return;
        }

        self.manager.open_settings().await;
        self.reset();
    }

    /// The user dismissed whichever prompt was pending
    pub fn on_dismiss(&mut self) {
        self.reset();
    }

    fn apply_outcome(&mut self, outcome: PermissionResult<PermissionStatus>, is_first: bool) {
        match outcome {
            Ok(status) => self.apply(status, is_first),
            Err(err) => {
                // Recoverable platform failures read like "not yet granted"
                tracing::warn!("Request for {} failed: {}", self.descriptor, err);
                self.apply(PermissionStatus::Denied, is_first);
            }
        }
    }

    fn apply(&mut self, status: PermissionStatus, is_first: bool) {
        match status {
            PermissionStatus::Granted => self.grant(),
            PermissionStatus::Denied => {
                if is_first {
                    // The user just answered the native prompt; a second
                    // dialog on top of it is exactly the UX this exists to
                    // prevent
                    self.reset();
                } else {
                    self.phase = HandlerPhase::AwaitingRationale;
                    self.pending_prompt(HandlerUiState::rationale(self.prompts.rationale.clone()));
                }
            }
            PermissionStatus::DeniedAlways => {
                if is_first {
                    self.reset();
                } else {
                    self.phase = HandlerPhase::AwaitingSettings;
                    self.pending_prompt(HandlerUiState::settings_guide(
                        self.prompts.settings.clone(),
                    ));
                }
            }
            PermissionStatus::NotDetermined => {
                // The delegate still could not determine anything after a
                // prompt; nothing sensible to show
                self.reset();
            }
        }
    }

    fn grant(&mut self) {
        if let Some(callback) = self.pending.take() {
            callback();
        }
        self.reset();
    }

    fn pending_prompt(&mut self, state: HandlerUiState) {
        tracing::debug!("Handler for {} entering {}", self.descriptor, self.phase);
        self.publish(state);
    }

    fn reset(&mut self) {
        self.pending = None;
        self.phase = HandlerPhase::Idle;
        self.publish(HandlerUiState::hidden());
    }

    fn publish(&self, state: HandlerUiState) {
        self.ui_tx.send_replace(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WellKnownPermission;
    use crate::platform::{ScriptedDelegate, ScriptedResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn handler_with(delegate: Arc<ScriptedDelegate>) -> PermissionHandler {
        let manager = Arc::new(PermissionManager::new(delegate));
        PermissionHandler::new(WellKnownPermission::Camera, manager)
    }

    fn counted_callback() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let clone = count.clone();
        (count, move || {
            clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test]
    async fn test_already_granted_runs_callback_silently() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.set_default_check(ScriptedResponse::Status(PermissionStatus::Granted));
        let mut handler = handler_with(delegate);

        let (granted, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        assert_eq!(granted.load(Ordering::SeqCst), 1);
        assert!(handler.phase().is_idle());
        assert!(!handler.ui_state().is_visible);
    }

    #[tokio::test]
    async fn test_first_prompt_grant_runs_callback() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.enqueue_request("camera", ScriptedResponse::Status(PermissionStatus::Granted));
        let mut handler = handler_with(delegate);

        let (granted, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        assert_eq!(granted.load(Ordering::SeqCst), 1);
        assert!(handler.phase().is_idle());
    }

    #[tokio::test]
    async fn test_first_denial_is_suppressed() {
        let delegate = Arc::new(ScriptedDelegate::new());
        // Fresh install; request comes back with a plain denial
        let mut handler = handler_with(delegate);

        let (granted, callback) = counted_callback();
        handler
            .request(
                PromptTexts::none().with_rationale("we need the camera"),
                callback,
            )
            .await;

        // No second dialog on top of the one the user just answered
        assert_eq!(granted.load(Ordering::SeqCst), 0);
        assert!(handler.phase().is_idle());
        assert!(!handler.ui_state().show_rationale);
        assert!(!handler.ui_state().show_settings_guide);
    }

    #[tokio::test]
    async fn test_first_hard_denial_is_suppressed() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.enqueue_request(
            "camera",
            ScriptedResponse::Status(PermissionStatus::DeniedAlways),
        );
        let mut handler = handler_with(delegate);

        let (_granted, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        assert!(handler.phase().is_idle());
        assert!(!handler.ui_state().show_settings_guide);
    }

    #[tokio::test]
    async fn test_second_call_after_denial_shows_rationale() {
        let delegate = Arc::new(ScriptedDelegate::new());
        let mut handler = handler_with(delegate);

        // First tap: prompt shown, user denies, suppressed
        let (_first, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;
        assert!(handler.phase().is_idle());

        // Second tap: the denial is now established state, so explain
        let (_second, callback) = counted_callback();
        handler
            .request(
                PromptTexts::none().with_rationale("scanning needs the camera"),
                callback,
            )
            .await;

        assert_eq!(handler.phase(), HandlerPhase::AwaitingRationale);
        let ui = handler.ui_state();
        assert!(ui.show_rationale);
        assert_eq!(
            ui.rationale_message.as_deref(),
            Some("scanning needs the camera")
        );
    }

    #[tokio::test]
    async fn test_rationale_confirmed_grant_runs_callback() {
        let delegate = Arc::new(ScriptedDelegate::new());
        let delegate_handle = delegate.clone();
        let mut handler = handler_with(delegate);

        // Establish a prior denial, then re-request
        let (_first, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        let (granted, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;
        assert_eq!(handler.phase(), HandlerPhase::AwaitingRationale);

        // User accepts the rationale and then grants in the native prompt
        delegate_handle
            .enqueue_request("camera", ScriptedResponse::Status(PermissionStatus::Granted));
        handler.on_rationale_confirmed().await;

        assert_eq!(granted.load(Ordering::SeqCst), 1);
        assert!(handler.phase().is_idle());
        assert!(!handler.ui_state().is_visible);
    }

    #[tokio::test]
    async fn test_denial_after_rationale_is_suppressed() {
        let delegate = Arc::new(ScriptedDelegate::new());
        let mut handler = handler_with(delegate);

        let (_first, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        let (granted, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;
        assert_eq!(handler.phase(), HandlerPhase::AwaitingRationale);

        // User accepts the rationale but denies the native prompt again:
        // that answer is first-hand, no further dialog
        handler.on_rationale_confirmed().await;

        assert_eq!(granted.load(Ordering::SeqCst), 0);
        assert!(handler.phase().is_idle());
        assert!(!handler.ui_state().is_prompting());
    }

    #[tokio::test]
    async fn test_established_hard_denial_shows_settings_guide() {
        let delegate = Arc::new(ScriptedDelegate::new());
        // Platform reports permanence on the live read (established state)
        delegate.set_default_check(ScriptedResponse::Status(PermissionStatus::DeniedAlways));
        let mut handler = handler_with(delegate);

        let (_granted, callback) = counted_callback();
        handler
            .request(
                PromptTexts::none().with_settings("enable the camera in Settings"),
                callback,
            )
            .await;

        assert_eq!(handler.phase(), HandlerPhase::AwaitingSettings);
        let ui = handler.ui_state();
        assert!(ui.show_settings_guide);
        assert_eq!(
            ui.settings_message.as_deref(),
            Some("enable the camera in Settings")
        );
    }

    #[tokio::test]
    async fn test_settings_confirmed_opens_settings_once_and_resets() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.set_default_check(ScriptedResponse::Status(PermissionStatus::DeniedAlways));
        let delegate_handle = delegate.clone();
        let mut handler = handler_with(delegate);

        let (_granted, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;
        assert_eq!(handler.phase(), HandlerPhase::AwaitingSettings);

        handler.on_settings_confirmed().await;

        assert_eq!(delegate_handle.settings_calls(), 1);
        assert!(handler.phase().is_idle());
        assert!(!handler.ui_state().is_visible);

        // Stray confirm after reset does nothing
        handler.on_settings_confirmed().await;
        assert_eq!(delegate_handle.settings_calls(), 1);
    }

    #[tokio::test]
    async fn test_dismiss_clears_prompt_and_callback() {
        let delegate = Arc::new(ScriptedDelegate::new());
        let delegate_handle = delegate.clone();
        let mut handler = handler_with(delegate);

        let (_first, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        let (granted, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;
        assert_eq!(handler.phase(), HandlerPhase::AwaitingRationale);

        handler.on_dismiss();

        assert!(handler.phase().is_idle());
        assert!(!handler.ui_state().is_visible);

        // The dismissed flow's callback is gone for good: even a granting
        // confirm afterwards must not run it
        delegate_handle
            .enqueue_request("camera", ScriptedResponse::Status(PermissionStatus::Granted));
        handler.on_rationale_confirmed().await;
        assert_eq!(granted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_new_request_supersedes_pending_callback() {
        let delegate = Arc::new(ScriptedDelegate::new());
        let delegate_handle = delegate.clone();
        let mut handler = handler_with(delegate);

        // Establish a prior denial so requests park in AwaitingRationale
        let (_setup, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        let (first, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;
        assert_eq!(handler.phase(), HandlerPhase::AwaitingRationale);

        // Second caller arrives before the first flow finished
        let (second, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;
        assert_eq!(handler.phase(), HandlerPhase::AwaitingRationale);

        delegate_handle
            .enqueue_request("camera", ScriptedResponse::Status(PermissionStatus::Granted));
        handler.on_rationale_confirmed().await;

        // Last caller wins
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_platform_failure_returns_to_idle() {
        let delegate = Arc::new(ScriptedDelegate::new());
        delegate.enqueue_request(
            "camera",
            ScriptedResponse::Unavailable("camera service restarting".into()),
        );
        let mut handler = handler_with(delegate);

        let (granted, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        // Reads like a first-hand denial: silent, not stuck
        assert_eq!(granted.load(Ordering::SeqCst), 0);
        assert!(handler.phase().is_idle());
        assert!(!handler.ui_state().is_prompting());
    }

    #[tokio::test]
    async fn test_ui_updates_stream_sees_prompt_and_reset() {
        use futures::StreamExt;

        let delegate = Arc::new(ScriptedDelegate::new());
        let mut handler = handler_with(delegate);
        let mut updates = Box::pin(handler.ui_updates());

        let (_setup, callback) = counted_callback();
        handler.request(PromptTexts::none(), callback).await;

        let (_granted, callback) = counted_callback();
        handler
            .request(PromptTexts::none().with_rationale("explain"), callback)
            .await;

        // Drain until the rationale prompt shows up
        let mut saw_rationale = false;
        while let Some(state) = updates.next().await {
            if state.show_rationale {
                saw_rationale = true;
                break;
            }
        }
        assert!(saw_rationale);

        handler.on_dismiss();
        while let Some(state) = updates.next().await {
            if !state.is_visible {
                break;
            }
        }
    }
}
