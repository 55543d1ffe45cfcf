//! UI-facing permission handlers
//!
//! A [`PermissionHandler`] wraps one permission with the state machine a
//! screen actually needs: call [`request`](PermissionHandler::request) from
//! a button tap and observe [`HandlerUiState`] to know whether to render a
//! rationale prompt or a settings redirect. The handler owns the
//! first-request suppression rule: a denial that is the direct result of
//! this call's own native prompt never produces a dialog of ours on top of
//! the one the user just dismissed.
//!
//! [`PermissionGroupHandler`] coordinates several permissions for flows
//! that need all of them at once (e.g. a video call needing camera plus
//! microphone) and surfaces only the aggregate.

mod group;
mod handler;
mod ui_state;

pub use group::{GroupResult, PermissionGroupHandler, RequestOutcome};
pub use handler::{HandlerPhase, PermissionHandler, PromptTexts};
pub use ui_state::HandlerUiState;
