//! Handler UI state

/// What the rendering layer should currently show for one handler
///
/// At most one of `show_rationale` / `show_settings_guide` is true; both
/// false means no prompt is pending. The struct is only ever constructed
/// through the helpers below, which maintain that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerUiState {
    /// Whether any prompt is visible
    pub is_visible: bool,
    /// Show the explanatory prompt that precedes a re-request
    pub show_rationale: bool,
    /// Show the prompt directing the user to OS settings
    pub show_settings_guide: bool,
    /// Message for the rationale prompt
    pub rationale_message: Option<String>,
    /// Message for the settings prompt
    pub settings_message: Option<String>,
}

impl HandlerUiState {
    /// No prompt pending
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Rationale prompt visible
    pub fn rationale(message: Option<String>) -> Self {
        Self {
            is_visible: true,
            show_rationale: true,
            rationale_message: message,
            ..Self::default()
        }
    }

    /// Settings-guide prompt visible
    pub fn settings_guide(message: Option<String>) -> Self {
        Self {
            is_visible: true,
            show_settings_guide: true,
            settings_message: message,
            ..Self::default()
        }
    }

    /// Whether either prompt is pending
    pub fn is_prompting(&self) -> bool {
        self.show_rationale || self.show_settings_guide
    }
}
