//! Alert kinds, delivery policies and visual modes.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Alert Kinds
// ============================================================================

/// Conditions detected on a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Bell character received (BEL / 0x07)
    Bell,
    /// The window produced output
    Activity,
    /// The window produced no output for `monitor_silence` seconds
    Silence,
}

impl AlertKind {
    /// Display name used in status messages ("Bell in current window")
    pub fn display_name(&self) -> &'static str {
        match self {
            AlertKind::Bell => "Bell",
            AlertKind::Activity => "Activity",
            AlertKind::Silence => "Silence",
        }
    }

    /// Lowercase name used to build option and hook names
    pub fn option_name(&self) -> &'static str {
        match self {
            AlertKind::Bell => "bell",
            AlertKind::Activity => "activity",
            AlertKind::Silence => "silence",
        }
    }

    /// Name of the hook dispatched when this alert is delivered
    pub fn hook_name(&self) -> &'static str {
        match self {
            AlertKind::Bell => "alert-bell",
            AlertKind::Activity => "alert-activity",
            AlertKind::Silence => "alert-silence",
        }
    }

    /// All kinds, in evaluation order
    pub fn all() -> &'static [AlertKind] {
        &[AlertKind::Bell, AlertKind::Activity, AlertKind::Silence]
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Action Policy
// ============================================================================

/// Which clients an alert applies to, relative to the window's session.
///
/// `current` means only alert for the session's current window, `other`
/// only for windows other than the current one. The `server-*` variants
/// also apply to clients attached to other sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AlertAction {
    /// Never alert
    None,
    /// Alert only when the window is the session's current window
    Current,
    /// Alert only when the window is not the session's current window
    Other,
    /// Alert for any window in the session
    #[default]
    Any,
    /// Alert for any window, including clients of other sessions
    ServerAny,
    /// Alert for non-current windows, including clients of other sessions
    ServerOther,
}

impl AlertAction {
    /// Display name for logs and UI
    pub fn display_name(&self) -> &'static str {
        match self {
            AlertAction::None => "none",
            AlertAction::Current => "current",
            AlertAction::Other => "other",
            AlertAction::Any => "any",
            AlertAction::ServerAny => "server-any",
            AlertAction::ServerOther => "server-other",
        }
    }

    /// Whether clients attached to other sessions are also eligible
    pub fn is_server_wide(&self) -> bool {
        matches!(self, AlertAction::ServerAny | AlertAction::ServerOther)
    }
}

// ============================================================================
// Visual Mode
// ============================================================================

/// How an alert is presented to an interactive client.
///
/// `off` sends a bell, `on` substitutes a status message for the bell and
/// `both` sends a bell and a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisualMode {
    /// Bell only
    #[default]
    Off,
    /// Status message only
    On,
    /// Bell and status message
    Both,
}

impl VisualMode {
    /// Whether a bell is sent in this mode
    pub fn rings_bell(self) -> bool {
        matches!(self, VisualMode::Off | VisualMode::Both)
    }

    /// Whether a status message is shown in this mode
    pub fn shows_message(self) -> bool {
        matches!(self, VisualMode::On | VisualMode::Both)
    }
}
