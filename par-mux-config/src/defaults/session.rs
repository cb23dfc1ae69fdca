//! Default values for per-session delivery options.

use crate::types::AlertAction;

pub fn bell_action() -> AlertAction {
    AlertAction::Any
}

pub fn activity_action() -> AlertAction {
    AlertAction::Other
}

pub fn silence_action() -> AlertAction {
    AlertAction::Other
}
