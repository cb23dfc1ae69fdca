//! Option sets consulted by the alert engine.
//!
//! Field names are snake_case; the tmux-style kebab-case spellings
//! (`monitor-bell`, `bell-action`, ...) are accepted as aliases.

use super::alert::{AlertAction, AlertKind, VisualMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-window monitoring options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorOptions {
    /// Monitor the window for bell characters
    #[serde(default = "crate::defaults::monitor_bell", alias = "monitor-bell")]
    pub monitor_bell: bool,
    /// Monitor the window for output activity
    #[serde(
        default = "crate::defaults::monitor_activity",
        alias = "monitor-activity"
    )]
    pub monitor_activity: bool,
    /// Seconds of silence before a silence alert (0 = disabled)
    #[serde(
        default = "crate::defaults::monitor_silence",
        alias = "monitor-silence"
    )]
    pub monitor_silence: u64,
}

impl MonitorOptions {
    /// Whether monitoring is enabled for `kind`
    pub fn enabled(&self, kind: AlertKind) -> bool {
        match kind {
            AlertKind::Bell => self.monitor_bell,
            AlertKind::Activity => self.monitor_activity,
            AlertKind::Silence => self.monitor_silence != 0,
        }
    }

    /// Silence timer interval, `None` when silence monitoring is off
    pub fn silence_interval(&self) -> Option<Duration> {
        (self.monitor_silence != 0).then(|| Duration::from_secs(self.monitor_silence))
    }
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            monitor_bell: crate::defaults::monitor_bell(),
            monitor_activity: crate::defaults::monitor_activity(),
            monitor_silence: crate::defaults::monitor_silence(),
        }
    }
}

/// Per-session delivery options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAlertOptions {
    #[serde(default = "crate::defaults::bell_action", alias = "bell-action")]
    pub bell_action: AlertAction,
    #[serde(default = "crate::defaults::activity_action", alias = "activity-action")]
    pub activity_action: AlertAction,
    #[serde(default = "crate::defaults::silence_action", alias = "silence-action")]
    pub silence_action: AlertAction,
    #[serde(default, alias = "visual-bell")]
    pub visual_bell: VisualMode,
    #[serde(default, alias = "visual-activity")]
    pub visual_activity: VisualMode,
    #[serde(default, alias = "visual-silence")]
    pub visual_silence: VisualMode,
}

impl SessionAlertOptions {
    /// Action policy for `kind`
    pub fn action(&self, kind: AlertKind) -> AlertAction {
        match kind {
            AlertKind::Bell => self.bell_action,
            AlertKind::Activity => self.activity_action,
            AlertKind::Silence => self.silence_action,
        }
    }

    /// Visual mode for `kind`
    pub fn visual(&self, kind: AlertKind) -> VisualMode {
        match kind {
            AlertKind::Bell => self.visual_bell,
            AlertKind::Activity => self.visual_activity,
            AlertKind::Silence => self.visual_silence,
        }
    }

    /// Set the action policy for `kind`
    pub fn set_action(&mut self, kind: AlertKind, action: AlertAction) {
        match kind {
            AlertKind::Bell => self.bell_action = action,
            AlertKind::Activity => self.activity_action = action,
            AlertKind::Silence => self.silence_action = action,
        }
    }

    /// Set the visual mode for `kind`
    pub fn set_visual(&mut self, kind: AlertKind, visual: VisualMode) {
        match kind {
            AlertKind::Bell => self.visual_bell = visual,
            AlertKind::Activity => self.visual_activity = visual,
            AlertKind::Silence => self.visual_silence = visual,
        }
    }
}

impl Default for SessionAlertOptions {
    fn default() -> Self {
        Self {
            bell_action: crate::defaults::bell_action(),
            activity_action: crate::defaults::activity_action(),
            silence_action: crate::defaults::silence_action(),
            visual_bell: VisualMode::default(),
            visual_activity: VisualMode::default(),
            visual_silence: VisualMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_enabled_per_kind() {
        let mut opts = MonitorOptions::default();
        assert!(opts.enabled(AlertKind::Bell));
        assert!(!opts.enabled(AlertKind::Activity));
        assert!(!opts.enabled(AlertKind::Silence));
        assert_eq!(opts.silence_interval(), None);

        opts.monitor_silence = 5;
        assert!(opts.enabled(AlertKind::Silence));
        assert_eq!(opts.silence_interval(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_session_option_accessors() {
        let mut opts = SessionAlertOptions::default();
        assert_eq!(opts.action(AlertKind::Bell), AlertAction::Any);
        assert_eq!(opts.action(AlertKind::Activity), AlertAction::Other);

        opts.set_action(AlertKind::Silence, AlertAction::ServerAny);
        opts.set_visual(AlertKind::Silence, VisualMode::Both);
        assert_eq!(opts.silence_action, AlertAction::ServerAny);
        assert_eq!(opts.visual(AlertKind::Silence), VisualMode::Both);
        assert_eq!(opts.visual(AlertKind::Bell), VisualMode::Off);
    }

    #[test]
    fn test_kebab_aliases() {
        let yaml = r#"
monitor-activity: true
monitor-silence: 30
"#;
        let opts: MonitorOptions = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(opts.monitor_bell);
        assert!(opts.monitor_activity);
        assert_eq!(opts.monitor_silence, 30);
    }
}
