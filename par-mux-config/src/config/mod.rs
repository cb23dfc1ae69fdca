//! Configuration struct and persistence for par-mux.
//!
//! - `Config`: top-level settings loaded from `config.yaml`
//! - `persistence`: load/save and XDG-style path helpers

mod persistence;

use crate::types::{LogLevel, MonitorOptions, SessionAlertOptions};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Window and session options are flattened so the file reads like a flat
/// list of options:
///
/// ```yaml
/// log_level: debug
/// monitor_activity: true
/// monitor_silence: 30
/// activity_action: other
/// visual_activity: both
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Verbosity of the debug log file
    #[serde(default)]
    pub log_level: LogLevel,

    /// Monitoring options applied to every window
    #[serde(flatten)]
    pub monitor: MonitorOptions,

    /// Delivery options applied to every session
    #[serde(flatten)]
    pub alerts: SessionAlertOptions,
}
