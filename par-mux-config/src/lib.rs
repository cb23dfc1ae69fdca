//! Configuration system for the par-mux alert engine.
//!
//! This crate provides configuration loading, saving, and default values
//! for alert monitoring. It includes:
//!
//! - Per-window monitoring options (`monitor_bell`, `monitor_activity`, `monitor_silence`)
//! - Per-session delivery options (`*_action` policies and `visual_*` modes)
//! - Log level selection for the debug log bridge
//! - YAML persistence with XDG-style path resolution

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;

// Re-export config types
pub use types::{AlertAction, AlertKind, LogLevel, MonitorOptions, SessionAlertOptions, VisualMode};
