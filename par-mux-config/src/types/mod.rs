//! Configuration types and enums.
//!
//! Split into focused sub-modules by domain:
//! - `alert`: alert kinds, action policies and visual modes
//! - `options`: per-window monitoring and per-session delivery option sets
//! - `log_level`: debug log verbosity

pub mod alert;
pub mod log_level;
pub mod options;

pub use alert::{AlertAction, AlertKind, VisualMode};
pub use log_level::LogLevel;
pub use options::{MonitorOptions, SessionAlertOptions};
