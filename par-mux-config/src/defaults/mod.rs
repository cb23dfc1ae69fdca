//! Default value functions for configuration.
//!
//! Each sub-module groups related default free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on config fields.

mod monitor;
mod session;

// ── Window monitoring ──────────────────────────────────────────────────────
pub use monitor::{monitor_activity, monitor_bell, monitor_silence};

// ── Session delivery ───────────────────────────────────────────────────────
pub use session::{activity_action, bell_action, silence_action};
