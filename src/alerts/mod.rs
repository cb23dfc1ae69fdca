//! Alert monitoring: bell, activity and silence detection and delivery.
//!
//! This module handles:
//! - Recording alert conditions on windows (`AlertScheduler::signal`)
//! - Coalescing signals into a single deferred check (`scheduler`)
//! - Deciding which links of a window need delivery (`evaluator`)
//! - Applying per-session action and visual policies per client (`router`)
//! - Emitting bells, messages, status refreshes and hooks (`sink`)

pub mod evaluator;
mod flags;
pub mod router;
pub mod scheduler;
pub mod sink;

pub use flags::AlertFlags;
pub use scheduler::AlertScheduler;
pub use sink::{AlertHook, AlertSink, LogSink, RecordingSink, SinkEvent};

use crate::event_loop::EventLoop;
use crate::mux::Window;
use std::rc::Weak;

/// Event loop whose timers fire with a handle to the window they watch.
pub type AlertEventLoop = EventLoop<Weak<Window>>;
