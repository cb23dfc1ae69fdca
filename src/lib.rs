// Library exports for the binary and the integration tests.
//
// Everything in the alert engine runs on a single thread: windows are shared
// through `Rc` with interior mutability, and timers hold `Weak` handles back
// to their window. The only lock is the `parking_lot::Mutex` guarding the
// debug log file.

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod alerts;
pub mod cli;
pub mod debug;
pub mod event_loop;
pub mod mux;
pub mod scenario;
pub mod server;

pub use alerts::{AlertFlags, AlertHook, AlertSink, LogSink, RecordingSink, SinkEvent};
pub use mux::{ClientId, ClientKind, LinkId, LinkRef, Mux, MuxError, SessionId, WindowId};
pub use par_mux_config::{
    AlertAction, AlertKind, Config, ConfigError, MonitorOptions, SessionAlertOptions, VisualMode,
};
pub use server::Server;
