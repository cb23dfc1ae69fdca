//! Shared integration test helpers for par-mux.
//!
//! ```ignore
//! mod common;
//! use common::{server, session_with_windows};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers is used by a test file.

#![allow(dead_code)]

use par_mux::{
    ClientId, ClientKind, Config, LinkRef, MonitorOptions, RecordingSink, Server, SessionId,
    WindowId,
};
use std::time::Duration;

/// Config monitoring every kind, with the given silence interval.
pub fn monitoring_config(silence_secs: u64) -> Config {
    Config {
        monitor: MonitorOptions {
            monitor_bell: true,
            monitor_activity: true,
            monitor_silence: silence_secs,
        },
        ..Config::default()
    }
}

/// Server on the manual clock recording every sink call.
pub fn server(config: Config) -> Server<RecordingSink> {
    Server::new(config, RecordingSink::new())
}

/// Create a session with one window per name; the first becomes current.
pub fn session_with_windows(
    server: &mut Server<RecordingSink>,
    session: &str,
    windows: &[&str],
) -> (SessionId, Vec<WindowId>) {
    let sid = server.new_session(session);
    let mut ids = Vec::new();
    for name in windows {
        let wid = server.new_window(name);
        server.link_window(sid, wid).expect("link window");
        ids.push(wid);
    }
    (sid, ids)
}

pub fn attach(server: &mut Server<RecordingSink>, name: &str, session: SessionId) -> ClientId {
    server
        .attach_client(name, ClientKind::Interactive, session)
        .expect("attach client")
}

/// The link of `window` in `session`.
pub fn link_of(server: &Server<RecordingSink>, session: SessionId, window: WindowId) -> LinkRef {
    let link = server
        .mux()
        .session(session)
        .and_then(|s| s.link_for_window(window))
        .expect("window linked into session")
        .id();
    LinkRef { session, link }
}

/// Advance the manual clock by whole seconds.
pub fn advance_secs(server: &mut Server<RecordingSink>, secs: u64) {
    server.advance(Duration::from_secs(secs));
}
