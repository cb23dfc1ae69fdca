//! Outputs of the alert engine.
//!
//! The engine never renders anything itself. It calls an [`AlertSink`] to
//! refresh a session's status line, ring a client's bell, show a client a
//! transient message or dispatch an alert hook.

use crate::mux::{Client, LinkRef, Session, Window, WindowId};
use par_mux_config::AlertKind;
use serde::Serialize;
use std::fmt;

/// Hook event dispatched for every link an alert is delivered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertHook {
    pub kind: AlertKind,
    pub link: LinkRef,
    pub session_name: String,
    pub window: WindowId,
    pub window_name: String,
}

impl AlertHook {
    pub(crate) fn new(kind: AlertKind, link: LinkRef, session: &Session, window: &Window) -> Self {
        Self {
            kind,
            link,
            session_name: session.name().to_string(),
            window: window.id(),
            window_name: window.name().to_string(),
        }
    }

    /// Hook name (`alert-bell`, `alert-activity`, `alert-silence`)
    pub fn name(&self) -> &'static str {
        self.kind.hook_name()
    }
}

/// Receiver of alert deliveries.
pub trait AlertSink {
    /// Redraw the status line of every client attached to `session`
    fn refresh_status(&mut self, session: &Session);

    /// Send a bell to `client`'s terminal
    fn ring_bell(&mut self, client: &Client);

    /// Show `message` in `client`'s status line
    fn show_message(&mut self, client: &Client, message: &str);

    /// Run the hook for an alert delivered on a link
    fn dispatch_hook(&mut self, hook: &AlertHook);
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    StatusRefresh {
        session: String,
    },
    Bell {
        client: String,
    },
    Message {
        client: String,
        text: String,
    },
    Hook {
        hook: String,
        session: String,
        window: String,
    },
}

impl fmt::Display for SinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkEvent::StatusRefresh { session } => write!(f, "status-refresh {session}"),
            SinkEvent::Bell { client } => write!(f, "bell {client}"),
            SinkEvent::Message { client, text } => write!(f, "message {client}: {text}"),
            SinkEvent::Hook {
                hook,
                session,
                window,
            } => write!(f, "hook {hook} {session}:{window}"),
        }
    }
}

/// Sink that records every call, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the sink empty
    pub fn take(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of bells sent to the named client
    pub fn bells_to(&self, client: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Bell { client: c } if c == client))
            .count()
    }

    /// Messages shown to the named client
    pub fn messages_to(&self, client: &str) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Message { client: c, text } if c == client => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of hooks dispatched for `kind`
    pub fn hooks(&self, kind: AlertKind) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Hook { hook, .. } if hook == kind.hook_name()))
            .count()
    }

    /// Number of status refreshes requested for the named session
    pub fn status_refreshes(&self, session: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::StatusRefresh { session: s } if s == session))
            .count()
    }
}

impl AlertSink for RecordingSink {
    fn refresh_status(&mut self, session: &Session) {
        self.events.push(SinkEvent::StatusRefresh {
            session: session.name().to_string(),
        });
    }

    fn ring_bell(&mut self, client: &Client) {
        self.events.push(SinkEvent::Bell {
            client: client.name().to_string(),
        });
    }

    fn show_message(&mut self, client: &Client, message: &str) {
        self.events.push(SinkEvent::Message {
            client: client.name().to_string(),
            text: message.to_string(),
        });
    }

    fn dispatch_hook(&mut self, hook: &AlertHook) {
        self.events.push(SinkEvent::Hook {
            hook: hook.name().to_string(),
            session: hook.session_name.clone(),
            window: hook.window_name.clone(),
        });
    }
}

/// Sink that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn refresh_status(&mut self, session: &Session) {
        log::info!("status refresh for session {} ({})", session.id(), session.name());
    }

    fn ring_bell(&mut self, client: &Client) {
        log::info!("bell to client {} ({})", client.id(), client.name());
    }

    fn show_message(&mut self, client: &Client, message: &str) {
        log::info!("message to client {} ({}): {}", client.id(), client.name(), message);
    }

    fn dispatch_hook(&mut self, hook: &AlertHook) {
        log::info!(
            "hook {} on {} ({}:{})",
            hook.name(),
            hook.link,
            hook.session_name,
            hook.window_name
        );
    }
}
