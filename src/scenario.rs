//! Scenario replay: drive the alert engine from a YAML script.
//!
//! A scenario declares sessions (with the names of the windows linked into
//! each), clients and timed steps. A window name listed in several sessions
//! is a single window linked into all of them.
//!
//! ```yaml
//! sessions:
//!   - name: work
//!     windows: [editor, build]
//!     current: editor
//!     options:
//!       activity_action: other
//!       visual_activity: both
//! windows:
//!   build:
//!     monitor_activity: true
//!     monitor_silence: 5
//! clients:
//!   - name: alice
//!     session: work
//! steps:
//!   - at: 1
//!     signal: { window: build, kind: activity }
//!   - at: 2
//!     select: { session: work, window: build }
//! run_until: 10
//! ```
//!
//! Replay runs on the virtual clock by default and reports every sink event
//! with its time offset from the start.

use crate::alerts::{AlertSink, RecordingSink, SinkEvent};
use crate::mux::{ClientKind, LinkRef, MuxError, SessionId, WindowId};
use crate::server::Server;
use par_mux_config::{AlertKind, Config, MonitorOptions, SessionAlertOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("unknown session '{0}'")]
    UnknownSession(String),

    #[error("unknown window '{0}'")]
    UnknownWindow(String),

    #[error("unknown client '{0}'")]
    UnknownClient(String),

    #[error("duplicate {kind} name '{name}'")]
    Duplicate { kind: &'static str, name: String },

    #[error("window '{window}' is not linked into session '{session}'")]
    NotLinked { session: String, window: String },

    #[error("invalid step time {0}")]
    InvalidTime(f64),

    #[error(transparent)]
    Mux(#[from] MuxError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSpec {
    pub name: String,
    #[serde(default)]
    pub windows: Vec<String>,
    /// Window made current after linking; defaults to the first
    #[serde(default)]
    pub current: Option<String>,
    /// Delivery options; the config's apply when absent
    #[serde(default)]
    pub options: Option<SessionAlertOptions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSpec {
    pub name: String,
    pub session: String,
    /// Headless control-mode client
    #[serde(default)]
    pub control: bool,
}

/// What a step does.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Signal { window: String, kind: AlertKind },
    Select { session: String, window: String },
    Unlink { session: String, window: String },
    Destroy { window: String },
    Attach { client: String, session: String },
    Detach { client: String },
    CheckSession { session: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Seconds from the start of the replay
    pub at: f64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub sessions: Vec<SessionSpec>,
    /// Per-window monitoring overrides, keyed by window name
    #[serde(default)]
    pub windows: BTreeMap<String, MonitorOptions>,
    #[serde(default)]
    pub clients: Vec<ClientSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Seconds to keep running after the start; defaults to the last step
    #[serde(default)]
    pub run_until: Option<f64>,
}

/// A sink event stamped with its offset from the start of the replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    #[serde(serialize_with = "serialize_secs")]
    pub at: Duration,
    #[serde(flatten)]
    pub event: SinkEvent,
}

fn serialize_secs<S: serde::Serializer>(at: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(at.as_secs_f64())
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>8.3}s] {}", self.at.as_secs_f64(), self.event)
    }
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Build a server holding the scenario's sessions, windows and clients
    pub fn build<S: AlertSink>(&self, server: &mut Server<S>) -> Result<(), ScenarioError> {
        for spec in &self.sessions {
            if server.mux().find_session(&spec.name).is_some() {
                return Err(ScenarioError::Duplicate {
                    kind: "session",
                    name: spec.name.clone(),
                });
            }
            let session = server.new_session(&spec.name);
            if let Some(options) = spec.options {
                server.set_session_options(session, options)?;
            }

            for name in &spec.windows {
                let window = match server.mux().find_window(name) {
                    Some(w) => w.id(),
                    None => {
                        let id = server.new_window(name);
                        if let Some(options) = self.windows.get(name) {
                            server.set_window_options(id, *options)?;
                        }
                        id
                    }
                };
                server.link_window(session, window)?;
            }

            if let Some(current) = &spec.current {
                let window = window_id(server, current)?;
                server
                    .select_window(session, window)
                    .map_err(|_| ScenarioError::NotLinked {
                        session: spec.name.clone(),
                        window: current.clone(),
                    })?;
            }
        }

        for spec in &self.clients {
            if server.mux().find_client(&spec.name).is_some() {
                return Err(ScenarioError::Duplicate {
                    kind: "client",
                    name: spec.name.clone(),
                });
            }
            let session = session_id(server, &spec.session)?;
            let kind = if spec.control {
                ClientKind::Control
            } else {
                ClientKind::Interactive
            };
            server.attach_client(&spec.name, kind, session)?;
        }
        Ok(())
    }

    /// Steps ordered by time (stable for equal times), with their offsets
    fn ordered_steps(&self) -> Result<Vec<(Duration, &Step)>, ScenarioError> {
        let mut steps = self
            .steps
            .iter()
            .map(|step| Ok((offset(step.at)?, step)))
            .collect::<Result<Vec<_>, ScenarioError>>()?;
        steps.sort_by_key(|(at, _)| *at);
        Ok(steps)
    }

    fn end(&self, steps: &[(Duration, &Step)]) -> Result<Duration, ScenarioError> {
        let last = steps.last().map_or(Duration::ZERO, |(at, _)| *at);
        let end = self.run_until.map(offset).transpose()?.unwrap_or(last);
        Ok(end.max(last))
    }
}

/// Seconds from the start of the replay as a duration
fn offset(secs: f64) -> Result<Duration, ScenarioError> {
    if secs < 0.0 {
        return Err(ScenarioError::InvalidTime(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ScenarioError::InvalidTime(secs))
}

/// The loop time `offset` after `start`
fn deadline(start: Instant, offset: Duration) -> Result<Instant, ScenarioError> {
    start
        .checked_add(offset)
        .ok_or(ScenarioError::InvalidTime(offset.as_secs_f64()))
}

fn session_id<S: AlertSink>(server: &Server<S>, name: &str) -> Result<SessionId, ScenarioError> {
    server
        .mux()
        .find_session(name)
        .map(|s| s.id())
        .ok_or_else(|| ScenarioError::UnknownSession(name.to_string()))
}

fn window_id<S: AlertSink>(server: &Server<S>, name: &str) -> Result<WindowId, ScenarioError> {
    server
        .mux()
        .find_window(name)
        .map(|w| w.id())
        .ok_or_else(|| ScenarioError::UnknownWindow(name.to_string()))
}

fn link_ref<S: AlertSink>(
    server: &Server<S>,
    session: &str,
    window: &str,
) -> Result<LinkRef, ScenarioError> {
    let session_id = session_id(server, session)?;
    let window_id = window_id(server, window)?;
    let not_linked = || ScenarioError::NotLinked {
        session: session.to_string(),
        window: window.to_string(),
    };
    let link = server
        .mux()
        .session(session_id)
        .and_then(|s| s.link_for_window(window_id))
        .ok_or_else(not_linked)?;
    Ok(LinkRef {
        session: session_id,
        link: link.id(),
    })
}

fn apply<S: AlertSink>(server: &mut Server<S>, action: &Action) -> Result<(), ScenarioError> {
    log::debug!("scenario step {:?}", action);
    match action {
        Action::Signal { window, kind } => {
            let id = window_id(server, window)?;
            server.signal(id, *kind)?;
        }
        Action::Select { session, window } => {
            let link = link_ref(server, session, window)?;
            server.select_link(link)?;
        }
        Action::Unlink { session, window } => {
            let link = link_ref(server, session, window)?;
            server.unlink_window(link)?;
        }
        Action::Destroy { window } => {
            let id = window_id(server, window)?;
            server.destroy_window(id)?;
        }
        Action::Attach { client, session } => {
            let session = session_id(server, session)?;
            match server.mux().find_client(client).map(|c| c.id()) {
                Some(id) => server.switch_client(id, session)?,
                None => {
                    server.attach_client(client, ClientKind::Interactive, session)?;
                }
            }
        }
        Action::Detach { client } => {
            let id = server
                .mux()
                .find_client(client)
                .map(|c| c.id())
                .ok_or_else(|| ScenarioError::UnknownClient(client.clone()))?;
            server.detach_client(id)?;
        }
        Action::CheckSession { session } => {
            let id = session_id(server, session)?;
            server.check_session(id)?;
        }
    }
    Ok(())
}

fn collect(server: &mut Server<RecordingSink>, at: Duration, out: &mut Vec<TimedEvent>) {
    out.extend(
        server
            .sink_mut()
            .take()
            .into_iter()
            .map(|event| TimedEvent { at, event }),
    );
}

/// Run the manual clock to `target`, stamping events with the deadline of
/// the timer that produced them
fn advance_collecting(
    server: &mut Server<RecordingSink>,
    start: Instant,
    target: Instant,
    out: &mut Vec<TimedEvent>,
) {
    while let Some(next) = server.next_deadline().filter(|d| *d <= target) {
        server.run_until(next);
        collect(server, next - start, out);
    }
    server.run_until(target);
    collect(server, target - start, out);
}

/// Replay a scenario on the virtual clock
pub fn replay(scenario: &Scenario, config: Config) -> Result<Vec<TimedEvent>, ScenarioError> {
    let mut server = Server::new(config, RecordingSink::new());
    scenario.build(&mut server)?;
    let steps = scenario.ordered_steps()?;
    let end = scenario.end(&steps)?;

    let start = server.now();
    let finish = deadline(start, end)?;
    let mut events = Vec::new();
    for (offset, step) in steps {
        let at = deadline(start, offset)?;
        advance_collecting(&mut server, start, at, &mut events);
        apply(&mut server, &step.action)?;
        server.run_pending();
        collect(&mut server, offset, &mut events);
    }
    advance_collecting(&mut server, start, finish, &mut events);
    Ok(events)
}

/// Replay a scenario in real time on the system clock
pub async fn replay_realtime(
    scenario: &Scenario,
    config: Config,
) -> Result<Vec<TimedEvent>, ScenarioError> {
    let mut server = Server::with_system_clock(config, RecordingSink::new());
    scenario.build(&mut server)?;
    let steps = scenario.ordered_steps()?;
    let end = scenario.end(&steps)?;

    let start = server.now();
    let finish = deadline(start, end)?;
    let mut events = Vec::new();
    for (offset, step) in steps {
        server.run_realtime_until(deadline(start, offset)?).await;
        let elapsed = server.now() - start;
        collect(&mut server, elapsed, &mut events);
        apply(&mut server, &step.action)?;
        server.run_pending();
        let elapsed = server.now() - start;
        collect(&mut server, elapsed, &mut events);
    }
    server.run_realtime_until(finish).await;
    let elapsed = server.now() - start;
    collect(&mut server, elapsed, &mut events);
    Ok(events)
}
