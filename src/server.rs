//! Server context: the object graph, the alert scheduler, the event loop and
//! the sink, plus the session-management calls that drive them.
//!
//! Everything here runs on one thread. Session-management calls and
//! [`Server::signal`] only record state; alerts are evaluated when the loop
//! runs (`run_pending`, `run_until`, `run_realtime_until`).

use crate::alerts::{AlertEventLoop, AlertFlags, AlertScheduler, AlertSink, evaluator};
use crate::event_loop::{Event, EventLoop, Task};
use crate::mux::{ClientId, ClientKind, LinkId, LinkRef, Mux, MuxError, SessionId, Window, WindowId};
use par_mux_config::{AlertKind, Config, MonitorOptions, SessionAlertOptions};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

pub struct Server<S: AlertSink> {
    mux: Mux,
    alerts: AlertScheduler,
    event_loop: AlertEventLoop,
    sink: S,
    /// Options given to new windows and sessions
    config: Config,
}

impl<S: AlertSink> Server<S> {
    /// Create a server on a manual clock starting now
    pub fn new(config: Config, sink: S) -> Self {
        Self::with_event_loop(config, sink, EventLoop::manual(Instant::now()))
    }

    /// Create a server on the system clock
    pub fn with_system_clock(config: Config, sink: S) -> Self {
        Self::with_event_loop(config, sink, EventLoop::system())
    }

    fn with_event_loop(config: Config, sink: S, event_loop: AlertEventLoop) -> Self {
        Self {
            mux: Mux::new(),
            alerts: AlertScheduler::new(),
            event_loop,
            sink,
            config,
        }
    }

    pub fn mux(&self) -> &Mux {
        &self.mux
    }

    pub fn scheduler(&self) -> &AlertScheduler {
        &self.alerts
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current loop time
    pub fn now(&self) -> Instant {
        self.event_loop.now()
    }

    /// Earliest armed silence timer
    pub fn next_deadline(&self) -> Option<Instant> {
        self.event_loop.next_deadline()
    }

    // =========================================================================
    // Session management
    // =========================================================================

    pub fn new_session(&mut self, name: &str) -> SessionId {
        let id = self.mux.create_session(name, self.config.alerts);
        log::debug!("{id} created ({name})");
        id
    }

    /// Create a window with the configured monitoring options and start
    /// silence detection for it
    pub fn new_window(&mut self, name: &str) -> WindowId {
        let id = self.mux.next_window_id();
        let options = self.config.monitor;
        let window = Rc::new_cyclic(|weak: &Weak<Window>| {
            Window::new(id, name, options, self.event_loop.timer(weak.clone()))
        });
        window.reset_silence_timer();
        self.mux.insert_window(window);
        log::debug!("{id} created ({name})");
        id
    }

    pub fn link_window(
        &mut self,
        session: SessionId,
        window: WindowId,
    ) -> Result<LinkId, MuxError> {
        let link = self.mux.link_window(session, window)?;
        log::debug!("{window} linked into {session} as {link}");
        Ok(link)
    }

    /// Remove a link. A window losing its last link leaves the registry; if
    /// it is queued it stays alive until the pending flush has run.
    pub fn unlink_window(&mut self, link: LinkRef) -> Result<(), MuxError> {
        if let Some(window) = self.mux.unlink_window(link)? {
            if window.is_queued() {
                log::debug!("{} unlinked while queued, kept until flush", window.id());
            } else {
                log::debug!("{} unlinked, dropping", window.id());
            }
        }
        Ok(())
    }

    /// Destroy a window: unlink it everywhere, cancel its timer and take it
    /// off the alert queue before the last handle is dropped
    pub fn destroy_window(&mut self, window: WindowId) -> Result<(), MuxError> {
        let window = self.mux.remove_window(window)?;
        window.cancel_timer();
        self.alerts.cancel(&window);
        log::debug!("{} destroyed", window.id());
        Ok(())
    }

    /// Make `link` its session's current link
    pub fn select_link(&mut self, link: LinkRef) -> Result<(), MuxError> {
        self.mux.select_link(link)
    }

    /// Make the first link to `window` in `session` current
    pub fn select_window(&mut self, session: SessionId, window: WindowId) -> Result<(), MuxError> {
        let s = self
            .mux
            .session(session)
            .ok_or(MuxError::UnknownSession(session))?;
        let link = s
            .link_for_window(window)
            .ok_or(MuxError::UnknownWindow(window))?
            .id();
        self.mux.select_link(LinkRef { session, link })
    }

    pub fn attach_client(
        &mut self,
        name: &str,
        kind: ClientKind,
        session: SessionId,
    ) -> Result<ClientId, MuxError> {
        let id = self.mux.add_client(name, kind, Some(session))?;
        log::debug!("client {id} ({name}) attached to {session}");
        Ok(id)
    }

    /// Attach an existing client to another session
    pub fn switch_client(&mut self, client: ClientId, session: SessionId) -> Result<(), MuxError> {
        self.mux.switch_client(client, Some(session))
    }

    /// Detach a client; it stays known but observes no session
    pub fn detach_client(&mut self, client: ClientId) -> Result<(), MuxError> {
        self.mux.switch_client(client, None)
    }

    pub fn remove_client(&mut self, client: ClientId) -> Result<(), MuxError> {
        self.mux.remove_client(client).map(|_| ())
    }

    /// Change a window's monitoring options; silence detection restarts
    /// with the new interval
    pub fn set_window_options(
        &mut self,
        window: WindowId,
        options: MonitorOptions,
    ) -> Result<(), MuxError> {
        let w = self
            .mux
            .window(window)
            .ok_or(MuxError::UnknownWindow(window))?;
        w.set_options(options);
        w.reset_silence_timer();
        Ok(())
    }

    pub fn set_session_options(
        &mut self,
        session: SessionId,
        options: SessionAlertOptions,
    ) -> Result<(), MuxError> {
        self.mux
            .session_mut(session)
            .ok_or(MuxError::UnknownSession(session))?
            .set_options(options);
        Ok(())
    }

    /// Apply a new configuration to every window and session, then restart
    /// silence detection everywhere
    pub fn apply_config(&mut self, config: Config) {
        for window in self.mux.windows() {
            window.set_options(config.monitor);
        }
        for session in self.mux.sessions_mut() {
            session.set_options(config.alerts);
        }
        self.config = config;
        self.reset_all();
    }

    // =========================================================================
    // Alerts
    // =========================================================================

    /// Record that `kind` happened on `window`
    pub fn signal(&mut self, window: WindowId, kind: AlertKind) -> Result<(), MuxError> {
        let window = self
            .mux
            .window(window)
            .cloned()
            .ok_or(MuxError::UnknownWindow(window))?;
        self.alerts.signal(&window, kind, &mut self.event_loop);
        Ok(())
    }

    /// Check every window linked into `session` right away, outside the
    /// queue. Window bits are left for the next flush to clear.
    pub fn check_session(&mut self, session: SessionId) -> Result<AlertFlags, MuxError> {
        let s = self
            .mux
            .session(session)
            .ok_or(MuxError::UnknownSession(session))?;

        let mut windows: Vec<Rc<Window>> = Vec::new();
        for link in s.links() {
            if windows.iter().any(|w| w.id() == link.window()) {
                continue;
            }
            if let Some(window) = self.mux.window(link.window()) {
                windows.push(Rc::clone(window));
            }
        }

        let mut alerts = AlertFlags::empty();
        for window in windows {
            alerts |= evaluator::check_all(&window, &mut self.mux, &mut self.sink);
        }
        Ok(alerts)
    }

    /// Restart silence detection on every window
    pub fn reset_all(&mut self) {
        for window in self.mux.windows() {
            window.reset_silence_timer();
        }
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Dispatch every event that is ready now; returns how many ran
    pub fn run_pending(&mut self) -> usize {
        let mut dispatched = 0;
        while let Some(event) = self.event_loop.poll() {
            self.dispatch(event);
            dispatched += 1;
        }
        dispatched
    }

    /// Run the loop up to `deadline`.
    ///
    /// On the manual clock time jumps from one timer deadline to the next so
    /// every timer fires at exactly its deadline. On the system clock only
    /// events already due are run.
    pub fn run_until(&mut self, deadline: Instant) {
        loop {
            self.run_pending();
            match self.event_loop.next_deadline() {
                Some(next) if next <= deadline && self.event_loop.is_manual() => {
                    self.event_loop.advance_to(next);
                }
                _ => break,
            }
        }
        self.event_loop.advance_to(deadline);
    }

    /// Run the loop for `duration` of loop time
    pub fn advance(&mut self, duration: Duration) {
        let deadline = self.now() + duration;
        self.run_until(deadline);
    }

    /// Run the loop up to `deadline`, sleeping between timer deadlines when
    /// on the system clock
    pub async fn run_realtime_until(&mut self, deadline: Instant) {
        loop {
            self.run_pending();
            if self.now() >= deadline {
                break;
            }
            let wake = self
                .event_loop
                .next_deadline()
                .map_or(deadline, |next| next.min(deadline));
            if self.event_loop.is_manual() {
                self.event_loop.advance_to(wake);
            } else {
                tokio::time::sleep_until(tokio::time::Instant::from_std(wake)).await;
            }
        }
    }

    fn dispatch(&mut self, event: Event<Weak<Window>>) {
        match event {
            Event::Task(Task::FlushAlerts) => self.alerts.flush(&mut self.mux, &mut self.sink),
            Event::Timer(window) => {
                let Some(window) = window.upgrade() else {
                    unreachable!("silence timer fired for a destroyed window");
                };
                log::debug!("{} alerts timer expired", window.id());
                self.alerts
                    .signal(&window, AlertKind::Silence, &mut self.event_loop);
            }
        }
    }
}
