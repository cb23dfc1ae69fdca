//! Object graph of the multiplexer: windows, sessions, links and clients.
//!
//! This module handles:
//! - The registry of live windows (shared `Rc<Window>` handles)
//! - Sessions and the ordered links they own
//! - Clients and the session each one is attached to
//!
//! Entities refer to each other by id and are resolved through [`Mux`]
//! lookups, never by following stored pointers. The only shared handle is
//! `Rc<Window>`, which the alert scheduler also holds while a window is
//! queued.

mod client;
mod session;
mod window;

pub use client::{Client, ClientKind};
pub use session::{Link, Session};
pub use window::{Window, WindowTimer};

use par_mux_config::{MonitorOptions, SessionAlertOptions};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Window identifier (`@N`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

/// Session identifier (`$N`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u32);

/// Link identifier, unique across all sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u32);

/// Client identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u32);

/// A link addressed through the session that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkRef {
    pub session: SessionId,
    pub link: LinkId,
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl fmt::Display for LinkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.session, self.link)
    }
}

/// Lookup failures on the session-management surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MuxError {
    #[error("no such window: {0}")]
    UnknownWindow(WindowId),

    #[error("no such session: {0}")]
    UnknownSession(SessionId),

    #[error("no such link: {0}")]
    UnknownLink(LinkRef),

    #[error("no such client: {0}")]
    UnknownClient(ClientId),
}

/// Registry of every window, session and client.
#[derive(Debug, Default)]
pub struct Mux {
    windows: BTreeMap<WindowId, Rc<Window>>,
    sessions: BTreeMap<SessionId, Session>,
    clients: BTreeMap<ClientId, Client>,
    next_window: u32,
    next_session: u32,
    next_link: u32,
    next_client: u32,
}

impl Mux {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Windows
    // =========================================================================

    pub(crate) fn next_window_id(&mut self) -> WindowId {
        let id = WindowId(self.next_window);
        self.next_window += 1;
        id
    }

    pub(crate) fn insert_window(&mut self, window: Rc<Window>) {
        self.windows.insert(window.id(), window);
    }

    /// Look up a live window
    pub fn window(&self, id: WindowId) -> Option<&Rc<Window>> {
        self.windows.get(&id)
    }

    /// Find a live window by name
    pub fn find_window(&self, name: &str) -> Option<&Rc<Window>> {
        self.windows.values().find(|w| w.name() == name)
    }

    /// All live windows, in id order
    pub fn windows(&self) -> impl Iterator<Item = &Rc<Window>> {
        self.windows.values()
    }

    /// Unlink a window from every session and remove it from the registry.
    ///
    /// Returns the registry's handle; the caller is responsible for the
    /// alert teardown (timer cancel, dequeue) before dropping it.
    pub(crate) fn remove_window(&mut self, id: WindowId) -> Result<Rc<Window>, MuxError> {
        let window = self.windows.remove(&id).ok_or(MuxError::UnknownWindow(id))?;
        for link in window.links() {
            if let Some(session) = self.sessions.get_mut(&link.session) {
                session.remove_link(link.link);
            }
            window.remove_link(link);
        }
        Ok(window)
    }

    // =========================================================================
    // Sessions and links
    // =========================================================================

    pub(crate) fn create_session(&mut self, name: &str, options: SessionAlertOptions) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session += 1;
        self.sessions.insert(id, Session::new(id, name, options));
        id
    }

    /// Look up a session
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub(crate) fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Find a session by name
    pub fn find_session(&self, name: &str) -> Option<&Session> {
        self.sessions.values().find(|s| s.name() == name)
    }

    /// All sessions, in id order
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub(crate) fn sessions_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.sessions.values_mut()
    }

    /// Resolve a link reference
    pub fn link(&self, link: LinkRef) -> Option<&Link> {
        self.sessions.get(&link.session)?.link(link.link)
    }

    /// Link `window` into `session` after its last link
    pub(crate) fn link_window(
        &mut self,
        session: SessionId,
        window: WindowId,
    ) -> Result<LinkId, MuxError> {
        let w = self
            .windows
            .get(&window)
            .ok_or(MuxError::UnknownWindow(window))?;
        let s = self
            .sessions
            .get_mut(&session)
            .ok_or(MuxError::UnknownSession(session))?;

        let id = LinkId(self.next_link);
        self.next_link += 1;
        s.push_link(id, window);
        w.add_link(LinkRef { session, link: id });
        Ok(id)
    }

    /// Remove a link from its session.
    ///
    /// When the window loses its last link it leaves the registry and its
    /// handle is returned. A queued window stays alive through the
    /// scheduler's claim until its flush.
    pub(crate) fn unlink_window(
        &mut self,
        link: LinkRef,
    ) -> Result<Option<Rc<Window>>, MuxError> {
        let session = self
            .sessions
            .get_mut(&link.session)
            .ok_or(MuxError::UnknownSession(link.session))?;
        let removed = session
            .remove_link(link.link)
            .ok_or(MuxError::UnknownLink(link))?;

        let Some(window) = self.windows.get(&removed.window()) else {
            unreachable!("link {link} references missing window {}", removed.window());
        };
        window.remove_link(link);
        if window.has_links() {
            return Ok(None);
        }
        Ok(self.windows.remove(&removed.window()))
    }

    /// Make `link` the current link of its session
    pub(crate) fn select_link(&mut self, link: LinkRef) -> Result<(), MuxError> {
        let session = self
            .sessions
            .get_mut(&link.session)
            .ok_or(MuxError::UnknownSession(link.session))?;
        if session.set_current(link.link) {
            Ok(())
        } else {
            Err(MuxError::UnknownLink(link))
        }
    }

    // =========================================================================
    // Clients
    // =========================================================================

    pub(crate) fn add_client(
        &mut self,
        name: &str,
        kind: ClientKind,
        session: Option<SessionId>,
    ) -> Result<ClientId, MuxError> {
        if let Some(s) = session
            && !self.sessions.contains_key(&s)
        {
            return Err(MuxError::UnknownSession(s));
        }
        let id = ClientId(self.next_client);
        self.next_client += 1;
        self.clients
            .insert(id, Client::new(id, name, kind, session));
        Ok(id)
    }

    pub(crate) fn switch_client(
        &mut self,
        client: ClientId,
        session: Option<SessionId>,
    ) -> Result<(), MuxError> {
        if let Some(s) = session
            && !self.sessions.contains_key(&s)
        {
            return Err(MuxError::UnknownSession(s));
        }
        let c = self
            .clients
            .get_mut(&client)
            .ok_or(MuxError::UnknownClient(client))?;
        c.set_session(session);
        Ok(())
    }

    pub(crate) fn remove_client(&mut self, client: ClientId) -> Result<Client, MuxError> {
        self.clients
            .remove(&client)
            .ok_or(MuxError::UnknownClient(client))
    }

    /// Look up a client
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    /// Find a client by name
    pub fn find_client(&self, name: &str) -> Option<&Client> {
        self.clients.values().find(|c| c.name() == name)
    }

    /// Clients currently attached to some session
    pub fn attached_clients(&self) -> impl Iterator<Item = &Client> + Clone {
        self.clients.values().filter(|c| c.is_attached())
    }

    /// Number of clients attached to `session`
    pub fn attached_count(&self, session: SessionId) -> usize {
        self.clients
            .values()
            .filter(|c| c.session() == Some(session))
            .count()
    }
}
