//! Clients viewing sessions.

use super::{ClientId, SessionId};

/// What kind of viewer a client is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    /// A terminal attached by a person; receives bells and messages
    Interactive,
    /// A headless control-mode or automation client; never receives them
    Control,
}

/// A viewer attached to at most one session.
#[derive(Debug, Clone)]
pub struct Client {
    id: ClientId,
    name: String,
    kind: ClientKind,
    session: Option<SessionId>,
}

impl Client {
    pub(crate) fn new(
        id: ClientId,
        name: &str,
        kind: ClientKind,
        session: Option<SessionId>,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            session,
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The session this client is attached to
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub(crate) fn set_session(&mut self, session: Option<SessionId>) {
        self.session = session;
    }

    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    /// Whether bells and status messages may be sent to this client
    pub fn is_interactive(&self) -> bool {
        self.kind == ClientKind::Interactive
    }
}
