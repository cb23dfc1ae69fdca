//! Delivery of an alert on one link to the attached clients.
//!
//! The session's `*-action` option decides whether the alert applies to a
//! client; `visual-*` decides between a bell, a message or both. If the
//! action does not apply to even one attached client, nobody is alerted.

use super::sink::AlertSink;
use crate::mux::{LinkRef, Mux, SessionId, Window};
use par_mux_config::{AlertAction, AlertKind};

/// Whether `action` lets an alert on a link reach a client.
///
/// `link_is_current` says whether the link is its session's current link;
/// `client_session` is the session the client is attached to.
pub fn action_applies(
    action: AlertAction,
    link_session: SessionId,
    link_is_current: bool,
    client_session: Option<SessionId>,
) -> bool {
    if client_session == Some(link_session) {
        match action {
            AlertAction::Any | AlertAction::ServerAny => true,
            AlertAction::Current => link_is_current,
            AlertAction::Other | AlertAction::ServerOther => !link_is_current,
            AlertAction::None => false,
        }
    } else {
        action.is_server_wide()
    }
}

/// Send bells/messages for `kind` on `link`; returns false when suppressed
pub fn route<S: AlertSink>(
    mux: &Mux,
    link: LinkRef,
    window: &Window,
    kind: AlertKind,
    sink: &mut S,
) -> bool {
    let Some(session) = mux.session(link.session) else {
        unreachable!("alert routed on {link} of a missing session");
    };
    let action = session.options().action(kind);
    let is_current = session.is_current(link.link);

    if let Some(client) = mux
        .attached_clients()
        .find(|c| !action_applies(action, link.session, is_current, c.session()))
    {
        log::debug!(
            "{} {} on {} suppressed: {}-action {} does not apply to {}",
            window.id(),
            kind,
            link,
            kind.option_name(),
            action.display_name(),
            client.id()
        );
        return false;
    }

    let visual = session.options().visual(kind);
    for client in mux.attached_clients().filter(|c| c.is_interactive()) {
        if visual.rings_bell() {
            sink.ring_bell(client);
        }
        if visual.shows_message() {
            let message = if client.session() == Some(link.session) && is_current {
                format!("{kind} in current window")
            } else {
                format!("{kind} in {}:{}", session.name(), window.name())
            };
            sink.show_message(client, &message);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINE: SessionId = SessionId(1);
    const THEIRS: SessionId = SessionId(2);

    #[test]
    fn test_same_session_policies() {
        for current in [true, false] {
            assert!(action_applies(AlertAction::Any, MINE, current, Some(MINE)));
            assert!(action_applies(AlertAction::ServerAny, MINE, current, Some(MINE)));
            assert!(!action_applies(AlertAction::None, MINE, current, Some(MINE)));
        }
        assert!(action_applies(AlertAction::Current, MINE, true, Some(MINE)));
        assert!(!action_applies(AlertAction::Current, MINE, false, Some(MINE)));
        assert!(action_applies(AlertAction::Other, MINE, false, Some(MINE)));
        assert!(!action_applies(AlertAction::Other, MINE, true, Some(MINE)));
        assert!(action_applies(AlertAction::ServerOther, MINE, false, Some(MINE)));
        assert!(!action_applies(AlertAction::ServerOther, MINE, true, Some(MINE)));
    }

    #[test]
    fn test_other_session_only_server_policies() {
        for current in [true, false] {
            assert!(action_applies(AlertAction::ServerAny, MINE, current, Some(THEIRS)));
            assert!(action_applies(AlertAction::ServerOther, MINE, current, Some(THEIRS)));
            assert!(!action_applies(AlertAction::Any, MINE, current, Some(THEIRS)));
            assert!(!action_applies(AlertAction::Current, MINE, current, Some(THEIRS)));
            assert!(!action_applies(AlertAction::Other, MINE, current, Some(THEIRS)));
            assert!(!action_applies(AlertAction::None, MINE, current, Some(THEIRS)));
        }
    }
}
