//! Sessions and the links they own.

use super::{LinkId, SessionId, WindowId};
use crate::alerts::AlertFlags;
use par_mux_config::SessionAlertOptions;

/// Membership of a window inside a session.
#[derive(Debug, Clone)]
pub struct Link {
    id: LinkId,
    /// Position within the session
    index: u32,
    window: WindowId,
    /// Activity/silence alerts already delivered for this link
    delivered: AlertFlags,
}

impl Link {
    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn delivered(&self) -> AlertFlags {
        self.delivered
    }

    pub(crate) fn mark_delivered(&mut self, flags: AlertFlags) {
        self.delivered |= flags;
    }
}

/// An ordered collection of links with one current link.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    name: String,
    links: Vec<Link>,
    current: Option<LinkId>,
    options: SessionAlertOptions,
    /// Status line already refreshed during the current alert check
    alerted: bool,
}

impl Session {
    pub(crate) fn new(id: SessionId, name: &str, options: SessionAlertOptions) -> Self {
        Self {
            id,
            name: name.to_string(),
            links: Vec::new(),
            current: None,
            options,
            alerted: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &SessionAlertOptions {
        &self.options
    }

    pub(crate) fn set_options(&mut self, options: SessionAlertOptions) {
        self.options = options;
    }

    pub fn is_alerted(&self) -> bool {
        self.alerted
    }

    pub(crate) fn set_alerted(&mut self, alerted: bool) {
        self.alerted = alerted;
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Links in index order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub(crate) fn link_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.id == id)
    }

    /// First link to `window`, if linked here
    pub fn link_for_window(&self, window: WindowId) -> Option<&Link> {
        self.links.iter().find(|l| l.window == window)
    }

    pub fn current(&self) -> Option<LinkId> {
        self.current
    }

    pub fn current_link(&self) -> Option<&Link> {
        self.current.and_then(|id| self.link(id))
    }

    pub fn is_current(&self, id: LinkId) -> bool {
        self.current == Some(id)
    }

    /// Append a link after the highest index; the first link becomes current
    pub(crate) fn push_link(&mut self, id: LinkId, window: WindowId) {
        let index = self.links.last().map_or(0, |l| l.index + 1);
        self.links.push(Link {
            id,
            index,
            window,
            delivered: AlertFlags::empty(),
        });
        if self.current.is_none() {
            self.current = Some(id);
        }
    }

    /// Remove a link. If it was current, the next link (or else the
    /// previous one) becomes current.
    pub(crate) fn remove_link(&mut self, id: LinkId) -> Option<Link> {
        let pos = self.links.iter().position(|l| l.id == id)?;
        let removed = self.links.remove(pos);
        if self.current == Some(id) {
            self.current = None;
            let next = self
                .links
                .get(pos)
                .or_else(|| self.links.last())
                .map(|l| l.id);
            if let Some(next) = next {
                self.set_current(next);
            }
        }
        Some(removed)
    }

    /// Make `id` the current link and clear its delivered alerts, so the
    /// next alert after switching away again is delivered afresh.
    pub(crate) fn set_current(&mut self, id: LinkId) -> bool {
        let Some(link) = self.link_mut(id) else {
            return false;
        };
        link.delivered = AlertFlags::empty();
        self.current = Some(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_link_assigns_indexes_and_current() {
        let mut session = Session::new(SessionId(0), "main", SessionAlertOptions::default());
        session.push_link(LinkId(10), WindowId(1));
        session.push_link(LinkId(11), WindowId(2));

        assert_eq!(session.links()[0].index(), 0);
        assert_eq!(session.links()[1].index(), 1);
        assert_eq!(session.current(), Some(LinkId(10)));
    }

    #[test]
    fn test_set_current_clears_delivered() {
        let mut session = Session::new(SessionId(0), "main", SessionAlertOptions::default());
        session.push_link(LinkId(1), WindowId(1));
        session.push_link(LinkId(2), WindowId(2));
        session
            .link_mut(LinkId(2))
            .unwrap()
            .mark_delivered(AlertFlags::ACTIVITY);

        assert!(session.set_current(LinkId(2)));
        assert!(session.link(LinkId(2)).unwrap().delivered().is_empty());
        assert!(!session.set_current(LinkId(99)));
    }

    #[test]
    fn test_removing_current_selects_neighbour() {
        let mut session = Session::new(SessionId(0), "main", SessionAlertOptions::default());
        session.push_link(LinkId(1), WindowId(1));
        session.push_link(LinkId(2), WindowId(2));
        session.push_link(LinkId(3), WindowId(3));
        session.set_current(LinkId(2));

        session.remove_link(LinkId(2));
        assert_eq!(session.current(), Some(LinkId(3)));

        session.remove_link(LinkId(3));
        assert_eq!(session.current(), Some(LinkId(1)));

        session.remove_link(LinkId(1));
        assert_eq!(session.current(), None);
    }
}
