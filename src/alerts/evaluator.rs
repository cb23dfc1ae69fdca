//! Per-window alert checks.
//!
//! For each kind whose bit is set and which the window monitors, every link
//! to the window is considered. Bells are delivered every time; activity and
//! silence only once per link until the link is made current again.

use super::sink::{AlertHook, AlertSink};
use super::{AlertFlags, router};
use crate::mux::{Mux, Window};
use par_mux_config::AlertKind;

/// Check every alert kind on `window`; returns the kinds that were handled
pub fn check_all<S: AlertSink>(window: &Window, mux: &mut Mux, sink: &mut S) -> AlertFlags {
    let mut alerts = AlertFlags::empty();
    for kind in window.alerts().kinds() {
        if check_window(window, kind, mux, sink) {
            alerts |= AlertFlags::from(kind);
        }
    }
    alerts
}

fn check_window<S: AlertSink>(
    window: &Window,
    kind: AlertKind,
    mux: &mut Mux,
    sink: &mut S,
) -> bool {
    let flag = AlertFlags::from(kind);
    if !window.alerts().contains(flag) {
        return false;
    }
    // Bits are still cleared by the flush; disabling monitoring only
    // suppresses delivery
    if !window.monitors(kind) {
        return false;
    }

    let links = window.links();
    for link in &links {
        if let Some(session) = mux.session_mut(link.session) {
            session.set_alerted(false);
        }
    }

    let redeliver = kind == AlertKind::Bell;
    for link in links {
        let attached = mux.attached_count(link.session);
        let Some(session) = mux.session_mut(link.session) else {
            unreachable!("{} linked from missing session {}", window.id(), link.session);
        };
        let is_current = session.is_current(link.link);
        let Some(l) = session.link_mut(link.link) else {
            unreachable!("{} linked from missing link {}", window.id(), link);
        };

        if !redeliver && l.delivered().contains(flag) {
            continue;
        }
        if !is_current || attached == 0 {
            if !redeliver {
                l.mark_delivered(flag);
            }
            if !session.is_alerted() {
                session.set_alerted(true);
                sink.refresh_status(session);
            }
        }

        sink.dispatch_hook(&AlertHook::new(kind, link, session, window));
        router::route(mux, link, window, kind, sink);
    }

    true
}
