//! Window alert state.
//!
//! Each window carries its pending alert condition bits, the `queued`
//! marker mirrored by the alert scheduler, its monitoring options and the
//! silence timer. The timer is owned by the window, so dropping the last
//! handle to a window cancels it.

use super::{LinkRef, WindowId};
use crate::alerts::AlertFlags;
use crate::event_loop::Timer;
use par_mux_config::{AlertKind, MonitorOptions};
use std::cell::{Cell, RefCell};
use std::rc::Weak;
use std::time::Instant;

/// Silence timer of a window; fires with a weak handle back to the window.
pub type WindowTimer = Timer<Weak<Window>>;

/// A terminal-backed output stream that can be linked into sessions.
#[derive(Debug)]
pub struct Window {
    id: WindowId,
    name: String,
    options: Cell<MonitorOptions>,
    /// Conditions seen since the last evaluation
    alerts: Cell<AlertFlags>,
    /// Mirrors membership of the alert scheduler's pending set
    queued: Cell<bool>,
    timer: WindowTimer,
    /// Links referencing this window, in link order
    links: RefCell<Vec<LinkRef>>,
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        name: &str,
        options: MonitorOptions,
        timer: WindowTimer,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            options: Cell::new(options),
            alerts: Cell::new(AlertFlags::empty()),
            queued: Cell::new(false),
            timer,
            links: RefCell::new(Vec::new()),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> MonitorOptions {
        self.options.get()
    }

    pub(crate) fn set_options(&self, options: MonitorOptions) {
        self.options.set(options);
    }

    /// Whether monitoring is enabled for `kind`
    pub fn monitors(&self, kind: AlertKind) -> bool {
        self.options.get().enabled(kind)
    }

    // =========================================================================
    // Condition bits
    // =========================================================================

    /// Pending condition bits
    pub fn alerts(&self) -> AlertFlags {
        self.alerts.get()
    }

    /// Set the bit for `kind`; returns false if it was already set
    pub(crate) fn add_alert(&self, kind: AlertKind) -> bool {
        let flag = AlertFlags::from(kind);
        let alerts = self.alerts.get();
        if alerts.contains(flag) {
            return false;
        }
        self.alerts.set(alerts | flag);
        true
    }

    pub(crate) fn clear_alerts(&self) {
        self.alerts.set(AlertFlags::empty());
    }

    pub fn is_queued(&self) -> bool {
        self.queued.get()
    }

    pub(crate) fn set_queued(&self, queued: bool) {
        self.queued.set(queued);
    }

    // =========================================================================
    // Silence timer
    // =========================================================================

    /// Restart silence detection.
    ///
    /// Clears a pending silence bit and re-arms the timer for the full
    /// `monitor_silence` interval; leaves it disarmed when silence
    /// monitoring is off.
    pub(crate) fn reset_silence_timer(&self) {
        self.alerts.set(self.alerts.get() - AlertFlags::SILENCE);
        self.timer.cancel();

        let options = self.options.get();
        log::debug!("{} alerts timer reset {}", self.id, options.monitor_silence);
        if let Some(interval) = options.silence_interval() {
            self.timer.arm(interval);
        }
    }

    pub(crate) fn cancel_timer(&self) {
        self.timer.cancel();
    }

    /// When silence will next be detected, if the timer is armed
    pub fn silence_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Snapshot of the links referencing this window
    pub fn links(&self) -> Vec<LinkRef> {
        self.links.borrow().clone()
    }

    pub fn has_links(&self) -> bool {
        !self.links.borrow().is_empty()
    }

    pub(crate) fn add_link(&self, link: LinkRef) {
        self.links.borrow_mut().push(link);
    }

    pub(crate) fn remove_link(&self, link: LinkRef) {
        self.links.borrow_mut().retain(|l| *l != link);
    }
}
