//! Coalescing alert queue.
//!
//! Signals only mark a window and put it on the pending list; the actual
//! evaluation happens in a single deferred flush, so any number of signals
//! within one loop iteration collapse into one pass.
//!
//! # Invariants
//!
//! - A window's `queued` flag is set iff it is on the pending list.
//! - A queued window holds exactly one `Rc` claim from the scheduler, which
//!   keeps it alive even if it leaves the registry before the flush.
//! - At most one flush task is scheduled at any time.

use super::sink::AlertSink;
use super::{AlertEventLoop, evaluator};
use crate::event_loop::Task;
use crate::mux::{Mux, Window};
use par_mux_config::AlertKind;
use std::rc::Rc;

/// Pending set plus the "flush already scheduled" marker.
#[derive(Debug, Default)]
pub struct AlertScheduler {
    pending: Vec<Rc<Window>>,
    scheduled: bool,
    flushes: u64,
    evaluated: u64,
}

impl AlertScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `kind` happened on `window`.
    ///
    /// Always restarts silence detection, sets the condition bit and, when
    /// the window monitors `kind`, queues it for the next flush.
    pub fn signal(
        &mut self,
        window: &Rc<Window>,
        kind: AlertKind,
        event_loop: &mut AlertEventLoop,
    ) {
        window.reset_silence_timer();

        if window.add_alert(kind) {
            log::debug!("{} alerts flags added {}", window.id(), kind);
        } else {
            log::trace!("{} alerts flag {} already set", window.id(), kind);
        }

        if window.monitors(kind) {
            self.enqueue(window, event_loop);
        }
    }

    /// Queue `window` for evaluation and make sure a flush is scheduled
    pub fn enqueue(&mut self, window: &Rc<Window>, event_loop: &mut AlertEventLoop) {
        if window.is_queued() {
            debug_assert!(self.contains(window), "{} queued but not pending", window.id());
        } else {
            debug_assert!(!self.contains(window), "{} pending twice", window.id());
            window.set_queued(true);
            self.pending.push(Rc::clone(window));
        }

        if !self.scheduled {
            log::debug!("alerts check queued (by {})", window.id());
            event_loop.schedule_once(Task::FlushAlerts);
            self.scheduled = true;
        }
    }

    /// Remove `window` from the pending list and release the claim.
    ///
    /// Part of window teardown; no-op for a window that is not queued.
    pub fn cancel(&mut self, window: &Window) {
        if !window.is_queued() {
            return;
        }
        let Some(pos) = self.pending.iter().position(|w| w.id() == window.id()) else {
            panic!("{} marked queued but missing from the alert queue", window.id());
        };
        let claim = self.pending.remove(pos);
        claim.set_queued(false);
        log::debug!("{} removed from alert queue", window.id());
    }

    /// Run the deferred check: evaluate every window queued so far.
    ///
    /// The pending list is taken up front, so windows signalled from here on
    /// land in a fresh list with a fresh flush scheduled.
    pub fn flush<S: AlertSink>(&mut self, mux: &mut Mux, sink: &mut S) {
        self.scheduled = false;
        self.flushes += 1;
        let drained = std::mem::take(&mut self.pending);

        for window in drained {
            let alerts = evaluator::check_all(&window, mux, sink);
            log::debug!("{} alerts check, alerts {:?}", window.id(), alerts);

            window.clear_alerts();
            window.set_queued(false);
            self.evaluated += 1;
            // The claim is released here; an unlinked window is freed now
            drop(window);
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Number of windows waiting for the next flush
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn contains(&self, window: &Window) -> bool {
        self.pending.iter().any(|w| w.id() == window.id())
    }

    /// Flushes run so far
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Window evaluations run so far, across all flushes
    pub fn evaluated(&self) -> u64 {
        self.evaluated
    }
}
