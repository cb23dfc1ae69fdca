//! Single-threaded event loop: one-shot timers and deferred run-once tasks.
//!
//! Everything runs cooperatively on one thread. Callers pull events with
//! [`EventLoop::poll`] and dispatch them to completion before pulling the
//! next one, so no two handlers ever overlap.
//!
//! Timers are scoped resources: a [`Timer`] handle owns its slot in the
//! shared timer wheel and removes it when dropped, so a timer can never fire
//! after its owner is gone.
//!
//! Two clocks are supported:
//! - **Manual**: virtual time that only moves when [`EventLoop::advance_to`]
//!   is called. Used by tests and scenario replay.
//! - **System**: `Instant::now()`. Driven by an async caller that sleeps
//!   until [`EventLoop::next_deadline`].

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// Identifier of a timer slot in the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Deferred work scheduled to run once on the next loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Drain the alert queue and evaluate every pending window
    FlushAlerts,
}

/// An event ready to be dispatched.
#[derive(Debug)]
pub enum Event<T> {
    /// A deferred task is due
    Task(Task),
    /// A timer expired; carries the payload registered with the timer
    Timer(T),
}

#[derive(Debug, Clone, Copy)]
enum Clock {
    Manual(Instant),
    System,
}

impl Clock {
    fn now(&self) -> Instant {
        match self {
            Clock::Manual(now) => *now,
            Clock::System => Instant::now(),
        }
    }
}

struct TimerSlot<T> {
    payload: T,
    deadline: Option<Instant>,
}

/// Timer state shared between the loop and every [`Timer`] handle.
struct TimerWheel<T> {
    clock: Clock,
    next_id: u64,
    slots: HashMap<TimerId, TimerSlot<T>>,
    /// Armed timers ordered by deadline; the id breaks ties in arm order
    armed: BTreeSet<(Instant, TimerId)>,
}

impl<T> TimerWheel<T> {
    fn disarm(&mut self, id: TimerId) {
        if let Some(slot) = self.slots.get_mut(&id)
            && let Some(deadline) = slot.deadline.take()
        {
            self.armed.remove(&(deadline, id));
        }
    }
}

/// The event loop.
pub struct EventLoop<T> {
    wheel: Rc<RefCell<TimerWheel<T>>>,
    deferred: VecDeque<Task>,
}

impl<T: Clone> EventLoop<T> {
    /// Create a loop on a manual clock starting at `start`
    pub fn manual(start: Instant) -> Self {
        Self::with_clock(Clock::Manual(start))
    }

    /// Create a loop on the system clock
    pub fn system() -> Self {
        Self::with_clock(Clock::System)
    }

    fn with_clock(clock: Clock) -> Self {
        Self {
            wheel: Rc::new(RefCell::new(TimerWheel {
                clock,
                next_id: 1,
                slots: HashMap::new(),
                armed: BTreeSet::new(),
            })),
            deferred: VecDeque::new(),
        }
    }

    /// Current loop time
    pub fn now(&self) -> Instant {
        self.wheel.borrow().clock.now()
    }

    /// Whether the loop runs on the manual clock
    pub fn is_manual(&self) -> bool {
        matches!(self.wheel.borrow().clock, Clock::Manual(_))
    }

    /// Move the manual clock forward to `until`.
    ///
    /// Never moves time backwards. No-op on the system clock.
    pub fn advance_to(&mut self, until: Instant) {
        let mut wheel = self.wheel.borrow_mut();
        if let Clock::Manual(now) = wheel.clock
            && until > now
        {
            wheel.clock = Clock::Manual(until);
        }
    }

    /// Create an unarmed timer that yields `payload` when it fires
    pub fn timer(&self, payload: T) -> Timer<T> {
        let mut wheel = self.wheel.borrow_mut();
        let id = TimerId(wheel.next_id);
        wheel.next_id += 1;
        wheel.slots.insert(
            id,
            TimerSlot {
                payload,
                deadline: None,
            },
        );
        Timer {
            id,
            wheel: Rc::downgrade(&self.wheel),
        }
    }

    /// Schedule a deferred task to run once on the next iteration
    pub fn schedule_once(&mut self, task: Task) {
        self.deferred.push_back(task);
    }

    /// Earliest armed timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.wheel
            .borrow()
            .armed
            .first()
            .map(|(deadline, _)| *deadline)
    }

    /// Number of armed timers
    pub fn armed_timers(&self) -> usize {
        self.wheel.borrow().armed.len()
    }

    /// Take the next ready event.
    ///
    /// Deferred tasks run first, in scheduling order. Then the earliest timer
    /// whose deadline is not after the current time fires; a fired timer is
    /// disarmed before its payload is returned.
    pub fn poll(&mut self) -> Option<Event<T>> {
        if let Some(task) = self.deferred.pop_front() {
            return Some(Event::Task(task));
        }

        let mut guard = self.wheel.borrow_mut();
        let wheel = &mut *guard;
        let now = wheel.clock.now();
        let &(deadline, id) = wheel.armed.first()?;
        if deadline > now {
            return None;
        }
        wheel.armed.remove(&(deadline, id));
        let slot = wheel.slots.get_mut(&id)?;
        slot.deadline = None;
        Some(Event::Timer(slot.payload.clone()))
    }
}

/// Handle to a one-shot timer slot.
///
/// Re-arming replaces any pending deadline. Dropping the handle cancels the
/// timer and frees its slot.
pub struct Timer<T> {
    id: TimerId,
    wheel: Weak<RefCell<TimerWheel<T>>>,
}

impl<T> Timer<T> {
    /// Arm the timer to fire `after` from now, replacing any pending deadline
    pub fn arm(&self, after: Duration) {
        let Some(wheel) = self.wheel.upgrade() else {
            return;
        };
        let mut guard = wheel.borrow_mut();
        let wheel = &mut *guard;
        wheel.disarm(self.id);
        let deadline = wheel.clock.now() + after;
        if let Some(slot) = wheel.slots.get_mut(&self.id) {
            slot.deadline = Some(deadline);
            wheel.armed.insert((deadline, self.id));
        }
    }

    /// Cancel a pending deadline; no-op when not armed
    pub fn cancel(&self) {
        if let Some(wheel) = self.wheel.upgrade() {
            wheel.borrow_mut().disarm(self.id);
        }
    }

    /// Pending deadline, if armed
    pub fn deadline(&self) -> Option<Instant> {
        let wheel = self.wheel.upgrade()?;
        let wheel = wheel.borrow();
        wheel.slots.get(&self.id).and_then(|slot| slot.deadline)
    }

    /// Whether the timer is armed
    pub fn is_armed(&self) -> bool {
        self.deadline().is_some()
    }
}

impl<T> Drop for Timer<T> {
    fn drop(&mut self) {
        if let Some(wheel) = self.wheel.upgrade() {
            let mut wheel = wheel.borrow_mut();
            wheel.disarm(self.id);
            wheel.slots.remove(&self.id);
        }
    }
}

impl<T> fmt::Debug for Timer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("deadline", &self.deadline())
            .finish()
    }
}
