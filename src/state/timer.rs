//! Clocks and the cue scheduler.
//!
//! The controller never sleeps. It asks a [`Scheduler`] for a one-shot
//! deadline and gets back a [`CueHandle`]. Whoever drives the game polls
//! the scheduler and hands due handles back to the controller.
//!
//! Time comes from a [`Clock`], so tests can swap in a [`ManualClock`] and
//! step time forward without waiting.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic instants.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one copy and hand
/// another to the scheduler and controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Move time forward by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Identity of a scheduled cue.
///
/// Handles are never reused by the scheduler that issued them, so a
/// handle that was cancelled can't be confused with a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CueHandle(u64);

impl CueHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cue#{}", self.0)
    }
}

/// One-shot cancellable deadlines.
pub trait Scheduler {
    /// Schedule a cue `delay` from now.
    fn schedule(&mut self, delay: Duration) -> CueHandle;

    /// Cancel a pending cue. Returns false if it already fired or was
    /// never pending.
    fn cancel(&mut self, handle: CueHandle) -> bool;

    /// Remove and return every cue whose deadline has passed, earliest
    /// first.
    fn take_due(&mut self) -> Vec<CueHandle>;

    /// Earliest pending deadline.
    fn next_deadline(&self) -> Option<Instant>;

    /// Number of cues still pending.
    fn pending(&self) -> usize;
}

/// Deadline queue driven by a [`Clock`].
#[derive(Debug)]
pub struct TimerQueue<C: Clock> {
    clock: C,
    next_id: u64,
    deadlines: BTreeMap<CueHandle, Instant>,
}

impl<C: Clock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 1,
            deadlines: BTreeMap::new(),
        }
    }
}

impl<C: Clock> Scheduler for TimerQueue<C> {
    fn schedule(&mut self, delay: Duration) -> CueHandle {
        let handle = CueHandle(self.next_id);
        self.next_id += 1;
        self.deadlines.insert(handle, self.clock.now() + delay);
        handle
    }

    fn cancel(&mut self, handle: CueHandle) -> bool {
        self.deadlines.remove(&handle).is_some()
    }

    fn take_due(&mut self) -> Vec<CueHandle> {
        let now = self.clock.now();
        let mut due: Vec<(Instant, CueHandle)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(handle, deadline)| (*deadline, *handle))
            .collect();
        due.sort();

        for (_, handle) in &due {
            self.deadlines.remove(handle);
        }

        due.into_iter().map(|(_, handle)| handle).collect()
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    fn pending(&self) -> usize {
        self.deadlines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();

        clock.advance_millis(250);

        assert_eq!(other.now() - start, Duration::from_millis(250));
        assert_eq!(other.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_schedule_and_fire() {
        let clock = ManualClock::new();
        let mut timers = TimerQueue::new(clock.clone());

        let handle = timers.schedule(Duration::from_millis(1500));
        assert_eq!(timers.pending(), 1);

        clock.advance_millis(1499);
        assert!(timers.take_due().is_empty());

        clock.advance_millis(1);
        assert_eq!(timers.take_due(), vec![handle]);
        assert_eq!(timers.pending(), 0);

        // Already fired
        assert!(timers.take_due().is_empty());
        assert!(!timers.cancel(handle));
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let clock = ManualClock::new();
        let mut timers = TimerQueue::new(clock.clone());

        let handle = timers.schedule(Duration::from_millis(1000));
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));

        clock.advance_millis(10_000);
        assert!(timers.take_due().is_empty());
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_due_in_deadline_order() {
        let clock = ManualClock::new();
        let mut timers = TimerQueue::new(clock.clone());

        let start = clock.now();
        let late = timers.schedule(Duration::from_millis(300));
        let early = timers.schedule(Duration::from_millis(100));

        assert_eq!(
            timers.next_deadline(),
            Some(start + Duration::from_millis(100))
        );

        clock.advance_millis(500);
        assert_eq!(timers.take_due(), vec![early, late]);
    }

    #[test]
    fn test_handles_not_reused() {
        let mut timers = TimerQueue::new(ManualClock::new());

        let first = timers.schedule(Duration::from_millis(10));
        timers.cancel(first);
        let second = timers.schedule(Duration::from_millis(10));

        assert_ne!(first, second);
        assert_eq!(format!("{}", second), format!("cue#{}", second.id()));
    }
}
