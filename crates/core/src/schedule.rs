//! Timer capability used by widgets that wait.
//!
//! Widgets never block: they ask a [`Scheduler`] for a callback and get back
//! a [`TimerHandle`]. The host routes fired tokens back into the owning
//! widget, which ignores tokens it no longer holds.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Identifies one armed timer. Tokens are never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A scheduled callback that can be cancelled.
///
/// `cancel` takes effect synchronously and is idempotent. Implementations
/// also cancel on drop.
pub trait TimerHandle {
    fn token(&self) -> TimerToken;
    fn cancel(&mut self);
}

/// Schedules repeating and one-shot callbacks.
pub trait Scheduler {
    type Handle: TimerHandle;

    /// Arm a timer that fires every `interval` until cancelled.
    fn every(&mut self, interval: Duration) -> Self::Handle;

    /// Arm a timer that fires once after `delay`.
    fn after(&mut self, delay: Duration) -> Self::Handle;
}

#[derive(Debug)]
struct PendingTimer {
    due: Duration,
    interval: Option<Duration>,
}

#[derive(Debug, Default)]
struct QueueState {
    now: Duration,
    next_token: u64,
    timers: BTreeMap<TimerToken, PendingTimer>,
}

// Zero-length intervals would fire forever within one advance.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A deterministic scheduler over a virtual clock.
///
/// Time only moves when the host calls [`TimerQueue::advance`]. Tests use it
/// to step through intervals exactly; the terminal host feeds it wall-clock
/// deltas from its event loop.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    state: Rc<RefCell<QueueState>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Move the clock forward and return every token that fell due, in
    /// firing order. Repeating timers re-arm from their own due time so
    /// late delivery never accumulates drift.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerToken> {
        let mut state = self.state.borrow_mut();
        let target = state.now + elapsed;
        let mut fired = Vec::new();

        loop {
            let next = state
                .timers
                .iter()
                .filter(|(_, timer)| timer.due <= target)
                .min_by_key(|(token, timer)| (timer.due, **token))
                .map(|(token, timer)| (*token, timer.due, timer.interval));
            let Some((token, due, interval)) = next else {
                break;
            };

            state.now = due;
            fired.push(token);
            match interval {
                Some(interval) => {
                    if let Some(timer) = state.timers.get_mut(&token) {
                        timer.due = due + interval;
                    }
                }
                None => {
                    state.timers.remove(&token);
                }
            }
        }

        state.now = target;
        fired
    }

    fn arm(&mut self, delay: Duration, interval: Option<Duration>) -> QueuedTimer {
        let mut state = self.state.borrow_mut();
        let token = TimerToken(state.next_token);
        state.next_token += 1;
        let due = state.now + delay;
        state.timers.insert(token, PendingTimer { due, interval });
        QueuedTimer {
            token,
            queue: Rc::downgrade(&self.state),
        }
    }
}

impl Scheduler for TimerQueue {
    type Handle = QueuedTimer;

    fn every(&mut self, interval: Duration) -> QueuedTimer {
        let interval = interval.max(MIN_INTERVAL);
        self.arm(interval, Some(interval))
    }

    fn after(&mut self, delay: Duration) -> QueuedTimer {
        self.arm(delay, None)
    }
}

/// Handle to a timer armed on a [`TimerQueue`].
#[derive(Debug)]
pub struct QueuedTimer {
    token: TimerToken,
    queue: Weak<RefCell<QueueState>>,
}

impl TimerHandle for QueuedTimer {
    fn token(&self) -> TimerToken {
        self.token
    }

    fn cancel(&mut self) {
        if let Some(state) = self.queue.upgrade() {
            state.borrow_mut().timers.remove(&self.token);
        }
        self.queue = Weak::new();
    }
}

impl Drop for QueuedTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn repeating_timer_fires_once_per_interval() {
        let mut queue = TimerQueue::new();
        let timer = queue.every(4 * SECOND);

        assert!(queue.advance(3 * SECOND).is_empty());
        assert_eq!(queue.advance(SECOND), vec![timer.token()]);
        assert_eq!(queue.advance(8 * SECOND), vec![timer.token(); 2]);
        assert_eq!(queue.now(), 16 * SECOND);
    }

    #[test]
    fn one_shot_fires_once_and_disarms() {
        let mut queue = TimerQueue::new();
        let timer = queue.after(2 * SECOND);

        assert_eq!(queue.advance(10 * SECOND), vec![timer.token()]);
        assert_eq!(queue.pending(), 0);
        assert!(queue.advance(10 * SECOND).is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let mut timer = queue.every(SECOND);
        timer.cancel();
        timer.cancel();

        assert!(queue.advance(5 * SECOND).is_empty());
    }

    #[test]
    fn dropping_handle_cancels() {
        let mut queue = TimerQueue::new();
        drop(queue.after(SECOND));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn tokens_fire_in_due_order() {
        let mut queue = TimerQueue::new();
        let slow = queue.after(3 * SECOND);
        let fast = queue.every(2 * SECOND);

        assert_eq!(
            queue.advance(4 * SECOND),
            vec![fast.token(), slow.token(), fast.token()]
        );
    }

    #[test]
    fn tokens_are_unique() {
        let mut queue = TimerQueue::new();
        let a = queue.after(SECOND);
        let b = queue.after(SECOND);
        assert_ne!(a.token(), b.token());
    }
}
