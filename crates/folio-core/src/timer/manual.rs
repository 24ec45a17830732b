use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::{Clock, Scheduler, TimerCallback, TimerHandle};

/// Key ordering timers by deadline, then by scheduling order
type TimerKey = (Duration, u64);

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<TimerKey, TimerCallback>,
}

/// Deterministic scheduler driven by explicit calls to [`advance`](Self::advance)
///
/// Clones share the same clock and timer queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, firing every timer that falls due on the way
    /// in deadline order. Timers armed by callbacks are fired too if they
    /// fall inside the window. Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now + by;
        let mut fired = 0;

        loop {
            // Release the borrow before running the callback: callbacks
            // re-arm and cancel timers on this scheduler.
            let callback = {
                let mut state = self.state.borrow_mut();
                let is_due = state
                    .queue
                    .keys()
                    .next()
                    .is_some_and(|&(due, _)| due <= target);
                if !is_due {
                    None
                } else if let Some(((due, _), callback)) = state.queue.pop_first() {
                    state.now = due;
                    Some(callback)
                } else {
                    None
                }
            };

            match callback {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => break,
            }
        }

        self.state.borrow_mut().now = target;
        fired
    }

    pub fn advance_ms(&self, ms: u64) -> usize {
        self.advance(Duration::from_millis(ms))
    }

    /// Jump straight to the next deadline and fire everything due then
    pub fn run_next(&self) -> usize {
        match self.next_deadline() {
            Some(deadline) => {
                let now = self.now();
                self.advance(deadline.saturating_sub(now))
            }
            None => 0,
        }
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.borrow().queue.keys().next().map(|&(due, _)| due)
    }
}

impl Clock for ManualScheduler {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let key = {
            let mut state = self.state.borrow_mut();
            let key = (state.now + delay, state.next_seq);
            state.next_seq += 1;
            state.queue.insert(key, callback);
            key
        };

        let weak: Weak<RefCell<ManualState>> = Rc::downgrade(&self.state);
        TimerHandle::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().queue.remove(&key);
            }
        })
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}
