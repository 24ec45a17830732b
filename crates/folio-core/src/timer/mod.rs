//! Clock and timer primitives injected into the UI engines
//!
//! The engines never read wall-clock time or spawn timers themselves. A host
//! hands them a [`Scheduler`]:
//!
//! - [`ManualScheduler`] - deterministic fake clock, advanced explicitly
//! - [`TokioScheduler`] - real timers on a tokio `LocalSet`

mod manual;
mod runtime;

use std::fmt;
use std::time::Duration;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// Callback run when a timer fires
pub type TimerCallback = Box<dyn FnOnce()>;

/// Monotonic time source, measured from the clock's own origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// One-shot timer facility
pub trait Scheduler: Clock {
    /// Run `callback` once after `delay`, unless the returned handle is
    /// cancelled or dropped first.
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;
}

/// Cancellable handle to a pending timer
///
/// Dropping the handle cancels the timer. Cancelling a timer that already
/// fired is a no-op.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle with nothing to cancel
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}
