use std::time::Duration;

use tokio::time::Instant;

use super::{Clock, Scheduler, TimerCallback, TimerHandle};

/// Scheduler backed by tokio timers
///
/// Callbacks are not `Send`, so timers run as `spawn_local` tasks and
/// `schedule_after` must be called from inside a `tokio::task::LocalSet`.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    origin: Instant,
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for TokioScheduler {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        let abort = task.abort_handle();
        TimerHandle::new(move || abort.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay_and_honours_cancel() {
        LocalSet::new()
            .run_until(async {
                let scheduler = TokioScheduler::new();
                let hits = Rc::new(Cell::new(0));

                let kept_hits = hits.clone();
                let _kept = scheduler.schedule_after(
                    Duration::from_millis(50),
                    Box::new(move || kept_hits.set(kept_hits.get() + 1)),
                );
                let cancelled_hits = hits.clone();
                let cancelled = scheduler.schedule_after(
                    Duration::from_millis(10),
                    Box::new(move || cancelled_hits.set(cancelled_hits.get() + 100)),
                );
                cancelled.cancel();

                tokio::time::sleep(Duration::from_millis(100)).await;
                assert_eq!(hits.get(), 1);
                assert!(scheduler.now() >= Duration::from_millis(100));
            })
            .await;
    }
}
