use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use folio_core::{Result, Scheduler, TimerHandle, TypewriterConfig};
use tokio::sync::watch;
use tracing::{debug, trace};

use super::state::{Phase, TypewriterState};

struct Inner {
    state: TypewriterState,
    config: TypewriterConfig,
    scheduler: Rc<dyn Scheduler>,
    /// The single armed timer, replaced (and thereby cancelled) on re-arm
    pending: Option<TimerHandle>,
    /// Bumped on every re-arm and on destroy; stale callbacks compare and bail
    generation: u64,
    destroyed: bool,
    text_tx: watch::Sender<String>,
    passes_tx: watch::Sender<usize>,
}

/// Timer-driven typewriter cycling through a list of phrases forever
///
/// Each step is driven by exactly one pending timer on the injected
/// scheduler. Hosts read [`current_text`](Self::current_text) or
/// [`subscribe`](Self::subscribe) to be told when it changes.
/// [`destroy`](Self::destroy) (or dropping the handle) cancels the pending
/// timer; nothing mutates afterwards.
pub struct Typewriter {
    inner: Rc<RefCell<Inner>>,
}

impl Typewriter {
    /// Start typing the first phrase. Fails on an empty phrase list.
    pub fn new(
        phrases: Vec<String>,
        config: TypewriterConfig,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self> {
        let state = TypewriterState::new(phrases)?;
        let (text_tx, _) = watch::channel(String::new());
        let (passes_tx, _) = watch::channel(0);

        debug!(
            phrases = state.phrases().len(),
            typing_ms = config.typing_speed_ms,
            delete_ms = config.delete_speed_ms,
            pause_ms = config.pause_ms,
            "Typewriter started"
        );

        let inner = Rc::new(RefCell::new(Inner {
            state,
            config,
            scheduler,
            pending: None,
            generation: 0,
            destroyed: false,
            text_tx,
            passes_tx,
        }));
        arm(&inner);

        Ok(Self { inner })
    }

    /// Text currently on screen
    pub fn current_text(&self) -> String {
        self.inner.borrow().state.display_text().to_string()
    }

    /// Receiver that is marked changed whenever the text changes
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.inner.borrow().text_tx.subscribe()
    }

    /// Completed passes over the whole phrase list
    ///
    /// Counts every wrap back to the first phrase, so a single phrase or a
    /// list of empty phrases still completes passes.
    pub fn completed_passes(&self) -> usize {
        self.inner.borrow().state.completed_passes()
    }

    /// Receiver that is marked changed whenever a pass completes
    pub fn subscribe_passes(&self) -> watch::Receiver<usize> {
        self.inner.borrow().passes_tx.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.inner.borrow().state.phase()
    }

    pub fn phrase_index(&self) -> usize {
        self.inner.borrow().state.phrase_index()
    }

    pub fn char_index(&self) -> usize {
        self.inner.borrow().state.char_index()
    }

    pub fn is_deleting(&self) -> bool {
        self.inner.borrow().state.is_deleting()
    }

    pub fn config(&self) -> TypewriterConfig {
        self.inner.borrow().config.clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }

    /// Replace the phrase list without restarting the cycle
    ///
    /// See [`TypewriterState::set_phrases`] for how in-flight indices are
    /// clamped. The pending timer is superseded.
    pub fn set_phrases(&self, phrases: Vec<String>) -> Result<()> {
        {
            let mut guard = self.inner.borrow_mut();
            if guard.destroyed {
                return Ok(());
            }
            guard.state.set_phrases(phrases)?;
            publish(&guard);
            debug!(phrases = guard.state.phrases().len(), "Typewriter phrases replaced");
        }
        arm(&self.inner);
        Ok(())
    }

    /// Apply new timings, restarting the current step's delay
    pub fn set_config(&self, config: TypewriterConfig) {
        {
            let mut guard = self.inner.borrow_mut();
            if guard.destroyed {
                return;
            }
            guard.config = config;
        }
        arm(&self.inner);
    }

    /// Cancel the pending timer and stop for good
    pub fn destroy(&self) {
        let mut guard = self.inner.borrow_mut();
        if guard.destroyed {
            return;
        }
        guard.destroyed = true;
        guard.generation += 1;
        guard.pending = None;
        debug!("Typewriter destroyed");
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.inner.try_borrow_mut() {
            guard.destroyed = true;
            guard.pending = None;
        }
    }
}

impl fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Typewriter")
            .field("state", &inner.state)
            .field("config", &inner.config)
            .field("destroyed", &inner.destroyed)
            .finish()
    }
}

/// Arm the timer for the current phase, superseding any pending one
fn arm(inner: &Rc<RefCell<Inner>>) {
    let mut guard = inner.borrow_mut();
    if guard.destroyed {
        return;
    }
    let inner_ref = &mut *guard;

    inner_ref.pending = None;
    inner_ref.generation += 1;
    let generation = inner_ref.generation;
    let delay = inner_ref.state.delay(&inner_ref.config);

    let weak = Rc::downgrade(inner);
    let handle = inner_ref
        .scheduler
        .schedule_after(delay, Box::new(move || fire(&weak, generation)));
    inner_ref.pending = Some(handle);
}

fn fire(weak: &Weak<RefCell<Inner>>, generation: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };

    {
        let mut guard = inner.borrow_mut();
        if guard.destroyed || guard.generation != generation {
            return;
        }
        // This timer just fired; nothing left to cancel
        guard.pending = None;

        let before = guard.state.phase();
        guard.state.step();
        let after = guard.state.phase();
        if before != after {
            trace!(?before, ?after, phrase = guard.state.phrase_index(), "Typewriter phase change");
        }
        publish(&guard);
    }

    arm(&inner);
}

fn publish(inner: &Inner) {
    let text = inner.state.display_text();
    inner.text_tx.send_if_modified(|current| {
        if current != text {
            current.clear();
            current.push_str(text);
            true
        } else {
            false
        }
    });

    let passes = inner.state.completed_passes();
    inner.passes_tx.send_if_modified(|current| {
        if *current != passes {
            *current = passes;
            true
        } else {
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ManualScheduler;

    fn phrases(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn start(items: &[&str], config: TypewriterConfig) -> (ManualScheduler, Typewriter) {
        let scheduler = ManualScheduler::new();
        let typewriter =
            Typewriter::new(phrases(items), config, Rc::new(scheduler.clone())).unwrap();
        (scheduler, typewriter)
    }

    /// Distinct consecutive texts observed while firing `ticks` timers
    fn snapshots(scheduler: &ManualScheduler, typewriter: &Typewriter, ticks: usize) -> Vec<String> {
        let mut seen = vec![typewriter.current_text()];
        for _ in 0..ticks {
            scheduler.run_next();
            let text = typewriter.current_text();
            if seen.last() != Some(&text) {
                seen.push(text);
            }
        }
        seen
    }

    #[test]
    fn test_go_rust_sequence() {
        let (scheduler, typewriter) = start(&["Go", "Rust"], TypewriterConfig::uniform(10));
        let seen = snapshots(&scheduler, &typewriter, 40);

        let expected = [
            "", "G", "Go", "G", "", "R", "Ru", "Rus", "Rust", "Rus", "Ru", "R", "", "G", "Go",
        ];
        assert!(seen.len() >= expected.len());
        assert_eq!(&seen[..expected.len()], &expected[..]);
    }

    #[test]
    fn test_timings_follow_config() {
        let config = TypewriterConfig {
            typing_speed_ms: 100,
            delete_speed_ms: 50,
            pause_ms: 2000,
            advance_delay_ms: 500,
        };
        let (scheduler, typewriter) = start(&["Hi", "Yo"], config);

        scheduler.advance_ms(99);
        assert_eq!(typewriter.current_text(), "");
        scheduler.advance_ms(1);
        assert_eq!(typewriter.current_text(), "H");
        scheduler.advance_ms(100);
        assert_eq!(typewriter.current_text(), "Hi");

        // pause, then the first deletion 50ms after it ends
        scheduler.advance_ms(2000);
        assert_eq!(typewriter.current_text(), "Hi");
        assert!(typewriter.is_deleting());
        scheduler.advance_ms(50);
        assert_eq!(typewriter.current_text(), "H");
        scheduler.advance_ms(50);
        assert_eq!(typewriter.current_text(), "");
        assert_eq!(typewriter.phase(), Phase::Advancing);
        assert_eq!(typewriter.phrase_index(), 1);

        scheduler.advance_ms(500);
        assert_eq!(typewriter.phase(), Phase::Typing);
        scheduler.advance_ms(100);
        assert_eq!(typewriter.current_text(), "Y");
    }

    #[test]
    fn test_exactly_one_timer_pending() {
        let (scheduler, typewriter) = start(&["abc", ""], TypewriterConfig::uniform(5));
        for _ in 0..50 {
            assert_eq!(scheduler.pending(), 1);
            scheduler.run_next();
        }
        typewriter.set_config(TypewriterConfig::uniform(7));
        assert_eq!(scheduler.pending(), 1);
        typewriter.set_phrases(phrases(&["x"])).unwrap();
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_text_is_always_a_prefix_and_moves_monotonically() {
        let items = ["héllo", "", "日本", "a"];
        let (scheduler, typewriter) = start(&items, TypewriterConfig::uniform(3));

        let mut last_len = 0;
        let mut last_phase = typewriter.phase();
        for _ in 0..200 {
            scheduler.run_next();
            let text = typewriter.current_text();
            let phrase = items[typewriter.phrase_index()];
            assert!(phrase.starts_with(&text), "{:?} is not a prefix of {:?}", text, phrase);

            let len = text.chars().count();
            let phase = typewriter.phase();
            match (last_phase, phase) {
                (Phase::Typing, Phase::Typing) => assert!(len >= last_len),
                (Phase::Deleting, Phase::Deleting) => assert!(len <= last_len),
                _ => {}
            }
            last_len = len;
            last_phase = phase;
        }
    }

    #[test]
    fn test_phrases_cycle_in_order() {
        let (scheduler, typewriter) = start(&["a", "b", "c"], TypewriterConfig::uniform(1));
        let mut order = vec![typewriter.phrase_index()];
        for _ in 0..60 {
            scheduler.run_next();
            let index = typewriter.phrase_index();
            if order.last() != Some(&index) {
                order.push(index);
            }
        }
        assert!(order.len() >= 7);
        assert_eq!(&order[..7], &[0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_empty_phrases_do_not_deadlock() {
        let (scheduler, typewriter) = start(&["", "", "ok"], TypewriterConfig::uniform(1));
        let seen = snapshots(&scheduler, &typewriter, 40);
        assert!(seen.contains(&"ok".to_string()));
    }

    #[test]
    fn test_rejects_empty_phrase_list() {
        let scheduler = ManualScheduler::new();
        let result = Typewriter::new(Vec::new(), TypewriterConfig::default(), Rc::new(scheduler.clone()));
        assert!(result.is_err());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_destroy_stops_all_mutation() {
        let (scheduler, typewriter) = start(&["Go", "Rust"], TypewriterConfig::uniform(10));
        scheduler.advance_ms(10);
        assert_eq!(typewriter.current_text(), "G");

        typewriter.destroy();
        assert!(typewriter.is_destroyed());
        assert_eq!(scheduler.pending(), 0);

        let rx = typewriter.subscribe();
        scheduler.advance_ms(10_000);
        assert_eq!(typewriter.current_text(), "G");
        assert_eq!(typewriter.char_index(), 1);
        assert!(!rx.has_changed().unwrap());

        typewriter.set_config(TypewriterConfig::uniform(1));
        typewriter.set_phrases(phrases(&["x"])).unwrap();
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_drop_cancels_pending_timer() {
        let (scheduler, typewriter) = start(&["Go"], TypewriterConfig::uniform(10));
        assert_eq!(scheduler.pending(), 1);
        drop(typewriter);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.advance_ms(1000), 0);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let (scheduler, typewriter) = start(&["Go"], TypewriterConfig::uniform(10));
        let mut rx = typewriter.subscribe();
        assert!(!rx.has_changed().unwrap());

        scheduler.advance_ms(10);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "G");

        // entering the pause does not change the text
        scheduler.advance_ms(10);
        assert_eq!(*rx.borrow_and_update(), "Go");
        scheduler.advance_ms(10);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_set_phrases_mid_cycle_clamps() {
        let (scheduler, typewriter) = start(&["Go", "Rust"], TypewriterConfig::uniform(10));
        // "Go" cycle takes 50ms, advance delay 500ms, then "R", "Ru"
        scheduler.advance_ms(50 + 500 + 20);
        assert_eq!(typewriter.phrase_index(), 1);
        assert_eq!(typewriter.current_text(), "Ru");

        typewriter.set_phrases(phrases(&["Zig"])).unwrap();
        assert_eq!(typewriter.phrase_index(), 0);
        assert_eq!(typewriter.current_text(), "");

        scheduler.advance_ms(10);
        assert_eq!(typewriter.current_text(), "Z");
        assert!(typewriter.set_phrases(Vec::new()).is_err());
    }

    #[test]
    fn test_single_phrase_passes_are_published() {
        let (scheduler, typewriter) = start(&["Go"], TypewriterConfig::uniform(10));
        let mut rx = typewriter.subscribe_passes();

        // type 2, pause, delete 2: the wrap happens on the fifth tick
        scheduler.advance_ms(40);
        assert_eq!(typewriter.completed_passes(), 0);
        assert!(!rx.has_changed().unwrap());
        scheduler.advance_ms(10);
        assert_eq!(typewriter.completed_passes(), 1);
        assert_eq!(*rx.borrow_and_update(), 1);

        // advance delay (500) then the next 50ms pass
        scheduler.advance_ms(550);
        assert_eq!(*rx.borrow_and_update(), 2);
    }

    #[test]
    fn test_empty_phrase_passes_are_published() {
        let (scheduler, typewriter) = start(&[""], TypewriterConfig::uniform(10));
        let text_rx = typewriter.subscribe();
        let mut passes_rx = typewriter.subscribe_passes();

        // pause (10) wraps; advance (500) then pause again
        scheduler.advance_ms(10);
        assert_eq!(*passes_rx.borrow_and_update(), 1);
        scheduler.advance_ms(510);
        assert_eq!(*passes_rx.borrow_and_update(), 2);
        assert!(!text_rx.has_changed().unwrap());
    }
}
