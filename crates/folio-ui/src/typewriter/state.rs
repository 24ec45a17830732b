use std::time::Duration;

use folio_core::{Error, Result, TypewriterConfig};

/// Shortest delay between two steps, so zero-millisecond timings never spin
const MIN_STEP: Duration = Duration::from_millis(1);

/// Which part of the phrase cycle the typewriter is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Adding characters to the current phrase
    Typing,
    /// Full phrase on screen, waiting before deletion
    Pausing,
    /// Removing characters from the current phrase
    Deleting,
    /// Phrase fully deleted, waiting before the next one starts
    Advancing,
}

/// Type/pause/delete state over a fixed phrase list
///
/// `display_text()` is always the first `char_index()` characters of
/// `phrases()[phrase_index()]`.
#[derive(Debug, Clone)]
pub struct TypewriterState {
    phrases: Vec<String>,
    phrase_index: usize,
    /// Counted in chars, not bytes
    char_index: usize,
    is_deleting: bool,
    advancing: bool,
    /// Times the cycle wrapped back to the first phrase
    passes: usize,
}

impl TypewriterState {
    pub fn new(phrases: Vec<String>) -> Result<Self> {
        validate(&phrases)?;
        Ok(Self {
            phrases,
            phrase_index: 0,
            char_index: 0,
            is_deleting: false,
            advancing: false,
            passes: 0,
        })
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    pub fn is_deleting(&self) -> bool {
        self.is_deleting
    }

    /// Completed passes over the whole phrase list
    pub fn completed_passes(&self) -> usize {
        self.passes
    }

    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase_index]
    }

    fn phrase_len(&self) -> usize {
        self.current_phrase().chars().count()
    }

    /// Currently rendered prefix of the active phrase
    pub fn display_text(&self) -> &str {
        let phrase = self.current_phrase();
        match phrase.char_indices().nth(self.char_index) {
            Some((byte_index, _)) => &phrase[..byte_index],
            None => phrase,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.advancing {
            Phase::Advancing
        } else if self.is_deleting {
            Phase::Deleting
        } else if self.char_index < self.phrase_len() {
            Phase::Typing
        } else {
            Phase::Pausing
        }
    }

    /// Delay before the next call to [`step`](Self::step)
    pub fn delay(&self, config: &TypewriterConfig) -> Duration {
        let ms = match self.phase() {
            Phase::Typing => config.typing_speed_ms,
            Phase::Pausing => config.pause_ms,
            Phase::Deleting => config.delete_speed_ms,
            Phase::Advancing => config.advance_delay_ms,
        };
        Duration::from_millis(ms).max(MIN_STEP)
    }

    /// Perform the transition for the current phase
    pub fn step(&mut self) {
        match self.phase() {
            Phase::Typing => self.char_index += 1,
            Phase::Pausing => self.is_deleting = true,
            Phase::Deleting => self.char_index -= 1,
            Phase::Advancing => self.advancing = false,
        }
        self.settle();
    }

    /// Swap the phrase list mid-cycle
    ///
    /// An in-flight index past the end of the new list restarts the cycle at
    /// the first phrase; otherwise the rendered prefix is clamped to the new
    /// phrase length.
    pub fn set_phrases(&mut self, phrases: Vec<String>) -> Result<()> {
        validate(&phrases)?;
        self.phrases = phrases;

        if self.phrase_index >= self.phrases.len() {
            self.phrase_index = 0;
            self.char_index = 0;
            self.is_deleting = false;
            self.advancing = false;
        } else {
            self.char_index = self.char_index.min(self.phrase_len());
        }
        self.settle();
        Ok(())
    }

    /// A fully deleted phrase hands over to the next one immediately
    fn settle(&mut self) {
        if self.is_deleting && self.char_index == 0 {
            self.is_deleting = false;
            self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
            self.advancing = true;
            if self.phrase_index == 0 {
                self.passes += 1;
            }
        }
    }
}

fn validate(phrases: &[String]) -> Result<()> {
    if phrases.is_empty() {
        return Err(Error::InvalidConfig(
            "typewriter needs at least one phrase".to_string(),
        ));
    }
    Ok(())
}
