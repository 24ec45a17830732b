//! Typewriter text cycling for the hero banner
//!
//! - `state` - pure type/pause/delete state machine over a phrase list
//! - `engine` - timer-driven handle that advances the state on an injected
//!   [`Scheduler`](folio_core::Scheduler) and publishes text changes

mod engine;
mod state;

pub use engine::Typewriter;
pub use state::{Phase, TypewriterState};
