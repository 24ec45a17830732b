pub mod scroll;
pub mod typewriter;

pub use scroll::{
    EntranceAnimation, LayoutProvider, ScrollCoordinator, ScrollEvent, SectionTracker,
    StaticLayout, TriggerId, TriggerMarkers, VisualState,
};
pub use typewriter::{Phase, Typewriter, TypewriterState};
