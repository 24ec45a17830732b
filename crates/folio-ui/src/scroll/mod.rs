//! Scroll-driven UI state for the portfolio page
//!
//! Two independent jobs share one scroll tick:
//! - highlighting the navigation entry of the section under the header
//! - playing entrance animations as elements cross into the viewport, and
//!   reversing them when scrolled back out
//!
//! # Layers
//!
//! ## Atoms
//! - `easing` - easing curves over [0, 1]
//! - `timing` - clock-relative progress and interpolation
//! - `config` - config types re-exported from folio-core plus helpers
//! - `layout` - host geometry provider
//! - `marker` - `"top 80%"` style trigger boundaries
//!
//! ## Molecules
//! - `animation` - entrance tween playback
//! - `sections` - active-section tracking
//! - `trigger` - per-element viewport trigger
//! - `coordinator` - owns both, coalesces ticks, publishes changes
//!
//! # Usage
//!
//! ```ignore
//! use folio_ui::scroll::{ScrollCoordinator, StaticLayout};
//!
//! let mut coordinator = ScrollCoordinator::new(&config.scroll, &config.animation, clock)?;
//! coordinator.register(["home", "about", "contact"]);
//! coordinator.observe_default("contact-form");
//! coordinator.mount(&layout);
//!
//! // on every scroll event
//! coordinator.on_scroll(&layout);
//! // once per animation frame
//! coordinator.on_frame(&layout);
//! ```

// Atoms
pub mod config;
pub mod easing;
pub mod layout;
pub mod marker;
pub mod timing;

// Molecules
pub mod animation;
pub mod coordinator;
pub mod sections;
pub mod trigger;

pub use animation::{EntranceAnimation, Tween, VisualState};
pub use config::{AnimationConfig, AnimationConfigExt, ScrollConfig, ScrollConfigExt};
pub use coordinator::{ScrollCoordinator, ScrollEvent};
pub use easing::{EasingType, EasingTypeExt};
pub use layout::{ElementRect, LayoutProvider, StaticLayout};
pub use marker::{Edge, Marker, TriggerMarkers, ViewportOffset};
pub use sections::{SectionChange, SectionTracker};
pub use trigger::{TriggerId, TriggerTransition, ViewportTrigger};
