//! Per-element viewport entry trigger

use std::fmt;
use std::time::Duration;

use super::animation::{EntranceAnimation, Tween, VisualState};
use super::layout::LayoutProvider;
use super::marker::TriggerMarkers;

/// Identifier handed out by `observe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(pub u64);

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger-{}", self.0)
    }
}

/// What a scroll tick did to a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTransition {
    /// NotPlayed -> Played, entrance started
    Entered,
    /// Played -> NotPlayed, entrance reversed
    Reversed,
}

/// Entrance trigger for one observed element
///
/// The start marker is the only thing that flips `played`: reaching it plays
/// the entrance, scrolling back above it reverses (unless the animation is a
/// one-shot). The end marker only bounds [`is_active`](Self::is_active).
///
/// A trigger built with [`on_load`](Self::on_load) ignores scrolling and
/// geometry: it plays once at its first evaluation and never reverses.
#[derive(Debug, Clone)]
pub struct ViewportTrigger {
    id: TriggerId,
    element_id: String,
    animation: EntranceAnimation,
    markers: TriggerMarkers,
    on_load: bool,
    played: bool,
    active: bool,
    tween: Tween,
}

impl ViewportTrigger {
    pub fn new(
        id: TriggerId,
        element_id: impl Into<String>,
        animation: EntranceAnimation,
        markers: TriggerMarkers,
    ) -> Self {
        Self {
            id,
            element_id: element_id.into(),
            animation,
            markers,
            on_load: false,
            played: false,
            active: false,
            tween: Tween::hidden(),
        }
    }

    /// Entrance that plays when the page mounts rather than on scroll
    pub fn on_load(id: TriggerId, element_id: impl Into<String>, animation: EntranceAnimation) -> Self {
        Self {
            on_load: true,
            ..Self::new(id, element_id, animation, TriggerMarkers::default())
        }
    }

    pub fn plays_on_load(&self) -> bool {
        self.on_load
    }

    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn markers(&self) -> &TriggerMarkers {
        &self.markers
    }

    pub fn is_played(&self) -> bool {
        self.played
    }

    /// Between the start and end markers as of the last evaluation
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.tween.is_running(now)
    }

    pub fn visual_state(&self, now: Duration) -> VisualState {
        self.animation.state_at(self.tween.progress(now))
    }

    /// Re-check both markers against the current layout
    ///
    /// An element without geometry is left exactly as it was.
    pub fn evaluate(&mut self, layout: &dyn LayoutProvider, now: Duration) -> Option<TriggerTransition> {
        self.tween.settle(now);

        if self.on_load {
            if self.played {
                return None;
            }
            self.played = true;
            self.tween.play(now, &self.animation);
            return Some(TriggerTransition::Entered);
        }

        let rect = layout.element_rect(&self.element_id)?;
        let viewport_height = layout.viewport_height();
        if viewport_height.is_nan() || viewport_height <= 0.0 {
            return None;
        }
        let scroll_y = layout.scroll_y();

        let start_reached = self.markers.start.is_reached(&rect, scroll_y, viewport_height);
        let end_reached = self.markers.end.is_reached(&rect, scroll_y, viewport_height);
        self.active = start_reached && !end_reached;

        match (self.played, start_reached) {
            (false, true) => {
                self.played = true;
                self.tween.play(now, &self.animation);
                Some(TriggerTransition::Entered)
            }
            (true, false) if self.animation.reverse_on_leave_back => {
                self.played = false;
                self.tween.reverse(now, &self.animation);
                Some(TriggerTransition::Reversed)
            }
            _ => None,
        }
    }

    /// Stop the tween where it is
    pub fn cancel(&mut self, now: Duration) {
        self.tween.cancel(now);
    }
}
