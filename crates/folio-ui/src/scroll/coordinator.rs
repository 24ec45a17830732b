//! Scroll coordinator: one tick drives section tracking and every trigger

use std::fmt;
use std::rc::Rc;

use folio_core::{AnimationConfig, Clock, Result, ScrollConfig};
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};

use super::animation::{EntranceAnimation, VisualState};
use super::config::{AnimationConfigExt, ScrollConfigExt};
use super::layout::LayoutProvider;
use super::marker::TriggerMarkers;
use super::sections::{SectionChange, SectionTracker};
use super::trigger::{TriggerId, TriggerTransition, ViewportTrigger};

/// Changes emitted to the host
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollEvent {
    /// Navigation highlight should move
    ActiveSectionChanged {
        previous: Option<String>,
        current: String,
    },
    /// An element's entrance started playing
    Entered { trigger: TriggerId, element_id: String },
    /// An element's entrance is playing back to hidden
    Reversed { trigger: TriggerId, element_id: String },
}

/// Owns section tracking and viewport triggers for one page instance
///
/// Hosts call [`on_scroll`](Self::on_scroll) from their scroll listener and
/// [`on_frame`](Self::on_frame) once per animation frame; with coalescing
/// enabled, any number of scroll events between two frames cost a single
/// evaluation. [`destroy`](Self::destroy) drops every trigger and tween, after
/// which all calls are no-ops.
pub struct ScrollCoordinator {
    clock: Rc<dyn Clock>,
    sections: SectionTracker,
    triggers: Vec<ViewportTrigger>,
    next_trigger_id: u64,
    default_markers: TriggerMarkers,
    default_animation: EntranceAnimation,
    coalesce: bool,
    /// A scroll event arrived since the last evaluation
    dirty: bool,
    destroyed: bool,
    active_tx: watch::Sender<Option<String>>,
    event_tx: Option<mpsc::UnboundedSender<ScrollEvent>>,
}

impl ScrollCoordinator {
    /// Fails only when the configured default markers do not parse
    pub fn new(
        scroll: &ScrollConfig,
        animation: &AnimationConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self> {
        let (active_tx, _) = watch::channel(None);
        Ok(Self {
            clock,
            sections: SectionTracker::from_config(scroll),
            triggers: Vec::new(),
            next_trigger_id: 1,
            default_markers: scroll.markers()?,
            default_animation: animation.entrance(),
            coalesce: scroll.coalesce_frames,
            dirty: false,
            destroyed: false,
            active_tx,
            event_tx: None,
        })
    }

    /// Set the event sender for host notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<ScrollEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn send_event(&self, event: ScrollEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send scroll event: receiver dropped");
            }
        }
    }

    /// Track these sections for navigation highlighting, in document order
    pub fn register<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.destroyed {
            return;
        }
        self.sections.register(ids);
        debug!(sections = self.sections.sections().len(), "Sections registered");
        self.publish_active();
    }

    /// Attach an entrance trigger to an element
    pub fn observe(
        &mut self,
        element_id: impl Into<String>,
        animation: EntranceAnimation,
        markers: TriggerMarkers,
    ) -> TriggerId {
        let id = TriggerId(self.next_trigger_id);
        self.next_trigger_id += 1;
        if self.destroyed {
            return id;
        }

        let trigger = ViewportTrigger::new(id, element_id, animation, markers);
        debug!(
            %id,
            element = trigger.element_id(),
            start = %markers.start,
            end = %markers.end,
            "Observing element"
        );
        self.triggers.push(trigger);
        id
    }

    /// Entrance that plays at the next evaluation (normally `mount`) and
    /// ignores scrolling afterwards
    pub fn animate_on_load(
        &mut self,
        element_id: impl Into<String>,
        animation: EntranceAnimation,
    ) -> TriggerId {
        let id = TriggerId(self.next_trigger_id);
        self.next_trigger_id += 1;
        if self.destroyed {
            return id;
        }

        let trigger = ViewportTrigger::on_load(id, element_id, animation);
        debug!(%id, element = trigger.element_id(), "Animating on load");
        self.triggers.push(trigger);
        id
    }

    /// Observe with the configured default animation and markers
    pub fn observe_default(&mut self, element_id: impl Into<String>) -> TriggerId {
        let animation = self.default_animation.clone();
        let markers = self.default_markers;
        self.observe(element_id, animation, markers)
    }

    /// Detach one trigger, stopping its tween. Returns false if unknown.
    pub fn unobserve(&mut self, id: TriggerId) -> bool {
        let now = self.clock.now();
        match self.triggers.iter().position(|t| t.id() == id) {
            Some(index) => {
                let mut trigger = self.triggers.remove(index);
                trigger.cancel(now);
                true
            }
            None => false,
        }
    }

    /// Initial evaluation once the page is laid out
    pub fn mount(&mut self, layout: &dyn LayoutProvider) {
        self.evaluate(layout);
    }

    /// Scroll listener entry point
    pub fn on_scroll(&mut self, layout: &dyn LayoutProvider) {
        if self.destroyed {
            return;
        }
        if self.coalesce {
            self.dirty = true;
        } else {
            self.evaluate(layout);
        }
    }

    /// Animation frame entry point. Returns true if an evaluation ran.
    pub fn on_frame(&mut self, layout: &dyn LayoutProvider) -> bool {
        if !self.dirty || self.destroyed {
            return false;
        }
        self.evaluate(layout);
        true
    }

    /// Evaluate sections and triggers against the current layout right away
    pub fn evaluate(&mut self, layout: &dyn LayoutProvider) {
        if self.destroyed {
            return;
        }
        self.dirty = false;
        let now = self.clock.now();
        trace!(scroll_y = layout.scroll_y(), "Scroll tick");

        if let Some(SectionChange { previous, current }) = self.sections.update(layout) {
            debug!(from = ?previous, to = %current, "Active section changed");
            self.publish_active();
            self.send_event(ScrollEvent::ActiveSectionChanged { previous, current });
        }

        let mut events = Vec::new();
        for trigger in &mut self.triggers {
            let Some(transition) = trigger.evaluate(layout, now) else {
                continue;
            };
            let trigger_id = trigger.id();
            let element_id = trigger.element_id().to_string();
            trace!(%trigger_id, element = %element_id, ?transition, "Trigger crossed start marker");
            events.push(match transition {
                TriggerTransition::Entered => ScrollEvent::Entered {
                    trigger: trigger_id,
                    element_id,
                },
                TriggerTransition::Reversed => ScrollEvent::Reversed {
                    trigger: trigger_id,
                    element_id,
                },
            });
        }
        for event in events {
            self.send_event(event);
        }
    }

    fn publish_active(&self) {
        let active = self.sections.active().map(str::to_string);
        self.active_tx.send_if_modified(|current| {
            if *current != active {
                *current = active;
                true
            } else {
                false
            }
        });
    }

    pub fn active_section(&self) -> Option<&str> {
        self.sections.active()
    }

    /// Receiver marked changed whenever the active section moves
    pub fn subscribe_active(&self) -> watch::Receiver<Option<String>> {
        self.active_tx.subscribe()
    }

    /// `None` for unknown triggers
    pub fn is_played(&self, id: TriggerId) -> Option<bool> {
        self.trigger(id).map(ViewportTrigger::is_played)
    }

    pub fn is_active(&self, id: TriggerId) -> Option<bool> {
        self.trigger(id).map(ViewportTrigger::is_active)
    }

    /// Current interpolated properties for the element's entrance
    pub fn visual_state(&self, id: TriggerId) -> Option<VisualState> {
        let now = self.clock.now();
        self.trigger(id).map(|t| t.visual_state(now))
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&ViewportTrigger> {
        self.triggers.iter().find(|t| t.id() == id)
    }

    pub fn triggers(&self) -> &[ViewportTrigger] {
        &self.triggers
    }

    /// Any entrance tween still moving
    pub fn is_animating(&self) -> bool {
        let now = self.clock.now();
        self.triggers.iter().any(|t| t.is_animating(now))
    }

    /// Whether the host should keep requesting frames
    pub fn needs_frame(&self) -> bool {
        !self.destroyed && (self.dirty || self.is_animating())
    }

    /// Scroll offset for a navigation click on `section_id`
    pub fn scroll_target(&self, section_id: &str, layout: &dyn LayoutProvider) -> Option<f64> {
        self.sections.scroll_target(section_id, layout)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Detach all triggers, cancel their tweens and stop reacting to scrolls
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        let now = self.clock.now();
        for trigger in &mut self.triggers {
            trigger.cancel(now);
        }
        self.triggers.clear();
        self.sections.clear();
        self.dirty = false;
        self.destroyed = true;
        self.event_tx = None;
        debug!("Scroll coordinator destroyed");
    }
}

impl Drop for ScrollCoordinator {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for ScrollCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("sections", &self.sections)
            .field("triggers", &self.triggers.len())
            .field("coalesce", &self.coalesce)
            .field("dirty", &self.dirty)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
