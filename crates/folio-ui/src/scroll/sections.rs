//! Active-section tracking for navigation highlighting

use tracing::trace;

use super::config::ScrollConfig;
use super::layout::LayoutProvider;

/// Active section moved from `previous` to `current`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionChange {
    pub previous: Option<String>,
    pub current: String,
}

/// Finds the section under the fixed header
///
/// The probe point is the scroll offset plus a lookahead; the first
/// registered section whose `[top, top + height)` contains it becomes
/// active. Sections must be registered in document order. When nothing
/// contains the probe point the previous active section is kept.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    sections: Vec<String>,
    active: Option<String>,
    /// Highlighted as soon as it is registered, before geometry matches
    initial: Option<String>,
    lookahead: f64,
    header_offset: f64,
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::from_config(&ScrollConfig::default())
    }
}

impl SectionTracker {
    pub fn new(lookahead: f64, header_offset: f64) -> Self {
        Self {
            sections: Vec::new(),
            active: None,
            initial: None,
            lookahead,
            header_offset,
        }
    }

    pub fn from_config(config: &ScrollConfig) -> Self {
        let tracker = Self::new(config.lookahead_px, config.header_offset_px);
        match config.initial_section.trim() {
            "" => tracker,
            id => tracker.with_initial(id),
        }
    }

    /// Seed the active section (the page starts at its first section)
    pub fn with_initial(mut self, id: impl Into<String>) -> Self {
        self.initial = Some(id.into());
        self
    }

    /// Replace the tracked sections, in document order
    ///
    /// The active section is dropped if it is no longer registered. With
    /// nothing active, the initial section takes over when it is registered.
    pub fn register<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections = ids.into_iter().map(Into::into).collect();
        if let Some(active) = &self.active {
            if !self.sections.contains(active) {
                self.active = None;
            }
        }
        if self.active.is_none() {
            self.active = self
                .initial
                .as_ref()
                .filter(|id| self.sections.contains(id))
                .cloned();
        }
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn lookahead(&self) -> f64 {
        self.lookahead
    }

    pub fn probe_point(&self, layout: &dyn LayoutProvider) -> f64 {
        layout.scroll_y() + self.lookahead
    }

    /// First section containing the probe point, without updating state
    pub fn locate(&self, layout: &dyn LayoutProvider) -> Option<&str> {
        let probe = self.probe_point(layout);
        self.sections
            .iter()
            .find(|id| {
                layout
                    .element_rect(id)
                    .is_some_and(|rect| rect.contains(probe))
            })
            .map(String::as_str)
    }

    /// Re-read geometry and move the active section if needed
    pub fn update(&mut self, layout: &dyn LayoutProvider) -> Option<SectionChange> {
        let found = self.locate(layout)?;
        if self.active.as_deref() == Some(found) {
            return None;
        }

        let current = found.to_string();
        trace!(probe = self.probe_point(layout), section = %current, "Active section changed");
        let previous = self.active.replace(current.clone());
        Some(SectionChange { previous, current })
    }

    /// Scroll offset that puts the section just below the fixed header
    pub fn scroll_target(&self, id: &str, layout: &dyn LayoutProvider) -> Option<f64> {
        let rect = layout.element_rect(id)?;
        Some((rect.top - self.header_offset).max(0.0))
    }

    pub fn clear(&mut self) {
        self.sections.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::layout::StaticLayout;

    fn abc_layout() -> StaticLayout {
        StaticLayout::new(800.0)
            .with_element("A", 0.0, 100.0)
            .with_element("B", 100.0, 200.0)
            .with_element("C", 300.0, 200.0)
    }

    fn tracker() -> SectionTracker {
        let mut tracker = SectionTracker::new(100.0, 80.0);
        tracker.register(["A", "B", "C"]);
        tracker
    }

    #[test]
    fn test_probe_selects_containing_section() {
        let mut layout = abc_layout();
        let mut tracker = tracker();

        layout.scroll_to(50.0);
        let change = tracker.update(&layout).unwrap();
        assert_eq!(change.previous, None);
        assert_eq!(change.current, "B");

        layout.scroll_to(250.0);
        let change = tracker.update(&layout).unwrap();
        assert_eq!(change.previous.as_deref(), Some("B"));
        assert_eq!(tracker.active(), Some("C"));
    }

    #[test]
    fn test_no_match_keeps_previous() {
        let mut layout = abc_layout();
        let mut tracker = tracker();

        layout.scroll_to(250.0);
        tracker.update(&layout);
        assert_eq!(tracker.active(), Some("C"));

        layout.scroll_to(-200.0);
        assert_eq!(tracker.update(&layout), None);
        assert_eq!(tracker.active(), Some("C"));

        layout.scroll_to(10_000.0);
        assert_eq!(tracker.update(&layout), None);
        assert_eq!(tracker.active(), Some("C"));
    }

    #[test]
    fn test_boundary_belongs_to_next_section() {
        let mut layout = abc_layout();
        let mut tracker = tracker();
        layout.scroll_to(0.0);
        tracker.update(&layout);
        assert_eq!(tracker.active(), Some("B"));
    }

    #[test]
    fn test_first_registered_match_wins() {
        let layout = StaticLayout::new(800.0)
            .with_element("outer", 0.0, 1000.0)
            .with_element("inner", 100.0, 100.0);
        let mut tracker = SectionTracker::new(100.0, 80.0);
        tracker.register(["outer", "inner"]);
        tracker.update(&layout);
        assert_eq!(tracker.active(), Some("outer"));
    }

    #[test]
    fn test_geometry_is_reread_every_update() {
        let mut layout = abc_layout();
        let mut tracker = tracker();
        layout.scroll_to(50.0);
        tracker.update(&layout);
        assert_eq!(tracker.active(), Some("B"));

        // reflow: A grows and pushes B down
        layout.insert("A", 0.0, 400.0);
        layout.insert("B", 400.0, 200.0);
        tracker.update(&layout);
        assert_eq!(tracker.active(), Some("A"));
    }

    #[test]
    fn test_unmounted_sections_are_skipped() {
        let mut layout = abc_layout();
        layout.remove("B");
        layout.insert("C", 100.0, 0.0);
        let mut tracker = tracker();
        layout.scroll_to(50.0);
        assert_eq!(tracker.update(&layout), None);
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_scroll_target_subtracts_header() {
        let layout = abc_layout();
        let tracker = tracker();
        assert_eq!(tracker.scroll_target("C", &layout), Some(220.0));
        assert_eq!(tracker.scroll_target("A", &layout), Some(0.0));
        assert_eq!(tracker.scroll_target("missing", &layout), None);
    }

    #[test]
    fn test_reregister_drops_stale_active() {
        let mut layout = abc_layout();
        let mut tracker = tracker();
        layout.scroll_to(50.0);
        tracker.update(&layout);
        tracker.register(["A", "C"]);
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_initial_section_is_active_before_geometry() {
        let mut tracker = SectionTracker::new(100.0, 80.0).with_initial("home");
        assert_eq!(tracker.active(), None);

        tracker.register(["home", "about"]);
        assert_eq!(tracker.active(), Some("home"));
        assert_eq!(tracker.update(&StaticLayout::default()), None);
        assert_eq!(tracker.active(), Some("home"));

        let mut layout = StaticLayout::new(800.0)
            .with_element("home", 0.0, 600.0)
            .with_element("about", 600.0, 600.0);
        layout.scroll_to(700.0);
        assert_eq!(
            tracker.update(&layout),
            Some(SectionChange {
                previous: Some("home".to_string()),
                current: "about".to_string(),
            })
        );

        // not part of this page: nothing to seed
        tracker.register(["A", "B"]);
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_initial_section_from_config() {
        let mut tracker = SectionTracker::default();
        tracker.register(["home", "about"]);
        assert_eq!(tracker.active(), Some("home"));

        let config = ScrollConfig {
            initial_section: String::new(),
            ..Default::default()
        };
        let mut tracker = SectionTracker::from_config(&config);
        tracker.register(["home", "about"]);
        assert_eq!(tracker.active(), None);
    }
}
