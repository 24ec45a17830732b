//! Geometry supplied by the host layout engine

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Document-space box of a laid-out element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Half-open containment: `[top, top + height)`
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom()
    }

    /// Non-finite or zero-sized boxes are treated as not laid out
    pub fn is_laid_out(&self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height > 0.0
    }
}

/// Scroll position and element geometry, re-read on every tick
///
/// Returning `None` for an element means it is not mounted yet; callers treat
/// that as "not visible" and move on.
pub trait LayoutProvider {
    /// Current vertical scroll offset
    fn scroll_y(&self) -> f64;

    fn viewport_height(&self) -> f64;

    /// Offset of the element's top edge from the top of the document
    fn element_top(&self, id: &str) -> Option<f64>;

    fn element_height(&self, id: &str) -> Option<f64>;

    /// Both coordinates, or `None` when the element is missing or empty
    fn element_rect(&self, id: &str) -> Option<ElementRect> {
        let rect = ElementRect::new(self.element_top(id)?, self.element_height(id)?);
        rect.is_laid_out().then_some(rect)
    }
}

/// Fixed layout snapshot, used by the CLI and in tests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticLayout {
    #[serde(default)]
    pub scroll_y: f64,
    #[serde(default)]
    pub viewport_height: f64,
    #[serde(default)]
    pub elements: HashMap<String, ElementRect>,
}

impl StaticLayout {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Default::default()
        }
    }

    pub fn with_element(mut self, id: impl Into<String>, top: f64, height: f64) -> Self {
        self.insert(id, top, height);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, top: f64, height: f64) {
        self.elements.insert(id.into(), ElementRect::new(top, height));
    }

    pub fn remove(&mut self, id: &str) -> Option<ElementRect> {
        self.elements.remove(id)
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }
}

impl LayoutProvider for StaticLayout {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn element_top(&self, id: &str) -> Option<f64> {
        self.elements.get(id).map(|rect| rect.top)
    }

    fn element_height(&self, id: &str) -> Option<f64> {
        self.elements.get(id).map(|rect| rect.height)
    }
}
