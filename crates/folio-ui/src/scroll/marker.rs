//! Trigger boundaries written as `"<element edge> <viewport position>"`
//!
//! `"top 80%"` means: the element's top edge meets the line 80% of the way
//! down the viewport. The viewport side accepts `top`, `center`, `bottom`,
//! a percentage, or a pixel offset (`"120px"` or a bare number).

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use folio_core::{Error, Result};
use regex::Regex;

use super::layout::ElementRect;

/// Reference edge on the observed element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    /// Document y of this edge on `rect`
    pub fn position(&self, rect: &ElementRect) -> f64 {
        match self {
            Edge::Top => rect.top,
            Edge::Center => rect.top + rect.height / 2.0,
            Edge::Bottom => rect.bottom(),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Center => "center",
            Edge::Bottom => "bottom",
        }
    }
}

/// Distance of the trigger line below the top of the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportOffset {
    /// Fraction of the viewport height (0.8 for `80%`)
    Fraction(f64),
    Pixels(f64),
}

impl ViewportOffset {
    pub fn resolve(&self, viewport_height: f64) -> f64 {
        match self {
            ViewportOffset::Fraction(f) => viewport_height * f,
            ViewportOffset::Pixels(px) => *px,
        }
    }
}

/// One trigger boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub element_edge: Edge,
    pub viewport: ViewportOffset,
}

impl Marker {
    pub fn new(element_edge: Edge, viewport: ViewportOffset) -> Self {
        Self {
            element_edge,
            viewport,
        }
    }

    /// Document y of the viewport line at the given scroll offset
    pub fn line(&self, scroll_y: f64, viewport_height: f64) -> f64 {
        scroll_y + self.viewport.resolve(viewport_height)
    }

    /// Whether scrolling has carried the element edge up to (or past) the line
    pub fn is_reached(&self, rect: &ElementRect, scroll_y: f64, viewport_height: f64) -> bool {
        self.element_edge.position(rect) <= self.line(scroll_y, viewport_height)
    }
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^\s*(top|center|bottom)\s+(?:(top|center|bottom)|(-?\d+(?:\.\d+)?)(%|px)?)\s*$",
        )
        .expect("marker pattern is valid")
    })
}

impl FromStr for Marker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMarker(s.to_string());
        let lowered = s.to_ascii_lowercase();
        let caps = marker_pattern().captures(&lowered).ok_or_else(invalid)?;

        let element_edge = match &caps[1] {
            "top" => Edge::Top,
            "center" => Edge::Center,
            _ => Edge::Bottom,
        };

        let viewport = if let Some(keyword) = caps.get(2) {
            match keyword.as_str() {
                "top" => ViewportOffset::Fraction(0.0),
                "center" => ViewportOffset::Fraction(0.5),
                _ => ViewportOffset::Fraction(1.0),
            }
        } else {
            let value: f64 = caps[3].parse().map_err(|_| invalid())?;
            match caps.get(4).map(|unit| unit.as_str()) {
                Some("%") => ViewportOffset::Fraction(value / 100.0),
                _ => ViewportOffset::Pixels(value),
            }
        };

        Ok(Marker::new(element_edge, viewport))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.viewport {
            ViewportOffset::Fraction(frac) => {
                write!(f, "{} {}%", self.element_edge.as_str(), tidy(frac * 100.0))
            }
            ViewportOffset::Pixels(px) => {
                write!(f, "{} {}px", self.element_edge.as_str(), tidy(px))
            }
        }
    }
}

/// Drop float noise such as `56.99999999999999` left by the fraction round trip
fn tidy(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Start and end boundaries for a viewport trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerMarkers {
    /// Crossing this forward plays the entrance, crossing back reverses it
    pub start: Marker,
    /// Bounds the trigger's active range
    pub end: Marker,
}

impl Default for TriggerMarkers {
    /// `top 80%` / `bottom 20%`
    fn default() -> Self {
        Self {
            start: Marker::new(Edge::Top, ViewportOffset::Fraction(0.8)),
            end: Marker::new(Edge::Bottom, ViewportOffset::Fraction(0.2)),
        }
    }
}

impl TriggerMarkers {
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}
