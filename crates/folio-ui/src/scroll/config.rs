//! Scroll and animation settings, re-exported from folio-core with helpers

use std::time::Duration;

use folio_core::Result;

pub use folio_core::{AnimationConfig, ScrollConfig};

use super::animation::EntranceAnimation;
use super::marker::TriggerMarkers;

/// Helpers over [`ScrollConfig`]
pub trait ScrollConfigExt {
    /// Frame interval for hosts driving `on_frame` from a timer
    fn frame_duration(&self) -> Duration;

    /// Parsed default start/end markers
    fn markers(&self) -> Result<TriggerMarkers>;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn frame_duration(&self) -> Duration {
        if self.frame_rate == 0 {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(1000 / self.frame_rate as u64)
        }
    }

    fn markers(&self) -> Result<TriggerMarkers> {
        TriggerMarkers::parse(&self.start_marker, &self.end_marker)
    }
}

/// Helpers over [`AnimationConfig`]
pub trait AnimationConfigExt {
    fn animation_duration(&self) -> Duration;

    /// Entrance animation described by this config
    fn entrance(&self) -> EntranceAnimation;
}

impl AnimationConfigExt for AnimationConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    fn entrance(&self) -> EntranceAnimation {
        EntranceAnimation {
            duration: self.animation_duration(),
            delay: Duration::ZERO,
            easing: self.easing,
            from_opacity: self.from_opacity,
            from_offset_y: self.from_offset_y,
            from_offset_x: self.from_offset_x,
            from_scale: self.from_scale,
            reverse_on_leave_back: self.reverse_on_leave_back,
        }
    }
}
