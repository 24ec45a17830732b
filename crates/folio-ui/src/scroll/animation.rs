//! Entrance tween playback
//!
//! A tween moves a progress value between 0 (hidden, the animation's "from"
//! state) and 1 (fully shown). Playing and reversing start from wherever the
//! tween currently is, so a reverse halfway through an entrance takes half
//! the time.

use std::time::Duration;

use super::config::AnimationConfigExt;
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp, progress, scale};

/// How an observed element enters the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct EntranceAnimation {
    /// Time for a full 0 -> 1 entrance
    pub duration: Duration,
    /// Wait before the entrance starts (for staggered lists)
    pub delay: Duration,
    pub easing: EasingType,
    pub from_opacity: f64,
    pub from_offset_y: f64,
    /// Negative slides in from the left
    pub from_offset_x: f64,
    pub from_scale: f64,
    /// false makes the entrance a one-shot latch
    pub reverse_on_leave_back: bool,
}

impl Default for EntranceAnimation {
    fn default() -> Self {
        folio_core::AnimationConfig::default().entrance()
    }
}

impl EntranceAnimation {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Stagger the n-th item of a list by `step`, saturating on huge lists
    pub fn staggered(self, index: usize, step: Duration) -> Self {
        let factor = u32::try_from(index).unwrap_or(u32::MAX);
        self.with_delay(step.saturating_mul(factor))
    }

    /// Slide in horizontally from `offset_x`
    pub fn from_x(mut self, offset_x: f64) -> Self {
        self.from_offset_x = offset_x;
        self
    }

    /// Grow (or shrink) in from `scale`
    pub fn from_scale(mut self, scale: f64) -> Self {
        self.from_scale = scale;
        self
    }

    /// Visual properties at the given progress
    pub fn state_at(&self, progress: f64) -> VisualState {
        let p = progress.clamp(0.0, 1.0);
        VisualState {
            opacity: lerp(self.from_opacity, 1.0, p),
            offset_y: lerp(self.from_offset_y, 0.0, p),
            offset_x: lerp(self.from_offset_x, 0.0, p),
            scale: lerp(self.from_scale, 1.0, p),
        }
    }
}

/// Interpolated properties the host applies to an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub opacity: f64,
    pub offset_y: f64,
    pub offset_x: f64,
    pub scale: f64,
}

impl VisualState {
    pub const SHOWN: VisualState = VisualState {
        opacity: 1.0,
        offset_y: 0.0,
        offset_x: 0.0,
        scale: 1.0,
    };
}

#[derive(Debug, Clone)]
struct Segment {
    /// Includes any delay
    start: Duration,
    duration: Duration,
    from: f64,
    to: f64,
    easing: EasingType,
}

/// Progress of one element's entrance over time
#[derive(Debug, Clone)]
pub struct Tween {
    segment: Option<Segment>,
    /// Progress when no segment is running
    resting: f64,
}

impl Default for Tween {
    fn default() -> Self {
        Self::hidden()
    }
}

impl Tween {
    /// At rest in the "from" state
    pub fn hidden() -> Self {
        Self {
            segment: None,
            resting: 0.0,
        }
    }

    /// Progress in [0, 1] at time `now`
    pub fn progress(&self, now: Duration) -> f64 {
        match &self.segment {
            Some(seg) => {
                let t = progress(seg.start, now, seg.duration);
                lerp(seg.from, seg.to, seg.easing.apply(t))
            }
            None => self.resting,
        }
    }

    /// Whether a segment is still moving at `now` (a pending delay counts)
    pub fn is_running(&self, now: Duration) -> bool {
        self.segment
            .as_ref()
            .is_some_and(|seg| !is_complete(seg.start, now, seg.duration))
    }

    /// Play towards fully shown, honouring the animation's delay
    pub fn play(&mut self, now: Duration, animation: &EntranceAnimation) {
        self.animate_to(1.0, now, animation, animation.delay);
    }

    /// Play back towards hidden, starting immediately
    pub fn reverse(&mut self, now: Duration, animation: &EntranceAnimation) {
        self.animate_to(0.0, now, animation, Duration::ZERO);
    }

    /// Drop a finished segment, keeping its end value
    pub fn settle(&mut self, now: Duration) {
        if let Some(seg) = &self.segment {
            if is_complete(seg.start, now, seg.duration) {
                self.resting = seg.to;
                self.segment = None;
            }
        }
    }

    /// Freeze wherever the tween is right now
    pub fn cancel(&mut self, now: Duration) {
        self.resting = self.progress(now);
        self.segment = None;
    }

    fn animate_to(&mut self, target: f64, now: Duration, animation: &EntranceAnimation, delay: Duration) {
        let from = self.progress(now);
        let distance = (target - from).abs();
        if distance == 0.0 {
            self.segment = None;
            self.resting = target;
            return;
        }

        self.segment = Some(Segment {
            start: now.saturating_add(delay),
            duration: scale(animation.duration, distance),
            from,
            to: target,
            easing: animation.easing,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn linear(duration_ms: u64) -> EntranceAnimation {
        EntranceAnimation {
            duration: ms(duration_ms),
            easing: EasingType::Linear,
            ..Default::default()
        }
    }

    #[test]
    fn test_play_runs_to_shown() {
        let animation = linear(100);
        let mut tween = Tween::hidden();
        tween.play(ms(0), &animation);

        assert!(tween.is_running(ms(50)));
        assert!((tween.progress(ms(50)) - 0.5).abs() < 1e-9);
        assert_eq!(tween.progress(ms(100)), 1.0);
        assert!(!tween.is_running(ms(100)));

        tween.settle(ms(100));
        assert_eq!(tween.progress(ms(5000)), 1.0);
    }

    #[test]
    fn test_reverse_midway_takes_proportional_time() {
        let animation = linear(100);
        let mut tween = Tween::hidden();
        tween.play(ms(0), &animation);
        tween.reverse(ms(40), &animation);

        assert!((tween.progress(ms(40)) - 0.4).abs() < 1e-9);
        assert!((tween.progress(ms(60)) - 0.2).abs() < 1e-9);
        assert_eq!(tween.progress(ms(80)), 0.0);
        assert!(!tween.is_running(ms(80)));
    }

    #[test]
    fn test_delay_holds_the_from_state() {
        let animation = linear(100).with_delay(ms(60));
        let mut tween = Tween::hidden();
        tween.play(ms(0), &animation);

        assert!(tween.is_running(ms(30)));
        assert_eq!(tween.progress(ms(30)), 0.0);
        assert!((tween.progress(ms(110)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_freezes_progress() {
        let animation = linear(100);
        let mut tween = Tween::hidden();
        tween.play(ms(0), &animation);
        tween.cancel(ms(25));

        assert!(!tween.is_running(ms(25)));
        assert!((tween.progress(ms(999)) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_state_at_interpolates_from_state() {
        let animation = EntranceAnimation {
            from_opacity: 0.0,
            from_offset_y: 30.0,
            ..Default::default()
        };
        assert_eq!(
            animation.state_at(0.0),
            VisualState {
                opacity: 0.0,
                offset_y: 30.0,
                offset_x: 0.0,
                scale: 1.0,
            }
        );
        assert_eq!(animation.state_at(1.0), VisualState::SHOWN);
        assert_eq!(animation.state_at(0.5).offset_y, 15.0);
    }

    #[test]
    fn test_state_at_slides_and_scales() {
        let animation = EntranceAnimation {
            from_offset_y: 0.0,
            ..Default::default()
        }
        .from_x(-50.0)
        .from_scale(0.9);

        let start = animation.state_at(0.0);
        assert_eq!(start.offset_x, -50.0);
        assert_eq!(start.scale, 0.9);

        let half = animation.state_at(0.5);
        assert_eq!(half.offset_x, -25.0);
        assert!((half.scale - 0.95).abs() < 1e-12);
        assert_eq!(half.offset_y, 0.0);

        assert_eq!(animation.state_at(1.0), VisualState::SHOWN);
    }

    #[test]
    fn test_stagger() {
        let animation = EntranceAnimation::default().staggered(3, ms(60));
        assert_eq!(animation.delay, ms(180));
    }

    #[test]
    fn test_stagger_saturates() {
        let step = Duration::from_secs(u64::MAX / 2);
        let animation = EntranceAnimation::default().staggered(usize::MAX, step);
        assert_eq!(animation.delay, Duration::MAX);
    }

    #[test]
    fn test_alternating_slide_list() {
        // even rows come in from the left, odd rows from the right, 50ms apart
        let rows: Vec<EntranceAnimation> = (0..4)
            .map(|index| {
                linear(100)
                    .from_x(if index % 2 == 0 { -30.0 } else { 30.0 })
                    .staggered(index, ms(50))
            })
            .collect();

        let mut tweens: Vec<Tween> = rows.iter().map(|_| Tween::hidden()).collect();
        for (tween, row) in tweens.iter_mut().zip(&rows) {
            tween.play(ms(0), row);
        }

        let at = |i: usize, t: u64| rows[i].state_at(tweens[i].progress(ms(t)));
        assert_eq!(at(0, 0).offset_x, -30.0);
        assert_eq!(at(1, 0).offset_x, 30.0);

        // row 0 halfway, row 1 untouched until its delay elapses
        assert_eq!(at(0, 50).offset_x, -15.0);
        assert_eq!(at(1, 50).offset_x, 30.0);
        assert_eq!(at(1, 100).offset_x, 15.0);
        assert_eq!(at(3, 150).offset_x, 30.0);

        assert_eq!(at(3, 250), VisualState::SHOWN);
        assert_eq!(at(2, 250), VisualState::SHOWN);
    }
}
