//! Progress and interpolation helpers measured against an injected clock

use std::time::Duration;

/// Fraction of `duration` elapsed between `start` and `now`, clamped to [0, 1]
///
/// A zero duration is complete as soon as `now` reaches `start`.
#[inline]
pub fn progress(start: Duration, now: Duration, duration: Duration) -> f64 {
    if now < start {
        return 0.0;
    }
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now - start;
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Duration, now: Duration, duration: Duration) -> bool {
    start.checked_add(duration).map_or(false, |end| now >= end)
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Scale `duration` by `fraction` (clamped to [0, 1])
#[inline]
pub fn scale(duration: Duration, fraction: f64) -> Duration {
    duration.mul_f64(fraction.clamp(0.0, 1.0))
}
