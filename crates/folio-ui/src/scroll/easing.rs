//! Easing curves mapping tween progress in [0, 1] to eased progress in [0, 1]

pub use folio_core::EasingType;

/// Curve evaluation for [`EasingType`]
pub trait EasingTypeExt {
    /// Eased value for progress `t`; input is clamped to [0, 1]
    fn apply(&self, t: f64) -> f64;
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::QuadOut => power_out(t, 2),
            EasingType::Cubic => power_out(t, 3),
            EasingType::Quintic => power_out(t, 5),
            EasingType::EaseOut => expo_out(t),
        }
    }
}

/// 1 - (1-t)^n
#[inline]
fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

/// 1 - 2^(-10t), snapped to exactly 1 at the end
#[inline]
fn expo_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}
