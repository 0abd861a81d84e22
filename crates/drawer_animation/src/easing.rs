//! Easing functions for settle animations

/// Easing function type
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseOutQuad,
    EaseOutCubic,
    /// Decelerating curve `1 - (1 - t)^(2 * factor)`.
    ///
    /// A factor of 1.0 is the classic quadratic deceleration; larger factors
    /// start faster and brake harder.
    Decelerate(f32),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Decelerate(1.0)
    }
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::Decelerate(factor) => {
                if *factor == 1.0 {
                    1.0 - (1.0 - t) * (1.0 - t)
                } else {
                    1.0 - (1.0 - t).powf(2.0 * factor)
                }
            }
        }
    }
}
