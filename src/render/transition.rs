use serde::{Deserialize, Serialize};

/// Easing curve applied to linear transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    QuadInOut,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map `t` in `[0, 1]` onto the curve. Input outside the interval is clamped.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Easing::Linear => "Linear",
            Easing::QuadInOut => "Quadratic",
            Easing::CubicInOut => "Cubic",
        }
    }
}

/// A timed interpolation driven by an external clock in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub started_at: f64,
    pub duration: f64,
    pub easing: Easing,
}

impl Transition {
    pub fn new(started_at: f64, duration: f64, easing: Easing) -> Self {
        Self { started_at, duration, easing }
    }

    /// Eased progress in `[0, 1]` at time `now`.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.easing.apply((now - self.started_at) / self.duration)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.started_at >= self.duration
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
