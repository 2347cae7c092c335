use serde::{Deserialize, Serialize};

/// Easing curves for element transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Quadratic, starting slow.
    InQuad,
    /// Quadratic, ending slow.
    OutQuad,
    /// Quadratic, slow at both ends.
    InOutQuad,
    /// Cubic, starting slow.
    InCubic,
    /// Cubic, ending slow.
    OutCubic,
    /// Cubic, slow at both ends. Used for every step transition by default.
    #[default]
    InOutCubic,
}

impl Ease {
    /// Eased progress for normalized time `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
