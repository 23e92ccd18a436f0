/// Easing curves applied to normalized progress `t` in `[0,1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// `t`.
    #[default]
    Linear,
    /// `t^2`.
    InQuad,
    /// `1 - (1 - t)^2`.
    OutQuad,
    /// Quadratic in, quadratic out.
    InOutQuad,
    /// `(1 - cos(pi * t)) / 2`.
    InOutSine,
}

impl Ease {
    /// Map `t` (clamped into `[0,1]`) through the curve.
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
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InOutSine => (1.0 - (std::f64::consts::PI * t).cos()) / 2.0,
        }
    }
}

/// Symmetric pulse over one cycle: 0 at `t = 0` and `t = 1`, 1 at `t = 0.5`.
///
/// Folds `t` into a triangle wave and applies [`Ease::InOutSine`] to it, which equals
/// `(1 - cos(2 pi t)) / 2`. The derivative is zero at both ends so looping cycles join smoothly.
pub fn pulse(t: f64) -> f64 {
    let folded = 1.0 - (2.0 * t.clamp(0.0, 1.0) - 1.0).abs();
    Ease::InOutSine.apply(folded)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
