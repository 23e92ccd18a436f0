use crate::animation::ease::Ease;
use crate::foundation::core::Vec2;
use crate::foundation::error::{StarlitError, StarlitResult};

/// Linear interpolation between two values.
pub trait Lerp: Sized {
    /// Value at `t` between `a` (`t = 0`) and `b` (`t = 1`).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Visual state of a curve at some progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveState {
    /// Displacement from the element's start position, in logical pixels.
    pub translate: Vec2,
    /// Opacity in `[0,1]`.
    pub opacity: f64,
}

/// One keyframe.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    /// Normalized progress in `[0,1]`.
    pub offset: f64,
    /// State reached at `offset`.
    pub state: CurveState,
    /// Shapes opacity toward the next key. Translation always interpolates linearly.
    pub ease: Ease,
}

/// Named, host-agnostic keyframe curve.
///
/// Pure data: a declarative host applies it by name, a procedural host calls
/// [`MotionCurve::sample`] each frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionCurve {
    /// Stable name hosts look the curve up by.
    pub name: String,
    /// Keys sorted by offset.
    pub keys: Vec<CurveKey>,
}

impl MotionCurve {
    /// Require at least one key with sorted offsets inside `[0,1]`.
    pub fn validate(&self) -> StarlitResult<()> {
        if self.keys.is_empty() {
            return Err(StarlitError::validation(format!(
                "curve '{}' must have at least one key",
                self.name
            )));
        }
        if !self.keys.iter().all(|k| (0.0..=1.0).contains(&k.offset)) {
            return Err(StarlitError::validation(format!(
                "curve '{}' key offsets must be within [0,1]",
                self.name
            )));
        }
        if !self.keys.windows(2).all(|w| w[0].offset <= w[1].offset) {
            return Err(StarlitError::validation(format!(
                "curve '{}' keys must be sorted by offset",
                self.name
            )));
        }
        Ok(())
    }

    /// Evaluate the curve at `progress` (clamped into `[0,1]`).
    ///
    /// Before the first key the first state holds; past the last key the last state holds.
    /// Each segment's ease applies to opacity only, so motion keeps a constant velocity across
    /// keys.
    pub fn sample(&self, progress: f64) -> Option<CurveState> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        let p = progress.clamp(0.0, 1.0);

        let idx = self.keys.partition_point(|k| k.offset <= p);
        if idx == 0 {
            return Some(first.state);
        }
        if idx >= self.keys.len() {
            return Some(last.state);
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.offset - a.offset;
        if span <= 0.0 {
            return Some(a.state);
        }
        let t = (p - a.offset) / span;
        Some(CurveState {
            translate: <Vec2 as Lerp>::lerp(&a.state.translate, &b.state.translate, t),
            opacity: <f64 as Lerp>::lerp(&a.state.opacity, &b.state.opacity, a.ease.apply(t)),
        })
    }

    /// State at full progress.
    pub fn end_state(&self) -> Option<CurveState> {
        self.keys.last().map(|k| k.state)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
