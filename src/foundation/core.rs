use std::time::Duration;

use rand::Rng;

use crate::foundation::error::{StarlitError, StarlitResult};

pub use kurbo::{Point, Vec2};

/// Logical viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport; both dimensions must be finite and `> 0`.
    pub fn new(width: f64, height: f64) -> StarlitResult<Self> {
        let vp = Self { width, height };
        vp.validate()?;
        Ok(vp)
    }

    /// Return `true` when both dimensions are finite and strictly positive.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Reject zero, negative, or non-finite dimensions.
    pub fn validate(self) -> StarlitResult<()> {
        if !self.is_valid() {
            return Err(StarlitError::geometry(format!(
                "viewport must be finite and positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Length of the viewport diagonal.
    pub fn diagonal(self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Return `true` when `p` lies inside `[0,width] x [0,height]`.
    pub fn contains(self, p: Point) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Clamp `p` into `[0,width] x [0,height]`.
    pub fn clamp(self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }
}

/// Straight (non-premultiplied) RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an opacity in `[0,1]` (clamped) as an 8-bit alpha.
    pub fn with_opacity(self, opacity: f64) -> Rgba8 {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// Straight (non-premultiplied) RGBA8 color as handed to drawing surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Straight alpha.
    pub a: u8,
}

/// Closed real interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Range64 {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl Range64 {
    /// Build `[min, max]` without validation.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Require finite bounds with `min <= max`; `what` names the field in errors.
    pub fn validate(self, what: &str) -> StarlitResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(StarlitError::validation(format!(
                "{what} bounds must be finite"
            )));
        }
        if self.min > self.max {
            return Err(StarlitError::validation(format!(
                "{what} min must be <= max ({} > {})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Return `true` when `v` lies in `[min, max]`.
    pub fn contains(self, v: f64) -> bool {
        (self.min..=self.max).contains(&v)
    }

    /// Uniform draw in `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        if self.min == self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// Closed millisecond interval used for timer cadences and meteor durations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MillisRange {
    /// Shortest interval in milliseconds.
    pub min: u64,
    /// Longest interval in milliseconds.
    pub max: u64,
}

impl MillisRange {
    /// Build `[min, max]` milliseconds without validation.
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Require `min <= max`.
    pub fn validate(self, what: &str) -> StarlitResult<()> {
        if self.min > self.max {
            return Err(StarlitError::validation(format!(
                "{what} min must be <= max ({} > {})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Uniform whole-millisecond draw in `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.random_range(self.min..=self.max))
    }
}

/// Closed count interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CountRange {
    /// Smallest count.
    pub min: usize,
    /// Largest count.
    pub max: usize,
}

impl CountRange {
    /// Build `[min, max]` without validation.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Require `min <= max`.
    pub fn validate(self, what: &str) -> StarlitResult<()> {
        if self.min > self.max {
            return Err(StarlitError::validation(format!(
                "{what} min must be <= max ({} > {})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Uniform draw in `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> usize {
        rng.random_range(self.min..=self.max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
