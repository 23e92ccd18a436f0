use std::time::Duration;

use crate::foundation::core::{Point, Rgb8, Viewport};

/// How a star's opacity evolves over time.
///
/// Exactly one parameter set exists per star: a fixed opacity, or a twinkle timing pair.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StarAnimation {
    /// Constant opacity for the star's lifetime.
    Static {
        /// Opacity in `[0,1]`.
        opacity: f64,
    },
    /// Looping pulse between the configured minimum and maximum opacity.
    Twinkling {
        /// Offset from the scene epoch before the first cycle starts.
        phase_delay: Duration,
        /// Length of one full pulse.
        cycle: Duration,
    },
}

impl StarAnimation {
    /// Return `true` for [`StarAnimation::Twinkling`].
    pub fn is_twinkling(&self) -> bool {
        matches!(self, Self::Twinkling { .. })
    }
}

/// One star: a primary or a binary companion.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Star {
    /// Center in viewport-local logical pixels.
    pub position: Point,
    /// Diameter in logical pixels.
    pub diameter: f64,
    /// Index into the configured spectral class table.
    pub class: usize,
    /// Spectral class colour.
    pub color: Rgb8,
    /// Static opacity or twinkle timing.
    pub animation: StarAnimation,
    /// `true` for a binary companion emitted next to its primary.
    pub companion: bool,
}

/// One planet, drawn at a fixed opacity.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Planet {
    /// Center in viewport-local logical pixels.
    pub position: Point,
    /// Diameter in logical pixels.
    pub diameter: f64,
    /// Planet colour.
    pub color: Rgb8,
    /// Fixed opacity.
    pub opacity: f64,
    /// Diagnostic only, never drawn.
    pub label: String,
}

/// One complete generation pass. Replaced wholesale, never mutated.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Population {
    /// Viewport the population was generated for; `None` for the empty population.
    pub viewport: Option<Viewport>,
    /// Stars in generation order (a companion directly follows its primary).
    pub stars: Vec<Star>,
    /// Planets in definition order.
    pub planets: Vec<Planet>,
}

impl Population {
    /// Population with no stars, no planets, and no viewport.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty() && self.planets.is_empty()
    }

    /// Number of stars that are not companions.
    pub fn primary_count(&self) -> usize {
        self.stars.iter().filter(|s| !s.companion).count()
    }

    /// Number of binary companions.
    pub fn companion_count(&self) -> usize {
        self.stars.iter().filter(|s| s.companion).count()
    }

    /// Per-class counts of primary stars, indexed like the spectral class table.
    pub fn class_counts(&self, classes: usize) -> Vec<usize> {
        let mut counts = vec![0; classes];
        for s in self.stars.iter().filter(|s| !s.companion) {
            if let Some(c) = counts.get_mut(s.class) {
                *c += 1;
            }
        }
        counts
    }
}
