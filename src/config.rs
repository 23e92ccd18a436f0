//! Immutable scene configuration.
//!
//! A [`SceneConfig`] is built once (defaults, JSON, or by hand in tests), validated, and passed by
//! reference into every component constructor. Every section carries `#[serde(default)]` so a JSON
//! file only needs the fields it overrides.

use std::path::Path;

use anyhow::Context as _;

use crate::animation::ease::Ease;
use crate::foundation::core::{CountRange, MillisRange, Range64, Rgb8};
use crate::foundation::error::{StarlitError, StarlitResult};

/// Coarse device class supplied by the host; only selects the star count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceTier {
    /// Low-power or small-screen device.
    Reduced,
    /// Everything else.
    #[default]
    Full,
}

/// Top-level scene configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for deterministic runs; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Device class selecting the star count.
    pub device_tier: DeviceTier,
    /// Star and planet field.
    pub field: FieldConfig,
    /// Twinkle opacity range and timing.
    pub twinkle: TwinkleConfig,
    /// Meteor trajectories and cadences.
    pub meteors: MeteorConfig,
}

impl SceneConfig {
    /// Parse and validate a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> StarlitResult<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| StarlitError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a JSON config file and parse it with [`SceneConfig::from_json_str`].
    pub fn from_json_path(path: &Path) -> StarlitResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Star count for the configured device tier.
    pub fn star_count(&self) -> usize {
        match self.device_tier {
            DeviceTier::Reduced => self.field.star_count_reduced,
            DeviceTier::Full => self.field.star_count_full,
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> StarlitResult<()> {
        self.field.validate()?;
        self.twinkle.validate()?;
        self.meteors.validate()
    }
}

/// One spectral colour class: rarity weight plus base colour.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpectralClass {
    /// Class label, e.g. `"yellow"`.
    pub name: String,
    /// Relative frequency; weights need not sum to exactly 1.
    pub weight: f64,
    /// Base star colour.
    pub color: Rgb8,
}

/// One planet definition; planets are placed in definition order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlanetDef {
    /// Display name.
    pub label: String,
    /// Diameter in logical pixels.
    pub diameter: f64,
    /// Planet colour.
    pub color: Rgb8,
    /// Fixed opacity in `[0,1]`.
    pub opacity: f64,
}

/// Star and planet field generation parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Primary star count on [`DeviceTier::Full`].
    pub star_count_full: usize,
    /// Primary star count on [`DeviceTier::Reduced`].
    pub star_count_reduced: usize,
    /// Star diameter in logical pixels.
    pub star_diameter: Range64,
    /// Probability that a star is static rather than twinkling.
    pub static_fraction: f64,
    /// Opacity range for static stars.
    pub static_opacity: Range64,
    /// Exponent for the vertical biased-uniform draw; `> 1` favours the top.
    pub y_bias_exponent: f64,
    /// Colour classes in sampling order.
    pub spectral_classes: Vec<SpectralClass>,
    /// Probability that a primary gets a companion.
    pub binary_probability: f64,
    /// Companion separation from its primary in logical pixels.
    pub binary_separation: Range64,
    /// Companion diameter as a fraction of the primary's.
    pub companion_scale: Range64,
    /// Planet definitions in placement order.
    pub planets: Vec<PlanetDef>,
    /// Fraction of the height (from the top) holding planet base positions.
    pub planet_band: f64,
    /// Total jitter span as a fraction of the respective dimension, centered on zero.
    pub planet_jitter: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            star_count_full: 1200,
            star_count_reduced: 600,
            star_diameter: Range64::new(0.6, 1.8),
            static_fraction: 0.3,
            static_opacity: Range64::new(0.35, 0.85),
            y_bias_exponent: 1.5,
            spectral_classes: default_spectral_classes(),
            binary_probability: 0.025,
            binary_separation: Range64::new(3.0, 8.0),
            companion_scale: Range64::new(0.6, 0.9),
            planets: default_planets(),
            planet_band: 0.6,
            planet_jitter: 0.15,
        }
    }
}

fn default_spectral_classes() -> Vec<SpectralClass> {
    let class = |name: &str, weight: f64, color: Rgb8| SpectralClass {
        name: name.to_string(),
        weight,
        color,
    };
    vec![
        class("blue", 0.04, Rgb8::new(155, 176, 255)),
        class("white", 0.16, Rgb8::new(240, 244, 255)),
        class("yellow_white", 0.35, Rgb8::new(255, 246, 230)),
        class("yellow", 0.28, Rgb8::new(255, 224, 176)),
        class("orange", 0.17, Rgb8::new(255, 190, 140)),
    ]
}

fn default_planets() -> Vec<PlanetDef> {
    let planet = |label: &str, diameter: f64, color: Rgb8, opacity: f64| PlanetDef {
        label: label.to_string(),
        diameter,
        color,
        opacity,
    };
    vec![
        planet("mercury", 2.4, Rgb8::new(200, 190, 180), 0.75),
        planet("venus", 4.0, Rgb8::new(255, 250, 225), 0.95),
        planet("mars", 3.0, Rgb8::new(230, 120, 80), 0.85),
        planet("jupiter", 4.6, Rgb8::new(245, 225, 190), 0.9),
        planet("saturn", 3.8, Rgb8::new(235, 215, 160), 0.85),
    ]
}

impl FieldConfig {
    /// Check ranges, probabilities, and the class and planet lists.
    pub fn validate(&self) -> StarlitResult<()> {
        self.star_diameter.validate("field.star_diameter")?;
        if self.star_diameter.min <= 0.0 {
            return Err(StarlitError::validation("field.star_diameter must be > 0"));
        }
        self.static_opacity.validate("field.static_opacity")?;
        self.binary_separation.validate("field.binary_separation")?;
        self.companion_scale.validate("field.companion_scale")?;
        validate_unit("field.static_fraction", self.static_fraction)?;
        validate_unit("field.binary_probability", self.binary_probability)?;
        validate_unit("field.planet_band", self.planet_band)?;
        validate_unit("field.planet_jitter", self.planet_jitter)?;
        if !(self.y_bias_exponent.is_finite() && self.y_bias_exponent > 0.0) {
            return Err(StarlitError::validation(
                "field.y_bias_exponent must be finite and > 0",
            ));
        }
        if self.spectral_classes.is_empty() {
            return Err(StarlitError::validation(
                "field.spectral_classes must not be empty",
            ));
        }
        if self
            .spectral_classes
            .iter()
            .any(|c| !(c.weight.is_finite() && c.weight >= 0.0))
        {
            return Err(StarlitError::validation(
                "field.spectral_classes weights must be finite and >= 0",
            ));
        }
        if self.planets.is_empty() {
            return Err(StarlitError::validation("field.planets must not be empty"));
        }
        for p in &self.planets {
            validate_unit("field.planets[].opacity", p.opacity)?;
            if !(p.diameter.is_finite() && p.diameter > 0.0) {
                return Err(StarlitError::validation(format!(
                    "planet '{}' diameter must be > 0",
                    p.label
                )));
            }
        }
        Ok(())
    }
}

/// Twinkle pulse parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TwinkleConfig {
    /// Opacity at the start and end of each cycle.
    pub min_opacity: f64,
    /// Opacity at mid-cycle.
    pub max_opacity: f64,
    /// Per-star phase delay in seconds.
    pub phase_delay_secs: Range64,
    /// Per-star cycle duration in seconds.
    pub cycle_secs: Range64,
}

impl Default for TwinkleConfig {
    fn default() -> Self {
        Self {
            min_opacity: 0.2,
            max_opacity: 1.0,
            phase_delay_secs: Range64::new(0.0, 5.0),
            cycle_secs: Range64::new(2.0, 6.0),
        }
    }
}

impl TwinkleConfig {
    /// Require `0 <= min <= max <= 1` and positive cycles.
    pub fn validate(&self) -> StarlitResult<()> {
        validate_unit("twinkle.min_opacity", self.min_opacity)?;
        validate_unit("twinkle.max_opacity", self.max_opacity)?;
        if self.min_opacity > self.max_opacity {
            return Err(StarlitError::validation(
                "twinkle.min_opacity must be <= twinkle.max_opacity",
            ));
        }
        self.phase_delay_secs.validate("twinkle.phase_delay_secs")?;
        self.cycle_secs.validate("twinkle.cycle_secs")?;
        if self.phase_delay_secs.min < 0.0 {
            return Err(StarlitError::validation(
                "twinkle.phase_delay_secs must be >= 0",
            ));
        }
        if self.cycle_secs.min <= 0.0 {
            return Err(StarlitError::validation("twinkle.cycle_secs must be > 0"));
        }
        Ok(())
    }
}

/// Meteor trajectory, curve, and cadence parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeteorConfig {
    /// Discrete heading set in degrees, in tie-break order.
    pub angles_deg: Vec<u16>,
    /// Pixel offset between the short/nominal/long distance tiers.
    pub tier_offset: f64,
    /// Start x as a percentage of the viewport width; `> 100` is off-screen right.
    pub start_x_pct: Range64,
    /// Start x below this percentage counts as on-screen.
    pub onscreen_edge_pct: f64,
    /// Start y range (percent of height) for on-screen starts.
    pub start_y_onscreen_pct: Range64,
    /// Start y range (percent of height) for off-screen starts.
    pub start_y_offscreen_pct: Range64,
    /// Per-meteor animation duration.
    pub duration_ms: MillisRange,
    /// Ease applied to the fade segments of every curve.
    pub ease: Ease,
    /// Progress at which fade-in completes.
    pub fade_in_end: f64,
    /// Progress at which fade-out begins.
    pub fade_out_start: f64,
    /// Steady-stream cadence.
    pub stream: StreamConfig,
    /// Shower cadence.
    pub shower: ShowerConfig,
}

impl Default for MeteorConfig {
    fn default() -> Self {
        Self {
            angles_deg: vec![130, 135, 140, 145, 150, 155, 160, 165],
            tier_offset: 25.0,
            start_x_pct: Range64::new(90.0, 120.0),
            onscreen_edge_pct: 100.0,
            start_y_onscreen_pct: Range64::new(-40.0, 50.0),
            start_y_offscreen_pct: Range64::new(-10.0, 50.0),
            duration_ms: MillisRange::new(1200, 2400),
            ease: Ease::Linear,
            fade_in_end: 0.05,
            fade_out_start: 0.95,
            stream: StreamConfig::default(),
            shower: ShowerConfig::default(),
        }
    }
}

impl MeteorConfig {
    /// Check headings, start ranges, durations, fades, and both cadences.
    pub fn validate(&self) -> StarlitResult<()> {
        if self.angles_deg.is_empty() {
            return Err(StarlitError::validation(
                "meteors.angles_deg must not be empty",
            ));
        }
        if !(self.tier_offset.is_finite() && self.tier_offset >= 0.0) {
            return Err(StarlitError::validation(
                "meteors.tier_offset must be finite and >= 0",
            ));
        }
        self.start_x_pct.validate("meteors.start_x_pct")?;
        self.start_y_onscreen_pct
            .validate("meteors.start_y_onscreen_pct")?;
        self.start_y_offscreen_pct
            .validate("meteors.start_y_offscreen_pct")?;
        self.duration_ms.validate("meteors.duration_ms")?;
        if self.duration_ms.min == 0 {
            return Err(StarlitError::validation("meteors.duration_ms must be > 0"));
        }
        validate_unit("meteors.fade_in_end", self.fade_in_end)?;
        validate_unit("meteors.fade_out_start", self.fade_out_start)?;
        if self.fade_in_end > self.fade_out_start {
            return Err(StarlitError::validation(
                "meteors.fade_in_end must be <= meteors.fade_out_start",
            ));
        }
        self.stream.validate()?;
        self.shower.validate()
    }
}

/// Steady-stream cadence: `lanes` independent timers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Number of independent stream timers.
    pub lanes: usize,
    /// Wait before each stream meteor.
    pub interval_ms: MillisRange,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            lanes: 2,
            interval_ms: MillisRange::new(3000, 9000),
        }
    }
}

impl StreamConfig {
    /// Require a non-zero interval when any lane is configured.
    pub fn validate(&self) -> StarlitResult<()> {
        self.interval_ms.validate("meteors.stream.interval_ms")?;
        if self.lanes > 0 && self.interval_ms.min == 0 {
            return Err(StarlitError::validation(
                "meteors.stream.interval_ms must be > 0",
            ));
        }
        Ok(())
    }
}

/// Periodic burst cadence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShowerConfig {
    /// Whether showers run at all.
    pub enabled: bool,
    /// Wait before each shower.
    pub interval_ms: MillisRange,
    /// Meteors per shower.
    pub count: CountRange,
    /// Gap between consecutive shower meteors.
    pub stagger_ms: MillisRange,
    /// Wait after the last staggered meteor before the shower counts as finished.
    pub grace_ms: u64,
    /// Shared seed heading range in degrees.
    pub seed_deg: Range64,
    /// Per-meteor heading jitter (+/-) applied before snapping.
    pub angle_jitter_deg: f64,
}

impl Default for ShowerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: MillisRange::new(20_000, 45_000),
            count: CountRange::new(4, 9),
            stagger_ms: MillisRange::new(120, 450),
            grace_ms: 2500,
            seed_deg: Range64::new(130.0, 160.0),
            angle_jitter_deg: 5.0,
        }
    }
}

impl ShowerConfig {
    /// Check ranges and jitter.
    pub fn validate(&self) -> StarlitResult<()> {
        self.interval_ms.validate("meteors.shower.interval_ms")?;
        self.count.validate("meteors.shower.count")?;
        self.stagger_ms.validate("meteors.shower.stagger_ms")?;
        self.seed_deg.validate("meteors.shower.seed_deg")?;
        if self.enabled && self.interval_ms.min == 0 {
            return Err(StarlitError::validation(
                "meteors.shower.interval_ms must be > 0",
            ));
        }
        if !(self.angle_jitter_deg.is_finite() && self.angle_jitter_deg >= 0.0) {
            return Err(StarlitError::validation(
                "meteors.shower.angle_jitter_deg must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

fn validate_unit(what: &str, v: f64) -> StarlitResult<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(StarlitError::validation(format!(
            "{what} must be within [0,1], got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
