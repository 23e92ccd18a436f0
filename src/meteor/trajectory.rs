use rand::Rng;

use crate::config::MeteorConfig;
use crate::foundation::core::{Point, Range64, Vec2};
use crate::foundation::error::{StarlitError, StarlitResult};

/// Travel-distance variation around the viewport diagonal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DistanceTier {
    /// Diagonal minus the tier offset.
    Short,
    /// Exactly the diagonal.
    Nominal,
    /// Diagonal plus the tier offset.
    Long,
}

impl DistanceTier {
    /// Every tier, shortest first.
    pub const ALL: [Self; 3] = [Self::Short, Self::Nominal, Self::Long];

    /// Lowercase name used in curve names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Nominal => "nominal",
            Self::Long => "long",
        }
    }

    /// Travel distance for this tier; the short tier never goes negative.
    pub fn distance(self, diagonal: f64, offset: f64) -> f64 {
        match self {
            Self::Short => (diagonal - offset).max(0.0),
            Self::Nominal => diagonal,
            Self::Long => diagonal + offset,
        }
    }

    /// Uniform pick among the three tiers.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Displacement for a heading in degrees (screen space, +y down) and a travel distance.
pub fn displacement(angle_deg: f64, distance: f64) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos() * distance, rad.sin() * distance)
}

/// One `(angle, tier)` entry of the trajectory table.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MeteorTrajectory {
    /// Heading in degrees; screen space, +y down.
    pub angle_deg: u16,
    /// Distance tier.
    pub tier: DistanceTier,
    /// Travel distance in logical pixels.
    pub distance: f64,
    /// Total translation over the meteor's lifetime.
    pub displacement: Vec2,
}

/// Every `(angle, tier)` trajectory for one viewport diagonal.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TrajectoryTable {
    /// Viewport diagonal the table was computed for.
    pub diagonal: f64,
    /// Angle-major, tiers in [`DistanceTier::ALL`] order.
    pub entries: Vec<MeteorTrajectory>,
}

impl TrajectoryTable {
    /// Table with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `(angle_deg, tier)`, if the heading is in the table.
    pub fn get(&self, angle_deg: u16, tier: DistanceTier) -> Option<&MeteorTrajectory> {
        self.entries
            .iter()
            .find(|t| t.angle_deg == angle_deg && t.tier == tier)
    }
}

/// Meteor start position as percentages of the viewport; may lie outside `[0,100]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StartPosition {
    /// Horizontal position in percent of the width.
    pub x_pct: f64,
    /// Vertical position in percent of the height.
    pub y_pct: f64,
}

impl StartPosition {
    /// Resolve against a concrete viewport size in logical pixels.
    pub fn to_point(self, width: f64, height: f64) -> Point {
        Point::new(self.x_pct / 100.0 * width, self.y_pct / 100.0 * height)
    }
}

/// Heading selection, start placement, and displacement math for meteors.
#[derive(Clone, Debug)]
pub struct MeteorTrajectoryEngine {
    angles: Vec<u16>,
    tier_offset: f64,
    start_x: Range64,
    onscreen_edge: f64,
    start_y_onscreen: Range64,
    start_y_offscreen: Range64,
    shower_seed: Range64,
    shower_jitter: f64,
}

impl MeteorTrajectoryEngine {
    /// Engine for the configured headings and ranges.
    ///
    /// An empty heading set falls back to the default headings with a warning.
    pub fn new(config: &MeteorConfig) -> Self {
        let angles = if config.angles_deg.is_empty() {
            tracing::warn!("empty heading set; using the default headings");
            MeteorConfig::default().angles_deg
        } else {
            config.angles_deg.clone()
        };
        Self {
            angles,
            tier_offset: config.tier_offset,
            start_x: config.start_x_pct,
            onscreen_edge: config.onscreen_edge_pct,
            start_y_onscreen: config.start_y_onscreen_pct,
            start_y_offscreen: config.start_y_offscreen_pct,
            shower_seed: config.shower.seed_deg,
            shower_jitter: config.shower.angle_jitter_deg,
        }
    }

    /// Heading set in tie-break order.
    pub fn angles(&self) -> &[u16] {
        &self.angles
    }

    /// Displacement for one `(angle, tier)` pair; `diagonal` must be finite and positive.
    pub fn trajectory(
        &self,
        diagonal: f64,
        angle_deg: u16,
        tier: DistanceTier,
    ) -> StarlitResult<MeteorTrajectory> {
        validate_diagonal(diagonal)?;
        let distance = tier.distance(diagonal, self.tier_offset);
        Ok(MeteorTrajectory {
            angle_deg,
            tier,
            distance,
            displacement: displacement(f64::from(angle_deg), distance),
        })
    }

    /// Compute the whole angle x tier table for `diagonal` in one pass.
    #[tracing::instrument(skip(self))]
    pub fn table(&self, diagonal: f64) -> StarlitResult<TrajectoryTable> {
        validate_diagonal(diagonal)?;
        let entries = self
            .angles
            .iter()
            .flat_map(|&angle| {
                DistanceTier::ALL
                    .into_iter()
                    .map(move |tier| self.trajectory(diagonal, angle, tier))
            })
            .collect::<StarlitResult<Vec<_>>>()?;
        tracing::debug!(entries = entries.len(), "trajectory table computed");
        Ok(TrajectoryTable { diagonal, entries })
    }

    /// Sample a start position.
    ///
    /// Starts still on-screen (`x < edge`) get the taller `y` range so the arc has room to show;
    /// off-screen starts only need a short lead-in.
    pub fn start_position<R: Rng + ?Sized>(&self, rng: &mut R) -> StartPosition {
        let x_pct = self.start_x.sample(rng);
        let y_range = if x_pct < self.onscreen_edge {
            self.start_y_onscreen
        } else {
            self.start_y_offscreen
        };
        StartPosition {
            x_pct,
            y_pct: y_range.sample(rng),
        }
    }

    /// Uniform pick from the discrete heading set.
    pub fn random_angle<R: Rng + ?Sized>(&self, rng: &mut R) -> u16 {
        self.angles[rng.random_range(0..self.angles.len())]
    }

    /// Shared heading for one shower.
    pub fn shower_seed<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.shower_seed.sample(rng)
    }

    /// Nearest member of the heading set; on an exact tie the earlier member in set order wins.
    pub fn snap_angle(&self, angle_deg: f64) -> u16 {
        let mut best = self.angles[0];
        let mut best_diff = (f64::from(best) - angle_deg).abs();
        for &candidate in &self.angles[1..] {
            let diff = (f64::from(candidate) - angle_deg).abs();
            if diff < best_diff {
                best = candidate;
                best_diff = diff;
            }
        }
        best
    }

    /// Heading for one shower member: `seed` plus per-meteor jitter, snapped to the set.
    pub fn shower_angle<R: Rng + ?Sized>(&self, seed_deg: f64, rng: &mut R) -> u16 {
        let jitter = if self.shower_jitter > 0.0 {
            rng.random_range(-self.shower_jitter..=self.shower_jitter)
        } else {
            0.0
        };
        self.snap_angle(seed_deg + jitter)
    }
}

fn validate_diagonal(diagonal: f64) -> StarlitResult<()> {
    if !(diagonal.is_finite() && diagonal > 0.0) {
        return Err(StarlitError::geometry(format!(
            "viewport diagonal must be finite and positive, got {diagonal}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/meteor/trajectory.rs"]
mod tests;
