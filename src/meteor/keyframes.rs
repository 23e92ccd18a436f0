use std::collections::BTreeMap;
use std::fmt;

use crate::animation::curve::{CurveKey, CurveState, MotionCurve};
use crate::animation::ease::Ease;
use crate::config::MeteorConfig;
use crate::foundation::core::Vec2;
use crate::foundation::error::{StarlitError, StarlitResult};
use crate::meteor::trajectory::{DistanceTier, MeteorTrajectory, TrajectoryTable};

/// Key into the curve catalog: one per `(angle, tier)` pair.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CurveId {
    /// Heading in degrees, a member of the configured set.
    pub angle_deg: u16,
    /// Travel distance tier.
    pub tier: DistanceTier,
}

impl CurveId {
    /// Id for one `(angle, tier)` pair.
    pub fn new(angle_deg: u16, tier: DistanceTier) -> Self {
        Self { angle_deg, tier }
    }

    /// Host-facing curve name, e.g. `meteor-135-long`.
    pub fn name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "meteor-{}-{}", self.angle_deg, self.tier.as_str())
    }
}

impl From<&MeteorTrajectory> for CurveId {
    fn from(t: &MeteorTrajectory) -> Self {
        Self::new(t.angle_deg, t.tier)
    }
}

/// Expands trajectories into fade-in / hold / fade-out motion curves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyframeSynthesizer {
    fade_in_end: f64,
    fade_out_start: f64,
    ease: Ease,
}

impl KeyframeSynthesizer {
    /// Synthesizer using the configured fade points and ease.
    pub fn new(config: &MeteorConfig) -> Self {
        Self {
            fade_in_end: config.fade_in_end,
            fade_out_start: config.fade_out_start,
            ease: config.ease,
        }
    }

    /// Four keys: invisible at the origin, opaque by `fade_in_end`, still opaque at
    /// `fade_out_start`, invisible again at the full displacement.
    ///
    /// Each key's translation is its offset times the displacement and curves interpolate
    /// translation linearly, so the configured ease shapes the fades without bending the path.
    pub fn synthesize(&self, trajectory: &MeteorTrajectory) -> MotionCurve {
        let d = trajectory.displacement;
        let key = |offset: f64, opacity: f64| CurveKey {
            offset,
            state: CurveState {
                translate: Vec2::new(d.x * offset, d.y * offset),
                opacity,
            },
            ease: self.ease,
        };
        MotionCurve {
            name: CurveId::from(trajectory).name(),
            keys: vec![
                key(0.0, 0.0),
                key(self.fade_in_end, 1.0),
                key(self.fade_out_start, 1.0),
                key(1.0, 0.0),
            ],
        }
    }

    /// Build the full catalog for one trajectory table.
    #[tracing::instrument(skip_all, fields(diagonal = table.diagonal))]
    pub fn catalog(&self, table: &TrajectoryTable) -> CurveCatalog {
        let mut catalog = CurveCatalog {
            diagonal: table.diagonal,
            curves: Vec::with_capacity(table.len()),
            index: BTreeMap::new(),
        };
        for trajectory in &table.entries {
            catalog
                .index
                .insert(CurveId::from(trajectory), catalog.curves.len());
            catalog.curves.push(self.synthesize(trajectory));
        }
        tracing::debug!(curves = catalog.curves.len(), "curve catalog synthesized");
        catalog
    }
}

/// Every motion curve for one viewport diagonal, in table order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct CurveCatalog {
    /// Viewport diagonal the curves were built for.
    pub diagonal: f64,
    /// Curves in trajectory-table order.
    pub curves: Vec<MotionCurve>,
    #[serde(skip)]
    index: BTreeMap<CurveId, usize>,
}

impl CurveCatalog {
    /// Catalog with no curves.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Return `true` when there are no curves.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Curve for `id`, if the catalog has one.
    pub fn get(&self, id: CurveId) -> Option<&MotionCurve> {
        self.index.get(&id).and_then(|&i| self.curves.get(i))
    }

    /// Return `true` when `id` has a curve.
    pub fn contains(&self, id: CurveId) -> bool {
        self.index.contains_key(&id)
    }

    /// Every id in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = CurveId> + '_ {
        self.index.keys().copied()
    }

    /// Pretty-printed JSON for handing the catalog to a host.
    pub fn to_json(&self) -> StarlitResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StarlitError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/meteor/keyframes.rs"]
mod tests;
