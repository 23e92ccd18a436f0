//! Starlit generates and animates procedural night-sky scenes.
//!
//! The pieces, leaf first:
//!
//! - Weighted and biased sampling primitives ([`sampling`])
//! - A [`CelestialFieldGenerator`] building star and planet populations per viewport
//! - A [`TwinkleAnimator`] mapping `(star, time)` to opacity
//! - A [`SceneRenderer`] driving the draw loop over any [`DrawSurface`]
//! - Meteor trajectories ([`MeteorTrajectoryEngine`]), motion curves ([`KeyframeSynthesizer`]),
//!   and spawn cadences ([`MeteorScheduler`])
//!
//! [`Scene`] wires them together behind a `new` / `resize` / `suspend` / `resume` / `dispose`
//! lifecycle.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub mod config;
pub(crate) mod field;
pub(crate) mod meteor;
pub(crate) mod render;
pub mod sampling;
mod scene;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;

pub use crate::foundation::core::{
    CountRange, MillisRange, Point, Range64, Rgb8, Rgba8, Vec2, Viewport,
};
pub use crate::foundation::error::{StarlitError, StarlitResult};

pub use crate::animation::curve::{CurveKey, CurveState, Lerp, MotionCurve};
pub use crate::animation::ease::{Ease, pulse};
pub use crate::animation::twinkle::TwinkleAnimator;
pub use crate::config::{
    DeviceTier, FieldConfig, MeteorConfig, PlanetDef, SceneConfig, ShowerConfig, SpectralClass,
    StreamConfig, TwinkleConfig,
};
pub use crate::field::generator::CelestialFieldGenerator;
pub use crate::field::model::{Planet, Population, Star, StarAnimation};
pub use crate::meteor::host::{AnimationHost, RecordingHost};
pub use crate::meteor::keyframes::{CurveCatalog, CurveId, KeyframeSynthesizer};
pub use crate::meteor::scheduler::{
    MeteorEvent, MeteorId, MeteorInstance, MeteorOrigin, MeteorScheduler, MeteorState,
};
pub use crate::meteor::timers::{TimerHandle, TimerQueue};
pub use crate::meteor::trajectory::{
    DistanceTier, MeteorTrajectory, MeteorTrajectoryEngine, StartPosition, TrajectoryTable,
    displacement,
};
pub use crate::render::cpu::{CpuSurface, FrameRGBA};
pub use crate::render::renderer::{FrameOutcome, RenderState, SceneRenderer};
pub use crate::render::surface::{DrawSurface, FrameHandle, FrameScheduler, ManualFrameClock};
pub use crate::scene::Scene;
