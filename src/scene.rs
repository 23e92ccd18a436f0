use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::twinkle::TwinkleAnimator;
use crate::config::SceneConfig;
use crate::field::generator::CelestialFieldGenerator;
use crate::field::model::Population;
use crate::foundation::core::Viewport;
use crate::foundation::error::StarlitResult;
use crate::meteor::host::AnimationHost;
use crate::meteor::keyframes::{CurveCatalog, KeyframeSynthesizer};
use crate::meteor::scheduler::{MeteorEvent, MeteorScheduler};
use crate::meteor::trajectory::{MeteorTrajectoryEngine, TrajectoryTable};
use crate::render::renderer::{FrameOutcome, SceneRenderer};
use crate::render::surface::{DrawSurface, FrameHandle, FrameScheduler, ManualFrameClock};

/// One celestial scene: field, draw loop, trajectory table, curve catalog, and meteor cadences.
///
/// All times are offsets from the scene epoch (the `Duration::ZERO` passed to cadences at
/// construction). Population, table, and catalog are replaced wholesale on resize; readers
/// holding an `Arc` keep a consistent snapshot.
///
/// Meteor cadences only run while the viewport is valid: a spawn always names a curve the host
/// has installed.
pub struct Scene<S, F, H> {
    config: SceneConfig,
    rng: StdRng,
    viewport: Option<Viewport>,
    field: CelestialFieldGenerator,
    engine: MeteorTrajectoryEngine,
    synthesizer: KeyframeSynthesizer,
    table: Arc<TrajectoryTable>,
    catalog: Arc<CurveCatalog>,
    renderer: Option<SceneRenderer<S, F>>,
    meteors: MeteorScheduler,
    host: H,
    suspended: bool,
    disposed: bool,
}

impl<S, F, H> Scene<S, F, H>
where
    S: DrawSurface,
    F: FrameScheduler,
    H: AnimationHost,
{
    /// Build and start a scene.
    ///
    /// Only an invalid config is fatal. A missing surface leaves the scene without a renderer;
    /// invalid geometry leaves it with an empty population and table until the next resize.
    #[tracing::instrument(skip(config, surface, frames, host))]
    pub fn new(
        config: SceneConfig,
        width: f64,
        height: f64,
        surface: StarlitResult<S>,
        frames: F,
        host: H,
    ) -> StarlitResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let renderer = match surface {
            Ok(surface) => Some(SceneRenderer::new(
                surface,
                frames,
                TwinkleAnimator::new(&config.twinkle),
            )),
            Err(err) => {
                tracing::warn!(%err, "no drawing surface; continuing without a renderer");
                None
            }
        };

        let mut scene = Self {
            field: CelestialFieldGenerator::new(&config),
            engine: MeteorTrajectoryEngine::new(&config.meteors),
            synthesizer: KeyframeSynthesizer::new(&config.meteors),
            meteors: MeteorScheduler::new(&config),
            config,
            rng,
            viewport: None,
            table: Arc::new(TrajectoryTable::empty()),
            catalog: Arc::new(CurveCatalog::empty()),
            renderer,
            host,
            suspended: false,
            disposed: false,
        };
        scene.rebuild(width, height);
        if let Some(renderer) = scene.renderer.as_mut() {
            if let Some(viewport) = scene.viewport {
                // A failed resize halts the renderer and logs there.
                let _ = renderer.resize_surface(viewport);
            }
            renderer.start();
        }
        scene.sync_cadences(Duration::ZERO);
        Ok(scene)
    }

    /// Regenerate population, trajectory table, and curve catalog for a new viewport size.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, width: f64, height: f64) {
        self.rebuild(width, height);
        if let (Some(renderer), Some(viewport)) = (self.renderer.as_mut(), self.viewport) {
            // A failed resize halts the renderer and logs there.
            let _ = renderer.resize_surface(viewport);
        }
    }

    /// Fire due meteor timers and expiries, forwarding each event to the host.
    ///
    /// Cadences held by invalid geometry restart here once a resize has made the viewport valid
    /// again; live meteors are retired at `now` when the viewport has become invalid.
    pub fn tick(&mut self, now: Duration) -> Vec<MeteorEvent> {
        let mut events = self.sync_cadences(now);
        events.extend(self.meteors.tick(now, &mut self.rng));
        self.forward(&events);
        events
    }

    /// Draw the frame for `handle` if it is the pending request.
    pub fn on_frame(&mut self, handle: FrameHandle, now: Duration) -> FrameOutcome {
        match self.renderer.as_mut() {
            Some(renderer) => renderer.on_frame(handle, now),
            None => FrameOutcome::Halted,
        }
    }

    /// Stop drawing, cancel every timer, and retire all live meteors.
    pub fn suspend(&mut self, now: Duration) -> Vec<MeteorEvent> {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.suspend();
        }
        let events = self.meteors.suspend(now);
        self.forward(&events);
        self.suspended = true;
        events
    }

    /// Restart drawing and both meteor cadences from a cold state. No-op after `dispose`.
    pub fn resume(&mut self, now: Duration) {
        if self.disposed {
            return;
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resume();
        }
        self.suspended = false;
        self.sync_cadences(now);
    }

    /// Tear the scene down: halt drawing and retire every live meteor. Terminal.
    pub fn dispose(&mut self, now: Duration) -> Vec<MeteorEvent> {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.dispose();
        }
        let events = self.meteors.dispose(now);
        self.forward(&events);
        self.disposed = true;
        events
    }

    /// Validated configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Current viewport; `None` after invalid geometry.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Current star and planet snapshot.
    pub fn population(&self) -> Arc<Population> {
        self.field.population()
    }

    /// Current trajectory table snapshot.
    pub fn trajectory_table(&self) -> Arc<TrajectoryTable> {
        Arc::clone(&self.table)
    }

    /// Curve catalog last installed on the host.
    pub fn curve_catalog(&self) -> Arc<CurveCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Draw loop; `None` when the scene was built without a surface.
    pub fn renderer(&self) -> Option<&SceneRenderer<S, F>> {
        self.renderer.as_ref()
    }

    /// Meteor cadences and live registry.
    pub fn meteors(&self) -> &MeteorScheduler {
        &self.meteors
    }

    /// Animation host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Animation host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Return `true` between `suspend` and `resume`.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Return `true` after `dispose`.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Hold the cadences while the viewport is invalid and re-arm them once it is valid again.
    /// Returns the retirements of a hold; the caller forwards them.
    fn sync_cadences(&mut self, now: Duration) -> Vec<MeteorEvent> {
        if self.disposed || self.suspended {
            return Vec::new();
        }
        match self.viewport {
            Some(_) => {
                self.meteors.start(now, &mut self.rng);
                Vec::new()
            }
            None if self.meteors.is_running() => {
                tracing::warn!("invalid viewport; holding meteor cadences");
                self.meteors.suspend(now)
            }
            None => Vec::new(),
        }
    }

    fn rebuild(&mut self, width: f64, height: f64) {
        let population = self.field.regenerate(width, height, &mut self.rng);

        self.viewport = Viewport::new(width, height).ok();
        let diagonal = self.viewport.map_or(f64::NAN, Viewport::diagonal);
        let table = match self.engine.table(diagonal) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(%err, "skipping trajectory table");
                TrajectoryTable::empty()
            }
        };
        let catalog = self.synthesizer.catalog(&table);
        if let Err(err) = self.host.install_curves(&catalog) {
            tracing::warn!(%err, "animation host rejected curve catalog");
        }
        self.table = Arc::new(table);
        self.catalog = Arc::new(catalog);

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_population(population);
        }
    }

    fn forward(&mut self, events: &[MeteorEvent]) {
        for event in events {
            let result = match event {
                MeteorEvent::Spawned(meteor) => self.host.spawn(meteor),
                MeteorEvent::Retired { id, .. } => self.host.retire(*id),
            };
            if let Err(err) = result {
                tracing::warn!(%err, "animation host call failed");
            }
        }
    }
}

impl<S, H> Scene<S, ManualFrameClock, H>
where
    S: DrawSurface,
    H: AnimationHost,
{
    /// Deliver the next outstanding frame request from the manual clock.
    pub fn pump_frame(&mut self, now: Duration) -> FrameOutcome {
        match self.renderer.as_mut() {
            Some(renderer) => renderer.pump(now),
            None => FrameOutcome::Halted,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
