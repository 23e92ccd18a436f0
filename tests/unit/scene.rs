use super::*;
use crate::foundation::core::{MillisRange, Point, Rgba8};
use crate::foundation::error::StarlitError;
use crate::meteor::host::RecordingHost;
use crate::render::renderer::RenderState;

#[derive(Debug, Default)]
struct NullSurface {
    circles: usize,
    resized_to: Vec<Viewport>,
}

impl DrawSurface for NullSurface {
    fn resize(&mut self, viewport: Viewport, _dpr: f64) -> StarlitResult<()> {
        self.resized_to.push(viewport);
        Ok(())
    }

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    fn clear(&mut self) -> StarlitResult<()> {
        Ok(())
    }

    fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Rgba8) -> StarlitResult<()> {
        self.circles += 1;
        Ok(())
    }

    fn present(&mut self) -> StarlitResult<()> {
        Ok(())
    }
}

type TestScene = Scene<NullSurface, ManualFrameClock, RecordingHost>;

fn config() -> SceneConfig {
    let mut cfg = SceneConfig {
        seed: Some(9),
        ..SceneConfig::default()
    };
    cfg.field.star_count_full = 200;
    cfg.meteors.stream.interval_ms = MillisRange::new(500, 1000);
    cfg
}

fn scene(width: f64, height: f64) -> TestScene {
    Scene::new(
        config(),
        width,
        height,
        Ok(NullSurface::default()),
        ManualFrameClock::new(),
        RecordingHost::new(),
    )
    .unwrap()
}

#[test]
fn new_scene_is_fully_built_and_running() {
    let s = scene(800.0, 600.0);
    assert_eq!(s.population().primary_count(), 200);
    assert_eq!(s.trajectory_table().len(), 24);
    assert_eq!(s.curve_catalog().len(), 24);
    assert_eq!(s.host().installs, 1);
    assert_eq!(s.host().curve_names.len(), 24);
    assert!(s.meteors().is_running());

    let renderer = s.renderer().unwrap();
    assert_eq!(renderer.state(), RenderState::Active);
    assert_eq!(renderer.frames().outstanding(), 1);
    assert_eq!(
        renderer.surface().resized_to,
        vec![Viewport::new(800.0, 600.0).unwrap()]
    );
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = config();
    cfg.twinkle.min_opacity = 0.9;
    cfg.twinkle.max_opacity = 0.1;
    let result = TestScene::new(
        cfg,
        800.0,
        600.0,
        Ok(NullSurface::default()),
        ManualFrameClock::new(),
        RecordingHost::new(),
    );
    assert!(matches!(result, Err(StarlitError::Validation(_))));
}

#[test]
fn missing_surface_keeps_meteors_running() {
    let mut s = TestScene::new(
        config(),
        800.0,
        600.0,
        Err(StarlitError::surface("no 2d context")),
        ManualFrameClock::new(),
        RecordingHost::new(),
    )
    .unwrap();
    assert!(s.renderer().is_none());
    assert_eq!(s.pump_frame(Duration::ZERO), FrameOutcome::Halted);

    s.tick(Duration::from_secs(5));
    assert!(s.host().spawned > 0);
}

#[test]
fn invalid_geometry_yields_empty_state_until_resize() {
    let mut s = scene(0.0, 600.0);
    assert!(s.population().is_empty());
    assert!(s.trajectory_table().is_empty());
    assert!(s.curve_catalog().is_empty());
    assert!(s.viewport().is_none());
    assert!(s.renderer().unwrap().surface().resized_to.is_empty());
    assert_eq!(s.pump_frame(Duration::ZERO), FrameOutcome::Skipped);

    s.resize(1024.0, 768.0);
    assert_eq!(s.renderer().unwrap().surface().resized_to.len(), 1);
    assert_eq!(s.population().primary_count(), 200);
    assert_eq!(s.curve_catalog().len(), 24);
    assert_eq!(s.host().installs, 2);
    assert!(matches!(
        s.pump_frame(Duration::from_millis(16)),
        FrameOutcome::Drawn { planets: 5, .. }
    ));
}

#[test]
fn meteors_wait_for_valid_geometry() {
    let mut s = TestScene::new(
        config(),
        0.0,
        0.0,
        Err(StarlitError::surface("no 2d context")),
        ManualFrameClock::new(),
        RecordingHost::new(),
    )
    .unwrap();
    assert!(s.curve_catalog().is_empty());
    assert!(!s.meteors().is_running());
    assert!(s.tick(Duration::from_secs(30)).is_empty());
    assert_eq!(s.host().spawned, 0);

    s.resize(800.0, 600.0);
    assert!(s.tick(Duration::from_secs(60)).is_empty());
    assert!(s.meteors().is_running());

    let events = s.tick(Duration::from_secs(65));
    assert!(s.host().spawned > 0);
    for event in &events {
        if let MeteorEvent::Spawned(m) = event {
            assert!(s.curve_catalog().contains(m.curve));
            assert!(m.created_at > Duration::from_secs(60));
        }
    }
}

#[test]
fn invalid_resize_retires_live_meteors_and_holds_cadences() {
    let mut s = scene(800.0, 600.0);
    s.tick(Duration::from_secs(3));
    assert!(s.host().live_count() > 0);

    s.resize(0.0, 600.0);
    let events = s.tick(Duration::from_secs(4));
    assert!(
        events
            .iter()
            .all(|e| matches!(e, MeteorEvent::Retired { .. }))
    );
    assert_eq!(s.host().live_count(), 0);
    assert!(!s.meteors().is_running());
    assert!(s.tick(Duration::from_secs(60)).is_empty());

    s.resize(800.0, 600.0);
    s.tick(Duration::from_secs(61));
    assert!(s.meteors().is_running());
}

#[test]
fn resize_swaps_snapshots_wholesale() {
    let mut s = scene(800.0, 600.0);
    let old_population = s.population();
    let old_table = s.trajectory_table();

    s.resize(1920.0, 1080.0);
    let new_population = s.population();
    assert!(!Arc::ptr_eq(&old_population, &new_population));
    assert_eq!(old_population.viewport.unwrap().width, 800.0);
    assert_eq!(new_population.viewport.unwrap().width, 1920.0);
    assert!((old_table.diagonal - 1000.0).abs() < 1e-9);
    let diagonal = s.trajectory_table().diagonal;
    assert!((diagonal - 1920f64.hypot(1080.0)).abs() < 1e-9);
}

#[test]
fn ticks_forward_meteor_events_to_the_host() {
    let mut s = scene(800.0, 600.0);
    let events = s.tick(Duration::from_secs(20));
    let spawned = events
        .iter()
        .filter(|e| matches!(e, MeteorEvent::Spawned(_)))
        .count();
    assert!(spawned > 0);
    assert_eq!(s.host().spawned, spawned);
    assert_eq!(s.host().live_count(), s.meteors().live_count());
    for m in s.host().live.values() {
        assert!(s.curve_catalog().contains(m.curve));
    }
}

#[test]
fn suspend_and_resume_cycle() {
    let mut s = scene(800.0, 600.0);
    s.tick(Duration::from_secs(3));
    assert!(s.host().live_count() > 0);

    s.suspend(Duration::from_secs(3));
    assert!(s.is_suspended());
    assert_eq!(s.host().live_count(), 0);
    assert_eq!(s.meteors().outstanding_timers(), 0);
    assert_eq!(s.renderer().unwrap().frames().outstanding(), 0);
    assert!(s.tick(Duration::from_secs(600)).is_empty());
    assert_eq!(
        s.pump_frame(Duration::from_secs(600)),
        FrameOutcome::Skipped
    );

    s.resume(Duration::from_secs(600));
    assert!(!s.is_suspended());
    assert_eq!(s.renderer().unwrap().frames().outstanding(), 1);
    assert!(s.meteors().outstanding_timers() > 0);
    assert!(matches!(
        s.pump_frame(Duration::from_secs(600)),
        FrameOutcome::Drawn { .. }
    ));
}

#[test]
fn dispose_stops_everything() {
    let mut s = scene(800.0, 600.0);
    s.tick(Duration::from_secs(3));
    s.dispose(Duration::from_secs(3));
    assert_eq!(s.host().live_count(), 0);
    assert_eq!(s.renderer().unwrap().state(), RenderState::Halted);
    assert!(s.tick(Duration::from_secs(60)).is_empty());
}

#[test]
fn resume_after_dispose_stays_stopped() {
    let mut s = scene(800.0, 600.0);
    s.tick(Duration::from_secs(3));
    s.dispose(Duration::from_secs(5));
    let spawned = s.host().spawned;

    s.resume(Duration::from_secs(5));
    assert!(s.is_disposed());
    assert!(!s.meteors().is_running());
    assert_eq!(s.meteors().outstanding_timers(), 0);
    assert_eq!(s.renderer().unwrap().state(), RenderState::Halted);
    assert!(s.tick(Duration::from_secs(60)).is_empty());
    assert_eq!(s.host().spawned, spawned);
}

#[test]
fn seeded_scenes_are_reproducible() {
    let a = scene(640.0, 480.0);
    let b = scene(640.0, 480.0);
    assert_eq!(*a.population(), *b.population());
}
