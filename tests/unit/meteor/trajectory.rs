use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn engine() -> MeteorTrajectoryEngine {
    MeteorTrajectoryEngine::new(&MeteorConfig::default())
}

#[test]
fn every_trajectory_has_its_tier_distance_and_heading() {
    let diag = 1920f64.hypot(1080.0);
    let table = engine().table(diag).unwrap();
    assert_eq!(table.len(), 24);

    for t in &table.entries {
        let expected = t.tier.distance(diag, 25.0);
        assert!((t.displacement.hypot() - expected).abs() < 1e-6);
        let heading = t.displacement.y.atan2(t.displacement.x).to_degrees();
        assert!((heading - f64::from(t.angle_deg)).abs() < 1e-9, "{t:?}");
    }
}

#[test]
fn tiers_are_spaced_by_the_offset() {
    let diag = 1000.0;
    let table = engine().table(diag).unwrap();
    let short = table.get(145, DistanceTier::Short).unwrap();
    let nominal = table.get(145, DistanceTier::Nominal).unwrap();
    let long = table.get(145, DistanceTier::Long).unwrap();
    assert_eq!(short.distance, 975.0);
    assert_eq!(nominal.distance, 1000.0);
    assert_eq!(long.distance, 1025.0);
}

#[test]
fn table_is_angle_major() {
    let table = engine().table(500.0).unwrap();
    assert_eq!(table.entries[0].angle_deg, 130);
    assert_eq!(table.entries[0].tier, DistanceTier::Short);
    assert_eq!(table.entries[2].tier, DistanceTier::Long);
    assert_eq!(table.entries[3].angle_deg, 135);
    assert_eq!(table.entries[23].angle_deg, 165);
}

#[test]
fn short_tier_never_goes_negative() {
    let t = engine().trajectory(10.0, 150, DistanceTier::Short).unwrap();
    assert_eq!(t.distance, 0.0);
    assert_eq!(t.displacement.hypot(), 0.0);
}

#[test]
fn invalid_diagonal_is_a_geometry_error() {
    let e = engine();
    for diag in [0.0, -3.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(e.table(diag), Err(StarlitError::Geometry(_))));
        assert!(matches!(
            e.trajectory(diag, 130, DistanceTier::Nominal),
            Err(StarlitError::Geometry(_))
        ));
    }
}

#[test]
fn snap_picks_nearest_heading() {
    let e = engine();
    assert_eq!(e.snap_angle(158.0), 160);
    assert_eq!(e.snap_angle(131.0), 130);
    assert_eq!(e.snap_angle(90.0), 130);
    assert_eq!(e.snap_angle(200.0), 165);
}

#[test]
fn snap_tie_goes_to_the_earlier_heading() {
    let e = engine();
    assert_eq!(e.snap_angle(132.5), 130);
    assert_eq!(e.snap_angle(157.5), 155);
}

#[test]
fn shower_angles_stay_in_the_set() {
    let e = engine();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let seed = e.shower_seed(&mut rng);
        assert!((130.0..=160.0).contains(&seed));
        let a = e.shower_angle(seed, &mut rng);
        assert!(e.angles().contains(&a));
        assert!((f64::from(a) - seed).abs() <= 5.0 + 2.5 + 1e-9);
    }
}

#[test]
fn zero_jitter_snaps_the_seed_directly() {
    let mut cfg = MeteorConfig::default();
    cfg.shower.angle_jitter_deg = 0.0;
    let e = MeteorTrajectoryEngine::new(&cfg);
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(e.shower_angle(158.0, &mut rng), 160);
}

#[test]
fn start_y_range_follows_the_onscreen_edge() {
    let e = engine();
    let mut rng = StdRng::seed_from_u64(42);
    let (mut onscreen, mut offscreen) = (0, 0);
    for _ in 0..2000 {
        let s = e.start_position(&mut rng);
        assert!((90.0..=120.0).contains(&s.x_pct));
        if s.x_pct < 100.0 {
            onscreen += 1;
            assert!((-40.0..=50.0).contains(&s.y_pct));
        } else {
            offscreen += 1;
            assert!((-10.0..=50.0).contains(&s.y_pct));
        }
    }
    assert!(onscreen > 0 && offscreen > 0);
}

#[test]
fn random_angle_draws_from_the_set() {
    let e = engine();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        assert!(e.angles().contains(&e.random_angle(&mut rng)));
    }
}

#[test]
fn empty_heading_set_falls_back_to_defaults() {
    let cfg = MeteorConfig {
        angles_deg: Vec::new(),
        ..MeteorConfig::default()
    };
    let e = MeteorTrajectoryEngine::new(&cfg);
    assert_eq!(e.angles().len(), 8);
}

#[test]
fn start_position_resolves_against_viewport() {
    let p = StartPosition {
        x_pct: 110.0,
        y_pct: -10.0,
    }
    .to_point(200.0, 100.0);
    assert!((p.x - 220.0).abs() < 1e-9);
    assert!((p.y + 10.0).abs() < 1e-9);
}
