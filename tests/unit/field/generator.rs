use super::*;
use crate::foundation::core::Range64;
use rand::{SeedableRng, rngs::StdRng};

fn small_config(stars: usize) -> SceneConfig {
    let mut cfg = SceneConfig::default();
    cfg.field.star_count_full = stars;
    cfg
}

#[test]
fn primary_count_matches_configured_total() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut generator = CelestialFieldGenerator::new(&small_config(300));
    let pop = generator.regenerate(800.0, 600.0, &mut rng);

    assert_eq!(pop.primary_count(), 300);
    let counts = pop.class_counts(5);
    assert_eq!(counts.iter().sum::<usize>(), 300);
    assert_eq!(pop.stars.len(), 300 + pop.companion_count());
    assert_eq!(pop.planets.len(), 5);
}

#[test]
fn every_star_and_planet_lies_inside_the_viewport() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut cfg = small_config(500);
    cfg.field.binary_probability = 0.5;
    cfg.field.binary_separation = Range64::new(20.0, 40.0);
    let mut generator = CelestialFieldGenerator::new(&cfg);
    let pop = generator.regenerate(320.0, 200.0, &mut rng);
    let vp = pop.viewport.unwrap();

    assert!(pop.companion_count() > 0);
    for s in &pop.stars {
        assert!(vp.contains(s.position), "star outside: {:?}", s.position);
    }
    for p in &pop.planets {
        assert!(vp.contains(p.position), "planet outside: {:?}", p.position);
    }
}

#[test]
fn vertical_positions_favour_the_top() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut generator = CelestialFieldGenerator::new(&small_config(4000));
    let pop = generator.regenerate(1000.0, 1000.0, &mut rng);
    let upper = pop
        .stars
        .iter()
        .filter(|s| !s.companion && s.position.y < 500.0)
        .count();
    let frac = upper as f64 / 4000.0;
    assert!(frac > 0.58, "upper fraction {frac}");
}

#[test]
fn companions_follow_their_primary() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut cfg = small_config(400);
    cfg.field.binary_probability = 1.0;
    let mut generator = CelestialFieldGenerator::new(&cfg);
    let pop = generator.regenerate(1000.0, 800.0, &mut rng);

    assert_eq!(pop.companion_count(), 400);
    for pair in pop.stars.chunks(2) {
        let (primary, companion) = (&pair[0], &pair[1]);
        assert!(!primary.companion && companion.companion);
        assert_eq!(primary.class, companion.class);
        assert_eq!(primary.color, companion.color);
        assert_eq!(
            primary.animation.is_twinkling(),
            companion.animation.is_twinkling()
        );
        let ratio = companion.diameter / primary.diameter;
        assert!((0.6 - 1e-9..=0.9 + 1e-9).contains(&ratio), "ratio {ratio}");
        let dist = (companion.position - primary.position).hypot();
        assert!(dist <= 8.0 + 1e-9, "separation {dist}");
    }
}

#[test]
fn static_fraction_extremes_select_animation_mode() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut cfg = small_config(200);
    cfg.field.static_fraction = 1.0;
    let mut generator = CelestialFieldGenerator::new(&cfg);
    let pop = generator.regenerate(100.0, 100.0, &mut rng);
    for s in &pop.stars {
        match s.animation {
            StarAnimation::Static { opacity } => {
                assert!(cfg.field.static_opacity.contains(opacity))
            }
            StarAnimation::Twinkling { .. } => panic!("expected static star"),
        }
    }

    cfg.field.static_fraction = 0.0;
    let mut generator = CelestialFieldGenerator::new(&cfg);
    let pop = generator.regenerate(100.0, 100.0, &mut rng);
    for s in &pop.stars {
        match s.animation {
            StarAnimation::Twinkling { phase_delay, cycle } => {
                let delay = phase_delay.as_secs_f64();
                assert!(cfg.twinkle.phase_delay_secs.contains(delay));
                assert!(cfg.twinkle.cycle_secs.contains(cycle.as_secs_f64()));
            }
            StarAnimation::Static { .. } => panic!("expected twinkling star"),
        }
    }
}

#[test]
fn planets_spread_left_to_right_in_definition_order() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut generator = CelestialFieldGenerator::new(&small_config(0));
    for _ in 0..50 {
        let pop = generator.regenerate(1200.0, 900.0, &mut rng);
        let labels: Vec<&str> = pop.planets.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["mercury", "venus", "mars", "jupiter", "saturn"]);
        assert!(
            pop.planets
                .windows(2)
                .all(|w| w[0].position.x < w[1].position.x)
        );
        for p in &pop.planets {
            assert!(p.position.y <= 900.0 * (0.6 + 0.075) + 1e-9);
        }
    }
}

#[test]
fn invalid_geometry_yields_empty_population() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut generator = CelestialFieldGenerator::new(&small_config(10));
    generator.regenerate(100.0, 100.0, &mut rng);
    for (w, h) in [(0.0, 100.0), (100.0, -3.0), (f64::NAN, 10.0)] {
        let pop = generator.regenerate(w, h, &mut rng);
        assert!(pop.is_empty());
        assert!(pop.viewport.is_none());
    }
}

#[test]
fn regeneration_swaps_snapshots_without_touching_old_ones() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut generator = CelestialFieldGenerator::new(&small_config(50));
    let first = generator.regenerate(400.0, 300.0, &mut rng);
    let before = (*first).clone();
    let second = generator.regenerate(800.0, 600.0, &mut rng);

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(*first, before);
    assert!(Arc::ptr_eq(&second, &generator.population()));
    assert_eq!(second.viewport.unwrap().width, 800.0);
}

#[test]
fn same_seed_same_population() {
    let cfg = small_config(120);
    let a = CelestialFieldGenerator::new(&cfg).regenerate(
        640.0,
        480.0,
        &mut StdRng::seed_from_u64(99),
    );
    let b = CelestialFieldGenerator::new(&cfg).regenerate(
        640.0,
        480.0,
        &mut StdRng::seed_from_u64(99),
    );
    assert_eq!(*a, *b);
}
