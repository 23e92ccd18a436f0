use super::*;
use crate::test_support::ScriptedRng;
use rand::{SeedableRng, rngs::StdRng};

const WEIGHTS: [(&str, f64); 3] = [("a", 0.25), ("b", 0.5), ("c", 0.25)];

#[test]
fn category_walks_cumulative_sum_in_order() {
    let mut rng = ScriptedRng::new(&[0.125, 0.25, 0.5, 0.75, 0.875]);
    let picks: Vec<&str> = (0..5)
        .map(|_| sample_category(&mut rng, WEIGHTS).unwrap())
        .collect();
    assert_eq!(picks, vec!["a", "a", "b", "b", "c"]);
}

#[test]
fn category_falls_back_to_last_on_slack() {
    let mut rng = ScriptedRng::new(&[0.9375]);
    let short = [("a", 0.25), ("b", 0.5), ("c", 0.125)];
    assert_eq!(sample_category(&mut rng, short), Some("c"));
}

#[test]
fn category_of_empty_list_is_none() {
    let mut rng = ScriptedRng::new(&[0.5]);
    let empty: [(&str, f64); 0] = [];
    assert_eq!(sample_category(&mut rng, empty), None);
}

#[test]
fn category_is_deterministic_for_a_seed() {
    let mut a = StdRng::seed_from_u64(42);
    let mut b = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        assert_eq!(
            sample_category(&mut a, WEIGHTS),
            sample_category(&mut b, WEIGHTS)
        );
    }
}

#[test]
fn biased_uniform_applies_exponent() {
    let mut rng = ScriptedRng::new(&[0.25]);
    assert_eq!(sample_biased_uniform(&mut rng, 1.0), 0.25);
    assert_eq!(sample_biased_uniform(&mut rng, 2.0), 0.0625);
    assert!((sample_biased_uniform(&mut rng, 1.5) - 0.125).abs() < 1e-12);
}

#[test]
fn biased_uniform_concentrates_toward_zero() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 20_000;
    let below_half = (0..n)
        .filter(|_| sample_biased_uniform(&mut rng, 1.5) < 0.5)
        .count();
    // P(u^1.5 < 0.5) = 0.5^(1/1.5) ~= 0.63
    let frac = below_half as f64 / n as f64;
    assert!((0.60..0.66).contains(&frac), "frac={frac}");
}

#[test]
fn direction_and_bernoulli_bounds() {
    let mut rng = ScriptedRng::new(&[0.0, 0.5, 0.999]);
    for _ in 0..3 {
        let a = sample_direction(&mut rng);
        assert!((0.0..std::f64::consts::TAU).contains(&a));
    }
    let mut rng = ScriptedRng::new(&[0.5]);
    assert!(!bernoulli(&mut rng, 0.5));
    assert!(bernoulli(&mut rng, 0.75));
    assert!(!bernoulli(&mut rng, 0.0));
    assert!(bernoulli(&mut rng, 2.0));
}
