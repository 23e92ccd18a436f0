//! Weighted categorical and biased-uniform sampling primitives.
//!
//! Every function takes the random source by `&mut R` so callers can inject a seeded or
//! scripted generator.

use rand::Rng;

/// Draw one label from an ordered `(label, probability)` list.
///
/// A uniform draw in `[0,1)` is compared against the running cumulative sum in list order and the
/// first label whose cumulative sum meets or exceeds it wins. Probabilities are not required to
/// sum to exactly 1: when the draw lands past the final cumulative sum the last label is returned.
/// Returns `None` only for an empty list.
pub fn sample_category<L, R>(rng: &mut R, weights: impl IntoIterator<Item = (L, f64)>) -> Option<L>
where
    R: Rng + ?Sized,
{
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    let mut last = None;
    for (label, p) in weights {
        cumulative += p;
        if cumulative >= roll {
            return Some(label);
        }
        last = Some(label);
    }
    last
}

/// Return `draw^exponent` for a uniform draw in `[0,1)`.
///
/// `exponent > 1` concentrates samples toward 0; `exponent == 1` is uniform.
pub fn sample_biased_uniform<R: Rng + ?Sized>(rng: &mut R, exponent: f64) -> f64 {
    let draw: f64 = rng.random();
    draw.powf(exponent)
}

/// Uniform heading in `[0, 2π)`.
pub fn sample_direction<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>() * std::f64::consts::TAU
}

/// Bernoulli trial with success probability `p` (clamped into `[0,1]`).
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../tests/unit/sampling.rs"]
mod tests;
