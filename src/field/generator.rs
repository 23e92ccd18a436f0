use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::config::{FieldConfig, SceneConfig, TwinkleConfig};
use crate::field::model::{Planet, Population, Star, StarAnimation};
use crate::foundation::core::{Point, Rgb8, Viewport};
use crate::sampling::{bernoulli, sample_biased_uniform, sample_category, sample_direction};

const FALLBACK_COLOR: Rgb8 = Rgb8::new(255, 255, 255);

/// Builds the star and planet population for a viewport.
///
/// The generator owns the current population behind an `Arc`; a regeneration pass builds a fresh
/// [`Population`] and swaps the pointer, so readers holding the previous snapshot never observe a
/// partial update.
pub struct CelestialFieldGenerator {
    field: FieldConfig,
    twinkle: TwinkleConfig,
    star_count: usize,
    current: Arc<Population>,
}

impl CelestialFieldGenerator {
    /// Generator for `config`, starting with an empty population.
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            field: config.field.clone(),
            twinkle: config.twinkle.clone(),
            star_count: config.star_count(),
            current: Arc::new(Population::empty()),
        }
    }

    /// Current population snapshot.
    pub fn population(&self) -> Arc<Population> {
        Arc::clone(&self.current)
    }

    /// Primary stars generated per pass, fixed by the device tier.
    pub fn star_count(&self) -> usize {
        self.star_count
    }

    /// Discard the current population and generate a new one for `width x height`.
    ///
    /// Invalid geometry is recovered locally: the population becomes empty and a warning is
    /// logged.
    #[tracing::instrument(skip(self, rng))]
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> Arc<Population> {
        let population = match Viewport::new(width, height) {
            Ok(viewport) => self.generate(viewport, rng),
            Err(err) => {
                tracing::warn!(%err, "skipping field generation");
                Population::empty()
            }
        };
        tracing::debug!(
            stars = population.stars.len(),
            companions = population.companion_count(),
            planets = population.planets.len(),
            "field regenerated"
        );
        self.current = Arc::new(population);
        self.population()
    }

    fn generate<R: Rng + ?Sized>(&self, viewport: Viewport, rng: &mut R) -> Population {
        let expected_companions =
            (self.star_count as f64 * self.field.binary_probability).ceil() as usize;
        let mut stars = Vec::with_capacity(self.star_count + expected_companions * 2);

        for _ in 0..self.star_count {
            let primary = self.primary_star(viewport, rng);
            let companion = bernoulli(rng, self.field.binary_probability)
                .then(|| self.companion_of(&primary, viewport, rng));
            stars.push(primary);
            stars.extend(companion);
        }

        Population {
            viewport: Some(viewport),
            stars,
            planets: self.place_planets(viewport, rng),
        }
    }

    fn primary_star<R: Rng + ?Sized>(&self, viewport: Viewport, rng: &mut R) -> Star {
        let x = rng.random::<f64>() * viewport.width;
        let y = sample_biased_uniform(rng, self.field.y_bias_exponent) * viewport.height;
        let diameter = self.field.star_diameter.sample(rng);

        let classes = &self.field.spectral_classes;
        let class = sample_category(rng, classes.iter().enumerate().map(|(i, c)| (i, c.weight)))
            .unwrap_or(0);

        let twinkles = !bernoulli(rng, self.field.static_fraction);
        Star {
            position: Point::new(x, y),
            diameter,
            class,
            color: classes.get(class).map_or(FALLBACK_COLOR, |c| c.color),
            animation: self.sample_animation(twinkles, rng),
            companion: false,
        }
    }

    fn companion_of<R: Rng + ?Sized>(
        &self,
        primary: &Star,
        viewport: Viewport,
        rng: &mut R,
    ) -> Star {
        let direction = sample_direction(rng);
        let separation = self.field.binary_separation.sample(rng);
        let offset = Point::new(
            primary.position.x + direction.cos() * separation,
            primary.position.y + direction.sin() * separation,
        );
        let scale = self.field.companion_scale.sample(rng);
        Star {
            position: viewport.clamp(offset),
            diameter: primary.diameter * scale,
            class: primary.class,
            color: primary.color,
            animation: self.sample_animation(primary.animation.is_twinkling(), rng),
            companion: true,
        }
    }

    fn sample_animation<R: Rng + ?Sized>(&self, twinkles: bool, rng: &mut R) -> StarAnimation {
        if twinkles {
            StarAnimation::Twinkling {
                phase_delay: Duration::from_secs_f64(self.twinkle.phase_delay_secs.sample(rng)),
                cycle: Duration::from_secs_f64(self.twinkle.cycle_secs.sample(rng)),
            }
        } else {
            StarAnimation::Static {
                opacity: self.field.static_opacity.sample(rng),
            }
        }
    }

    fn place_planets<R: Rng + ?Sized>(&self, viewport: Viewport, rng: &mut R) -> Vec<Planet> {
        let defs = &self.field.planets;
        let section = viewport.width / (defs.len() + 1) as f64;
        let jitter = self.field.planet_jitter;

        defs.iter()
            .enumerate()
            .map(|(order, def)| {
                let base_x = section * (order + 1) as f64;
                let base_y = rng.random::<f64>() * viewport.height * self.field.planet_band;
                let jx = (rng.random::<f64>() - 0.5) * jitter * viewport.width;
                let jy = (rng.random::<f64>() - 0.5) * jitter * viewport.height;
                Planet {
                    position: viewport.clamp(Point::new(base_x + jx, base_y + jy)),
                    diameter: def.diameter,
                    color: def.color,
                    opacity: def.opacity,
                    label: def.label.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/generator.rs"]
mod tests;
