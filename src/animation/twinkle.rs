use std::time::Duration;

use crate::animation::ease::pulse;
use crate::config::TwinkleConfig;
use crate::field::model::{Star, StarAnimation};

/// Maps `(star, time since scene epoch)` to opacity. Stateless apart from its opacity range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwinkleAnimator {
    min_opacity: f64,
    max_opacity: f64,
}

impl TwinkleAnimator {
    /// Animator for the configured opacity range.
    pub fn new(config: &TwinkleConfig) -> Self {
        Self {
            min_opacity: config.min_opacity,
            max_opacity: config.max_opacity,
        }
    }

    /// Opacity of `star` at `since_epoch`: fixed for static stars, a looping pulse otherwise.
    pub fn opacity(&self, star: &Star, since_epoch: Duration) -> f64 {
        match star.animation {
            StarAnimation::Static { opacity } => opacity,
            StarAnimation::Twinkling { phase_delay, cycle } => {
                self.twinkle_opacity(since_epoch, phase_delay, cycle)
            }
        }
    }

    fn twinkle_opacity(
        &self,
        since_epoch: Duration,
        phase_delay: Duration,
        cycle: Duration,
    ) -> f64 {
        let elapsed = since_epoch.as_secs_f64() - phase_delay.as_secs_f64();
        let period = cycle.as_secs_f64();
        if elapsed < 0.0 || period <= 0.0 {
            return self.min_opacity;
        }
        let t = elapsed.rem_euclid(period) / period;
        self.min_opacity + (self.max_opacity - self.min_opacity) * pulse(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/twinkle.rs"]
mod tests;
