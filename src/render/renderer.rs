use std::sync::Arc;
use std::time::Duration;

use crate::animation::twinkle::TwinkleAnimator;
use crate::field::model::Population;
use crate::foundation::core::Viewport;
use crate::foundation::error::StarlitResult;
use crate::render::surface::{DrawSurface, FrameHandle, FrameScheduler, ManualFrameClock};

/// Draw loop state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// A frame is (or will be) scheduled.
    Active,
    /// No frame scheduled; `resume` re-arms.
    Suspended,
    /// Stopped after a surface failure or `dispose`; terminal.
    Halted,
}

/// Result of delivering one frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn and the next one requested.
    Drawn {
        /// Stars drawn.
        stars: usize,
        /// Planets drawn.
        planets: usize,
    },
    /// Nothing was drawn: stale handle, suspended, or no viewport yet.
    Skipped,
    /// The draw loop is stopped for good.
    Halted,
}

/// Continuous draw loop over the current population.
///
/// At most one frame request is outstanding at any time. A failing draw halts the loop; it is
/// never retried.
pub struct SceneRenderer<S, F> {
    surface: S,
    frames: F,
    twinkle: TwinkleAnimator,
    population: Arc<Population>,
    state: RenderState,
    pending: Option<FrameHandle>,
    frames_drawn: u64,
}

impl<S: DrawSurface, F: FrameScheduler> SceneRenderer<S, F> {
    /// Suspended renderer with an empty population.
    pub fn new(surface: S, frames: F, twinkle: TwinkleAnimator) -> Self {
        Self {
            surface,
            frames,
            twinkle,
            population: Arc::new(Population::empty()),
            state: RenderState::Suspended,
            pending: None,
            frames_drawn: 0,
        }
    }

    /// Request the first frame.
    pub fn start(&mut self) {
        self.resume();
    }

    /// Swap in a new population; the next frame draws it in full.
    pub fn set_population(&mut self, population: Arc<Population>) {
        self.population = population;
    }

    /// Resize the surface at its current pixel ratio; a failure halts the loop.
    pub fn resize_surface(&mut self, viewport: Viewport) -> StarlitResult<()> {
        let dpr = self.surface.device_pixel_ratio();
        if let Err(err) = self.surface.resize(viewport, dpr) {
            tracing::error!(%err, "surface resize failed; halting draw loop");
            self.halt();
            return Err(err);
        }
        Ok(())
    }

    /// Handle a delivered frame request. Stale or cancelled handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now: Duration) -> FrameOutcome {
        if self.pending != Some(handle) {
            return match self.state {
                RenderState::Halted => FrameOutcome::Halted,
                _ => FrameOutcome::Skipped,
            };
        }
        self.pending = None;
        if self.state != RenderState::Active {
            return FrameOutcome::Skipped;
        }

        let population = Arc::clone(&self.population);
        let outcome = if population.viewport.is_none() {
            FrameOutcome::Skipped
        } else {
            match self.draw(&population, now) {
                Ok(()) => {
                    self.frames_drawn += 1;
                    FrameOutcome::Drawn {
                        stars: population.stars.len(),
                        planets: population.planets.len(),
                    }
                }
                Err(err) => {
                    tracing::error!(%err, "draw failed; halting draw loop");
                    self.halt();
                    return FrameOutcome::Halted;
                }
            }
        };
        self.pending = Some(self.frames.request_frame());
        outcome
    }

    /// Stop drawing and cancel the pending frame request before returning.
    pub fn suspend(&mut self) {
        if self.state != RenderState::Active {
            return;
        }
        self.state = RenderState::Suspended;
        self.cancel_pending();
    }

    /// Schedule a fresh frame unless one is already pending.
    pub fn resume(&mut self) {
        if self.state != RenderState::Suspended {
            return;
        }
        self.state = RenderState::Active;
        if self.pending.is_none() {
            self.pending = Some(self.frames.request_frame());
        }
    }

    /// Halt for good, cancelling any pending request.
    pub fn dispose(&mut self) {
        self.halt();
    }

    /// Current state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Handle of the outstanding request, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames drawn so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Frame scheduler.
    pub fn frames(&self) -> &F {
        &self.frames
    }

    fn draw(&mut self, population: &Population, now: Duration) -> StarlitResult<()> {
        self.surface.clear()?;
        for star in &population.stars {
            let opacity = self.twinkle.opacity(star, now);
            self.surface.fill_circle(
                star.position,
                star.diameter * 0.5,
                star.color.with_opacity(opacity),
            )?;
        }
        for planet in &population.planets {
            self.surface.fill_circle(
                planet.position,
                planet.diameter * 0.5,
                planet.color.with_opacity(planet.opacity),
            )?;
        }
        self.surface.present()
    }

    fn halt(&mut self) {
        self.state = RenderState::Halted;
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
    }
}

impl<S: DrawSurface> SceneRenderer<S, ManualFrameClock> {
    /// Deliver the next outstanding frame request from the manual clock.
    pub fn pump(&mut self, now: Duration) -> FrameOutcome {
        match self.frames.take_next() {
            Some(handle) => self.on_frame(handle, now),
            None if self.state == RenderState::Halted => FrameOutcome::Halted,
            None => FrameOutcome::Skipped,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
