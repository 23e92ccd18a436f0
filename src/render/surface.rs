use std::collections::BTreeSet;

use crate::foundation::core::{Point, Rgba8, Viewport};
use crate::foundation::error::StarlitResult;

/// 2D raster target in logical (CSS pixel) coordinates.
///
/// Implementations may back the surface with a buffer scaled by the device pixel ratio; callers
/// never see device pixels.
pub trait DrawSurface {
    /// Reallocate the backing store for a new viewport and pixel ratio.
    fn resize(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> StarlitResult<()>;
    /// Current device pixel ratio.
    fn device_pixel_ratio(&self) -> f64;
    /// Begin a frame with a cleared target.
    fn clear(&mut self) -> StarlitResult<()>;
    /// Fill a circle of `radius` logical pixels around `center`.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) -> StarlitResult<()>;
    /// Finish the frame started by [`DrawSurface::clear`].
    fn present(&mut self) -> StarlitResult<()>;
}

/// Identifies one frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// Refresh-synchronized frame requests with cancellation.
pub trait FrameScheduler {
    /// Ask for a callback on the next refresh.
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a request; unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame scheduler driven by hand; used headless and in tests.
#[derive(Debug, Default)]
pub struct ManualFrameClock {
    next: u64,
    pending: BTreeSet<FrameHandle>,
    max_outstanding: usize,
    requested: u64,
    cancelled: u64,
}

impl ManualFrameClock {
    /// Clock with no requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet delivered or cancelled.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// High-water mark of simultaneously outstanding requests.
    pub fn max_outstanding(&self) -> usize {
        self.max_outstanding
    }

    /// Total requests made.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total requests cancelled.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Deliver the oldest outstanding request.
    pub fn take_next(&mut self) -> Option<FrameHandle> {
        self.pending.pop_first()
    }
}

impl FrameScheduler for ManualFrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.requested += 1;
        self.pending.insert(handle);
        self.max_outstanding = self.max_outstanding.max(self.pending.len());
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.remove(&handle) {
            self.cancelled += 1;
        }
    }
}

impl<F: FrameScheduler + ?Sized> FrameScheduler for &mut F {
    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }
}
