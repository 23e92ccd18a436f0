use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Point, Rgba8, Viewport};
use crate::foundation::error::{StarlitError, StarlitResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::surface::DrawSurface;

const CIRCLE_TOLERANCE: f64 = 0.1;

/// Readback of one presented frame in device pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha; no-op when already straight.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }

    /// RGBA bytes at `(x, y)` as stored; `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha RGBA image for PNG export.
    pub fn to_image(&self) -> StarlitResult<image::RgbaImage> {
        let straight = self.clone().into_straight();
        image::RgbaImage::from_raw(straight.width, straight.height, straight.data)
            .ok_or_else(|| StarlitError::surface("frame buffer size does not match dimensions"))
    }
}

/// `vello_cpu` surface with a device-pixel-ratio scaled backing pixmap.
pub struct CpuSurface {
    viewport: Viewport,
    dpr: f64,
    width: u16,
    height: u16,
    background: Option<Rgba8>,
    pixmap: vello_cpu::Pixmap,
    frame: Option<vello_cpu::RenderContext>,
}

impl CpuSurface {
    /// Allocate a surface; `background` is filled on every `clear`, transparent when `None`.
    pub fn new(viewport: Viewport, dpr: f64, background: Option<Rgba8>) -> StarlitResult<Self> {
        let (width, height) = backing_size(viewport, dpr)?;
        Ok(Self {
            viewport,
            dpr,
            width,
            height,
            background,
            pixmap: vello_cpu::Pixmap::new(width, height),
            frame: None,
        })
    }

    /// Logical viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Backing size in device pixels.
    pub fn backing_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Copy of the last presented frame (premultiplied).
    pub fn readback(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

impl DrawSurface for CpuSurface {
    fn resize(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> StarlitResult<()> {
        let (width, height) = backing_size(viewport, device_pixel_ratio)?;
        if width != self.width || height != self.height {
            self.pixmap = vello_cpu::Pixmap::new(width, height);
            self.width = width;
            self.height = height;
        }
        self.viewport = viewport;
        self.dpr = device_pixel_ratio;
        self.frame = None;
        Ok(())
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    fn clear(&mut self) -> StarlitResult<()> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::scale(self.dpr));
        if let Some(bg) = self.background {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                self.viewport.width,
                self.viewport.height,
            ));
        }
        self.frame = Some(ctx);
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) -> StarlitResult<()> {
        if !(radius.is_finite() && radius >= 0.0) || !(center.x.is_finite() && center.y.is_finite())
        {
            return Err(StarlitError::draw(format!(
                "invalid circle at ({}, {}) radius {radius}",
                center.x, center.y
            )));
        }
        let ctx = self
            .frame
            .as_mut()
            .ok_or_else(|| StarlitError::draw("fill_circle called outside a frame"))?;
        if radius == 0.0 || color.a == 0 {
            return Ok(());
        }
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        let circle = vello_cpu::kurbo::Circle::new((center.x, center.y), radius);
        ctx.fill_path(&circle.to_path(CIRCLE_TOLERANCE));
        Ok(())
    }

    fn present(&mut self) -> StarlitResult<()> {
        let mut ctx = self
            .frame
            .take()
            .ok_or_else(|| StarlitError::draw("present called outside a frame"))?;
        ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }
}

fn backing_size(viewport: Viewport, dpr: f64) -> StarlitResult<(u16, u16)> {
    viewport.validate()?;
    if !(dpr.is_finite() && dpr > 0.0) {
        return Err(StarlitError::surface(format!(
            "device pixel ratio must be finite and positive, got {dpr}"
        )));
    }
    let to_u16 = |logical: f64, what: &str| -> StarlitResult<u16> {
        let device = (logical * dpr).ceil();
        if !(1.0..=f64::from(u16::MAX)).contains(&device) {
            return Err(StarlitError::surface(format!(
                "backing {what} {device} is outside 1..={}",
                u16::MAX
            )));
        }
        Ok(device as u16)
    };
    Ok((
        to_u16(viewport.width, "width")?,
        to_u16(viewport.height, "height")?,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
