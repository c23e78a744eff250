//! Off-screen drawing surfaces.
//!
//! A [`ContextFactory`] hands out one [`GraphicsContext`] per operation. The
//! context owns its backing store and releases it when dropped, so every exit
//! path of an operation (including `?`) frees the surface.

use image::RgbaImage;
use tracing::trace;

use crate::error::{ResizeError, Result};
use crate::geometry::{Rect, Size};
use crate::transform::{draw_image, Filter};

/// Default upper bound on the pixel count of a single context (16384 x 16384)
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 28;

/// Creates drawing contexts sized for a single operation
pub trait ContextFactory {
    type Context: GraphicsContext;

    fn create(&self, size: Size) -> Result<Self::Context>;
}

/// A drawing surface an image can be rendered into and extracted from
pub trait GraphicsContext {
    /// Dimensions of the backing store in pixels
    fn pixel_size(&self) -> (u32, u32);

    /// Draw `image` scaled into `rect`, given in context coordinates
    fn draw_image(&mut self, image: &RgbaImage, rect: Rect) -> Result<()>;

    /// Consume the context and return what was drawn
    fn finish(self) -> Result<RgbaImage>;
}

/// CPU raster backend over [`RgbaImage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterBackend {
    pub filter: Filter,
    pub max_pixels: u64,
}

impl RasterBackend {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new(Filter::default())
    }
}

impl ContextFactory for RasterBackend {
    type Context = RasterContext;

    fn create(&self, size: Size) -> Result<RasterContext> {
        let (width, height) = size.pixel_dimensions()?;

        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(ResizeError::context_unavailable(format!(
                "{}x{} exceeds the limit of {} pixels",
                width, height, self.max_pixels
            )));
        }

        trace!(width, height, "acquired raster context");
        Ok(RasterContext {
            canvas: Some(RgbaImage::new(width, height)),
            filter: self.filter,
        })
    }
}

/// Transparent canvas owned for the duration of one operation
#[derive(Debug)]
pub struct RasterContext {
    canvas: Option<RgbaImage>,
    filter: Filter,
}

impl RasterContext {
    fn canvas_mut(&mut self) -> Result<&mut RgbaImage> {
        self.canvas
            .as_mut()
            .ok_or_else(|| ResizeError::context_unavailable("context already finished"))
    }
}

impl GraphicsContext for RasterContext {
    fn pixel_size(&self) -> (u32, u32) {
        self.canvas.as_ref().map_or((0, 0), |c| c.dimensions())
    }

    fn draw_image(&mut self, image: &RgbaImage, rect: Rect) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ResizeError::EmptySource);
        }
        if !rect.is_finite() {
            return Err(ResizeError::invalid_size(rect.width, rect.height));
        }

        let filter = self.filter;
        let canvas = self.canvas_mut()?;
        let written = draw_image(canvas, image, rect, filter);
        trace!(%rect, %filter, written, "drew image");
        Ok(())
    }

    fn finish(mut self) -> Result<RgbaImage> {
        self.canvas
            .take()
            .ok_or_else(|| ResizeError::context_unavailable("context already finished"))
    }
}

impl Drop for RasterContext {
    fn drop(&mut self) {
        match &self.canvas {
            Some(canvas) => trace!(
                width = canvas.width(),
                height = canvas.height(),
                "released unfinished raster context"
            ),
            None => trace!("released raster context"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_create_allocates_transparent_canvas() {
        let ctx = RasterBackend::default().create(Size::new(3.0, 2.5)).unwrap();
        assert_eq!(ctx.pixel_size(), (3, 3));

        let img = ctx.finish().unwrap();
        assert_eq!(img.dimensions(), (3, 3));
        assert!(img.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_create_rejects_degenerate_sizes() {
        let backend = RasterBackend::default();
        assert!(matches!(
            backend.create(Size::new(0.0, 10.0)),
            Err(ResizeError::InvalidSize { .. })
        ));
        assert!(backend.create(Size::new(-4.0, 10.0)).is_err());
        assert!(backend.create(Size::new(f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_create_enforces_pixel_limit() {
        let backend = RasterBackend::default().with_max_pixels(100);
        assert!(backend.create(Size::new(10.0, 10.0)).is_ok());
        assert!(matches!(
            backend.create(Size::new(10.0, 11.0)),
            Err(ResizeError::ContextUnavailable(_))
        ));
    }

    #[test]
    fn test_draw_and_extract() {
        let mut ctx = RasterBackend::new(Filter::Nearest)
            .create(Size::new(4.0, 4.0))
            .unwrap();
        let red = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        ctx.draw_image(&red, Rect::new(2.0, 2.0, 2.0, 2.0)).unwrap();

        let img = ctx.finish().unwrap();
        assert_eq!(*img.get_pixel(3, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_draw_rejects_empty_image() {
        let mut ctx = RasterBackend::default().create(Size::new(2.0, 2.0)).unwrap();
        let empty = RgbaImage::new(0, 0);
        assert_eq!(
            ctx.draw_image(&empty, Rect::new(0.0, 0.0, 2.0, 2.0)),
            Err(ResizeError::EmptySource)
        );
    }
}
