use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::context::{ContextFactory, GraphicsContext, RasterBackend};
use crate::error::{ResizeError, Result};
use crate::geometry::{resolve_on_pixels, ContentMode, Rect, Size};

/// Resize and crop operations over an injected context factory.
///
/// Every operation is a pure function of the source image and its arguments:
/// it acquires one context, draws into it, and returns a new image. An `Err`
/// means no image was produced.
#[derive(Debug, Clone, Default)]
pub struct Resizer<F = RasterBackend> {
    factory: F,
}

impl<F: ContextFactory> Resizer<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Scale `image` to `size` using `mode`. Fractional sizes round up to
    /// whole pixels; fill and aspect-fill still cover every pixel.
    pub fn scale_to_size(&self, image: &RgbaImage, size: Size, mode: ContentMode) -> Result<RgbaImage> {
        let source = source_size(image)?;
        let placement = resolve_on_pixels(source, size, mode)?;
        debug!(
            %mode,
            %source,
            target = %size,
            draw = %placement.draw,
            "resolved placement"
        );

        let mut ctx = self.factory.create(placement.canvas)?;
        ctx.draw_image(image, placement.draw)?;
        ctx.finish()
    }

    /// Copy the pixels inside `bounds` into a new image.
    ///
    /// The bounds are snapped outward to whole pixels and clamped to the
    /// source; bounds that miss the source entirely are an error.
    pub fn crop_to_bounds(&self, image: &RgbaImage, bounds: Rect) -> Result<RgbaImage> {
        let source = source_size(image)?;
        let empty_crop = || ResizeError::EmptyCrop {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        };

        if !bounds.is_finite() {
            return Err(empty_crop());
        }
        let crop = bounds
            .integral()
            .intersection(&Rect::from_size(source))
            .ok_or_else(empty_crop)?;
        debug!(requested = %bounds, clamped = %crop, "resolved crop");

        let mut ctx = self.factory.create(crop.size())?;
        ctx.draw_image(image, Rect::new(-crop.x, -crop.y, source.width, source.height))?;
        ctx.finish()
    }

    /// Stretch to exactly `size`, ignoring aspect ratio
    pub fn scale_to_fill_size(&self, image: &RgbaImage, size: Size) -> Result<RgbaImage> {
        self.scale_to_size(image, size, ContentMode::Fill)
    }

    /// Cover `size` preserving aspect ratio, trimming the overflow evenly
    pub fn scale_aspect_fill_size(&self, image: &RgbaImage, size: Size) -> Result<RgbaImage> {
        self.scale_to_size(image, size, ContentMode::AspectFill)
    }

    /// Fit inside `size` preserving aspect ratio, padding with transparency
    pub fn scale_aspect_fit_size(&self, image: &RgbaImage, size: Size) -> Result<RgbaImage> {
        self.scale_to_size(image, size, ContentMode::AspectFit)
    }
}

fn source_size(image: &RgbaImage) -> Result<Size> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ResizeError::EmptySource);
    }
    Ok(Size::from_pixels(width, height))
}

/// Resize methods on image types, backed by the default raster backend
pub trait SimpleResize {
    fn scaled_to_size(&self, size: Size, mode: ContentMode) -> Result<RgbaImage>;

    fn cropped_to_bounds(&self, bounds: Rect) -> Result<RgbaImage>;

    fn scaled_to_fill_size(&self, size: Size) -> Result<RgbaImage> {
        self.scaled_to_size(size, ContentMode::Fill)
    }

    fn scaled_aspect_fill_size(&self, size: Size) -> Result<RgbaImage> {
        self.scaled_to_size(size, ContentMode::AspectFill)
    }

    fn scaled_aspect_fit_size(&self, size: Size) -> Result<RgbaImage> {
        self.scaled_to_size(size, ContentMode::AspectFit)
    }
}

impl SimpleResize for RgbaImage {
    fn scaled_to_size(&self, size: Size, mode: ContentMode) -> Result<RgbaImage> {
        Resizer::<RasterBackend>::default().scale_to_size(self, size, mode)
    }

    fn cropped_to_bounds(&self, bounds: Rect) -> Result<RgbaImage> {
        Resizer::<RasterBackend>::default().crop_to_bounds(self, bounds)
    }
}

impl SimpleResize for DynamicImage {
    fn scaled_to_size(&self, size: Size, mode: ContentMode) -> Result<RgbaImage> {
        self.to_rgba8().scaled_to_size(size, mode)
    }

    fn cropped_to_bounds(&self, bounds: Rect) -> Result<RgbaImage> {
        self.to_rgba8().cropped_to_bounds(bounds)
    }
}
