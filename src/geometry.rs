use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Vector2, Vector3};

use crate::error::{ResizeError, Result};

/// A 2-D magnitude in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size of an image with the given pixel dimensions
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    /// Both dimensions finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ResizeError::invalid_size(self.width, self.height))
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Whole pixel dimensions covering this size (fractional sizes round up)
    pub fn pixel_dimensions(&self) -> Result<(u32, u32)> {
        let size = self.validate()?;
        let width = size.width.ceil();
        let height = size.height.ceil();
        if width > u32::MAX as f64 || height > u32::MAX as f64 {
            return Err(ResizeError::invalid_size(size.width, size.height));
        }
        Ok((width as u32, height as u32))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle: origin plus size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering `size`
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Same rectangle with non-negative width and height
    pub fn standardized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }

    /// Smallest rectangle on whole pixel boundaries that contains this one
    pub fn integral(&self) -> Self {
        let r = self.standardized();
        let x0 = r.x.floor();
        let y0 = r.y.floor();
        let x1 = r.max_x().ceil();
        let y1 = r.max_y().ceil();
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Overlap of two rectangles, `None` when they do not overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let a = self.standardized();
        let b = other.standardized();
        let x0 = a.x.max(b.x);
        let y0 = a.y.max(b.y);
        let x1 = a.max_x().min(b.max_x());
        let y1 = a.max_y().min(b.max_y());
        let overlap = Rect::new(x0, y0, x1 - x0, y1 - y0);
        if overlap.is_empty() {
            None
        } else {
            Some(overlap)
        }
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Affine matrix that maps a `source`-sized image into this rectangle
    pub fn mapping_from(&self, source: Size) -> Matrix3<f64> {
        let sx = self.width / source.width;
        let sy = self.height / source.height;

        Matrix3::new(
            sx, 0.0, self.x,
            0.0, sy, self.y,
            0.0, 0.0, 1.0,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// How a source is mapped into a differently sized destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Stretch to the target, ignoring aspect ratio
    Fill,
    /// Preserve aspect ratio, cover the target and trim the overflow
    AspectFill,
    /// Preserve aspect ratio, fit inside the target with transparent padding
    #[default]
    AspectFit,
}

impl FromStr for ContentMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fill" | "stretch" | "scale-to-fill" => Ok(Self::Fill),
            "aspect-fill" | "aspectfill" | "cover" => Ok(Self::AspectFill),
            "aspect-fit" | "aspectfit" | "contain" => Ok(Self::AspectFit),
            other => Err(format!(
                "Invalid content mode '{}', expected fill, aspect-fill or aspect-fit",
                other
            )),
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fill => "fill",
            Self::AspectFill => "aspect-fill",
            Self::AspectFit => "aspect-fit",
        };
        f.write_str(name)
    }
}

/// Where a source image lands in the output canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Size of the output image
    pub canvas: Size,
    /// Rectangle, in canvas coordinates, that the whole source is drawn into.
    /// May extend past the canvas (aspect-fill) or leave padding (aspect-fit).
    pub draw: Rect,
    /// For aspect-fill: the centered crop taken out of the scaled intermediate
    pub crop: Option<Rect>,
}

impl Placement {
    /// Horizontal and vertical scale factors relative to `source`
    pub fn scale(&self, source: Size) -> Vector2<f64> {
        Vector2::new(self.draw.width / source.width, self.draw.height / source.height)
    }

    /// Affine matrix from source coordinates to canvas coordinates
    pub fn source_to_canvas(&self, source: Size) -> Matrix3<f64> {
        self.draw.mapping_from(source)
    }

    /// Part of the canvas actually covered by source pixels
    pub fn covered(&self) -> Option<Rect> {
        self.draw.intersection(&Rect::from_size(self.canvas))
    }
}

/// Compute the draw (and crop) rectangles for scaling `source` to `target`
pub fn resolve(source: Size, target: Size, mode: ContentMode) -> Result<Placement> {
    let source = source.validate()?;
    let target = target.validate()?;

    let scale_x = target.width / source.width;
    let scale_y = target.height / source.height;

    let placement = match mode {
        ContentMode::Fill => Placement {
            canvas: target,
            draw: Rect::from_size(target),
            crop: None,
        },
        ContentMode::AspectFit => {
            let scale = scale_x.min(scale_y);
            let drawn = Size::new(source.width * scale, source.height * scale);
            Placement {
                canvas: target,
                draw: Rect::new(
                    (target.width - drawn.width) / 2.0,
                    (target.height - drawn.height) / 2.0,
                    drawn.width,
                    drawn.height,
                ),
                crop: None,
            }
        }
        ContentMode::AspectFill => {
            let scale = scale_x.max(scale_y);
            let drawn = Size::new(source.width * scale, source.height * scale);
            let crop = Rect::new(
                (drawn.width - target.width) / 2.0,
                (drawn.height - target.height) / 2.0,
                target.width,
                target.height,
            );
            Placement {
                canvas: target,
                draw: Rect::new(-crop.x, -crop.y, drawn.width, drawn.height),
                crop: Some(crop),
            }
        }
    };

    Ok(placement)
}

/// Resolve onto the whole-pixel canvas that will actually be allocated.
///
/// Fill and aspect-fill are resolved against the rounded-up canvas so every
/// pixel is covered. Aspect-fit stays centered within the requested `target`
/// and leaves the rounding slack as padding.
pub fn resolve_on_pixels(source: Size, target: Size, mode: ContentMode) -> Result<Placement> {
    let (width, height) = target.pixel_dimensions()?;
    let canvas = Size::from_pixels(width, height);

    match mode {
        ContentMode::Fill | ContentMode::AspectFill => resolve(source, canvas, mode),
        ContentMode::AspectFit => {
            let placement = resolve(source, target, mode)?;
            Ok(Placement { canvas, ..placement })
        }
    }
}

/// Transform a point using the affine matrix
pub fn transform_point(matrix: &Matrix3<f64>, x: f64, y: f64) -> (f64, f64) {
    let p = Vector3::new(x, y, 1.0);
    let result = matrix * p;
    (result.x / result.z, result.y / result.z)
}
