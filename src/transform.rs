use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};

use crate::geometry::{transform_point, Rect, Size};

/// Resampling kernel used when a source is drawn at a different scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            "bicubic" | "cubic" | "catmull-rom" => Ok(Self::Bicubic),
            other => Err(format!(
                "Invalid filter '{}', expected nearest, bilinear or bicubic",
                other
            )),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
        };
        f.write_str(name)
    }
}

/// Source pixels as `[r*a, g*a, b*a, a]` in 0..=255 float space
fn premultiply_alpha(img: &RgbaImage) -> Vec<[f64; 4]> {
    img.pixels()
        .map(|pixel| {
            let alpha = pixel[3] as f64 / 255.0;
            [
                pixel[0] as f64 * alpha,
                pixel[1] as f64 * alpha,
                pixel[2] as f64 * alpha,
                pixel[3] as f64,
            ]
        })
        .collect()
}

/// Unpremultiply alpha: divide RGB by alpha
fn unpremultiply_alpha(premultiplied: [f64; 4]) -> Rgba<u8> {
    let alpha = premultiplied[3].round();
    if alpha < 1.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let alpha_norm = alpha.min(255.0) / 255.0;
    let channel = |v: f64| (v / alpha_norm).round().clamp(0.0, 255.0) as u8;

    Rgba([
        channel(premultiplied[0]),
        channel(premultiplied[1]),
        channel(premultiplied[2]),
        alpha.clamp(0.0, 255.0) as u8,
    ])
}

/// Catmull-Rom weights for the four taps around a sample at fraction `t`
fn cubic_weight(t: f64) -> [f64; 4] {
    let (t2, t3) = (t * t, t * t * t);
    [
        0.5 * (-t3 + 2.0 * t2 - t),
        0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
        0.5 * (-3.0 * t3 + 4.0 * t2 + t),
        0.5 * (t3 - t2),
    ]
}

/// Clamp a neighbour coordinate to the source edge
fn clamp_index(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

/// Bicubic interpolation at a given position
fn bicubic_interpolate(
    premultiplied: &[[f64; 4]],
    width: u32,
    height: u32,
    x: f64,
    y: f64,
) -> [f64; 4] {
    let x_floor = x.floor() as i64;
    let y_floor = y.floor() as i64;

    let wx = cubic_weight(x - x.floor());
    let wy = cubic_weight(y - y.floor());

    let mut result = [0.0; 4];

    for (j, weight_y) in wy.iter().enumerate() {
        let py = clamp_index(y_floor + j as i64 - 1, height);
        for (i, weight_x) in wx.iter().enumerate() {
            let px = clamp_index(x_floor + i as i64 - 1, width);
            let idx = (py as usize) * (width as usize) + px as usize;

            let weight = weight_x * weight_y;
            for c in 0..4 {
                result[c] += premultiplied[idx][c] * weight;
            }
        }
    }

    result
}

/// Bilinear interpolation
fn bilinear_interpolate(
    premultiplied: &[[f64; 4]],
    width: u32,
    height: u32,
    x: f64,
    y: f64,
) -> [f64; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let x_frac = x - x.floor();
    let y_frac = y - y.floor();

    let get_pixel = |px: i64, py: i64| -> [f64; 4] {
        let px = clamp_index(px, width) as usize;
        let py = clamp_index(py, height) as usize;
        premultiplied[py * width as usize + px]
    };

    let p00 = get_pixel(x0, y0);
    let p10 = get_pixel(x0 + 1, y0);
    let p01 = get_pixel(x0, y0 + 1);
    let p11 = get_pixel(x0 + 1, y0 + 1);

    let mut result = [0.0; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - x_frac) + p10[c] * x_frac;
        let bottom = p01[c] * (1.0 - x_frac) + p11[c] * x_frac;
        result[c] = top * (1.0 - y_frac) + bottom * y_frac;
    }

    result
}

fn nearest_sample(premultiplied: &[[f64; 4]], width: u32, height: u32, x: f64, y: f64) -> [f64; 4] {
    let px = clamp_index((x + 0.5).floor() as i64, width) as usize;
    let py = clamp_index((y + 0.5).floor() as i64, height) as usize;
    premultiplied[py * width as usize + px]
}

fn sample(
    filter: Filter,
    premultiplied: &[[f64; 4]],
    width: u32,
    height: u32,
    x: f64,
    y: f64,
) -> [f64; 4] {
    match filter {
        Filter::Nearest => nearest_sample(premultiplied, width, height, x, y),
        Filter::Bilinear => bilinear_interpolate(premultiplied, width, height, x, y),
        Filter::Bicubic => bicubic_interpolate(premultiplied, width, height, x, y),
    }
}

/// Composite `src` over `dst` (straight alpha)
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 || dst[3] == 0 {
        return src;
    }
    if src[3] == 0 {
        return dst;
    }

    let sa = src[3] as f64 / 255.0;
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| {
        let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Integer offset when `rect` places the image 1:1 on whole pixels
fn pixel_aligned_offset(rect: &Rect, width: u32, height: u32) -> Option<(i64, i64)> {
    let aligned = rect.x.fract() == 0.0
        && rect.y.fract() == 0.0
        && rect.width == width as f64
        && rect.height == height as f64;
    aligned.then_some((rect.x as i64, rect.y as i64))
}

/// Pixel indices in `0..limit` whose centers lie in `[start, end)`.
///
/// A span thinner than one pixel that covers no center still gets the pixel
/// under its midpoint, so slivers never vanish.
fn pixel_span(start: f64, end: f64, limit: u32) -> Option<(u32, u32)> {
    let lo = (start - 0.5).ceil().clamp(0.0, limit as f64) as u32;
    let hi = (end - 0.5).ceil().clamp(0.0, limit as f64) as u32;
    if lo < hi {
        return Some((lo, hi));
    }

    let mid = (start + end) / 2.0;
    if mid >= 0.0 && mid < limit as f64 {
        let px = mid.floor() as u32;
        Some((px, px + 1))
    } else {
        None
    }
}

/// Draw `image` scaled into `rect` (canvas coordinates), compositing over the
/// canvas. Pixels whose centers fall inside `rect` are touched, plus at least
/// one row or column when `rect` is thinner than a pixel. Returns the number
/// of canvas pixels written.
pub fn draw_image(canvas: &mut RgbaImage, image: &RgbaImage, rect: Rect, filter: Filter) -> u64 {
    let (src_width, src_height) = image.dimensions();
    let (dst_width, dst_height) = canvas.dimensions();
    if src_width == 0 || src_height == 0 || !rect.is_finite() || rect.is_empty() {
        return 0;
    }

    let (x_start, x_end) = match pixel_span(rect.x, rect.max_x(), dst_width) {
        Some(span) => span,
        None => return 0,
    };
    let (y_start, y_end) = match pixel_span(rect.y, rect.max_y(), dst_height) {
        Some(span) => span,
        None => return 0,
    };

    let mut written = 0;

    // 1:1 placement on the pixel grid is a straight copy
    if let Some((offset_x, offset_y)) = pixel_aligned_offset(&rect, src_width, src_height) {
        for out_y in y_start..y_end {
            for out_x in x_start..x_end {
                let src_x = (out_x as i64 - offset_x) as u32;
                let src_y = (out_y as i64 - offset_y) as u32;
                let pixel = blend_over(*canvas.get_pixel(out_x, out_y), *image.get_pixel(src_x, src_y));
                canvas.put_pixel(out_x, out_y, pixel);
                written += 1;
            }
        }
        return written;
    }

    let forward = rect.mapping_from(Size::from_pixels(src_width, src_height));
    let inverse = match forward.try_inverse() {
        Some(inv) => inv,
        None => return 0,
    };

    let premultiplied = premultiply_alpha(image);

    for out_y in y_start..y_end {
        let center_y = out_y as f64 + 0.5;
        for out_x in x_start..x_end {
            // Canvas pixel center back in source pixel space; edges clamp
            let (src_x, src_y) = transform_point(&inverse, out_x as f64 + 0.5, center_y);
            let interpolated = sample(
                filter,
                &premultiplied,
                src_width,
                src_height,
                src_x - 0.5,
                src_y - 0.5,
            );
            let pixel = blend_over(*canvas.get_pixel(out_x, out_y), unpremultiply_alpha(interpolated));
            canvas.put_pixel(out_x, out_y, pixel);
            written += 1;
        }
    }

    written
}
