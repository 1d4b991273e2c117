//! Pure calculation functions for image dimensions and placement.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CropBox, ResizeSpec, WatermarkPosition};
use thiserror::Error;

/// Largest canvas, in pixels, that any edit step may allocate.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{width} x {height} pixels exceeds the canvas limit")]
pub struct CanvasTooLarge {
    pub width: u64,
    pub height: u64,
}

/// Accept a canvas size if both sides fit `u32` and the area is within
/// [`MAX_CANVAS_PIXELS`].
///
/// ```
/// # use imgedit::imaging::check_canvas;
/// assert_eq!(check_canvas(800, 600), Ok((800, 600)));
/// assert!(check_canvas(u32::MAX as u64 + 1, 1).is_err());
/// assert!(check_canvas(100_000, 100_000).is_err());
/// ```
pub fn check_canvas(width: u64, height: u64) -> Result<(u32, u32), CanvasTooLarge> {
    let too_large = CanvasTooLarge { width, height };
    let w = u32::try_from(width).map_err(|_| too_large)?;
    let h = u32::try_from(height).map_err(|_| too_large)?;
    match width.checked_mul(height) {
        Some(area) if area <= MAX_CANVAS_PIXELS => Ok((w, h)),
        _ => Err(too_large),
    }
}

/// Calculate the output dimensions of a resize.
///
/// # Arguments
/// * `original` - Source dimensions (width, height)
/// * `spec` - Requested resize
/// * `keep_aspect` - For [`ResizeSpec::Exact`], shrink the dimension that
///   would overshoot the source aspect ratio so proportions are preserved
///
/// # Returns
/// * `Some((width, height))`, never zero in either dimension; targets past
///   `u32::MAX` saturate, so [`check_canvas`] rejects them
/// * `None` if the spec cannot produce an image (zero or non-finite target)
///
/// # Examples
/// ```
/// # use imgedit::imaging::{ResizeSpec, calculate_resize_dimensions};
/// // 800x600 into a 400x400 box keeps 4:3 → 400x300
/// assert_eq!(
///     calculate_resize_dimensions((800, 600), ResizeSpec::Exact { width: 400, height: 400 }, true),
///     Some((400, 300))
/// );
/// ```
pub fn calculate_resize_dimensions(
    original: (u32, u32),
    spec: ResizeSpec,
    keep_aspect: bool,
) -> Option<(u32, u32)> {
    let (orig_w, orig_h) = original;
    if orig_w == 0 || orig_h == 0 {
        return None;
    }
    let aspect = orig_w as f64 / orig_h as f64;

    let (w, h) = match spec {
        ResizeSpec::Scale(factor) => {
            if !factor.is_finite() || factor <= 0.0 {
                return None;
            }
            (
                (orig_w as f64 * factor).round(),
                (orig_h as f64 * factor).round(),
            )
        }
        ResizeSpec::Exact { width, height } => {
            if width == 0 || height == 0 {
                return None;
            }
            let (w, h) = (width as f64, height as f64);
            if !keep_aspect {
                (w, h)
            } else if w / h > aspect {
                // Target box is wider than the source: height is the tight edge
                ((h * aspect).round(), h)
            } else {
                (w, (w / aspect).round())
            }
        }
        ResizeSpec::Width(width) => {
            if width == 0 {
                return None;
            }
            let w = width as f64;
            (w, (w / aspect).round())
        }
        ResizeSpec::Height(height) => {
            if height == 0 {
                return None;
            }
            let h = height as f64;
            ((h * aspect).round(), h)
        }
    };

    // Float-to-int casts saturate
    Some(((w as u32).max(1), (h as u32).max(1)))
}

/// Pixel rectangle produced by [`calculate_crop_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Convert one crop coordinate to pixels.
///
/// Values in `[0, 1]` are fractions of `extent`; anything else is a literal
/// pixel offset. Both are truncated toward zero.
fn crop_coordinate(value: f64, extent: u32) -> i64 {
    if (0.0..=1.0).contains(&value) {
        (extent as f64 * value) as i64
    } else {
        value as i64
    }
}

/// Resolve a crop box against an image size.
///
/// The result always satisfies `0 <= left < right <= width` and
/// `0 <= top < bottom <= height`: left/top are clamped into the image and
/// right/bottom are forced at least one pixel past them.
pub fn calculate_crop_rect(crop: CropBox, size: (u32, u32)) -> CropRect {
    let (width, height) = size;
    let (width, height) = (width.max(1) as i64, height.max(1) as i64);

    let left = crop_coordinate(crop.left, width as u32).clamp(0, width - 1);
    let top = crop_coordinate(crop.top, height as u32).clamp(0, height - 1);
    let right = crop_coordinate(crop.right, width as u32)
        .min(width)
        .max(left + 1);
    let bottom = crop_coordinate(crop.bottom, height as u32)
        .min(height)
        .max(top + 1);

    CropRect {
        left: left as u32,
        top: top as u32,
        right: right as u32,
        bottom: bottom as u32,
    }
}

/// Canvas size that fully contains an image rotated by `degrees`.
///
/// Multiples of 90° are exact (width/height swap or stay); other angles take
/// the bounding box of the rotated corners, rounded up.
pub fn calculate_rotated_bounds(size: (u32, u32), degrees: f32) -> (u32, u32) {
    let (w, h) = size;
    let angle = (degrees as f64).rem_euclid(360.0);

    if angle == 0.0 || angle == 180.0 {
        return (w, h);
    }
    if angle == 90.0 || angle == 270.0 {
        return (h, w);
    }

    let radians = angle.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    // Tolerate float noise so an exact fit does not grow by a pixel
    let fit = |v: f64| (v - 1e-6).ceil().max(1.0) as u32;
    (
        fit(w as f64 * cos + h as f64 * sin),
        fit(w as f64 * sin + h as f64 * cos),
    )
}

/// Default watermark font size: one twentieth of the width, within 10..=50px.
pub fn default_watermark_font_size(image_width: u32) -> u32 {
    (image_width / 20).clamp(10, 50)
}

/// Top-left origin of the watermark text.
///
/// Corners sit `padding` pixels from both edges; `Center` ignores padding.
/// The origin may be negative when the text is larger than the image.
///
/// ```
/// # use imgedit::imaging::{WatermarkPosition, calculate_watermark_origin};
/// assert_eq!(
///     calculate_watermark_origin(WatermarkPosition::Center, (100, 100), (20, 10), 20),
///     (40, 45)
/// );
/// ```
pub fn calculate_watermark_origin(
    position: WatermarkPosition,
    image: (u32, u32),
    text: (u32, u32),
    padding: u32,
) -> (i32, i32) {
    let (img_w, img_h) = (image.0 as i64, image.1 as i64);
    let (text_w, text_h) = (text.0 as i64, text.1 as i64);
    let pad = padding as i64;

    let (x, y) = match position {
        WatermarkPosition::TopLeft => (pad, pad),
        WatermarkPosition::TopRight => (img_w - text_w - pad, pad),
        WatermarkPosition::BottomLeft => (pad, img_h - text_h - pad),
        WatermarkPosition::BottomRight => (img_w - text_w - pad, img_h - text_h - pad),
        WatermarkPosition::Center => ((img_w - text_w).div_euclid(2), (img_h - text_h).div_euclid(2)),
    };

    let to_i32 = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    (to_i32(x), to_i32(y))
}
