//! Resize, crop and rotate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Crop | `DynamicImage::crop_imm` |
//! | Quarter turns | `DynamicImage::rotate90` / `rotate180` / `rotate270` |
//! | Free rotation | `imageproc::geometric_transformations::rotate_about_center`, bicubic |

use super::calculations::{
    calculate_crop_rect, calculate_resize_dimensions, calculate_rotated_bounds, check_canvas,
};
use super::params::{CropBox, ResizeSpec};
use super::pipeline::StepError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

/// Resize according to `spec`.
///
/// Fails when the spec yields no image or a canvas over the pixel limit.
pub fn resize(img: &DynamicImage, spec: ResizeSpec, keep_aspect: bool) -> Result<DynamicImage, StepError> {
    let (width, height) = calculate_resize_dimensions(img.dimensions(), spec, keep_aspect)
        .ok_or(StepError::EmptyResize(spec))?;
    check_canvas(width.into(), height.into())?;
    if (width, height) == img.dimensions() {
        return Ok(img.clone());
    }
    Ok(img.resize_exact(width, height, FilterType::Lanczos3))
}

/// Crop to `crop`, clamped into the image so the result is never empty.
pub fn crop(img: &DynamicImage, crop: CropBox) -> DynamicImage {
    let rect = calculate_crop_rect(crop, img.dimensions());
    img.crop_imm(rect.left, rect.top, rect.width(), rect.height())
}

/// Rotate counter-clockwise by `degrees`, growing the canvas to fit.
///
/// Quarter turns are lossless transposes. Other angles are resampled
/// bicubically; uncovered corners are black, or transparent for images with
/// alpha.
pub fn rotate(img: &DynamicImage, degrees: f32) -> DynamicImage {
    let angle = (degrees as f64).rem_euclid(360.0);
    if angle == 0.0 {
        return img.clone();
    }
    if angle == 90.0 {
        return img.rotate270();
    }
    if angle == 180.0 {
        return img.rotate180();
    }
    if angle == 270.0 {
        return img.rotate90();
    }

    let bounds = calculate_rotated_bounds(img.dimensions(), degrees);
    // imageproc turns clockwise for positive angles
    let theta = -(angle as f32).to_radians();

    match img {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(rotate_expanded(buf, theta, bounds, Luma([0])))
        }
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(rotate_expanded(buf, theta, bounds, LumaA([0, 0])))
        }
        DynamicImage::ImageRgb8(buf) => {
            DynamicImage::ImageRgb8(rotate_expanded(buf, theta, bounds, Rgb([0, 0, 0])))
        }
        other => DynamicImage::ImageRgba8(rotate_expanded(
            &other.to_rgba8(),
            theta,
            bounds,
            Rgba([0, 0, 0, 0]),
        )),
    }
}

/// Center `src` on a `bounds`-sized canvas of `fill`, then rotate about the center.
fn rotate_expanded<P>(
    src: &ImageBuffer<P, Vec<u8>>,
    theta: f32,
    bounds: (u32, u32),
    fill: P,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + Send + Sync,
{
    let (width, height) = bounds;
    let mut canvas = ImageBuffer::from_pixel(width, height, fill);
    let x = (width as i64 - src.width() as i64) / 2;
    let y = (height as i64 - src.height() as i64) / 2;
    imageops::replace(&mut canvas, src, x, y);
    rotate_about_center(&canvas, theta, Interpolation::Bicubic, fill)
}
