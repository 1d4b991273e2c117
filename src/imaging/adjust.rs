//! Continuous enhancements: brightness, contrast, sharpness, color.
//!
//! Each one blends the image against a *degenerate* version of itself:
//!
//! ```text
//! out = degenerate + factor * (image - degenerate)
//! ```
//!
//! | Enhancement | Degenerate image |
//! |---|---|
//! | brightness | black |
//! | contrast | flat gray at the mean luminance |
//! | sharpness | the image run through the `smooth` kernel |
//! | color | the luminance of the image |
//!
//! A factor of 1.0 returns the image unchanged, 0.0 returns the degenerate
//! image, and larger factors extrapolate. Alpha is never blended.

use super::filters::SMOOTH;
use super::params::Adjustments;
use super::raster::{self, PixelLayout};
use image::DynamicImage;

/// Apply each provided factor in the fixed order brightness, contrast,
/// sharpness, color.
pub fn apply_adjustments(img: &DynamicImage, adjustments: &Adjustments) -> DynamicImage {
    let mut out = raster::to_8bit(img);
    if let Some(factor) = adjustments.brightness {
        out = brightness(&out, factor);
    }
    if let Some(factor) = adjustments.contrast {
        out = contrast(&out, factor);
    }
    if let Some(factor) = adjustments.sharpness {
        out = sharpness(&out, factor);
    }
    if let Some(factor) = adjustments.color {
        out = color(&out, factor);
    }
    out
}

pub fn brightness(img: &DynamicImage, factor: f32) -> DynamicImage {
    raster::map_color_samples(&raster::to_8bit(img), |_, v| blend(0, v, factor))
}

pub fn contrast(img: &DynamicImage, factor: f32) -> DynamicImage {
    let img = raster::to_8bit(img);
    let mean = mean_luma(&img);
    raster::map_color_samples(&img, |_, v| blend(mean, v, factor))
}

pub fn sharpness(img: &DynamicImage, factor: f32) -> DynamicImage {
    let img = raster::to_8bit(img);
    let smoothed = SMOOTH.apply(&img);
    let degenerate = smoothed.as_bytes();
    let mut out = img.clone();
    raster::with_samples_mut(&mut out, |samples, layout| {
        for (i, sample) in samples.iter_mut().enumerate() {
            if i % layout.channels < layout.color {
                *sample = blend(degenerate[i], *sample, factor);
            }
        }
    });
    out
}

pub fn color(img: &DynamicImage, factor: f32) -> DynamicImage {
    let mut out = raster::to_8bit(img);
    raster::with_samples_mut(&mut out, |samples, layout| {
        if layout.color < 3 {
            return;
        }
        for pixel in samples.chunks_exact_mut(layout.channels) {
            let gray = luma(pixel[0], pixel[1], pixel[2]);
            for sample in &mut pixel[..3] {
                *sample = blend(gray, *sample, factor);
            }
        }
    });
    out
}

/// `degenerate + factor * (value - degenerate)`, truncated into `0..=255`.
fn blend(degenerate: u8, value: u8, factor: f32) -> u8 {
    let d = f32::from(degenerate);
    (d + factor * (f32::from(value) - d)).clamp(0.0, 255.0) as u8
}

/// ITU-R 601 luminance with integer rounding.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114 + 500) / 1000) as u8
}

fn mean_luma(img: &DynamicImage) -> u8 {
    let PixelLayout { channels, color } = raster::layout_of(img);
    let bytes = img.as_bytes();
    let pixels = bytes.len() / channels;
    if pixels == 0 {
        return 0;
    }
    let total: u64 = bytes
        .chunks_exact(channels)
        .map(|px| {
            if color == 1 {
                u64::from(px[0])
            } else {
                u64::from(luma(px[0], px[1], px[2]))
            }
        })
        .sum();
    ((total as f64 / pixels as f64) + 0.5) as u8
}
