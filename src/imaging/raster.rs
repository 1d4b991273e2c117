//! Raw sample access shared by the per-pixel operations.
//!
//! Images are normalized to one of four 8-bit layouts on load
//! (`L`, `LA`, `RGB`, `RGBA`); the helpers here expose those as flat byte
//! slices plus a [`PixelLayout`] describing which samples are color and
//! which one (if any) is alpha.

use image::DynamicImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelLayout {
    /// Samples per pixel.
    pub channels: usize,
    /// Leading samples that carry color; a trailing extra sample is alpha.
    pub color: usize,
}

impl PixelLayout {
    pub fn has_alpha(self) -> bool {
        self.channels > self.color
    }
}

/// Layout of an image already passed through [`to_8bit`].
pub(crate) fn layout_of(img: &DynamicImage) -> PixelLayout {
    match img {
        DynamicImage::ImageLuma8(_) => PixelLayout { channels: 1, color: 1 },
        DynamicImage::ImageLumaA8(_) => PixelLayout { channels: 2, color: 1 },
        DynamicImage::ImageRgb8(_) => PixelLayout { channels: 3, color: 3 },
        _ => PixelLayout { channels: 4, color: 3 },
    }
}

/// Convert to the 8-bit layout closest to the source.
///
/// 16-bit and float images are narrowed; already-8-bit images are cloned.
pub(crate) fn to_8bit(img: &DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => img.clone(),
        DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(img.to_luma8()),
        DynamicImage::ImageLumaA16(_) => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
        DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgb32F(_) => {
            DynamicImage::ImageRgb8(img.to_rgb8())
        }
        _ => DynamicImage::ImageRgba8(img.to_rgba8()),
    }
}

/// Convert grayscale layouts to their RGB counterparts; RGB(A) passes through.
pub(crate) fn to_color(img: &DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        match img {
            DynamicImage::ImageRgba8(_) => img.clone(),
            _ => DynamicImage::ImageRgba8(img.to_rgba8()),
        }
    } else {
        match img {
            DynamicImage::ImageRgb8(_) => img.clone(),
            _ => DynamicImage::ImageRgb8(img.to_rgb8()),
        }
    }
}

/// Run `f` over the samples of `img` in place.
///
/// Layouts other than the four 8-bit ones are converted to RGBA first.
pub(crate) fn with_samples_mut(img: &mut DynamicImage, f: impl FnOnce(&mut [u8], PixelLayout)) {
    match img {
        DynamicImage::ImageLuma8(buf) => f(&mut **buf, PixelLayout { channels: 1, color: 1 }),
        DynamicImage::ImageLumaA8(buf) => f(&mut **buf, PixelLayout { channels: 2, color: 1 }),
        DynamicImage::ImageRgb8(buf) => f(&mut **buf, PixelLayout { channels: 3, color: 3 }),
        DynamicImage::ImageRgba8(buf) => f(&mut **buf, PixelLayout { channels: 4, color: 3 }),
        other => {
            let mut rgba = other.to_rgba8();
            f(&mut *rgba, PixelLayout { channels: 4, color: 3 });
            *other = DynamicImage::ImageRgba8(rgba);
        }
    }
}

/// Apply a per-sample mapping to the color samples, leaving alpha untouched.
pub(crate) fn map_color_samples(img: &DynamicImage, mut f: impl FnMut(usize, u8) -> u8) -> DynamicImage {
    let mut out = img.clone();
    with_samples_mut(&mut out, |samples, layout| {
        for pixel in samples.chunks_exact_mut(layout.channels) {
            for (channel, sample) in pixel.iter_mut().take(layout.color).enumerate() {
                *sample = f(channel, *sample);
            }
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb32FImage, Rgba, RgbaImage};

    #[test]
    fn to_8bit_narrows_float_images() {
        let img = DynamicImage::ImageRgb32F(Rgb32FImage::new(2, 2));
        assert_eq!(to_8bit(&img).color(), image::ColorType::Rgb8);
    }

    #[test]
    fn to_color_keeps_alpha() {
        let img = DynamicImage::ImageLumaA8(image::GrayAlphaImage::new(1, 1));
        assert_eq!(to_color(&img).color(), image::ColorType::Rgba8);
        let img = DynamicImage::ImageLuma8(GrayImage::new(1, 1));
        assert_eq!(to_color(&img).color(), image::ColorType::Rgb8);
    }

    #[test]
    fn map_color_samples_skips_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 40])));
        let out = map_color_samples(&img, |_, v| v + 1);
        assert_eq!(out.to_rgba8().get_pixel(0, 0), &Rgba([11, 21, 31, 40]));
    }

    #[test]
    fn map_color_samples_reports_channel() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([7])));
        let mut seen = Vec::new();
        map_color_samples(&img, |c, v| {
            seen.push(c);
            v
        });
        assert_eq!(seen, vec![0]);
    }
}
