//! The filter catalog.
//!
//! | Filter | Implementation |
//! |---|---|
//! | blur, contour, detail, edge_enhance(_more), emboss, find_edges, sharpen, smooth(_more), box_blur | fixed [`Kernel`] tables run through `imageproc::filter::Kernel` |
//! | gaussian_blur | `DynamicImage::blur`, sigma 2 |
//! | grayscale | `DynamicImage::to_luma8` |
//! | mirror / flip | `fliph` / `flipv` |
//! | sepia, invert, auto_contrast | per-sample color mapping, alpha untouched |
//!
//! The kernel tables are the classic 3x3 / 5x5 weights every raster toolkit
//! ships under these names; only the tables live here. `imageproc` does the
//! neighborhood accumulation with edge pixels repeated, and alpha is never
//! filtered.

use super::params::FilterKind;
use super::raster::{self, PixelLayout};
use image::{DynamicImage, ImageBuffer, Pixel};
use imageproc::filter;

/// Sigma used for `gaussian_blur`.
pub const GAUSSIAN_BLUR_RADIUS: f32 = 2.0;

/// A square convolution kernel: `sum(weights * samples) / scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    pub size: usize,
    pub weights: &'static [i32],
    pub scale: i32,
    pub offset: i32,
}

#[rustfmt::skip]
pub const BLUR: Kernel = Kernel {
    size: 5,
    weights: &[
        1, 1, 1, 1, 1,
        1, 0, 0, 0, 1,
        1, 0, 0, 0, 1,
        1, 0, 0, 0, 1,
        1, 1, 1, 1, 1,
    ],
    scale: 16,
    offset: 0,
};

#[rustfmt::skip]
pub const CONTOUR: Kernel = Kernel {
    size: 3,
    weights: &[
        -1, -1, -1,
        -1,  8, -1,
        -1, -1, -1,
    ],
    scale: 1,
    offset: 255,
};

#[rustfmt::skip]
pub const DETAIL: Kernel = Kernel {
    size: 3,
    weights: &[
         0, -1,  0,
        -1, 10, -1,
         0, -1,  0,
    ],
    scale: 6,
    offset: 0,
};

#[rustfmt::skip]
pub const EDGE_ENHANCE: Kernel = Kernel {
    size: 3,
    weights: &[
        -1, -1, -1,
        -1, 10, -1,
        -1, -1, -1,
    ],
    scale: 2,
    offset: 0,
};

#[rustfmt::skip]
pub const EDGE_ENHANCE_MORE: Kernel = Kernel {
    size: 3,
    weights: &[
        -1, -1, -1,
        -1,  9, -1,
        -1, -1, -1,
    ],
    scale: 1,
    offset: 0,
};

#[rustfmt::skip]
pub const EMBOSS: Kernel = Kernel {
    size: 3,
    weights: &[
        -1, 0, 0,
         0, 1, 0,
         0, 0, 0,
    ],
    scale: 1,
    offset: 128,
};

#[rustfmt::skip]
pub const FIND_EDGES: Kernel = Kernel {
    size: 3,
    weights: &[
        -1, -1, -1,
        -1,  8, -1,
        -1, -1, -1,
    ],
    scale: 1,
    offset: 0,
};

#[rustfmt::skip]
pub const SHARPEN: Kernel = Kernel {
    size: 3,
    weights: &[
        -2, -2, -2,
        -2, 32, -2,
        -2, -2, -2,
    ],
    scale: 16,
    offset: 0,
};

#[rustfmt::skip]
pub const SMOOTH: Kernel = Kernel {
    size: 3,
    weights: &[
        1, 1, 1,
        1, 5, 1,
        1, 1, 1,
    ],
    scale: 13,
    offset: 0,
};

#[rustfmt::skip]
pub const SMOOTH_MORE: Kernel = Kernel {
    size: 5,
    weights: &[
        1, 1,  1, 1, 1,
        1, 5,  5, 5, 1,
        1, 5, 44, 5, 1,
        1, 5,  5, 5, 1,
        1, 1,  1, 1, 1,
    ],
    scale: 100,
    offset: 0,
};

/// Radius-2 box blur.
pub const BOX_BLUR: Kernel = Kernel {
    size: 5,
    weights: &[1; 25],
    scale: 25,
    offset: 0,
};

impl Kernel {
    /// Correlate the color samples of `img` with this kernel.
    ///
    /// The accumulation runs in `imageproc`, which pads by repeating edge
    /// pixels. Alpha is copied back from the source afterwards.
    pub fn apply(&self, img: &DynamicImage) -> DynamicImage {
        let src = raster::to_8bit(img);
        let mut out = match &src {
            DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(self.filter(buf)),
            DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(self.filter(buf)),
            DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(self.filter(buf)),
            other => DynamicImage::ImageRgba8(self.filter(&other.to_rgba8())),
        };
        let source = src.as_bytes();
        raster::with_samples_mut(&mut out, |dst, layout| {
            if layout.has_alpha() && source.len() == dst.len() {
                restore_alpha(dst, source, layout);
            }
        });
        out
    }

    fn filter<P>(&self, buf: &ImageBuffer<P, Vec<u8>>) -> ImageBuffer<P, Vec<u8>>
    where
        P: Pixel<Subpixel = u8>,
    {
        let side = self.size as u32;
        let kernel = filter::Kernel::new(self.weights, side, side);
        kernel.filter(buf, |out: &mut u8, acc: i32| *out = self.finish(acc))
    }

    /// Scale, offset and clamp one accumulated sample.
    fn finish(&self, acc: i32) -> u8 {
        let value = (acc as f32 / self.scale as f32).round() + self.offset as f32;
        value.clamp(0.0, 255.0) as u8
    }
}

fn restore_alpha(dst: &mut [u8], src: &[u8], layout: PixelLayout) {
    for (d, s) in dst
        .chunks_exact_mut(layout.channels)
        .zip(src.chunks_exact(layout.channels))
    {
        d[layout.color] = s[layout.color];
    }
}

/// Apply one catalog filter.
pub fn apply_filter(img: &DynamicImage, filter: FilterKind) -> DynamicImage {
    match filter {
        FilterKind::Blur => BLUR.apply(img),
        FilterKind::Contour => CONTOUR.apply(img),
        FilterKind::Detail => DETAIL.apply(img),
        FilterKind::EdgeEnhance => EDGE_ENHANCE.apply(img),
        FilterKind::EdgeEnhanceMore => EDGE_ENHANCE_MORE.apply(img),
        FilterKind::Emboss => EMBOSS.apply(img),
        FilterKind::FindEdges => FIND_EDGES.apply(img),
        FilterKind::Sharpen => SHARPEN.apply(img),
        FilterKind::Smooth => SMOOTH.apply(img),
        FilterKind::SmoothMore => SMOOTH_MORE.apply(img),
        FilterKind::GaussianBlur => img.blur(GAUSSIAN_BLUR_RADIUS),
        FilterKind::BoxBlur => BOX_BLUR.apply(img),
        FilterKind::Grayscale => DynamicImage::ImageLuma8(img.to_luma8()),
        FilterKind::Sepia => sepia(img),
        FilterKind::Invert => invert(img),
        FilterKind::Mirror => img.fliph(),
        FilterKind::Flip => img.flipv(),
        FilterKind::AutoContrast => autocontrast(img),
    }
}

const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Sepia tone of one RGB triple; each output channel truncated and capped at 255.
pub fn sepia_tone(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(f32::from);
    SEPIA_MATRIX.map(|[kr, kg, kb]| (r * kr + g * kg + b * kb).min(255.0) as u8)
}

/// Sepia-tone an image. Grayscale input is promoted to RGB first.
pub fn sepia(img: &DynamicImage) -> DynamicImage {
    let mut out = raster::to_color(img);
    raster::with_samples_mut(&mut out, |samples, layout| {
        for pixel in samples.chunks_exact_mut(layout.channels) {
            let toned = sepia_tone([pixel[0], pixel[1], pixel[2]]);
            pixel[..3].copy_from_slice(&toned);
        }
    });
    out
}

/// Invert color samples; alpha is carried over unchanged.
pub fn invert(img: &DynamicImage) -> DynamicImage {
    raster::map_color_samples(&raster::to_8bit(img), |_, v| 255 - v)
}

/// Stretch each color channel so its darkest sample maps to 0 and its
/// brightest to 255. Flat channels are left alone.
pub fn autocontrast(img: &DynamicImage) -> DynamicImage {
    let img = raster::to_8bit(img);
    let layout = raster::layout_of(&img);

    let mut lo = [u8::MAX; 4];
    let mut hi = [u8::MIN; 4];
    for pixel in img.as_bytes().chunks_exact(layout.channels) {
        for c in 0..layout.color {
            lo[c] = lo[c].min(pixel[c]);
            hi[c] = hi[c].max(pixel[c]);
        }
    }

    let luts: Vec<[u8; 256]> = (0..layout.color)
        .map(|c| stretch_lut(lo[c], hi[c]))
        .collect();
    raster::map_color_samples(&img, |c, v| luts[c][v as usize])
}

fn stretch_lut(lo: u8, hi: u8) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = if hi <= lo {
            i as u8
        } else {
            let scale = 255.0 / (hi - lo) as f32;
            ((i as f32 - lo as f32) * scale).clamp(0.0, 255.0) as u8
        };
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_rgb, solid_rgb, solid_rgba};
    use image::{ColorType, GenericImageView, Rgb, Rgba};

    #[test]
    fn sepia_black_stays_black() {
        assert_eq!(sepia_tone([0, 0, 0]), [0, 0, 0]);
    }

    #[test]
    fn sepia_white_follows_formula() {
        let w = 255.0f32;
        let expected = [
            (w * 0.393 + w * 0.769 + w * 0.189).min(255.0) as u8,
            (w * 0.349 + w * 0.686 + w * 0.168).min(255.0) as u8,
            (w * 0.272 + w * 0.534 + w * 0.131).min(255.0) as u8,
        ];
        assert_eq!(sepia_tone([255, 255, 255]), expected);
        // Red and green saturate, blue stays under the cap
        assert_eq!(expected[0], 255);
        assert_eq!(expected[1], 255);
        assert!(expected[2] < 255);
    }

    #[test]
    fn sepia_promotes_grayscale_and_keeps_alpha() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
        assert_eq!(sepia(&gray).color(), ColorType::Rgb8);

        let rgba = solid_rgba(2, 2, [100, 100, 100, 42]);
        let toned = sepia(&rgba);
        assert_eq!(toned.get_pixel(1, 1)[3], 42);
    }

    #[test]
    fn invert_twice_restores_rgba_and_never_touches_alpha() {
        let mut img = image::RgbaImage::new(3, 3);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(x * 80) as u8, (y * 70) as u8, 33, (x * 50 + y * 20) as u8]);
        }
        let original = DynamicImage::ImageRgba8(img);

        let once = invert(&original);
        for (a, b) in once.to_rgba8().pixels().zip(original.to_rgba8().pixels()) {
            assert_eq!(a[3], b[3]);
            assert_eq!(a[0], 255 - b[0]);
        }

        let twice = invert(&once);
        assert_eq!(twice.as_bytes(), original.as_bytes());
    }

    #[test]
    fn grayscale_drops_color() {
        let out = apply_filter(&gradient_rgb(4, 4), FilterKind::Grayscale);
        assert_eq!(out.color(), ColorType::L8);
    }

    #[test]
    fn mirror_and_flip() {
        let img = gradient_rgb(5, 3);
        let mirrored = apply_filter(&img, FilterKind::Mirror);
        assert_eq!(mirrored.get_pixel(0, 0), img.get_pixel(4, 0));
        let flipped = apply_filter(&img, FilterKind::Flip);
        assert_eq!(flipped.get_pixel(0, 0), img.get_pixel(0, 2));
    }

    #[test]
    fn autocontrast_stretches_range() {
        let mut img = image::RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([50, 50, 50]));
        img.put_pixel(1, 0, Rgb([100, 100, 100]));
        let out = autocontrast(&DynamicImage::ImageRgb8(img));
        assert_eq!(out.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn autocontrast_leaves_flat_image_alone() {
        let img = solid_rgb(3, 3, [80, 90, 100]);
        assert_eq!(autocontrast(&img).as_bytes(), img.as_bytes());
    }

    #[test]
    fn normalized_kernels_keep_flat_images_flat() {
        let img = solid_rgb(8, 8, [120, 60, 200]);
        for kernel in [BLUR, DETAIL, EDGE_ENHANCE, EDGE_ENHANCE_MORE, SHARPEN, SMOOTH, SMOOTH_MORE, BOX_BLUR] {
            assert_eq!(kernel.apply(&img).as_bytes(), img.as_bytes());
        }
    }

    #[test]
    fn offset_kernels_on_flat_images() {
        let img = solid_rgb(6, 6, [10, 20, 30]);
        assert_eq!(CONTOUR.apply(&img).get_pixel(3, 3), Rgba([255, 255, 255, 255]));
        assert_eq!(EMBOSS.apply(&img).get_pixel(3, 3), Rgba([128, 128, 128, 255]));
        assert_eq!(FIND_EDGES.apply(&img).get_pixel(3, 3), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn find_edges_lights_up_a_step() {
        let mut img = image::GrayImage::new(6, 1);
        for x in 3..6 {
            img.put_pixel(x, 0, image::Luma([200]));
        }
        let out = FIND_EDGES.apply(&DynamicImage::ImageLuma8(img));
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert!(out.get_pixel(3, 0)[0] > 0);
    }

    #[test]
    fn smooth_repeats_edges_and_restores_varying_alpha() {
        let img = image::GrayAlphaImage::from_raw(3, 1, vec![10, 1, 50, 2, 90, 3]).unwrap();
        let out = SMOOTH.apply(&DynamicImage::ImageLumaA8(img));
        // x=0: (70 + 110 + 70) / 13 = 19.2; x=1: (150 + 350 + 150) / 13 = 50
        assert_eq!(out.color(), ColorType::La8);
        assert_eq!(&out.as_bytes()[..4], &[19, 1, 50, 2]);
        assert_eq!(out.as_bytes()[5], 3);
    }

    #[test]
    fn kernels_preserve_alpha_and_size() {
        let img = solid_rgba(5, 4, [10, 200, 30, 77]);
        for filter in FilterKind::ALL {
            let out = apply_filter(&img, filter);
            assert_eq!(out.dimensions(), (5, 4), "{filter}");
        }
        assert_eq!(SHARPEN.apply(&img).get_pixel(2, 2)[3], 77);
    }
}
