//! Shared test utilities for the imgedit test suite.
//!
//! Provides synthetic images and on-disk fixtures so unit tests never depend
//! on checked-in binary files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = tmp.path().join("photo.jpg");
//! write_test_jpeg(&path, 64, 48);
//! write_test_jpeg_with_exif(&path, 64, 48, &TestExif {
//!     make: "Canon",
//!     exposure_time: (1, 250),
//!     f_number: (28, 10),
//!     iso: 400,
//! });
//!
//! let img = gradient_rgb(64, 48);
//! ```

use image::{DynamicImage, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// In-memory images
// =========================================================================

/// RGB image whose pixels encode their own coordinates, so geometry tests
/// can tell where a pixel came from.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    }))
}

pub fn solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

pub fn solid_rgba(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

// =========================================================================
// On-disk fixtures
// =========================================================================

/// Write a small valid JPEG with the given dimensions.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Camera fields embedded by [`write_test_jpeg_with_exif`].
pub struct TestExif<'a> {
    pub make: &'a str,
    /// Rational `(num, denom)`.
    pub exposure_time: (u32, u32),
    /// Rational `(num, denom)`.
    pub f_number: (u32, u32),
    pub iso: u16,
}

/// Write a small valid JPEG carrying an EXIF APP1 segment right after SOI.
///
/// IFD0 holds Make and the Exif IFD pointer; the Exif IFD holds
/// ExposureTime, FNumber and PhotographicSensitivity (ISO).
pub fn write_test_jpeg_with_exif(path: &Path, width: u32, height: u32, exif: &TestExif) {
    write_test_jpeg(path, width, height);
    let jpeg = std::fs::read(path).unwrap();
    assert_eq!(&jpeg[..2], [0xFF, 0xD8], "encoder must start with SOI");

    let tiff = exif_tiff_block(exif);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}

/// Little-endian TIFF block: header, IFD0 (2 entries), Exif IFD (3 entries),
/// then the out-of-line values.
fn exif_tiff_block(exif: &TestExif) -> Vec<u8> {
    const ASCII: u16 = 2;
    const SHORT: u16 = 3;
    const LONG: u16 = 4;
    const RATIONAL: u16 = 5;

    fn entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&kind.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend_from_slice(&value.to_le_bytes());
    }

    let ifd_len = |entries: u32| 2 + 12 * entries + 4;
    let ifd0 = 8u32;
    let exif_ifd = ifd0 + ifd_len(2);
    let make_at = exif_ifd + ifd_len(3);
    let mut make = exif.make.as_bytes().to_vec();
    make.push(0);
    let make_len = u32::try_from(make.len()).unwrap();
    let exposure_at = make_at + make_len;
    let f_number_at = exposure_at + 8;

    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&ifd0.to_le_bytes());

    buf.extend_from_slice(&2u16.to_le_bytes());
    entry(&mut buf, 0x010F, ASCII, make_len, make_at);
    entry(&mut buf, 0x8769, LONG, 1, exif_ifd);
    buf.extend_from_slice(&0u32.to_le_bytes());

    buf.extend_from_slice(&3u16.to_le_bytes());
    entry(&mut buf, 0x829A, RATIONAL, 1, exposure_at);
    entry(&mut buf, 0x829D, RATIONAL, 1, f_number_at);
    entry(&mut buf, 0x8827, SHORT, 1, u32::from(exif.iso));
    buf.extend_from_slice(&0u32.to_le_bytes());

    buf.extend_from_slice(&make);
    for (num, denom) in [exif.exposure_time, exif.f_number] {
        buf.extend_from_slice(&num.to_le_bytes());
        buf.extend_from_slice(&denom.to_le_bytes());
    }
    buf
}

/// Write a small valid PNG with the given dimensions.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height).save(path).unwrap();
}
