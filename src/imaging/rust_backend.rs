//! Pure Rust image I/O backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → everything else | `DynamicImage::write_to` |
//!
//! Encoders are picky about layouts, so images are converted before writing:
//! JPEG gets RGB (or L for grayscale) with alpha dropped, GIF gets RGBA.
//! WebP output is lossless, so quality only affects JPEG.

use super::backend::{BackendError, ImageBackend, SaveOptions};
use super::raster;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the content, so a PNG named `.jpg` still opens.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let img = ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })?;
    Ok(raster::to_8bit(&img))
}

/// Save a DynamicImage, inferring the format from the extension unless one is given.
fn save_image(img: &DynamicImage, path: &Path, options: &SaveOptions) -> Result<(), BackendError> {
    let format = match options.format {
        Some(format) => format,
        None => ImageFormat::from_path(path)
            .map_err(|_| BackendError::UnsupportedFormat(path.display().to_string()))?,
    };

    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);
    let encoded = match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, options.quality.value() as u8);
            jpeg_compatible(img).write_with_encoder(encoder)
        }
        ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut writer, format),
        _ => img.write_to(&mut writer, format),
    };
    encoded.map_err(|e| {
        BackendError::ProcessingFailed(format!("{format:?} encode failed for {}: {e}", path.display()))
    })?;
    writer.flush().map_err(BackendError::Io)
}

fn jpeg_compatible(img: &DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img.clone(),
        DynamicImage::ImageLumaA8(_) => DynamicImage::ImageLuma8(img.to_luma8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        load_image(path)
    }

    fn save(&self, img: &DynamicImage, path: &Path, options: &SaveOptions) -> Result<(), BackendError> {
        save_image(img, path, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{gradient_rgb, solid_rgba, write_test_jpeg};

    #[test]
    fn load_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_test_jpeg(&path, 200, 150);

        let img = RustBackend::new().load(&path).unwrap();
        assert_eq!((img.width(), img.height()), (200, 150));
    }

    #[test]
    fn load_sniffs_content_over_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually_png.jpg");
        gradient_rgb(12, 10)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let img = RustBackend::new().load(&path).unwrap();
        assert_eq!((img.width(), img.height()), (12, 10));
    }

    #[test]
    fn load_nonexistent_file_errors() {
        let result = RustBackend::new().load(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn load_garbage_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fake.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(RustBackend::new().load(&path).is_err());
    }

    #[test]
    fn load_narrows_16_bit_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("deep.png");
        DynamicImage::ImageRgb16(image::ImageBuffer::new(4, 4))
            .save(&path)
            .unwrap();
        let img = RustBackend::new().load(&path).unwrap();
        assert_eq!(img.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn save_infers_format_from_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = RustBackend::new();
        for ext in ["png", "jpg", "gif", "bmp", "tiff", "webp"] {
            let path = tmp.path().join(format!("out.{ext}"));
            backend
                .save(&gradient_rgb(16, 8), &path, &SaveOptions::default())
                .unwrap();
            let reloaded = backend.load(&path).unwrap();
            assert_eq!((reloaded.width(), reloaded.height()), (16, 8), "{ext}");
        }
    }

    #[test]
    fn save_jpeg_drops_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("alpha.jpg");
        let backend = RustBackend::new();
        backend
            .save(&solid_rgba(10, 10, [200, 0, 0, 128]), &path, &SaveOptions::default())
            .unwrap();
        assert_eq!(backend.load(&path).unwrap().color(), image::ColorType::Rgb8);
    }

    #[test]
    fn jpeg_quality_changes_file_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = RustBackend::new();
        let img = gradient_rgb(128, 128);
        let low = tmp.path().join("low.jpg");
        let high = tmp.path().join("high.jpg");
        let save = |path: &Path, q| {
            backend
                .save(
                    &img,
                    path,
                    &SaveOptions {
                        format: None,
                        quality: Quality::new(q),
                    },
                )
                .unwrap()
        };
        save(&low, 10);
        save(&high, 95);
        let size = |p: &Path| std::fs::metadata(p).unwrap().len();
        assert!(size(&low) < size(&high));
    }

    #[test]
    fn explicit_format_overrides_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.dat");
        RustBackend::new()
            .save(
                &gradient_rgb(4, 4),
                &path,
                &SaveOptions {
                    format: Some(ImageFormat::Png),
                    quality: Quality::default(),
                },
            )
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn unknown_extension_without_format_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = RustBackend::new().save(
            &gradient_rgb(4, 4),
            &tmp.path().join("out.xyz"),
            &SaveOptions::default(),
        );
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
    }
}
