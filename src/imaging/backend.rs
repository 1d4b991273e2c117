//! Image I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two operations that touch the
//! filesystem: decoding a source image and encoding a result. Everything
//! between those two is pure pixel work in [`pipeline`](super::pipeline).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure Rust codecs.

use super::params::Quality;
use image::ImageFormat;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// How to encode an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Explicit format; `None` infers it from the output extension.
    pub format: Option<ImageFormat>,
    /// Lossy quality; ignored by lossless formats.
    pub quality: Quality,
}

/// Trait for image I/O backends.
pub trait ImageBackend {
    /// Decode an image, normalized to 8 bits per sample.
    fn load(&self, path: &Path) -> Result<image::DynamicImage, BackendError>;

    /// Encode `img` to `path`.
    fn save(&self, img: &image::DynamicImage, path: &Path, options: &SaveOptions) -> Result<(), BackendError>;
}
