//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image::ImageReader`, `JpegEncoder` with quality |
//! | **Resize** | `image::imageops::resize` (Lanczos3) |
//! | **Rotate** | `imageproc::rotate_about_center` (bicubic), exact quarter turns |
//! | **Filters** | `imageproc::filter::Kernel` over 3x3 / 5x5 weight tables, `DynamicImage::blur` |
//! | **Adjustments** | in-crate blend against a degenerate image |
//! | **Watermark text** | `imageproc::draw_text_mut` + `ab_glyph`, `font8x8` fallback |
//!
//! The module is split into:
//! - **Parameters** and **colors**: typed descriptions of what to do
//! - **Calculations**: pure dimension math (unit testable)
//! - **Operations**: [`geometry`], [`filters`], [`adjust`], [`decorate`]
//! - **Pipeline**: the fixed-order [`Pipeline`] that chains operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`] for file I/O

pub mod adjust;
pub mod backend;
mod calculations;
mod color;
pub mod decorate;
pub mod filters;
mod font;
pub mod geometry;
mod params;
mod pipeline;
pub(crate) mod raster;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, SaveOptions};
pub use calculations::{
    CanvasTooLarge, CropRect, MAX_CANVAS_PIXELS, calculate_crop_rect, calculate_resize_dimensions,
    calculate_rotated_bounds, calculate_watermark_origin, check_canvas, default_watermark_font_size,
};
pub use color::{Color, ColorError, NamedColor, resolve_or};
pub use font::{DEFAULT_FONT_DIRS, FontSearch, WatermarkFont, find_font_file};
pub use params::{
    Adjustments, BorderParams, CropBox, EditParams, FilterKind, OutputFormat, ParseError, Quality,
    ResizeSpec, WatermarkParams, WatermarkPosition,
};
pub use pipeline::{Pipeline, PipelineOutput, Step, StepError};
pub use rust_backend::RustBackend;
