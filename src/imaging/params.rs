//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. Strings from the
//! command line are parsed into them once, at the boundary; everything
//! downstream works with typed values only.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 75). Clamped on construction.
//! - [`ResizeSpec`]: Scale factor, `WxH` box, width-only or height-only target.
//! - [`CropBox`]: Four crop coordinates; fractions or pixels, resolved later.
//! - [`FilterKind`]: The closed filter catalog.
//! - [`Adjustments`]: Optional brightness/contrast/sharpness/color factors.
//! - [`BorderParams`], [`WatermarkParams`]: Decorations with resolved colors.
//! - [`OutputFormat`]: Format override for the written file.
//! - [`EditParams`]: The whole operation record for one run.

use super::color::Color;
use image::ImageFormat;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid resize '{0}' (expected WIDTHxHEIGHT, WIDTH, xHEIGHT or a scale like 0.5)")]
    Resize(String),
    #[error("invalid crop '{0}' (expected left,top,right,bottom)")]
    Crop(String),
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Target of a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeSpec {
    /// Multiply both dimensions.
    Scale(f64),
    /// Fit into (or, without aspect preservation, stretch to) a box.
    Exact { width: u32, height: u32 },
    /// Set the width, derive the height.
    Width(u32),
    /// Set the height, derive the width.
    Height(u32),
}

impl FromStr for ResizeSpec {
    type Err = ParseError;

    /// Accepted forms:
    ///
    /// ```text
    /// 800x600   Exact
    /// 800       Width
    /// x600      Height
    /// 0.5       Scale (anything with a decimal point)
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Resize(s.to_string());
        let trimmed = s.trim().to_ascii_lowercase();

        if let Some((w, h)) = trimmed.split_once('x') {
            let height: u32 = h.trim().parse().map_err(|_| err())?;
            if w.trim().is_empty() {
                return Ok(ResizeSpec::Height(height));
            }
            let width: u32 = w.trim().parse().map_err(|_| err())?;
            return Ok(ResizeSpec::Exact { width, height });
        }

        if trimmed.contains('.') {
            let factor: f64 = trimmed.parse().map_err(|_| err())?;
            if !factor.is_finite() || factor <= 0.0 {
                return Err(err());
            }
            return Ok(ResizeSpec::Scale(factor));
        }

        trimmed.parse().map(ResizeSpec::Width).map_err(|_| err())
    }
}

/// Crop coordinates as given by the user.
///
/// Each value in `[0, 1]` is a fraction of the matching dimension; larger
/// values are pixels. See [`calculate_crop_rect`](super::calculate_crop_rect).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CropBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl FromStr for CropBox {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| ParseError::Crop(s.to_string()))?;
        match values.as_slice() {
            [l, t, r, b] if values.iter().all(|v| v.is_finite()) => Ok(CropBox::new(*l, *t, *r, *b)),
            _ => Err(ParseError::Crop(s.to_string())),
        }
    }
}

/// The filter catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Blur,
    Contour,
    Detail,
    EdgeEnhance,
    EdgeEnhanceMore,
    Emboss,
    FindEdges,
    Sharpen,
    Smooth,
    SmoothMore,
    GaussianBlur,
    BoxBlur,
    Grayscale,
    Sepia,
    Invert,
    Mirror,
    Flip,
    AutoContrast,
}

impl FilterKind {
    pub const ALL: [FilterKind; 18] = [
        FilterKind::Blur,
        FilterKind::Contour,
        FilterKind::Detail,
        FilterKind::EdgeEnhance,
        FilterKind::EdgeEnhanceMore,
        FilterKind::Emboss,
        FilterKind::FindEdges,
        FilterKind::Sharpen,
        FilterKind::Smooth,
        FilterKind::SmoothMore,
        FilterKind::GaussianBlur,
        FilterKind::BoxBlur,
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Invert,
        FilterKind::Mirror,
        FilterKind::Flip,
        FilterKind::AutoContrast,
    ];

    /// Canonical name, also used as the default output suffix.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Blur => "blur",
            FilterKind::Contour => "contour",
            FilterKind::Detail => "detail",
            FilterKind::EdgeEnhance => "edge_enhance",
            FilterKind::EdgeEnhanceMore => "edge_enhance_more",
            FilterKind::Emboss => "emboss",
            FilterKind::FindEdges => "find_edges",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Smooth => "smooth",
            FilterKind::SmoothMore => "smooth_more",
            FilterKind::GaussianBlur => "gaussian_blur",
            FilterKind::BoxBlur => "box_blur",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Sepia => "sepia",
            FilterKind::Invert => "invert",
            FilterKind::Mirror => "mirror",
            FilterKind::Flip => "flip",
            FilterKind::AutoContrast => "auto_contrast",
        }
    }

    /// Look a filter up by name. Dashes and underscores are interchangeable
    /// and case is ignored, so `edge-enhance` and `EDGE_ENHANCE` both match.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let normalized = match normalized.as_str() {
            "autocontrast" => "auto_contrast",
            other => other,
        };
        Self::ALL.into_iter().find(|f| f.name() == normalized)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multiplicative enhancement factors. 1.0 leaves the image unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Adjustments {
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub sharpness: Option<f32>,
    pub color: Option<f32>,
}

impl Adjustments {
    pub fn is_empty(&self) -> bool {
        self.brightness.is_none()
            && self.contrast.is_none()
            && self.sharpness.is_none()
            && self.color.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderParams {
    pub width: u32,
    pub color: Color,
}

/// Watermark anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkParams {
    pub text: String,
    pub position: WatermarkPosition,
    /// Alpha multiplier in `[0, 1]`.
    pub opacity: f32,
    /// Font size in pixels; `None` derives it from the image width.
    pub size: Option<u32>,
    pub color: Color,
    /// Distance from the edges for corner anchors.
    pub padding: u32,
}

/// Output format override.
///
/// `Jpg` and `Jpeg` encode identically and differ only in the file extension
/// they produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Jpg,
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Webp,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpg | OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::Webp => ImageFormat::WebP,
        }
    }
}

/// Every operation requested for a run. Absent fields are no-ops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditParams {
    pub rotate: Option<f32>,
    pub crop: Option<CropBox>,
    pub resize: Option<ResizeSpec>,
    /// Shrink `WxH` resizes to keep the source aspect ratio.
    pub keep_aspect: bool,
    pub filter: Option<FilterKind>,
    pub adjustments: Adjustments,
    pub border: Option<BorderParams>,
    pub watermark: Option<WatermarkParams>,
    pub format: Option<OutputFormat>,
    pub quality: Option<Quality>,
    /// Suffix for outputs written next to their source when no filter names one.
    pub default_suffix: String,
    /// Print the info block of each written file.
    pub info: bool,
}

impl EditParams {
    /// Suffix appended to the stem when writing next to the source.
    pub fn output_suffix(&self) -> &str {
        match self.filter {
            Some(filter) => filter.name(),
            None => &self.default_suffix,
        }
    }
}
