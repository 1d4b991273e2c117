//! Command-line surface.
//!
//! Flags arrive as loosely typed values (`"200x150"`, `"sepia"`, `"#ff000080"`)
//! and are turned into an [`EditParams`] once, here. Anything that fails to
//! parse is reported with a warning and dropped (or replaced by its default
//! color), so a typo in one flag never stops the rest of the edit.
//!
//! Values not given on the command line come from the [`EditorConfig`].

use crate::config::EditorConfig;
use crate::imaging::{
    Adjustments, BorderParams, Color, CropBox, EditParams, FilterKind, OutputFormat, Quality,
    ResizeSpec, WatermarkParams, WatermarkPosition, resolve_or,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imgedit")]
#[command(about = "Image manipulation tool for various operations")]
#[command(long_about = "\
Image manipulation tool for various operations

Edits are applied in a fixed order, whatever the order of the flags:

  rotate → crop → resize → filter → brightness/contrast/sharpness/color
         → border → watermark

Examples:

  imgedit cat.jpg --resize 800 --filter sepia
  imgedit cat.jpg --crop 0.1,0.1,0.9,0.9 -o out/cat.png
  imgedit photos/ -r -o edited/ --watermark \"(c) 2024\" --format webp
  imgedit cat.jpg --info

Run 'imgedit --gen-config' to print a documented config file.")]
#[command(version)]
pub struct Cli {
    /// Input image file or directory
    #[arg(required_unless_present = "gen_config")]
    pub input: Option<PathBuf>,

    /// Output file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Process all images in the input directory
    #[arg(long)]
    pub batch: bool,

    /// Recursively process subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Resize image (WIDTHxHEIGHT, WIDTH, xHEIGHT, or a scale factor like 0.5).
    /// A bare integer is a width in pixels: `2` means 2 pixels wide, not 2x.
    /// Write `2.0` to double the size
    #[arg(long, value_name = "SPEC")]
    pub resize: Option<String>,

    /// Stretch WIDTHxHEIGHT resizes instead of keeping the aspect ratio
    #[arg(long)]
    pub exact: bool,

    /// Crop image (left,top,right,bottom as fractions or pixels)
    #[arg(long, value_name = "L,T,R,B", allow_hyphen_values = true)]
    pub crop: Option<String>,

    /// Rotate image counter-clockwise by degrees
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub rotate: Option<f32>,

    /// Apply a filter (blur, contour, detail, edge_enhance, edge_enhance_more,
    /// emboss, find_edges, sharpen, smooth, smooth_more, gaussian_blur,
    /// box_blur, grayscale, sepia, invert, mirror, flip, auto_contrast)
    #[arg(long, value_name = "NAME")]
    pub filter: Option<String>,

    /// Adjust brightness (0.0-2.0, 1.0 = unchanged)
    #[arg(long, value_name = "F")]
    pub brightness: Option<f32>,

    /// Adjust contrast (0.0-2.0, 1.0 = unchanged)
    #[arg(long, value_name = "F")]
    pub contrast: Option<f32>,

    /// Adjust sharpness (0.0-2.0, 1.0 = unchanged)
    #[arg(long, value_name = "F")]
    pub sharpness: Option<f32>,

    /// Adjust color saturation (0.0-2.0, 1.0 = unchanged)
    #[arg(long, value_name = "F")]
    pub color: Option<f32>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output quality for lossy formats
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub quality: Option<u32>,

    /// Add a border of this width in pixels
    #[arg(long, value_name = "N")]
    pub border: Option<u32>,

    /// Border color (name or #RRGGBB[AA])
    #[arg(long, value_name = "C")]
    pub border_color: Option<String>,

    /// Add a text watermark
    #[arg(long, value_name = "TEXT")]
    pub watermark: Option<String>,

    /// Watermark position
    #[arg(long, value_enum, value_name = "POS")]
    pub watermark_position: Option<WatermarkPosition>,

    /// Watermark opacity (0.0-1.0)
    #[arg(long, value_name = "F")]
    pub watermark_opacity: Option<f32>,

    /// Watermark font size in pixels (default: image width / 20)
    #[arg(long, value_name = "N")]
    pub watermark_size: Option<u32>,

    /// Watermark color (name or #RRGGBB[AA])
    #[arg(long, value_name = "C")]
    pub watermark_color: Option<String>,

    /// Display image information
    #[arg(long)]
    pub info: bool,

    /// Print image information as JSON
    #[arg(long)]
    pub json: bool,

    /// TOML file with default settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print a documented config file and exit
    #[arg(long)]
    pub gen_config: bool,

    /// Show debug diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Whether any flag asks for the image to be changed or re-encoded.
    pub fn has_transformations(&self) -> bool {
        self.resize.is_some()
            || self.crop.is_some()
            || self.rotate.is_some()
            || self.filter.is_some()
            || self.brightness.is_some()
            || self.contrast.is_some()
            || self.sharpness.is_some()
            || self.color.is_some()
            || self.format.is_some()
            || self.quality.is_some()
            || self.border.is_some()
            || self.watermark.is_some()
    }

    /// `--info` alone on a single file: print metadata, write nothing.
    pub fn info_only(&self) -> bool {
        self.info
            && !self.has_transformations()
            && !self.batch
            && !self.input.as_ref().is_some_and(|p| p.is_dir())
    }

    /// Batch mode is explicit or implied by a directory input.
    pub fn is_batch(&self) -> bool {
        self.batch || self.input.as_ref().is_some_and(|p| p.is_dir())
    }

    /// Build the operation record, filling gaps from `config`.
    pub fn edit_params(&self, config: &EditorConfig) -> EditParams {
        EditParams {
            rotate: self.rotate,
            crop: self.crop.as_deref().and_then(parse_crop),
            resize: self.resize.as_deref().and_then(parse_resize),
            keep_aspect: !self.exact,
            filter: self.filter.as_deref().and_then(parse_filter),
            adjustments: Adjustments {
                brightness: self.brightness,
                contrast: self.contrast,
                sharpness: self.sharpness,
                color: self.color,
            },
            border: self.border_params(config),
            watermark: self.watermark_params(config),
            format: self.format,
            quality: Some(Quality::new(self.quality.unwrap_or(config.output.quality))),
            default_suffix: config.output.suffix.clone(),
            info: self.info,
        }
    }

    fn border_params(&self, config: &EditorConfig) -> Option<BorderParams> {
        let width = self.border.filter(|&w| w > 0)?;
        let spec = self.border_color.as_deref().unwrap_or(&config.border.color);
        Some(BorderParams {
            width,
            color: parse_color(spec, Color::BLACK, "border"),
        })
    }

    fn watermark_params(&self, config: &EditorConfig) -> Option<WatermarkParams> {
        let text = self.watermark.as_ref().filter(|t| !t.is_empty())?;
        let spec = self
            .watermark_color
            .as_deref()
            .unwrap_or(&config.watermark.color);
        let opacity = self.watermark_opacity.unwrap_or(config.watermark.opacity);
        if !(0.0..=1.0).contains(&opacity) {
            tracing::warn!("Watermark opacity {opacity} out of range, clamping to 0.0-1.0");
        }
        Some(WatermarkParams {
            text: text.clone(),
            position: self
                .watermark_position
                .unwrap_or(config.watermark.position),
            opacity: if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) },
            size: self.watermark_size.filter(|&s| s > 0),
            color: parse_color(spec, Color::WHITE, "watermark"),
            padding: config.watermark.padding,
        })
    }
}

fn parse_resize(spec: &str) -> Option<ResizeSpec> {
    spec.parse()
        .inspect_err(|e| tracing::warn!("Skipping resize: {e}"))
        .ok()
}

fn parse_crop(spec: &str) -> Option<CropBox> {
    spec.parse()
        .inspect_err(|e| tracing::warn!("Skipping crop: {e}"))
        .ok()
}

fn parse_filter(name: &str) -> Option<FilterKind> {
    let filter = FilterKind::from_name(name);
    if filter.is_none() {
        tracing::warn!("Unknown filter '{name}', leaving the image unfiltered");
    }
    filter
}

fn parse_color(spec: &str, fallback: Color, what: &str) -> Color {
    let (color, err) = resolve_or(spec, fallback);
    if let Some(e) = err {
        tracing::warn!("Invalid {what} color: {e}, using {fallback}");
    }
    color
}
