//! Image metadata: format, pixel layout, dimensions, file size and a short
//! list of camera EXIF fields.
//!
//! ## What is read
//!
//! The header is decoded for format, color type and dimensions; pixel data
//! is never decoded, so this is cheap even for large files.
//!
//! EXIF is read with `kamadak-exif` from the primary image. Only an
//! allowlist of photographer-facing tags is reported:
//!
//! | Tag | Shown as |
//! |---|---|
//! | Make, Model, DateTime | text as stored |
//! | ExposureTime | `1/250` |
//! | FNumber | `f/2.8` |
//! | ISOSpeedRatings | `200` |
//! | FocalLength | `35.0 mm` |
//! | Flash | raw flag value |
//!
//! Missing or unreadable EXIF is not an error: the list is simply empty.

use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read image header: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Unrecognized image format: {0}")]
    UnknownFormat(PathBuf),
}

/// Summary of one image file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub filename: String,
    /// Upper-case format name, e.g. `JPEG`.
    pub format: String,
    /// Pixel layout, e.g. `RGB`, `RGBA`, `L`.
    pub mode: String,
    pub width: u32,
    pub height: u32,
    pub file_size_bytes: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exif: Vec<ExifEntry>,
}

impl ImageInfo {
    /// `"W x H"`.
    pub fn size_label(&self) -> String {
        format!("{} x {}", self.width, self.height)
    }

    /// File size in kibibytes with two decimals, e.g. `"12.50 KB"`.
    pub fn file_size_label(&self) -> String {
        format!("{:.2} KB", self.file_size_bytes as f64 / 1024.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExifEntry {
    pub tag: &'static str,
    pub value: String,
}

/// EXIF tags worth showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExifTag {
    Make,
    Model,
    DateTime,
    ExposureTime,
    FNumber,
    IsoSpeed,
    FocalLength,
    Flash,
}

impl ExifTag {
    pub const ALL: [ExifTag; 8] = [
        ExifTag::Make,
        ExifTag::Model,
        ExifTag::DateTime,
        ExifTag::ExposureTime,
        ExifTag::FNumber,
        ExifTag::IsoSpeed,
        ExifTag::FocalLength,
        ExifTag::Flash,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExifTag::Make => "Make",
            ExifTag::Model => "Model",
            ExifTag::DateTime => "DateTime",
            ExifTag::ExposureTime => "ExposureTime",
            ExifTag::FNumber => "FNumber",
            ExifTag::IsoSpeed => "ISOSpeedRatings",
            ExifTag::FocalLength => "FocalLength",
            ExifTag::Flash => "Flash",
        }
    }

    fn exif_tag(self) -> exif::Tag {
        match self {
            ExifTag::Make => exif::Tag::Make,
            ExifTag::Model => exif::Tag::Model,
            ExifTag::DateTime => exif::Tag::DateTime,
            ExifTag::ExposureTime => exif::Tag::ExposureTime,
            ExifTag::FNumber => exif::Tag::FNumber,
            ExifTag::IsoSpeed => exif::Tag::PhotographicSensitivity,
            ExifTag::FocalLength => exif::Tag::FocalLength,
            ExifTag::Flash => exif::Tag::Flash,
        }
    }
}

/// Read format, layout, dimensions, size and EXIF of the file at `path`.
pub fn read_image_info(path: &Path) -> Result<ImageInfo, MetadataError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| MetadataError::UnknownFormat(path.to_path_buf()))?;
    let decoder = reader.into_decoder()?;
    let (width, height) = decoder.dimensions();
    let mode = mode_name(decoder.color_type());
    let file_size_bytes = std::fs::metadata(path)?.len();

    Ok(ImageInfo {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        format: format_name(format),
        mode: mode.to_string(),
        width,
        height,
        file_size_bytes,
        exif: read_exif(path),
    })
}

/// Allowlisted EXIF fields of the file, in [`ExifTag::ALL`] order.
pub fn read_exif(path: &Path) -> Vec<ExifEntry> {
    let exif = match std::fs::File::open(path)
        .map(std::io::BufReader::new)
        .map_err(exif::Error::Io)
        .and_then(|mut reader| exif::Reader::new().read_from_container(&mut reader))
    {
        Ok(exif) => exif,
        Err(e) => {
            tracing::debug!(path = %path.display(), "no EXIF: {e}");
            return Vec::new();
        }
    };

    ExifTag::ALL
        .into_iter()
        .filter_map(|tag| {
            let field = exif.get_field(tag.exif_tag(), exif::In::PRIMARY)?;
            let value = format_value(tag, &field.value)?;
            Some(ExifEntry {
                tag: tag.name(),
                value,
            })
        })
        .collect()
}

/// Render one EXIF value for display.
pub fn format_value(tag: ExifTag, value: &exif::Value) -> Option<String> {
    match value {
        exif::Value::Ascii(parts) => {
            let text = parts.first()?;
            let text = String::from_utf8_lossy(text);
            Some(text.trim_end_matches('\0').trim().to_string())
        }
        exif::Value::Rational(values) => {
            let r = values.first()?;
            Some(match tag {
                ExifTag::ExposureTime => format_exposure(r.num, r.denom),
                ExifTag::FNumber => format_fnumber(r.num, r.denom),
                ExifTag::FocalLength => format_focal_length(r.num, r.denom),
                _ => format!("{}/{}", r.num, r.denom),
            })
        }
        other => other.get_uint(0).map(|v| v.to_string()),
    }
}

/// `1/250` style shutter speed. A zero numerator is shown raw.
pub fn format_exposure(num: u32, denom: u32) -> String {
    if num == 0 {
        return format!("{num}/{denom}");
    }
    format!("1/{:.0}", denom as f64 / num as f64)
}

pub fn format_fnumber(num: u32, denom: u32) -> String {
    if denom == 0 {
        return format!("{num}/{denom}");
    }
    format!("f/{:.1}", num as f64 / denom as f64)
}

pub fn format_focal_length(num: u32, denom: u32) -> String {
    if denom == 0 {
        return format!("{num}/{denom}");
    }
    format!("{:.1} mm", num as f64 / denom as f64)
}

pub fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        other => format!("{other:?}").to_uppercase(),
    }
}

pub fn mode_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;32F",
        ColorType::Rgba32F => "RGBA;32F",
        _ => "unknown",
    }
}
