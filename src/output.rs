//! CLI output formatting.
//!
//! Everything the tool prints for the user on stdout goes through here.
//! Diagnostics (errors, warnings, debug traces) go to stderr via `tracing`
//! instead, so stdout stays clean for piping `--info --json`.
//!
//! # Output Format
//!
//! ## Single image
//!
//! ```text
//! Image saved to photos/cat_sepia.png
//! ```
//!
//! ## Info block
//!
//! ```text
//!
//! ========================================
//! Image: cat.jpg
//! ========================================
//! Format: JPEG
//! Mode: RGB
//! Size: 800 x 600 pixels
//! File size: 112.40 KB
//!
//! EXIF Data:
//!   Make: Canon
//!   ExposureTime: 1/250
//! ========================================
//!
//! ```
//!
//! ## Batch
//!
//! ```text
//! Processing photos/a.jpg...
//! Image saved to out/a.jpg
//! Processing photos/b.jpg...
//! Image saved to out/b.jpg
//! Processed 2 of 2 images successfully
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::metadata::ImageInfo;
use crate::process::BatchSummary;
use std::path::Path;

const RULE_WIDTH: usize = 40;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

// ============================================================================
// Image info
// ============================================================================

/// The boxed info block for one image, including the blank lines around it.
pub fn format_image_info(info: &ImageInfo) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        rule(),
        format!("Image: {}", info.filename),
        rule(),
        format!("Format: {}", info.format),
        format!("Mode: {}", info.mode),
        format!("Size: {} pixels", info.size_label()),
        format!("File size: {}", info.file_size_label()),
    ];

    if !info.exif.is_empty() {
        lines.push(String::new());
        lines.push("EXIF Data:".to_string());
        for entry in &info.exif {
            lines.push(format!("  {}: {}", entry.tag, entry.value));
        }
    }

    lines.push(rule());
    lines.push(String::new());
    lines
}

pub fn format_image_info_json(info: &ImageInfo) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(info)
}

pub fn print_image_info(info: &ImageInfo, json: bool) {
    if json {
        match format_image_info_json(info) {
            Ok(text) => println!("{text}"),
            Err(e) => tracing::error!("cannot serialize image info: {e}"),
        }
        return;
    }
    for line in format_image_info(info) {
        println!("{}", line);
    }
}

pub fn print_no_info() {
    println!("No image information available");
}

// ============================================================================
// Processing
// ============================================================================

pub fn format_saved(path: &Path) -> String {
    format!("Image saved to {}", path.display())
}

pub fn print_saved(path: &Path) {
    println!("{}", format_saved(path));
}

pub fn format_batch_progress(path: &Path) -> String {
    format!("Processing {}...", path.display())
}

pub fn print_batch_progress(path: &Path) {
    println!("{}", format_batch_progress(path));
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    format!(
        "Processed {} of {} images successfully",
        summary.succeeded, summary.total
    )
}

pub fn print_batch_summary(summary: &BatchSummary) {
    println!("{}", format_batch_summary(summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ExifEntry;

    fn sample_info(exif: Vec<ExifEntry>) -> ImageInfo {
        ImageInfo {
            filename: "cat.jpg".into(),
            format: "JPEG".into(),
            mode: "RGB".into(),
            width: 800,
            height: 600,
            file_size_bytes: 2048,
            exif,
        }
    }

    #[test]
    fn info_block_layout() {
        let lines = format_image_info(&sample_info(Vec::new()));
        assert_eq!(
            lines,
            vec![
                "",
                "========================================",
                "Image: cat.jpg",
                "========================================",
                "Format: JPEG",
                "Mode: RGB",
                "Size: 800 x 600 pixels",
                "File size: 2.00 KB",
                "========================================",
                "",
            ]
        );
    }

    #[test]
    fn info_block_lists_exif_in_order() {
        let lines = format_image_info(&sample_info(vec![
            ExifEntry {
                tag: "Make",
                value: "Canon".into(),
            },
            ExifEntry {
                tag: "FNumber",
                value: "f/2.8".into(),
            },
        ]));
        let exif_start = lines.iter().position(|l| l == "EXIF Data:").unwrap();
        assert_eq!(lines[exif_start - 1], "");
        assert_eq!(lines[exif_start + 1], "  Make: Canon");
        assert_eq!(lines[exif_start + 2], "  FNumber: f/2.8");
        assert_eq!(lines[exif_start + 3], rule());
    }

    #[test]
    fn rule_is_forty_wide() {
        assert_eq!(rule().len(), 40);
    }

    #[test]
    fn json_omits_empty_exif() {
        let json = format_image_info_json(&sample_info(Vec::new())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["width"], 800);
        assert_eq!(value["format"], "JPEG");
        assert!(value.get("exif").is_none());
    }

    #[test]
    fn processing_lines() {
        assert_eq!(
            format_saved(Path::new("out/cat.png")),
            "Image saved to out/cat.png"
        );
        assert_eq!(
            format_batch_progress(Path::new("in/cat.png")),
            "Processing in/cat.png..."
        );
        assert_eq!(
            format_batch_summary(&BatchSummary {
                succeeded: 3,
                total: 5
            }),
            "Processed 3 of 5 images successfully"
        );
    }
}
