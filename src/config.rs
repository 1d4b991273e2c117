//! Editor configuration.
//!
//! Handles loading, validating, and merging an optional TOML defaults file.
//! Stock defaults are overridden by the file passed with `--config`, and
//! command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! quality = 75              # Lossy encoding quality (1-100)
//! suffix = "edited"         # Stem suffix when no filter names the output
//!
//! [border]
//! color = "black"           # Named color or #RRGGBB[AA]
//!
//! [watermark]
//! position = "bottom-right" # top-left, top-right, bottom-left, bottom-right, center
//! opacity = 0.5             # 0.0 (invisible) to 1.0 (opaque)
//! color = "white"
//! padding = 20              # Distance from the edges for corner positions
//!
//! [fonts]
//! preferred = "arial.ttf"
//! fallback = "DejaVuSans.ttf"
//! search_dirs = ["/usr/share/fonts"]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [watermark]
//! opacity = 0.8
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{DEFAULT_FONT_DIRS, FontSearch, WatermarkPosition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from a TOML file.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub output: OutputConfig,
    pub border: BorderConfig,
    pub watermark: WatermarkConfig,
    pub fonts: FontsConfig,
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.output.suffix.is_empty() || self.output.suffix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "output.suffix must be a non-empty file name fragment".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.watermark.opacity) {
            return Err(ConfigError::Validation(
                "watermark.opacity must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}

/// Output file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Lossy encoding quality used when `--quality` is not given.
    pub quality: u32,
    /// Suffix for outputs written next to their source when no filter is applied.
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: 75,
            suffix: "edited".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderConfig {
    pub color: String,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
        }
    }
}

/// Watermark defaults for flags not given on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkConfig {
    pub position: WatermarkPosition,
    pub opacity: f32,
    pub color: String,
    /// Distance in pixels from the image edges for corner positions.
    pub padding: u32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            position: WatermarkPosition::BottomRight,
            opacity: 0.5,
            color: "white".to_string(),
            padding: 20,
        }
    }
}

/// Watermark font lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// TrueType file tried first.
    pub preferred: String,
    /// TrueType file tried when the preferred one is unavailable.
    pub fallback: String,
    /// Directories searched (recursively) for the font files.
    pub search_dirs: Vec<PathBuf>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            preferred: "arial.ttf".to_string(),
            fallback: "DejaVuSans.ttf".to_string(),
            search_dirs: DEFAULT_FONT_DIRS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl FontsConfig {
    pub fn font_search(&self) -> FontSearch {
        FontSearch {
            candidates: vec![self.preferred.clone(), self.fallback.clone()],
            search_dirs: self.search_dirs.clone(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(EditorConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Unlike a discovered config, an explicitly named file must exist.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<EditorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EditorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config: stock defaults, overridden by `path` if given.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# imgedit Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass this file with --config PATH. Command-line flags always win over
# values set here. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output files
# ---------------------------------------------------------------------------
[output]
# Lossy encoding quality (1 = smallest, 100 = best). Used for JPEG when
# --quality is not given.
quality = 75

# Suffix appended to the file stem when writing next to the source and no
# filter is applied (photo.jpg -> photo_edited.jpg). With --filter the
# filter name is used instead (photo_sepia.jpg).
suffix = "edited"

# ---------------------------------------------------------------------------
# Border
# ---------------------------------------------------------------------------
[border]
# Named color (black, white, red, green, blue, yellow, cyan, magenta, gray)
# or hex #RRGGBB / #RRGGBBAA.
color = "black"

# ---------------------------------------------------------------------------
# Watermark
# ---------------------------------------------------------------------------
[watermark]
# top-left, top-right, bottom-left, bottom-right or center.
position = "bottom-right"

# 0.0 = invisible, 1.0 = fully opaque. Scales the alpha of hex colors too.
opacity = 0.5

color = "white"

# Distance in pixels from the edges for the corner positions.
padding = 20

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
[fonts]
# TrueType files tried in order. When neither is found the built-in
# bitmap font is used, so watermarking always works.
preferred = "arial.ttf"
fallback = "DejaVuSans.ttf"

# Directories searched recursively for the files above.
# Defaults to the usual system font directories.
# search_dirs = ["/usr/share/fonts", "~/.local/share/fonts"]
"##
}
