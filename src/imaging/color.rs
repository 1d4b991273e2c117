//! Color values for borders and watermarks.
//!
//! A color arrives from the command line either as one of a small fixed set
//! of names or as a `#RRGGBB` / `#RRGGBBAA` hex string. Both resolve to a
//! single [`Color`] value before any pixel work happens, so the imaging code
//! never looks at strings.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("unknown color: {0}")]
    Unknown(String),
    #[error("malformed hex color: {0} (expected #RRGGBB or #RRGGBBAA)")]
    MalformedHex(String),
}

/// The named palette accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    Gray,
}

impl NamedColor {
    pub const ALL: [NamedColor; 9] = [
        NamedColor::Black,
        NamedColor::White,
        NamedColor::Red,
        NamedColor::Green,
        NamedColor::Blue,
        NamedColor::Yellow,
        NamedColor::Cyan,
        NamedColor::Magenta,
        NamedColor::Gray,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::White => "white",
            NamedColor::Red => "red",
            NamedColor::Green => "green",
            NamedColor::Blue => "blue",
            NamedColor::Yellow => "yellow",
            NamedColor::Cyan => "cyan",
            NamedColor::Magenta => "magenta",
            NamedColor::Gray => "gray",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            NamedColor::Black => [0, 0, 0],
            NamedColor::White => [255, 255, 255],
            NamedColor::Red => [255, 0, 0],
            NamedColor::Green => [0, 255, 0],
            NamedColor::Blue => [0, 0, 255],
            NamedColor::Yellow => [255, 255, 0],
            NamedColor::Cyan => [0, 255, 255],
            NamedColor::Magenta => [255, 0, 255],
            NamedColor::Gray => [128, 128, 128],
        }
    }

    fn lookup(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "grey" {
            return Some(NamedColor::Gray);
        }
        Self::ALL.into_iter().find(|c| c.name() == lower)
    }
}

/// A resolved color.
///
/// `alpha` is `Some` only when the source spelled one out (`#RRGGBBAA`).
/// Named colors and `#RRGGBB` carry no alpha and are treated as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub rgb: [u8; 3],
    pub alpha: Option<u8>,
}

impl Color {
    pub const BLACK: Color = Color::opaque([0, 0, 0]);
    pub const WHITE: Color = Color::opaque([255, 255, 255]);

    pub const fn opaque(rgb: [u8; 3]) -> Self {
        Self { rgb, alpha: None }
    }

    /// Effective alpha, 255 when none was given.
    pub fn alpha_or_opaque(self) -> u8 {
        self.alpha.unwrap_or(255)
    }

    /// RGBA with the alpha channel scaled by `opacity` (clamped to `[0, 1]`).
    ///
    /// The scaled value is truncated, so an opacity of 0.5 on an opaque color
    /// yields alpha 127.
    pub fn with_opacity(self, opacity: f32) -> [u8; 4] {
        let opacity = opacity.clamp(0.0, 1.0);
        let alpha = (self.alpha_or_opaque() as f32 * opacity) as u8;
        let [r, g, b] = self.rgb;
        [r, g, b, alpha]
    }

    pub fn to_rgba(self) -> [u8; 4] {
        let [r, g, b] = self.rgb;
        [r, g, b, self.alpha_or_opaque()]
    }

    pub fn is_opaque(self) -> bool {
        self.alpha_or_opaque() == 255
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        Color::opaque(named.rgb())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorError::MalformedHex(trimmed.to_string()));
        }
        NamedColor::lookup(trimmed)
            .map(Color::from)
            .ok_or_else(|| ColorError::Unknown(trimmed.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb;
        match self.alpha {
            Some(a) => write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}"),
            None => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let rgb = [byte(0)?, byte(2)?, byte(4)?];
    let alpha = if hex.len() == 8 { Some(byte(6)?) } else { None };
    Some(Color { rgb, alpha })
}

/// Parse `input`, falling back to `fallback` when it is not a known color.
///
/// Returns the fallback together with the parse error so the caller can
/// report it.
pub fn resolve_or(input: &str, fallback: Color) -> (Color, Option<ColorError>) {
    match input.parse::<Color>() {
        Ok(color) => (color, None),
        Err(e) => (fallback, Some(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!("Red".parse::<Color>().unwrap().rgb, [255, 0, 0]);
        assert_eq!("MAGENTA".parse::<Color>().unwrap().rgb, [255, 0, 255]);
        assert_eq!("grey".parse::<Color>().unwrap().rgb, [128, 128, 128]);
    }

    #[test]
    fn named_colors_have_no_alpha() {
        assert_eq!("white".parse::<Color>().unwrap().alpha, None);
    }

    #[test]
    fn hex_rgb() {
        let c: Color = "#10a0ff".parse().unwrap();
        assert_eq!(c.rgb, [0x10, 0xa0, 0xff]);
        assert_eq!(c.alpha, None);
    }

    #[test]
    fn hex_rgba() {
        let c: Color = "#FF000080".parse().unwrap();
        assert_eq!(c.rgb, [255, 0, 0]);
        assert_eq!(c.alpha, Some(0x80));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(matches!(
            "#abc".parse::<Color>(),
            Err(ColorError::MalformedHex(_))
        ));
        assert!(matches!(
            "#gg0000".parse::<Color>(),
            Err(ColorError::MalformedHex(_))
        ));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "chartreuse".parse::<Color>(),
            Err(ColorError::Unknown("chartreuse".into()))
        );
    }

    #[test]
    fn resolve_or_falls_back() {
        let (color, err) = resolve_or("nope", Color::WHITE);
        assert_eq!(color, Color::WHITE);
        assert!(err.is_some());

        let (color, err) = resolve_or("blue", Color::WHITE);
        assert_eq!(color.rgb, [0, 0, 255]);
        assert!(err.is_none());
    }

    #[test]
    fn opacity_scales_named_color_from_full_alpha() {
        let c: Color = "white".parse().unwrap();
        assert_eq!(c.with_opacity(0.5), [255, 255, 255, 127]);
        assert_eq!(c.with_opacity(1.0), [255, 255, 255, 255]);
    }

    #[test]
    fn opacity_scales_explicit_hex_alpha() {
        let c: Color = "#00000080".parse().unwrap();
        assert_eq!(c.with_opacity(0.5), [0, 0, 0, 64]);
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(Color::BLACK.with_opacity(3.0)[3], 255);
        assert_eq!(Color::BLACK.with_opacity(-1.0)[3], 0);
    }

    #[test]
    fn display_round_trips_hex() {
        assert_eq!(Color::opaque([1, 2, 3]).to_string(), "#010203");
        let c: Color = "#01020304".parse().unwrap();
        assert_eq!(c.to_string(), "#01020304");
    }
}
