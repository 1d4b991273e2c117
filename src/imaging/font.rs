//! Watermark fonts.
//!
//! A TrueType font is looked up by file name in a list of directories; when
//! none of the candidates can be found or parsed, the built-in 8x8 bitmap
//! font is used instead, scaled up with nearest-neighbor to the requested
//! size. Watermarking therefore never fails for lack of fonts.

use ab_glyph::{FontVec, PxScale};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories searched when the font config names none.
pub const DEFAULT_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

const FONT_SEARCH_DEPTH: usize = 5;

/// Where to look for a watermark font, in order of preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSearch {
    pub candidates: Vec<String>,
    pub search_dirs: Vec<PathBuf>,
}

impl Default for FontSearch {
    fn default() -> Self {
        Self {
            candidates: vec!["arial.ttf".into(), "DejaVuSans.ttf".into()],
            search_dirs: DEFAULT_FONT_DIRS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl FontSearch {
    pub fn load(&self) -> WatermarkFont {
        let names: Vec<&str> = self.candidates.iter().map(String::as_str).collect();
        WatermarkFont::resolve(&names, &self.search_dirs)
    }
}

pub enum WatermarkFont {
    TrueType(FontVec),
    Bitmap,
}

impl std::fmt::Debug for WatermarkFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatermarkFont::TrueType(_) => f.write_str("WatermarkFont::TrueType"),
            WatermarkFont::Bitmap => f.write_str("WatermarkFont::Bitmap"),
        }
    }
}

impl WatermarkFont {
    /// Load the first candidate that can be found and parsed.
    pub fn resolve(candidates: &[&str], search_dirs: &[PathBuf]) -> Self {
        for name in candidates {
            let Some(path) = find_font_file(name, search_dirs) else {
                tracing::debug!(font = name, "font not found");
                continue;
            };
            match std::fs::read(&path).map(FontVec::try_from_vec) {
                Ok(Ok(font)) => {
                    tracing::debug!(path = %path.display(), "loaded watermark font");
                    return WatermarkFont::TrueType(font);
                }
                Ok(Err(e)) => tracing::warn!(path = %path.display(), "invalid font file: {e}"),
                Err(e) => tracing::warn!(path = %path.display(), "cannot read font file: {e}"),
            }
        }
        tracing::warn!("no TrueType font available, using built-in bitmap font");
        WatermarkFont::Bitmap
    }

    /// Width and height of `text` rendered at `size` pixels.
    pub fn text_size(&self, text: &str, size: u32) -> (u32, u32) {
        match self {
            WatermarkFont::TrueType(font) => text_size(PxScale::from(size as f32), font, text),
            WatermarkFont::Bitmap => bitmap_text_size(text, size),
        }
    }

    /// Draw `text` with its top-left corner at `origin`. Pixels outside the
    /// canvas are clipped.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, origin: (i32, i32), size: u32, color: Rgba<u8>) {
        match self {
            WatermarkFont::TrueType(font) => {
                draw_text_mut(canvas, color, origin.0, origin.1, PxScale::from(size as f32), font, text)
            }
            WatermarkFont::Bitmap => draw_bitmap_text(canvas, text, origin, size, color),
        }
    }
}

/// Find `name` as a path, or by file name (case-insensitive) under `dirs`.
pub fn find_font_file(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }
    let wanted = name.to_ascii_lowercase();
    dirs.iter().filter(|dir| dir.is_dir()).find_map(|dir| {
        WalkDir::new(dir)
            .max_depth(FONT_SEARCH_DEPTH)
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_type().is_file()
                    && e.file_name().to_string_lossy().to_ascii_lowercase() == wanted
            })
            .map(|e| e.into_path())
    })
}

fn bitmap_scale(size: u32) -> u32 {
    (size / 8).max(1)
}

/// Bitmap text extent; saturates at `u32::MAX` instead of overflowing.
fn bitmap_text_size(text: &str, size: u32) -> (u32, u32) {
    let scale = u64::from(bitmap_scale(size));
    let chars = text.chars().count() as u64;
    let height = 8 * scale;
    // One scaled column of spacing between glyphs
    let width = (chars * 9 * scale).saturating_sub(scale);
    let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
    (clamp(width), clamp(height))
}

fn draw_bitmap_text(canvas: &mut RgbaImage, text: &str, origin: (i32, i32), size: u32, color: Rgba<u8>) {
    let scale = i64::from(bitmap_scale(size));
    let advance = 9 * scale;
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (origin_x, origin_y) = (i64::from(origin.0), i64::from(origin.1));

    for (index, ch) in text.chars().enumerate() {
        let glyph_x = origin_x + index as i64 * advance;
        if glyph_x >= width {
            break;
        }
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        for (row, bits) in (0i64..).zip(glyph) {
            let y0 = origin_y + row * scale;
            let ys = y0.max(0)..(y0 + scale).min(height);
            for col in 0..8i64 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let x0 = glyph_x + col * scale;
                let xs = x0.max(0)..(x0 + scale).min(width);
                // Both ranges are clipped to the canvas, so the casts are lossless
                for y in ys.clone() {
                    for x in xs.clone() {
                        canvas.put_pixel(x as u32, y as u32, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_size_scales_with_font_size() {
        assert_eq!(bitmap_text_size("ab", 8), (17, 8));
        assert_eq!(bitmap_text_size("ab", 16), (34, 16));
        assert_eq!(bitmap_text_size("a", 3), (8, 8));
        assert_eq!(bitmap_text_size("", 16), (0, 16));
    }

    #[test]
    fn bitmap_size_saturates_for_huge_fonts() {
        assert_eq!(bitmap_text_size("ab", u32::MAX), (u32::MAX, u32::MAX));
        assert_eq!(bitmap_text_size("a", u32::MAX), (u32::MAX, u32::MAX));
    }

    #[test]
    fn missing_fonts_fall_back_to_bitmap() {
        let tmp = tempfile::TempDir::new().unwrap();
        let font = WatermarkFont::resolve(&["no-such-font.ttf"], &[tmp.path().to_path_buf()]);
        assert!(matches!(font, WatermarkFont::Bitmap));
    }

    #[test]
    fn garbage_font_file_falls_back_to_bitmap() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("broken.ttf"), b"not a font").unwrap();
        let font = WatermarkFont::resolve(&["broken.ttf"], &[tmp.path().to_path_buf()]);
        assert!(matches!(font, WatermarkFont::Bitmap));
    }

    #[test]
    fn find_font_file_is_case_insensitive_and_recursive() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("truetype/dejavu");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("DejaVuSans.ttf"), b"x").unwrap();
        let found = find_font_file("dejavusans.ttf", &[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(found, nested.join("DejaVuSans.ttf"));
    }

    #[test]
    fn bitmap_draw_marks_pixels_and_clips() {
        let mut canvas = RgbaImage::new(20, 10);
        let ink = Rgba([255, 0, 0, 255]);
        WatermarkFont::Bitmap.draw(&mut canvas, "H", (0, 0), 8, ink);
        assert!(canvas.pixels().any(|p| *p == ink));

        // Mostly off-canvas: must not panic
        WatermarkFont::Bitmap.draw(&mut canvas, "HH", (15, 5), 16, ink);
        WatermarkFont::Bitmap.draw(&mut canvas, "H", (-50, -50), 8, ink);
    }

    #[test]
    fn bitmap_draw_with_huge_font_stays_on_canvas() {
        let mut canvas = RgbaImage::new(16, 16);
        let ink = Rgba([0, 255, 0, 255]);
        // scale 2^29 - 1; only the clipped part of the first glyph is visited
        WatermarkFont::Bitmap.draw(&mut canvas, "HH", (i32::MIN, i32::MIN), u32::MAX, ink);
        WatermarkFont::Bitmap.draw(&mut canvas, "H", (0, 0), u32::MAX, ink);
        assert!(canvas.pixels().any(|p| *p == ink));
    }
}
