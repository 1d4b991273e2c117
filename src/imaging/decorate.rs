//! Border and text watermark.

use super::calculations::{calculate_watermark_origin, check_canvas, default_watermark_font_size};
use super::font::WatermarkFont;
use super::params::{BorderParams, WatermarkParams};
use super::pipeline::StepError;
use super::raster;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb, Rgba, RgbaImage, imageops};

/// Grow the canvas by `border.width` on every side, filled with the border color.
///
/// The result is RGBA when either the image or the color carries alpha,
/// RGB otherwise. Fails when the framed canvas exceeds the pixel limit.
pub fn add_border(img: &DynamicImage, border: &BorderParams) -> Result<DynamicImage, StepError> {
    let (width, height) = img.dimensions();
    let grow = 2 * u64::from(border.width);
    let (w, h) = check_canvas(u64::from(width) + grow, u64::from(height) + grow)?;
    let img = raster::to_color(&raster::to_8bit(img));
    let offset = i64::from(border.width);

    if img.color().has_alpha() || !border.color.is_opaque() {
        let mut canvas = RgbaImage::from_pixel(w, h, Rgba(border.color.to_rgba()));
        imageops::replace(&mut canvas, &img.to_rgba8(), offset, offset);
        Ok(DynamicImage::ImageRgba8(canvas))
    } else {
        let mut canvas = ImageBuffer::from_pixel(w, h, Rgb(border.color.rgb));
        imageops::replace(&mut canvas, &img.to_rgb8(), offset, offset);
        Ok(DynamicImage::ImageRgb8(canvas))
    }
}

/// Composite `watermark.text` over the image. The result is always RGBA.
///
/// Fails when the rendered text box alone would exceed the pixel limit.
pub fn add_watermark(
    img: &DynamicImage,
    watermark: &WatermarkParams,
    font: &WatermarkFont,
) -> Result<DynamicImage, StepError> {
    let (width, height) = img.dimensions();
    let size = watermark
        .size
        .unwrap_or_else(|| default_watermark_font_size(width));
    let text_size = font.text_size(&watermark.text, size);
    check_canvas(text_size.0.into(), text_size.1.into())?;
    let origin = calculate_watermark_origin(watermark.position, (width, height), text_size, watermark.padding);

    // Pre-filling the layer with the ink's RGB keeps antialiased edges from
    // darkening when coverage is blended in.
    let [r, g, b] = watermark.color.rgb;
    let mut layer = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0]));
    let ink = Rgba(watermark.color.with_opacity(watermark.opacity));
    font.draw(&mut layer, &watermark.text, origin, size, ink);

    tracing::debug!(
        text = %watermark.text,
        size,
        x = origin.0,
        y = origin.1,
        "watermark placed"
    );

    let mut base = img.to_rgba8();
    imageops::overlay(&mut base, &layer, 0, 0);
    Ok(DynamicImage::ImageRgba8(base))
}
