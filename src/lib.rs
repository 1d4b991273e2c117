//! # imgedit
//!
//! A command-line image editor. One invocation rotates, crops, resizes,
//! filters, adjusts, frames and watermarks an image (or a whole directory of
//! them) and saves the result, optionally in another format.
//!
//! # Architecture: Fixed-Order Pipeline
//!
//! Every requested edit becomes one [`imaging::Step`]. Steps always run in
//! the same order, no matter how the flags were written:
//!
//! ```text
//! load → rotate → crop → resize → filter → adjust → border → watermark → save
//! ```
//!
//! Rotating before cropping means crop fractions refer to the rotated canvas;
//! resizing after cropping means `--resize 800` sizes the final picture, not
//! the uncropped source. Watermarks go last so they sit on top of the border.
//!
//! A step that cannot run (a resize that would produce an empty image, or a
//! border, resize or watermark whose canvas would pass
//! [`imaging::MAX_CANVAS_PIXELS`]) is logged and skipped; the remaining
//! steps still apply. Only failing to read or write the file aborts an image.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`cli`] | clap flags and their conversion into [`imaging::EditParams`] |
//! | [`config`] | Optional TOML defaults file: loading, merging, validation |
//! | [`imaging`] | Pixel work: parameters, geometry, filters, decorations, pipeline, codecs |
//! | [`process`] | Single-image and batch orchestration |
//! | [`scan`] | Input validation and directory enumeration |
//! | [`naming`] | Where an edited image is written |
//! | [`metadata`] | Format, dimensions, file size and EXIF of an image |
//! | [`output`] | Everything printed to stdout |
//!
//! # Design Decisions
//!
//! ## Parse at the Boundary
//!
//! Resize specs, crop boxes, filter names and colors are strings only inside
//! [`cli`]. The pipeline sees typed values, so a malformed flag is caught
//! once, reported, and never reaches pixel code.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, encoding and resampling use the `image` crate; rotation,
//! kernel filtering and text rendering use `imageproc`. This crate only
//! holds the kernel weight tables and the per-pixel enhancement blends.
//! There are no system dependencies: a single binary works anywhere.
//!
//! ## Fonts Never Fail
//!
//! Watermark text is drawn with a TrueType font when one can be found, and
//! with a built-in 8x8 bitmap font otherwise.

pub mod cli;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
