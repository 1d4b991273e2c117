//! Input discovery: which files are images, and which images a batch covers.
//!
//! ## Supported inputs
//!
//! A path is an image when it is a regular file whose extension (any case)
//! is one of [`SUPPORTED_EXTENSIONS`]. Nothing is decoded here; a file with
//! the right extension and broken content passes validation and fails later
//! when it is opened.
//!
//! ## Batch layout
//!
//! ```text
//! photos/                    out/
//! ├── a.jpg          →       ├── a.jpg
//! ├── notes.txt              │
//! └── trip/                  └── trip/
//!     └── b.png      →           └── b.png      (recursive only)
//! ```
//!
//! With `--recursive` the whole tree is walked; otherwise only the immediate
//! directory contents are considered. Candidates are returned sorted so runs
//! are reproducible.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// Is `path` a regular file with a supported image extension?
pub fn is_valid_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

/// All images under `dir`, sorted by path.
pub fn collect_images(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let walker = WalkDir::new(dir).min_depth(1);
    let walker = if recursive { walker } else { walker.max_depth(1) };

    let mut images: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|path| is_valid_image(path))
        .collect();
    images.sort();
    images
}

/// Directory an image's output goes to when batch output is redirected:
/// the image's directory relative to `input_root`, re-rooted under `output_root`.
pub fn mirrored_output_dir(image: &Path, input_root: &Path, output_root: &Path) -> PathBuf {
    let relative_dir = image
        .parent()
        .and_then(|parent| parent.strip_prefix(input_root).ok())
        .unwrap_or_else(|| Path::new(""));
    output_root.join(relative_dir)
}
