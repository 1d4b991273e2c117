//! Output path resolution.
//!
//! Where an edited image is written depends on what `--output` points at:
//!
//! | `--output` | Result for `photos/cat.png` |
//! |---|---|
//! | absent | `photos/cat_<suffix>.png` |
//! | existing directory `out/` | `out/cat.png` |
//! | anything else, e.g. `out/kitty.png` | `out/kitty.png` |
//!
//! A format override swaps the extension in every case, so `--format webp`
//! turns the rows above into `cat_<suffix>.webp`, `out/cat.webp` and
//! `out/kitty.webp`.

use crate::imaging::OutputFormat;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolve the path an edited image is written to.
///
/// `suffix` is appended to the file stem as `_suffix` when the output is
/// derived from the input name (no output, or an output directory).
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
    suffix: Option<&str>,
    format: Option<OutputFormat>,
) -> PathBuf {
    match output {
        Some(dir) if dir.is_dir() => {
            let file_name = input.file_name().map(PathBuf::from).unwrap_or_default();
            dir.join(derived_name(&file_name, suffix, format))
        }
        Some(file) => match format {
            Some(format) => file.with_extension(format.extension()),
            None => file.to_path_buf(),
        },
        None => {
            let parent = input.parent().unwrap_or_else(|| Path::new(""));
            let file_name = input.file_name().map(PathBuf::from).unwrap_or_default();
            parent.join(derived_name(&file_name, suffix, format))
        }
    }
}

/// `stem[_suffix].ext`, with `ext` replaced by the format's when one is given.
fn derived_name(file_name: &Path, suffix: Option<&str>, format: Option<OutputFormat>) -> OsString {
    let mut name = file_name.file_stem().map(OsString::from).unwrap_or_default();
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        name.push("_");
        name.push(suffix);
    }
    let ext = match format {
        Some(format) => Some(OsString::from(format.extension())),
        None => file_name.extension().map(OsString::from),
    };
    if let Some(ext) = ext {
        name.push(".");
        name.push(ext);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_output_appends_suffix_next_to_input() {
        assert_eq!(
            resolve_output_path(Path::new("photos/cat.png"), None, Some("edited"), None),
            PathBuf::from("photos/cat_edited.png")
        );
    }

    #[test]
    fn no_output_with_format_swaps_extension() {
        assert_eq!(
            resolve_output_path(
                Path::new("photos/cat.png"),
                None,
                Some("sepia"),
                Some(OutputFormat::Webp)
            ),
            PathBuf::from("photos/cat_sepia.webp")
        );
    }

    #[test]
    fn bare_file_name_input() {
        assert_eq!(
            resolve_output_path(Path::new("cat.jpg"), None, Some("edited"), None),
            PathBuf::from("cat_edited.jpg")
        );
    }

    #[test]
    fn output_directory_keeps_base_name() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            resolve_output_path(Path::new("/in/cat.png"), Some(tmp.path()), None, None),
            tmp.path().join("cat.png")
        );
        assert_eq!(
            resolve_output_path(
                Path::new("/in/cat.png"),
                Some(tmp.path()),
                Some("x"),
                Some(OutputFormat::Jpeg)
            ),
            tmp.path().join("cat_x.jpeg")
        );
    }

    #[test]
    fn output_file_is_used_verbatim() {
        assert_eq!(
            resolve_output_path(Path::new("cat.png"), Some(Path::new("/nowhere/kitty.png")), None, None),
            PathBuf::from("/nowhere/kitty.png")
        );
    }

    #[test]
    fn output_file_with_format_swaps_only_extension() {
        assert_eq!(
            resolve_output_path(
                Path::new("cat.png"),
                Some(Path::new("/nowhere/kitty.png")),
                None,
                Some(OutputFormat::Jpg)
            ),
            PathBuf::from("/nowhere/kitty.jpg")
        );
    }

    #[test]
    fn extensionless_input_gains_format_extension() {
        assert_eq!(
            resolve_output_path(Path::new("scan"), None, Some("edited"), Some(OutputFormat::Png)),
            PathBuf::from("scan_edited.png")
        );
        assert_eq!(
            resolve_output_path(Path::new("scan"), None, Some("edited"), None),
            PathBuf::from("scan_edited")
        );
    }
}
