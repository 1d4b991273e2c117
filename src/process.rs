//! Single-image and batch processing.
//!
//! ## Single image
//!
//! ```text
//! validate → load → pipeline → resolve output path → mkdir -p → save → [info]
//! ```
//!
//! Validation, load and save failures abort the file. Pipeline step failures
//! never do: the pipeline logs them and carries on with the previous image.
//!
//! ## Batch
//!
//! Every image found by [`collect_images`] is run through the same
//! [`Editor`], one after another. With an output directory the input's
//! sub-directory structure is mirrored underneath it; without one, each
//! output lands next to its source. A failing file is reported and counted,
//! and the batch moves on.

use crate::imaging::{BackendError, EditParams, ImageBackend, Pipeline, SaveOptions};
use crate::metadata::read_image_info;
use crate::naming::resolve_output_path;
use crate::output;
use crate::scan::{collect_images, is_valid_image, mirrored_output_dir};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{0} is not a valid image file")]
    InvalidInput(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("{0} is not a valid directory")]
    NotADirectory(PathBuf),
    #[error("Error creating output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No valid image files found in {0}")]
    NoImages(PathBuf),
}

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub total: usize,
}

/// Everything needed to edit images with one set of parameters.
pub struct Editor<'a, B: ImageBackend> {
    pub backend: &'a B,
    pub params: &'a EditParams,
    pub pipeline: &'a Pipeline,
    /// Print `--info` blocks as JSON.
    pub json_info: bool,
}

impl<B: ImageBackend> Editor<'_, B> {
    /// Edit one image and write it. Returns the path written.
    pub fn process_image(&self, input: &Path, output: Option<&Path>) -> Result<PathBuf, ProcessError> {
        if !is_valid_image(input) {
            return Err(ProcessError::InvalidInput(input.to_path_buf()));
        }

        let img = self.backend.load(input)?;
        let result = self.pipeline.run(img);
        if !result.skipped.is_empty() {
            tracing::warn!(
                input = %input.display(),
                skipped = ?result.skipped,
                "some steps were skipped"
            );
        }

        // A derived name only gets a suffix when we pick the location ourselves
        let suffix = output.is_none().then(|| self.params.output_suffix());
        let out_path = resolve_output_path(input, output, suffix, self.params.format);
        if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let options = SaveOptions {
            format: self.params.format.map(|f| f.image_format()),
            quality: self.params.quality.unwrap_or_default(),
        };
        self.backend.save(&result.image, &out_path, &options)?;
        tracing::debug!(
            input = %input.display(),
            output = %out_path.display(),
            "saved"
        );
        Ok(out_path)
    }

    /// [`process_image`](Self::process_image), printing the outcome.
    /// Returns whether the image was written.
    pub fn process_and_report(&self, input: &Path, output: Option<&Path>) -> bool {
        match self.process_image(input, output) {
            Ok(path) => {
                output::print_saved(&path);
                if self.params.info {
                    match read_image_info(&path) {
                        Ok(info) => output::print_image_info(&info, self.json_info),
                        Err(e) => {
                            tracing::error!("Error getting image info: {e}");
                            output::print_no_info();
                        }
                    }
                }
                true
            }
            Err(ProcessError::InvalidInput(path)) => {
                tracing::error!("Error: {} is not a valid image file", path.display());
                false
            }
            Err(e) => {
                tracing::error!("Error processing image {}: {e}", input.display());
                false
            }
        }
    }

    /// Edit every image in `input_dir`.
    pub fn batch_process(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        recursive: bool,
    ) -> Result<BatchSummary, BatchError> {
        if !input_dir.is_dir() {
            return Err(BatchError::NotADirectory(input_dir.to_path_buf()));
        }
        if let Some(dir) = output_dir {
            std::fs::create_dir_all(dir).map_err(|source| BatchError::CreateOutputDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let images = collect_images(input_dir, recursive);
        if images.is_empty() {
            return Err(BatchError::NoImages(input_dir.to_path_buf()));
        }
        tracing::debug!(count = images.len(), dir = %input_dir.display(), "batch started");

        let mut succeeded = 0;
        for image in &images {
            let target_dir = match output_dir {
                Some(root) => {
                    let dir = mirrored_output_dir(image, input_dir, root);
                    if let Err(e) = std::fs::create_dir_all(&dir) {
                        tracing::error!("Error creating output directory {}: {e}", dir.display());
                        continue;
                    }
                    Some(dir)
                }
                None => None,
            };

            output::print_batch_progress(image);
            if self.process_and_report(image, target_dir.as_deref()) {
                succeeded += 1;
            }
        }

        let summary = BatchSummary {
            succeeded,
            total: images.len(),
        };
        output::print_batch_summary(&summary);
        Ok(summary)
    }
}
