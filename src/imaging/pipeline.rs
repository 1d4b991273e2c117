//! The fixed-order edit pipeline.
//!
//! ```text
//! rotate → crop → resize → filter → adjust → border → watermark
//! ```
//!
//! A [`Pipeline`] is built once from [`EditParams`] and can be run over any
//! number of images. Steps whose parameters are absent are never built. A
//! step that fails is logged and skipped; the next step sees the image from
//! before the failure.

use super::adjust::apply_adjustments;
use super::calculations::CanvasTooLarge;
use super::decorate::{add_border, add_watermark};
use super::filters::apply_filter;
use super::font::{FontSearch, WatermarkFont};
use super::geometry::{crop, resize, rotate};
use super::params::{Adjustments, BorderParams, CropBox, EditParams, FilterKind, ResizeSpec, WatermarkParams};
use image::DynamicImage;
use std::cell::OnceCell;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("resize {0:?} produces an empty image")]
    EmptyResize(ResizeSpec),
    #[error(transparent)]
    CanvasTooLarge(#[from] CanvasTooLarge),
}

/// One edit, with everything it needs already resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Rotate(f32),
    Crop(CropBox),
    Resize { spec: ResizeSpec, keep_aspect: bool },
    Filter(FilterKind),
    Adjust(Adjustments),
    Border(BorderParams),
    Watermark(WatermarkParams),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Rotate(_) => "rotate",
            Step::Crop(_) => "crop",
            Step::Resize { .. } => "resize",
            Step::Filter(_) => "filter",
            Step::Adjust(_) => "adjust",
            Step::Border(_) => "border",
            Step::Watermark(_) => "watermark",
        }
    }
}

/// Outcome of running the pipeline over one image.
#[derive(Debug)]
pub struct PipelineOutput {
    pub image: DynamicImage,
    /// Names of steps that failed and were skipped.
    pub skipped: Vec<&'static str>,
}

#[derive(Debug)]
pub struct Pipeline {
    steps: Vec<Step>,
    fonts: FontSearch,
    font: OnceCell<WatermarkFont>,
}

impl Pipeline {
    pub fn from_params(params: &EditParams, fonts: FontSearch) -> Self {
        let mut steps = Vec::new();
        if let Some(degrees) = params.rotate {
            steps.push(Step::Rotate(degrees));
        }
        if let Some(crop) = params.crop {
            steps.push(Step::Crop(crop));
        }
        if let Some(spec) = params.resize {
            steps.push(Step::Resize {
                spec,
                keep_aspect: params.keep_aspect,
            });
        }
        if let Some(filter) = params.filter {
            steps.push(Step::Filter(filter));
        }
        if !params.adjustments.is_empty() {
            steps.push(Step::Adjust(params.adjustments));
        }
        if let Some(border) = params.border {
            steps.push(Step::Border(border));
        }
        if let Some(watermark) = &params.watermark {
            steps.push(Step::Watermark(watermark.clone()));
        }
        Self {
            steps,
            fonts,
            font: OnceCell::new(),
        }
    }

    /// Use `font` for watermarks instead of searching for one.
    pub fn with_font(mut self, font: WatermarkFont) -> Self {
        self.font = OnceCell::from(font);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(&self, img: DynamicImage) -> PipelineOutput {
        let mut image = img;
        let mut skipped = Vec::new();
        for step in &self.steps {
            match self.apply(step, &image) {
                Ok(next) => {
                    tracing::debug!(
                        step = step.name(),
                        width = next.width(),
                        height = next.height(),
                        "applied"
                    );
                    image = next;
                }
                Err(e) => {
                    tracing::error!(step = step.name(), "step skipped: {e}");
                    skipped.push(step.name());
                }
            }
        }
        PipelineOutput { image, skipped }
    }

    fn apply(&self, step: &Step, img: &DynamicImage) -> Result<DynamicImage, StepError> {
        Ok(match step {
            Step::Rotate(degrees) => rotate(img, *degrees),
            Step::Crop(crop_box) => crop(img, *crop_box),
            Step::Resize { spec, keep_aspect } => resize(img, *spec, *keep_aspect)?,
            Step::Filter(filter) => apply_filter(img, *filter),
            Step::Adjust(adjustments) => apply_adjustments(img, adjustments),
            Step::Border(border) => add_border(img, border)?,
            Step::Watermark(watermark) => {
                let font = self.font.get_or_init(|| self.fonts.load());
                add_watermark(img, watermark, font)?
            }
        })
    }
}
