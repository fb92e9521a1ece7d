//! Image and result arrays, plus a built-in threshold classifier.

use ndarray::{stack, Array2, ArrayD, Axis};

use crate::config::ClassifierConfig;
use crate::dispatch::{Classifier, ClassifyRequest};
use crate::error::ClassifyError;

/// An n-dimensional image with intensities in `0.0..=1.0`.
pub type Image = ArrayD<f32>;

/// A single 2-D plane (height x width).
pub type Plane = Array2<f32>;

/// Controls how sharply probabilities fall off around the threshold.
const PROBABILITY_SHARPNESS: f32 = 12.0;

/// Two-class pixel classifier driven by an intensity threshold.
///
/// In label mode each pixel becomes `1.0` (foreground) or `0.0`
/// (background). In probability mode the result gains a trailing axis of
/// length 2 holding the background and foreground probabilities, which
/// straddle 0.5 exactly at the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdClassifier {
    threshold: f32,
    invert: bool,
}

impl ThresholdClassifier {
    pub fn new(threshold: f32, invert: bool) -> Self {
        Self { threshold, invert }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.threshold, config.invert)
    }

    fn foreground_probability(&self, value: f32) -> f32 {
        let p = 1.0 / (1.0 + (-(value - self.threshold) * PROBABILITY_SHARPNESS).exp());
        if self.invert {
            1.0 - p
        } else {
            p
        }
    }

    fn is_foreground(&self, value: f32) -> bool {
        (value >= self.threshold) != self.invert
    }
}

impl Classifier for ThresholdClassifier {
    type Input = Image;
    type Output = Image;

    fn classify(&self, input: &Image, request: &ClassifyRequest) -> Result<Image, ClassifyError> {
        if input.ndim() == 0 || input.shape().contains(&0) {
            return Err(ClassifyError::Unsupported(format!(
                "image {} has an empty extent {:?}",
                request.index,
                input.shape()
            )));
        }
        if input.iter().any(|v| !v.is_finite()) {
            return Err(ClassifyError::Unsupported(format!(
                "image {} contains non-finite pixels",
                request.index
            )));
        }

        if !request.probability_maps {
            return Ok(input.mapv(|v| if self.is_foreground(v) { 1.0 } else { 0.0 }));
        }

        let foreground = input.mapv(|v| self.foreground_probability(v));
        let background = foreground.mapv(|p| 1.0 - p);
        stack(
            Axis(input.ndim()),
            &[background.view(), foreground.view()],
        )
        .map_err(|e| ClassifyError::Internal(e.to_string()))
    }
}
