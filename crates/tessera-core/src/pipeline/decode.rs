//! Loading image files into intensity planes.

use std::path::Path;

use ndarray::Array2;

use crate::error::{PipelineError, PipelineResult};
use crate::plane::Plane;

/// Decode an image file into a grayscale plane with intensities in 0.0..=1.0.
///
/// Colour images are converted to luma. 16-bit inputs keep their full
/// precision.
pub fn decode_plane(path: &Path) -> PipelineResult<Plane> {
    if !path.exists() {
        return Err(PipelineError::FileNotFound(path.to_path_buf()));
    }

    let image = image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .decode()
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let luma = image.into_luma16();
    let (width, height) = luma.dimensions();
    let pixels: Vec<f32> = luma
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / f32::from(u16::MAX))
        .collect();

    Array2::from_shape_vec((height as usize, width as usize), pixels).map_err(|e| {
        PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}
