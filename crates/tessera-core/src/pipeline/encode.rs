//! Writing classification results as 8-bit images.

use std::path::Path;

use image::{GrayImage, Luma};
use ndarray::{ArrayViewD, Axis};

use crate::error::{PipelineError, PipelineResult};
use crate::plane::Image;

/// Render a result as a grayscale image.
///
/// Accepts a 2-D label map (values in 0.0..=1.0, scaled to 0..=255) or a
/// 3-D probability stack whose last axis holds per-class maps, in which case
/// the last class (foreground) is rendered.
pub fn render(result: &Image) -> PipelineResult<GrayImage> {
    let plane: ArrayViewD<f32> = match result.ndim() {
        2 => result.view(),
        3 => {
            let classes = result.len_of(Axis(2));
            if classes == 0 {
                return Err(PipelineError::UnsupportedShape {
                    shape: result.shape().to_vec(),
                });
            }
            result.index_axis(Axis(2), classes - 1)
        }
        _ => {
            return Err(PipelineError::UnsupportedShape {
                shape: result.shape().to_vec(),
            })
        }
    };

    let (height, width) = (plane.shape()[0], plane.shape()[1]);
    let mut out = GrayImage::new(width as u32, height as u32);
    for ((y, x), pixel) in plane
        .indexed_iter()
        .map(|(idx, v)| ((idx[0], idx[1]), *v))
    {
        let level = (pixel.clamp(0.0, 1.0) * 255.0).round() as u8;
        out.put_pixel(x as u32, y as u32, Luma([level]));
    }
    Ok(out)
}

/// Render a result and write it to `path` (format chosen by extension).
pub fn write_result(result: &Image, path: &Path) -> PipelineResult<()> {
    render(result)?
        .save(path)
        .map_err(|e| PipelineError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
