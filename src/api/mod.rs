//! High-level, file-based entry points built on the core primitives: letterbox
//! an image file, write a depth preview, and filter a scene list. Prefer these
//! over the low-level modules when wiring depthprep into a script or CLI.
use std::path::Path;

use image::GrayImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::params::LetterboxParams;
use crate::core::processing::normalize::to_u8_preview;
use crate::core::processing::resize::resize_and_crop_with_params;
use crate::core::processing::scene_filter::{PassFilter, filter_scenes};
use crate::error::{Error, Result};
use crate::io::text::read_lines;

/// Geometry of a letterboxed image, enough to map source coordinates into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeReport {
    pub width: usize,
    pub height: usize,
    pub r: f64,
    pub delta_u: usize,
    pub delta_v: usize,
}

/// Decode `input`, letterbox it per `params` and encode the result to `output`
/// (format chosen from the extension).
pub fn letterbox_file(input: &Path, output: &Path, params: &LetterboxParams) -> Result<ResizeReport> {
    let image = image::open(input)?;
    let result = resize_and_crop_with_params(&image, params)?;
    result.image.save(output)?;
    info!("Wrote {:?} ({}x{})", output, params.target_w, params.target_h);

    Ok(ResizeReport {
        width: result.image.width() as usize,
        height: result.image.height() as usize,
        r: result.r,
        delta_u: result.delta_u,
        delta_v: result.delta_v,
    })
}

/// Save a depth or disparity map as an 8-bit grayscale visualization,
/// rescaled so its minimum is black and maximum is white.
pub fn save_depth_preview(depth: &Array2<f32>, output: &Path) -> Result<()> {
    let (rows, cols) = depth.dim();
    let preview = to_u8_preview(depth);
    let img = GrayImage::from_raw(cols as u32, rows as u32, preview.iter().copied().collect())
        .ok_or_else(|| Error::Processing(format!("cannot build {}x{} preview", cols, rows)))?;
    img.save(output)?;
    Ok(())
}

/// Read one scene description per line and keep the ones passing `filter`.
pub fn filter_scene_file(path: &Path, filter: &PassFilter) -> Result<Vec<String>> {
    let lines = read_lines(path)?;
    let kept: Vec<String> = filter_scenes(&lines, filter)
        .into_iter()
        .map(str::to_string)
        .collect();
    info!(
        "Scene filter {:?}: kept {} of {} scenes",
        filter.conditions(),
        kept.len(),
        lines.len()
    );
    Ok(kept)
}
