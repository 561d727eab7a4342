use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;

/// A region in fractional coordinates (0.0 to 1.0) of the image size.
///
/// Defining regions as fractions keeps them valid at any window resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropFractions {
    pub x_start: f64,
    pub y_start: f64,
    pub x_end: f64,
    pub y_end: f64,
}

/// Absolute pixel bounds of a crop, end-exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelBounds {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

fn scale(dimension: u32, fraction: f64) -> u32 {
    // Truncation toward zero; negative fractions saturate to 0
    ((f64::from(dimension) * fraction) as u32).min(dimension)
}

impl CropFractions {
    /// Converts the fractions to pixel bounds for an image of the given size.
    pub fn pixel_bounds(&self, width: u32, height: u32) -> PixelBounds {
        PixelBounds {
            left: scale(width, self.x_start),
            top: scale(height, self.y_start),
            right: scale(width, self.x_end),
            bottom: scale(height, self.y_end),
        }
    }
}

/// Crops a sub-region from an image using fractional coordinates.
pub fn crop_region(
    img: &DynamicImage,
    region: &CropFractions,
) -> Result<DynamicImage, AssistantError> {
    let (width, height) = img.dimensions();
    let bounds = region.pixel_bounds(width, height);
    if bounds.width() == 0 || bounds.height() == 0 {
        return Err(AssistantError::EmptyRegion { width, height });
    }

    tracing::debug!(
        "Cropping {}x{} image to ({}, {}, {}, {})",
        width,
        height,
        bounds.left,
        bounds.top,
        bounds.right,
        bounds.bottom
    );

    Ok(img.crop_imm(bounds.left, bounds.top, bounds.width(), bounds.height()))
}

/// Returns `<output_dir>/<stem>_cropped.jpg` for a source image path.
pub fn cropped_path(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    output_dir.join(format!("{}_cropped.jpg", stem))
}

/// Loads `source`, crops it to `region` and writes the result into `output_dir`.
///
/// Returns the path of the cropped image.
pub fn crop_file(
    source: &Path,
    region: &CropFractions,
    output_dir: &Path,
) -> Result<PathBuf, AssistantError> {
    let img = image::open(source).map_err(|e| AssistantError::ImageLoadFailure {
        path: source.to_path_buf(),
        source: e,
    })?;

    let cropped = crop_region(&img, region)?;

    std::fs::create_dir_all(output_dir)?;
    let path = cropped_path(source, output_dir);
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(cropped.to_rgb8())
        .save(&path)
        .map_err(|e| AssistantError::ImageLoadFailure {
            path: path.clone(),
            source: e,
        })?;

    tracing::info!("Cropped image saved to {}", path.display());
    Ok(path)
}
