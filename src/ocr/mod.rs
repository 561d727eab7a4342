pub mod crop;
pub mod extract;
pub mod paddle;
pub mod recognizer;

pub use crop::{crop_file, CropFractions};
pub use extract::{load_rec_texts, StatusTextSelector};
pub use paddle::PaddleOcr;
pub use recognizer::TextRecognizer;

use std::path::{Path, PathBuf};

use crate::error::AssistantError;

/// High-level function: screenshot → cropped region → saved recognition JSON.
///
/// Crops `region` out of `source`, runs the recognizer on the crop and saves
/// the result next to it in `output_dir`. Returns the JSON path.
pub fn recognize_region(
    source: &Path,
    region: &CropFractions,
    recognizer: &dyn TextRecognizer,
    output_dir: &Path,
) -> Result<PathBuf, AssistantError> {
    let cropped = crop_file(source, region, output_dir)?;

    tracing::info!("Running OCR...");
    let prediction = recognizer.predict(&cropped)?;
    tracing::info!(
        "OCR finished for {} with {} text(s)",
        prediction.input_path().display(),
        prediction.rec_texts().map_or(0, |texts| texts.len())
    );

    prediction.save_to_json(output_dir)
}
