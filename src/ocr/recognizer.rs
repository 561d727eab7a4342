use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::extract::rec_texts_in;
use crate::error::AssistantError;

/// Key under which recognized strings are stored in the result JSON.
pub const REC_TEXTS_KEY: &str = "rec_texts";

/// Recognition result for one image.
///
/// Holds the recognizer's result document as-is, so saving it keeps every
/// field the model produced (`rec_texts`, `rec_scores`, boxes, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    input_path: PathBuf,
    data: Map<String, Value>,
}

impl Prediction {
    pub fn new(input_path: PathBuf, data: Map<String, Value>) -> Self {
        Self { input_path, data }
    }

    /// Builds a minimal document holding only the recognized strings.
    #[cfg(test)]
    pub fn from_texts<I, S>(input_path: PathBuf, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut data = Map::new();
        data.insert(
            "input_path".to_string(),
            Value::String(input_path.to_string_lossy().into_owned()),
        );
        data.insert(
            REC_TEXTS_KEY.to_string(),
            Value::Array(texts.into_iter().map(|t| Value::String(t.into())).collect()),
        );
        Self { input_path, data }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Recognized strings in detection order, if the document has them.
    pub fn rec_texts(&self) -> Option<Vec<String>> {
        rec_texts_in(&self.data)
    }

    /// File name of the saved result: `<stem>_res.json`.
    pub fn json_file_name(&self) -> String {
        let stem = self
            .input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        format!("{}_res.json", stem)
    }

    /// Writes the result to `<dir>/<stem>_res.json`, overwriting any previous file.
    pub fn save_to_json(&self, dir: &Path) -> Result<PathBuf, AssistantError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.json_file_name());
        let json = serde_json::to_string_pretty(&self.data).map_err(std::io::Error::other)?;
        fs::write(&path, json)?;
        tracing::info!("Recognition result saved to {}", path.display());
        Ok(path)
    }
}

/// Turns an image on disk into recognized text lines.
pub trait TextRecognizer {
    fn predict(&self, image_path: &Path) -> Result<Prediction, AssistantError>;
}
