//! Pulls the enkephalin status string out of saved recognition results.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::recognizer::REC_TEXTS_KEY;
use crate::error::AssistantError;

/// Matches a `current/max` counter anywhere in a recognized line.
/// ASCII digits only; the status parser rejects other digit forms.
static STATUS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+/[0-9]+").expect("valid status pattern"));

/// Strategy for picking the status string among the recognized texts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTextSelector {
    /// First text containing `[0-9]+/[0-9]+`; only the matching part is returned.
    #[default]
    Pattern,
    /// Text at a fixed position in detection order.
    Index(usize),
}

impl StatusTextSelector {
    pub fn select(&self, texts: &[String]) -> Result<String, AssistantError> {
        match self {
            Self::Pattern => texts
                .iter()
                .find_map(|text| STATUS_PATTERN.find(text))
                .map(|m| m.as_str().to_string())
                .ok_or(AssistantError::StatusTextMissing),
            Self::Index(index) => texts
                .get(*index)
                .cloned()
                .ok_or(AssistantError::StatusTextMissing),
        }
    }
}

/// Reads the recognized strings stored under `rec_texts` in a result file.
pub fn load_rec_texts(json_path: &Path) -> Result<Vec<String>, AssistantError> {
    if !json_path.exists() {
        tracing::warn!("Result file {} does not exist", json_path.display());
        return Err(AssistantError::RecognitionEmpty);
    }

    let contents = fs::read_to_string(json_path)?;
    let data: Value = serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    data.as_object()
        .and_then(rec_texts_in)
        .ok_or_else(|| AssistantError::JsonKeyMissing {
            key: REC_TEXTS_KEY.to_string(),
            path: json_path.to_path_buf(),
        })
}

/// `None` when the key is absent or does not hold a list of strings.
pub(crate) fn rec_texts_in(data: &Map<String, Value>) -> Option<Vec<String>> {
    data.get(REC_TEXTS_KEY)?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pattern_finds_status_anywhere() {
        let recognized = texts(&["Enkephalin", "Lv.42", "16/123", "Module"]);
        assert_eq!(
            StatusTextSelector::Pattern.select(&recognized).unwrap(),
            "16/123"
        );
    }

    #[test]
    fn test_pattern_extracts_substring() {
        let recognized = texts(&["x", "EGO 16/123 left"]);
        assert_eq!(
            StatusTextSelector::Pattern.select(&recognized).unwrap(),
            "16/123"
        );
    }

    #[test]
    fn test_pattern_skips_fullwidth_digits() {
        let recognized = texts(&["１６/１２３", "16/123"]);
        let selected = StatusTextSelector::Pattern.select(&recognized).unwrap();
        assert_eq!(selected, "16/123");

        let status: crate::status::ResourceStatus = selected.parse().unwrap();
        assert_eq!((status.current, status.max), (16, 123));

        assert!(matches!(
            StatusTextSelector::Pattern.select(&texts(&["１６/１２３"])),
            Err(AssistantError::StatusTextMissing)
        ));
    }

    #[test]
    fn test_pattern_without_match() {
        let recognized = texts(&["Enkephalin", "Module"]);
        assert!(matches!(
            StatusTextSelector::Pattern.select(&recognized),
            Err(AssistantError::StatusTextMissing)
        ));
    }

    #[test]
    fn test_index_selection() {
        let recognized = texts(&["a", "b", "16/123"]);
        assert_eq!(StatusTextSelector::Index(2).select(&recognized).unwrap(), "16/123");
        assert!(matches!(
            StatusTextSelector::Index(3).select(&recognized),
            Err(AssistantError::StatusTextMissing)
        ));
    }

    #[test]
    fn test_load_rec_texts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screenshot_cropped_res.json");
        fs::write(
            &path,
            r#"{ "input_path": "x.jpg", "rec_texts": ["a", "16/123"], "rec_scores": [0.9, 0.8] }"#,
        )
        .unwrap();

        assert_eq!(load_rec_texts(&path).unwrap(), texts(&["a", "16/123"]));
    }

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("res.json");
        fs::write(&path, r#"{ "input_path": "x.jpg", "rec_scores": [] }"#).unwrap();

        match load_rec_texts(&path) {
            Err(AssistantError::JsonKeyMissing { key, .. }) => assert_eq!(key, "rec_texts"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("res.json");
        fs::write(&path, r#"{ "rec_texts": [1, 2] }"#).unwrap();

        assert!(matches!(
            load_rec_texts(&path),
            Err(AssistantError::JsonKeyMissing { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_rec_texts(&dir.path().join("nothing.json")),
            Err(AssistantError::RecognitionEmpty)
        ));
    }
}
