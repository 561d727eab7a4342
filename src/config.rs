//! Application configuration.
//!
//! Loads settings from config.json at startup. Every field has a default, so
//! the file is optional and may list only the values it wants to override.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ocr::{CropFractions, StatusTextSelector};
use crate::status::Locale;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Settings for the PaddleOCR command-line recognizer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Path to the `paddleocr` executable. Searched on PATH when unset.
    pub executable: Option<PathBuf>,
    pub detection_model: String,
    pub recognition_model: String,
    /// Model cache directory. Defaults to `~/.paddleocr_models`.
    pub model_dir: Option<PathBuf>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            executable: None,
            detection_model: "PP-OCRv5_mobile_det".to_string(),
            recognition_model: "PP-OCRv5_mobile_rec".to_string(),
            model_dir: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Exact title of the game window.
    pub window_title: String,
    /// Where the window screenshot is written (relative to the executable).
    pub screenshot_path: PathBuf,
    /// Where the cropped image and recognizer JSON are written.
    pub results_dir: PathBuf,
    /// Region of the screenshot holding the enkephalin counter.
    pub enkephalin_region: CropFractions,
    /// How the status string is picked out of the recognized texts.
    pub status_text: StatusTextSelector,
    pub language: Locale,
    pub recognizer: RecognizerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "LimbusCompany".to_string(),
            screenshot_path: PathBuf::from("current").join("screenshot.png"),
            results_dir: PathBuf::from("ocr_results").join("enkephalin"),
            enkephalin_region: CropFractions {
                x_start: 0.2857,
                y_start: 0.8571,
                x_end: 0.375,
                y_end: 0.9524,
            },
            status_text: StatusTextSelector::default(),
            language: Locale::default(),
            recognizer: RecognizerConfig::default(),
        }
    }
}

/// Reads and parses a config file.
pub fn read_config(path: &Path) -> Result<AppConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

/// Loads configuration from config.json or returns defaults.
/// Looks for config.json in the same directory as the executable.
fn load_config() -> AppConfig {
    let config_path = crate::paths::get_exe_dir().join("config.json");
    tracing::info!("Looking for config at: {}", config_path.display());

    if !config_path.exists() {
        tracing::info!("config.json not found, using defaults");
        return AppConfig::default();
    }

    match read_config(&config_path) {
        Ok(config) => {
            tracing::info!("Config loaded from config.json");
            config
        }
        Err(e) => {
            tracing::warn!("{:#}. Using defaults.", e);
            AppConfig::default()
        }
    }
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    CONFIG.get_or_init(load_config);
}

/// Returns the global configuration, loading it on first use.
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(load_config)
}
