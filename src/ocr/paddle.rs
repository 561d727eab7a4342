//! PaddleOCR command-line recognizer.
//!
//! Runs the `paddleocr ocr` pipeline as a child process with the PP-OCRv5
//! mobile models, then reads back the `<stem>_res.json` it writes.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value};
use tempfile::TempDir;

use super::recognizer::{Prediction, TextRecognizer};
use crate::config::RecognizerConfig;
use crate::error::AssistantError;

const EXECUTABLE_NAME: &str = "paddleocr";

/// Suppresses the console window the child process would otherwise open.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// An initialized recognizer. Construct once at startup and share by reference.
#[derive(Debug, Clone)]
pub struct PaddleOcr {
    executable: PathBuf,
    model_dir: PathBuf,
    detection_model: String,
    recognition_model: String,
}

impl PaddleOcr {
    /// Prepares the model cache directory and locates the executable.
    pub fn initialize(config: &RecognizerConfig) -> Result<Self> {
        let model_dir = config
            .model_dir
            .clone()
            .unwrap_or_else(crate::paths::get_default_model_dir);
        fs::create_dir_all(&model_dir)
            .with_context(|| format!("create model dir {}", model_dir.display()))?;

        let executable = match &config.executable {
            Some(path) if path.exists() => path.clone(),
            Some(path) => bail!("configured recognizer {} does not exist", path.display()),
            None => find_executable(EXECUTABLE_NAME, std::env::var_os("PATH")).ok_or_else(
                || anyhow!("{} not found on PATH. Install it with `pip install paddleocr`.", EXECUTABLE_NAME),
            )?,
        };

        tracing::info!(
            "Recognizer ready: {} (models in {})",
            executable.display(),
            model_dir.display()
        );

        Ok(Self {
            executable,
            model_dir,
            detection_model: config.detection_model.clone(),
            recognition_model: config.recognition_model.clone(),
        })
    }

    fn command_args(&self, image_path: &Path, save_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "ocr".into(),
            "-i".into(),
            image_path.into(),
            "--save_path".into(),
            save_dir.into(),
            "--text_detection_model_name".into(),
            self.detection_model.as_str().into(),
            "--text_recognition_model_name".into(),
            self.recognition_model.as_str().into(),
        ];
        for flag in [
            "--use_doc_orientation_classify",
            "--use_doc_unwarping",
            "--use_textline_orientation",
        ] {
            args.push(flag.into());
            args.push("False".into());
        }
        args
    }

    fn command(&self, image_path: &Path, save_dir: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .args(self.command_args(image_path, save_dir))
            .env("PADDLE_HOME", &self.model_dir)
            .env("PADDLE_PDX_CACHE_HOME", &self.model_dir);

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        command
    }
}

impl TextRecognizer for PaddleOcr {
    fn predict(&self, image_path: &Path) -> Result<Prediction, AssistantError> {
        let save_dir = TempDir::new()?;

        tracing::info!("Running recognizer on {}", image_path.display());
        let output = self.command(image_path, save_dir.path()).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("Recognizer exited with {}: {}", output.status, stderr.trim());
            return Err(AssistantError::RecognitionEmpty);
        }

        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let json_path = save_dir.path().join(format!("{}_res.json", stem));

        read_prediction(&json_path, image_path)
    }
}

/// Parses a result file written by the recognizer.
///
/// A missing file or an empty `rec_texts` list means nothing was recognized.
/// A document without `rec_texts` is passed through; the caller reports it.
fn read_prediction(json_path: &Path, image_path: &Path) -> Result<Prediction, AssistantError> {
    if !json_path.exists() {
        tracing::warn!("Recognizer wrote no result for {}", image_path.display());
        return Err(AssistantError::RecognitionEmpty);
    }

    let contents = fs::read_to_string(json_path)?;
    let data: Map<String, Value> = serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let prediction = Prediction::new(image_path.to_path_buf(), data);

    match prediction.rec_texts() {
        Some(texts) if texts.is_empty() => {
            tracing::warn!("Recognizer found no text in {}", image_path.display());
            Err(AssistantError::RecognitionEmpty)
        }
        Some(texts) => {
            tracing::debug!("Recognized texts: {:?}", texts);
            Ok(prediction)
        }
        None => {
            tracing::warn!("Result for {} has no rec_texts", image_path.display());
            Ok(prediction)
        }
    }
}

/// Searches `path_var` for an executable called `name`.
fn find_executable(name: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    let candidates: Vec<String> = if cfg!(windows) {
        vec![format!("{}.exe", name), format!("{}.cmd", name), name.to_string()]
    } else {
        vec![name.to_string()]
    };

    std::env::split_paths(&path_var)
        .flat_map(|dir| candidates.iter().map(move |c| dir.join(c)))
        .find(|candidate| candidate.is_file())
}
