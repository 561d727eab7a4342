//! Error taxonomy for a single recognition cycle.
//!
//! Every failure of the capture → crop → recognize → parse pipeline is one of
//! these variants. None of them are fatal: the GUI turns each one into one of
//! two user-visible messages through [`AssistantError::user_message`].

use std::path::PathBuf;

use thiserror::Error;

use crate::status::{Locale, ParseError};

#[derive(Debug, Error)]
pub enum AssistantError {
    /// The text recognizer was never initialized.
    #[error("text recognizer is not initialized")]
    EngineUnavailable,

    #[error("could not find a window titled \"{title}\"")]
    WindowNotFound { title: String },

    /// Capture failed. The orchestrator logs this and keeps the previous screenshot.
    #[error("screenshot capture failed: {0}")]
    ScreenshotFailure(String),

    #[error("failed to load image {}: {source}", path.display())]
    ImageLoadFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("crop region is empty for a {width}x{height} image")]
    EmptyRegion { width: u32, height: u32 },

    #[error("recognizer produced no output")]
    RecognitionEmpty,

    #[error("key \"{key}\" missing from {}", path.display())]
    JsonKeyMissing { key: String, path: PathBuf },

    #[error("no recognized text looks like a status value")]
    StatusTextMissing,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The two messages a user can see when an update fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserMessage {
    EngineError,
    RecognitionFailed,
}

impl UserMessage {
    pub fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::EngineError, Locale::En) => "engine error",
            (Self::EngineError, Locale::Zh) => "引擎错误",
            (Self::RecognitionFailed, Locale::En) => "recognition failed, retry",
            (Self::RecognitionFailed, Locale::Zh) => "识别失败，请重试",
        }
    }
}

impl AssistantError {
    pub fn user_message(&self) -> UserMessage {
        match self {
            Self::EngineUnavailable | Self::WindowNotFound { .. } => UserMessage::EngineError,
            _ => UserMessage::RecognitionFailed,
        }
    }
}
