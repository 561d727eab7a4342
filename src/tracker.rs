//! One enkephalin recognition cycle.
//!
//! Sequence: locate the game window → capture it → crop the enkephalin
//! counter → recognize text → read `rec_texts` back from the saved JSON →
//! pick the `current/max` string → parse it.
//!
//! A failed capture is logged and the previous screenshot on disk is reused.
//! Every other failure ends the cycle with an [`AssistantError`]. Nothing is
//! retried here; the user starts a new cycle.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::capture::{Screenshotter, WindowLocator};
use crate::config::AppConfig;
use crate::error::AssistantError;
use crate::ocr::{self, TextRecognizer};
use crate::paths;
use crate::status::ResourceStatus;

/// Outcome of a successful cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusReading {
    pub status: ResourceStatus,
    /// The recognized text the status was parsed from.
    pub raw_text: String,
    pub json_path: PathBuf,
    pub captured_at: DateTime<Local>,
}

/// Collaborators for a recognition cycle, borrowed for its duration.
pub struct EnkephalinTracker<'a> {
    config: &'a AppConfig,
    locator: &'a dyn WindowLocator,
    screenshotter: &'a dyn Screenshotter,
    recognizer: Option<&'a dyn TextRecognizer>,
}

impl<'a> EnkephalinTracker<'a> {
    pub fn new(
        config: &'a AppConfig,
        locator: &'a dyn WindowLocator,
        screenshotter: &'a dyn Screenshotter,
        recognizer: Option<&'a dyn TextRecognizer>,
    ) -> Self {
        Self {
            config,
            locator,
            screenshotter,
            recognizer,
        }
    }

    pub fn update_status(&self) -> Result<StatusReading, AssistantError> {
        let recognizer = self.recognizer.ok_or(AssistantError::EngineUnavailable)?;

        let title = &self.config.window_title;
        let window = self
            .locator
            .locate(title)
            .ok_or_else(|| AssistantError::WindowNotFound {
                title: title.clone(),
            })?;

        let screenshot_path = paths::resolve(&self.config.screenshot_path);
        self.locator.bring_to_front(&window);
        if let Err(e) = self.screenshotter.capture(&window, &screenshot_path) {
            tracing::warn!("Screenshot not updated, using previous image: {}", e);
        }

        let results_dir = paths::resolve(&self.config.results_dir);
        let json_path = ocr::recognize_region(
            &screenshot_path,
            &self.config.enkephalin_region,
            recognizer,
            &results_dir,
        )?;

        let texts = ocr::load_rec_texts(&json_path)?;
        let raw_text = self.config.status_text.select(&texts)?;
        let status: ResourceStatus = raw_text.parse()?;

        tracing::info!(
            "Enkephalin {}/{} ({}) from \"{}\"",
            status.current,
            status.max,
            status.time_to_full(),
            raw_text
        );

        Ok(StatusReading {
            status,
            raw_text,
            json_path,
            captured_at: Local::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::path::Path;

    use image::{Rgba, RgbaImage};
    use serde_json::{Map, Value};
    use tempfile::TempDir;

    use super::*;
    use crate::capture::{GameWindow, WindowRect};
    use crate::error::UserMessage;
    use crate::ocr::StatusTextSelector;
    use crate::ocr::recognizer::Prediction;

    struct FakeLocator {
        found: bool,
        raised: Cell<bool>,
    }

    impl FakeLocator {
        fn new(found: bool) -> Self {
            Self {
                found,
                raised: Cell::new(false),
            }
        }
    }

    impl WindowLocator for FakeLocator {
        fn locate(&self, _title: &str) -> Option<GameWindow> {
            self.found.then_some(GameWindow {
                handle: 1,
                rect: WindowRect {
                    left: 0,
                    top: 0,
                    right: 1000,
                    bottom: 2000,
                },
            })
        }

        fn bring_to_front(&self, _window: &GameWindow) {
            self.raised.set(true);
        }
    }

    /// Writes a blank 1000x2000 screenshot, or fails.
    struct FakeScreenshotter {
        fail: bool,
    }

    impl Screenshotter for FakeScreenshotter {
        fn capture(&self, _window: &GameWindow, path: &Path) -> Result<(), AssistantError> {
            if self.fail {
                return Err(AssistantError::ScreenshotFailure("device lost".to_string()));
            }
            std::fs::create_dir_all(path.parent().unwrap())?;
            RgbaImage::from_pixel(1000, 2000, Rgba([0, 0, 0, 255]))
                .save(path)
                .unwrap();
            Ok(())
        }
    }

    /// Returns a canned result document and records the image it was given.
    struct FakeRecognizer {
        data: Map<String, Value>,
        seen: RefCell<Option<PathBuf>>,
    }

    impl FakeRecognizer {
        fn with_texts(texts: &[&str]) -> Self {
            Self::with_json(&serde_json::json!({ "rec_texts": texts }).to_string())
        }

        fn with_json(json: &str) -> Self {
            Self {
                data: serde_json::from_str(json).unwrap(),
                seen: Default::default(),
            }
        }
    }

    impl TextRecognizer for FakeRecognizer {
        fn predict(&self, image_path: &Path) -> Result<Prediction, AssistantError> {
            *self.seen.borrow_mut() = Some(image_path.to_path_buf());
            Ok(Prediction::new(image_path.to_path_buf(), self.data.clone()))
        }
    }

    fn config(dir: &TempDir) -> AppConfig {
        AppConfig {
            screenshot_path: dir.path().join("current").join("screenshot.png"),
            results_dir: dir.path().join("ocr_results"),
            ..AppConfig::default()
        }
    }

    /// Runs one cycle with a window that is found or not and a capture that works or fails.
    fn run(
        config: &AppConfig,
        window_found: bool,
        capture_fails: bool,
        recognizer: Option<&FakeRecognizer>,
    ) -> Result<StatusReading, AssistantError> {
        let locator = FakeLocator::new(window_found);
        let screenshotter = FakeScreenshotter {
            fail: capture_fails,
        };
        let recognizer = recognizer.map(|r| r as &dyn TextRecognizer);
        EnkephalinTracker::new(config, &locator, &screenshotter, recognizer).update_status()
    }

    #[test]
    fn test_update_status() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let locator = FakeLocator::new(true);
        let screenshotter = FakeScreenshotter { fail: false };
        let recognizer = FakeRecognizer::with_texts(&["Enkephalin", "Lv", "16/123"]);
        let tracker =
            EnkephalinTracker::new(&config, &locator, &screenshotter, Some(&recognizer));

        let reading = tracker.update_status().unwrap();
        assert_eq!(reading.status, ResourceStatus { current: 16, max: 123 });
        assert_eq!(reading.raw_text, "16/123");
        assert_eq!(reading.status.time_to_full().to_string(), "10h 42m");
        assert_eq!(
            reading.json_path,
            dir.path().join("ocr_results").join("screenshot_cropped_res.json")
        );
        assert!(locator.raised.get());
        assert_eq!(
            recognizer.seen.borrow().as_deref(),
            Some(dir.path().join("ocr_results").join("screenshot_cropped.jpg").as_path())
        );
    }

    #[test]
    fn test_positional_selection() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            status_text: StatusTextSelector::Index(2),
            ..config(&dir)
        };
        let recognizer = FakeRecognizer::with_texts(&["Enkephalin", "99/99", "123/123"]);
        let reading = run(&config, true, false, Some(&recognizer)).unwrap();
        assert_eq!(reading.raw_text, "123/123");
        assert!(reading.status.is_full());
    }

    #[test]
    fn test_engine_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let err = run(&config, true, false, None).unwrap_err();
        assert!(matches!(err, AssistantError::EngineUnavailable));
        assert_eq!(err.user_message(), UserMessage::EngineError);
    }

    #[test]
    fn test_window_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let recognizer = FakeRecognizer::with_texts(&["16/123"]);
        let err = run(&config, false, false, Some(&recognizer)).unwrap_err();
        assert!(matches!(err, AssistantError::WindowNotFound { .. }));
        assert_eq!(err.user_message(), UserMessage::EngineError);
        assert!(recognizer.seen.borrow().is_none());
    }

    #[test]
    fn test_failed_capture_reuses_previous_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let locator = FakeLocator::new(true);
        let window = locator.locate("").unwrap();
        FakeScreenshotter { fail: false }
            .capture(&window, &config.screenshot_path)
            .unwrap();

        let broken = FakeScreenshotter { fail: true };
        let recognizer = FakeRecognizer::with_texts(&["100/123"]);
        let tracker = EnkephalinTracker::new(&config, &locator, &broken, Some(&recognizer));

        let reading = tracker.update_status().unwrap();
        assert_eq!(reading.status, ResourceStatus { current: 100, max: 123 });
    }

    #[test]
    fn test_failed_capture_without_previous_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let recognizer = FakeRecognizer::with_texts(&["100/123"]);
        let err = run(&config, true, true, Some(&recognizer)).unwrap_err();
        assert!(matches!(err, AssistantError::ImageLoadFailure { .. }));
        assert_eq!(err.user_message(), UserMessage::RecognitionFailed);
    }

    #[test]
    fn test_missing_rec_texts_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let recognizer = FakeRecognizer::with_json(r#"{ "dt_polys": [], "rec_scores": [] }"#);
        let err = run(&config, true, false, Some(&recognizer)).unwrap_err();
        assert!(matches!(err, AssistantError::JsonKeyMissing { .. }));
        assert_eq!(err.user_message(), UserMessage::RecognitionFailed);
    }

    #[test]
    fn test_unparseable_status() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            status_text: StatusTextSelector::Index(0),
            ..config(&dir)
        };
        let recognizer = FakeRecognizer::with_texts(&["abc/123"]);
        let err = run(&config, true, false, Some(&recognizer)).unwrap_err();
        assert!(matches!(err, AssistantError::Parse(_)));
        assert_eq!(err.user_message(), UserMessage::RecognitionFailed);
    }

    #[test]
    fn test_no_status_text() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let recognizer = FakeRecognizer::with_texts(&["Enkephalin"]);
        assert!(matches!(
            run(&config, true, false, Some(&recognizer)),
            Err(AssistantError::StatusTextMissing)
        ));
    }
}
