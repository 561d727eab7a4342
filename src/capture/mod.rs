//! Game window discovery and screenshot capture.
//!
//! The pipeline only talks to the [`WindowLocator`] and [`Screenshotter`]
//! traits. On Windows they are backed by Win32 window lookup and the Windows
//! Graphics Capture API; other platforms get a locator that never finds the
//! game.

#[cfg(windows)]
pub mod screenshot;
#[cfg(windows)]
pub mod window;

use std::path::Path;

use crate::error::AssistantError;

/// Screen rectangle of a window, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// A located top-level window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameWindow {
    /// Native window handle as an integer.
    pub handle: isize,
    pub rect: WindowRect,
}

pub trait WindowLocator {
    /// Finds a window by its exact title.
    fn locate(&self, title: &str) -> Option<GameWindow>;

    /// Restores the window if minimized and brings it to the foreground.
    fn bring_to_front(&self, window: &GameWindow);
}

pub trait Screenshotter {
    /// Captures `window` and writes the image to `path`, overwriting it.
    fn capture(&self, window: &GameWindow, path: &Path) -> Result<(), AssistantError>;
}

#[cfg(windows)]
pub use screenshot::GraphicsCaptureScreenshotter as PlatformScreenshotter;
#[cfg(windows)]
pub use window::Win32WindowLocator as PlatformLocator;

#[cfg(not(windows))]
pub use unsupported::Unsupported as PlatformLocator;
#[cfg(not(windows))]
pub use unsupported::Unsupported as PlatformScreenshotter;

#[cfg(not(windows))]
mod unsupported {
    use super::*;

    /// Window capture needs Win32; this backend reports the game as not running.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Unsupported;

    impl WindowLocator for Unsupported {
        fn locate(&self, title: &str) -> Option<GameWindow> {
            tracing::warn!(
                "Window lookup is only supported on Windows, cannot find \"{}\"",
                title
            );
            None
        }

        fn bring_to_front(&self, _window: &GameWindow) {}
    }

    impl Screenshotter for Unsupported {
        fn capture(&self, _window: &GameWindow, _path: &Path) -> Result<(), AssistantError> {
            Err(AssistantError::ScreenshotFailure(
                "screen capture is only supported on Windows".to_string(),
            ))
        }
    }
}
