//! Window discovery for the game window.

use windows::core::{HSTRING, PCWSTR};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowW, GetWindowRect, IsIconic, SetForegroundWindow, ShowWindow, SW_RESTORE,
};

use super::{GameWindow, WindowLocator, WindowRect};

pub(crate) fn to_hwnd(handle: isize) -> HWND {
    HWND(handle as *mut std::ffi::c_void)
}

/// Finds a top-level window whose title matches `title` exactly.
pub fn find_window_by_title(title: &str) -> Option<HWND> {
    let title = HSTRING::from(title);
    let hwnd = unsafe { FindWindowW(PCWSTR::null(), PCWSTR(title.as_ptr())) }.ok()?;
    (!hwnd.is_invalid()).then_some(hwnd)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Win32WindowLocator;

impl WindowLocator for Win32WindowLocator {
    fn locate(&self, title: &str) -> Option<GameWindow> {
        tracing::info!("Searching for window \"{}\"...", title);
        let hwnd = find_window_by_title(title)?;

        let mut rect = RECT::default();
        if let Err(e) = unsafe { GetWindowRect(hwnd, &mut rect) } {
            tracing::warn!("GetWindowRect failed for {:?}: {}", hwnd, e);
            return None;
        }

        let window = GameWindow {
            handle: hwnd.0 as isize,
            rect: WindowRect {
                left: rect.left,
                top: rect.top,
                right: rect.right,
                bottom: rect.bottom,
            },
        };
        tracing::info!("Found window {:?} at {:?}", hwnd, window.rect);
        Some(window)
    }

    fn bring_to_front(&self, window: &GameWindow) {
        let hwnd = to_hwnd(window.handle);
        unsafe {
            if IsIconic(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            // Fails silently when another process holds the foreground lock
            let _ = SetForegroundWindow(hwnd);
        }
    }
}
