//! Auto Assistant of Limbus
//!
//! Reads the enkephalin counter from the Limbus Company window with
//! PaddleOCR and shows how long until it is full.

// Hide console window on Windows for GUI mode
#![windows_subsystem = "windows"]

mod capture;
mod config;
mod error;
mod gui;
mod logging;
mod ocr;
mod paths;
mod status;
mod tracker;

use anyhow::{anyhow, Result};

fn main() -> Result<()> {
    // Ensure output directories exist before the log file is opened
    paths::ensure_directories()?;
    logging::init();
    logging::install_panic_hook();

    #[cfg(windows)]
    unsafe {
        windows::Win32::System::WinRT::RoInitialize(
            windows::Win32::System::WinRT::RO_INIT_MULTITHREADED,
        )?
    };

    config::init_config();
    let config = config::get_config();

    let recognizer = match ocr::PaddleOcr::initialize(&config.recognizer) {
        Ok(recognizer) => Some(recognizer),
        Err(e) => {
            tracing::error!("Failed to initialize PaddleOCR: {:#}", e);
            tracing::warn!("Enkephalin updates will report an engine error.");
            None
        }
    };

    tracing::info!("Starting GUI application...");
    match gui::run_gui(config, recognizer) {
        Ok(()) => {
            tracing::info!("GUI application exited normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("GUI error: {}", e);
            Err(anyhow!("GUI error: {}", e))
        }
    }
}
