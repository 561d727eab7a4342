//! GUI module for the application.
//!
//! Navigation on the left, the selected screen on the right.

pub mod render;
pub mod state;

use eframe::egui::{self, Vec2};

use crate::capture::{PlatformLocator, PlatformScreenshotter};
use crate::config::AppConfig;
use crate::ocr::{PaddleOcr, TextRecognizer};
use crate::tracker::EnkephalinTracker;

use state::{GuiState, Screen};

const APP_TITLE: &str = "Auto Assistant of Limbus";

/// Main GUI application struct.
pub struct GuiApp {
    state: GuiState,
    config: &'static AppConfig,
    /// `None` when the OCR engine failed to start; updates then report an engine error.
    recognizer: Option<PaddleOcr>,
}

impl GuiApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &'static AppConfig,
        recognizer: Option<PaddleOcr>,
    ) -> Self {
        Self::setup_fonts(&cc.egui_ctx);

        Self {
            state: GuiState::new(config.language),
            config,
            recognizer,
        }
    }

    /// Setup fonts with Chinese support.
    fn setup_fonts(ctx: &egui::Context) {
        let mut fonts = egui::FontDefinitions::default();

        let font_paths = [
            "C:\\Windows\\Fonts\\msyh.ttc",   // Microsoft YaHei
            "C:\\Windows\\Fonts\\simhei.ttf", // SimHei
            "C:\\Windows\\Fonts\\simsun.ttc", // SimSun
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        ];

        let loaded = font_paths.iter().find_map(|path| {
            std::fs::read(path).ok().map(|data| (path, data))
        });

        match loaded {
            Some((path, font_data)) => {
                fonts.font_data.insert(
                    "cjk_font".to_owned(),
                    egui::FontData::from_owned(font_data).into(),
                );
                for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                    fonts
                        .families
                        .entry(family)
                        .or_default()
                        .insert(0, "cjk_font".to_owned());
                }
                tracing::info!("Loaded CJK font from: {}", path);
            }
            None => {
                tracing::warn!("Could not load a CJK font. Chinese text may not display correctly.");
            }
        }

        ctx.set_fonts(fonts);
    }

    /// Runs one recognition cycle. Blocks the UI until it finishes.
    fn handle_update(&mut self) {
        tracing::info!("GUI: Updating enkephalin...");
        let locator = PlatformLocator;
        let screenshotter = PlatformScreenshotter;
        let recognizer = self.recognizer.as_ref().map(|r| r as &dyn TextRecognizer);
        let tracker = EnkephalinTracker::new(self.config, &locator, &screenshotter, recognizer);

        let result = tracker.update_status();
        self.state.enkephalin.apply(result, self.state.locale);
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("navigation")
            .resizable(false)
            .exact_width(180.0)
            .show(ctx, |ui| {
                if let Some(screen) = render::render_navigation(ui, &self.state) {
                    self.state.screen = screen;
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let locale = self.state.locale;
            match self.state.screen {
                Screen::Home => render::render_home(ui, locale),
                Screen::Enkephalin => {
                    if render::render_enkephalin(ui, &self.state.enkephalin, locale) {
                        self.handle_update();
                    }
                }
                screen @ Screen::MoreFeatures => render::render_not_implemented(ui, screen, locale),
            }
        });
    }
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui(config: &'static AppConfig, recognizer: Option<PaddleOcr>) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(720.0, 480.0))
            .with_min_inner_size(Vec2::new(480.0, 360.0))
            .with_title(APP_TITLE)
            // Disable drag-and-drop to avoid COM conflict with RoInitialize (multithreaded)
            .with_drag_and_drop(false),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            tracing::info!("GUI: Creating GuiApp instance...");
            Ok(Box::new(GuiApp::new(cc, config, recognizer)))
        }),
    )
}
