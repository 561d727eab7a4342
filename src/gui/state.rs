//! GUI application state management.
//!
//! Tracks the selected screen and the last enkephalin reading for display.

use chrono::{DateTime, Local};

use crate::error::AssistantError;
use crate::status::Locale;
use crate::tracker::StatusReading;

/// Screens reachable from the navigation panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Home,
    Enkephalin,
    MoreFeatures,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Home, Screen::Enkephalin, Screen::MoreFeatures];

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Home, Locale::En) => "Home",
            (Self::Home, Locale::Zh) => "主页",
            (Self::Enkephalin, Locale::En) => "Enkephalin",
            (Self::Enkephalin, Locale::Zh) => "体力提醒/计算",
            (Self::MoreFeatures, Locale::En) => "More features",
            (Self::MoreFeatures, Locale::Zh) => "更多功能",
        }
    }
}

/// Values shown on the enkephalin screen.
#[derive(Clone, Debug)]
pub struct EnkephalinView {
    /// Last successfully read value. Kept when a later update fails.
    pub current: Option<u64>,
    /// Time-to-full text, a prompt before the first update, or an error message.
    pub time_to_full: String,
    pub full_at: Option<DateTime<Local>>,
    pub last_update: Option<DateTime<Local>>,
    pub is_error: bool,
}

impl EnkephalinView {
    pub fn new(locale: Locale) -> Self {
        let prompt = match locale {
            Locale::En => "Press the button below to update enkephalin",
            Locale::Zh => "请点击下方按钮更新体力信息",
        };
        Self {
            current: None,
            time_to_full: prompt.to_string(),
            full_at: None,
            last_update: None,
            is_error: false,
        }
    }

    /// Applies the outcome of one recognition cycle.
    pub fn apply(&mut self, result: Result<StatusReading, AssistantError>, locale: Locale) {
        match result {
            Ok(reading) => {
                self.current = Some(reading.status.current);
                self.time_to_full = reading.status.time_to_full().localized(locale);
                self.full_at = if reading.status.is_full() {
                    None
                } else {
                    reading.status.full_at(reading.captured_at)
                };
                self.last_update = Some(reading.captured_at);
                self.is_error = false;
            }
            Err(e) => {
                tracing::error!("Enkephalin update failed: {}", e);
                self.time_to_full = e.user_message().text(locale).to_string();
                self.full_at = None;
                self.is_error = true;
            }
        }
    }
}

/// GUI application state.
#[derive(Debug)]
pub struct GuiState {
    pub screen: Screen,
    pub locale: Locale,
    pub enkephalin: EnkephalinView,
}

impl GuiState {
    pub fn new(locale: Locale) -> Self {
        Self {
            screen: Screen::default(),
            locale,
            enkephalin: EnkephalinView::new(locale),
        }
    }
}
