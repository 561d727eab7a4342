//! GUI rendering functions.
//!
//! Contains UI layout and component rendering logic.

use eframe::egui::{self, Color32, RichText};

use super::state::{EnkephalinView, GuiState, Screen};
use crate::status::Locale;

fn tr(locale: Locale, en: &'static str, zh: &'static str) -> &'static str {
    match locale {
        Locale::En => en,
        Locale::Zh => zh,
    }
}

/// Render the navigation buttons. Returns the screen that was clicked, if any.
pub fn render_navigation(ui: &mut egui::Ui, state: &GuiState) -> Option<Screen> {
    let mut selected = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.add_space(8.0);
        for screen in Screen::ALL {
            let button = egui::Button::new(screen.label(state.locale))
                .selected(state.screen == screen)
                .min_size(egui::vec2(ui.available_width(), 40.0));
            if ui.add(button).clicked() {
                selected = Some(screen);
            }
            ui.add_space(5.0);
        }
    });

    selected
}

pub fn render_home(ui: &mut egui::Ui, locale: Locale) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(RichText::new(tr(locale, "Welcome to AAL!", "欢迎来到AAL！")).size(24.0));
        ui.add_space(12.0);
        ui.label(
            RichText::new(tr(
                locale,
                "Pick a feature on the left.",
                "请在左侧选择一个功能。",
            ))
            .size(18.0),
        );
    });
}

/// Render the enkephalin screen. Returns true when the update button was clicked.
pub fn render_enkephalin(ui: &mut egui::Ui, view: &EnkephalinView, locale: Locale) -> bool {
    let mut update_clicked = false;

    ui.heading(tr(locale, "Enkephalin", "体力"));
    ui.add_space(16.0);

    egui::Grid::new("enkephalin_grid")
        .num_columns(2)
        .spacing([24.0, 10.0])
        .show(ui, |ui| {
            ui.label(tr(locale, "Current:", "当前体力:"));
            let current = view
                .current
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            ui.label(RichText::new(current).size(20.0).strong());
            ui.end_row();

            ui.label(tr(locale, "Time to full:", "回满时间:"));
            let color = if view.is_error {
                Color32::from_rgb(200, 0, 0)
            } else {
                Color32::from_rgb(0, 120, 200)
            };
            ui.label(RichText::new(&view.time_to_full).size(18.0).color(color));
            ui.end_row();

            if let Some(full_at) = view.full_at {
                ui.label(tr(locale, "Full at:", "预计回满:"));
                ui.label(full_at.format("%m-%d %H:%M").to_string());
                ui.end_row();
            }

            if let Some(last_update) = view.last_update {
                ui.label(tr(locale, "Last update:", "上次更新:"));
                ui.label(last_update.format("%H:%M:%S").to_string());
                ui.end_row();
            }
        });

    ui.add_space(24.0);

    if ui
        .button(RichText::new(tr(locale, "⟳ Update", "⟳ 更新体力")).size(16.0))
        .clicked()
    {
        update_clicked = true;
    }

    update_clicked
}

pub fn render_not_implemented(ui: &mut egui::Ui, screen: Screen, locale: Locale) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        let title = match locale {
            Locale::En => format!("Feature '{}' is not implemented yet.", screen.label(locale)),
            Locale::Zh => format!("功能 '{}' 尚未实现。", screen.label(locale)),
        };
        ui.label(RichText::new(title).size(24.0).color(Color32::from_rgb(200, 0, 0)));
        ui.add_space(12.0);
        ui.label(
            RichText::new(tr(
                locale,
                "Pick another feature or wait for an update.",
                "请选择其他功能或等待更新。",
            ))
            .size(18.0),
        );
    });
}
