//! UI overlay using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::app::Viewer;
use crate::xr;

/// Button fill, #007bff
const BUTTON_FILL: egui::Color32 = egui::Color32::from_rgb(0, 123, 255);

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, session_button_ui);
    }
}

fn session_button_ui(mut contexts: EguiContexts, viewer: Res<Viewer>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::Area::new(egui::Id::new("vr_session_button"))
        .fixed_pos(egui::pos2(20.0, 20.0))
        .show(ctx, |ui| {
            ui.spacing_mut().button_padding = egui::vec2(10.0, 10.0);

            let text = egui::RichText::new(viewer.label().text())
                .size(16.0)
                .color(egui::Color32::WHITE);
            if ui.add(egui::Button::new(text).fill(BUTTON_FILL)).clicked() {
                xr::start_session(&viewer);
            }

            if let Some(status) = viewer.status_line() {
                ui.label(
                    egui::RichText::new(status)
                        .small()
                        .color(egui::Color32::LIGHT_GRAY),
                );
            }
        });
}
