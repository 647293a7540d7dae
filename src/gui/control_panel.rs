//! Control Panel Widget
//! Left side panel with the column selector, decomposition settings and progress.

use crate::gui::{DecompositionController, RunState};
use crate::stats::SeasonalModel;
use egui::{Color32, ComboBox, RichText};

/// Left side control panel.
pub struct ControlPanel {
    /// Column names captured once at construction, in table order.
    pub columns: Vec<String>,
}

impl ControlPanel {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        controller: &mut DecompositionController,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 Seasonal Decompose")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Column Section =====
        ui.label(RichText::new("📁 Series").size(14.0).strong());
        ui.add_space(5.0);

        let label_width = 90.0;
        let combo_width = 150.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Column:"));
            let selected = controller.selected_column().to_string();
            ComboBox::from_id_salt("value_col")
                .width(combo_width)
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for col in &self.columns {
                        if ui.selectable_label(selected == *col, col).clicked() {
                            controller.select_column(col);
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Settings Section =====
        ui.label(RichText::new("⚙️ Decomposition").size(14.0).strong());
        ui.add_space(5.0);

        let settings = &mut controller.settings;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Period:"));
            ui.add(egui::DragValue::new(&mut settings.period).range(1..=10_000));
        });

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Model:"));
            ui.radio_value(&mut settings.model, SeasonalModel::Additive, "Additive");
            ui.radio_value(
                &mut settings.model,
                SeasonalModel::Multiplicative,
                "Multiplicative",
            );
        });

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Extrapolate:"))
                .on_hover_text("Fill undefined trend edges from this many extra points (0 = off)");
            ui.add(egui::DragValue::new(&mut settings.extrapolate_trend).range(0..=10_000));
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Button =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("▶ Plot").size(16.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Plot;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        let busy = controller.busy();
        if busy.is_visible() {
            ui.add(
                egui::ProgressBar::new(busy.progress() / 100.0)
                    .show_percentage()
                    .animate(true),
            );
            ui.add_space(5.0);
        }

        let status_color = if busy.status().starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if busy.status().starts_with("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.horizontal(|ui| {
            if controller.run_state() == RunState::Running {
                ui.spinner();
            }
            ui.label(RichText::new(busy.status()).size(11.0).color(status_color));
        });

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Plot,
}
