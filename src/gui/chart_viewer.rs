//! Chart Viewer Widget
//! Central panel with the navigation toolbar and three stacked component plots.

use crate::charts::{ChartPlotter, ChartSurface, PlotNavigation};
use egui::{RichText, ScrollArea};

const SUMMARY_HEIGHT: f32 = 18.0;
const MIN_PLOT_HEIGHT: f32 = 140.0;

/// Owns the chart surface and the navigation state applied to its plots.
pub struct ChartViewer {
    pub surface: ChartSurface,
    pub navigation: PlotNavigation,
    /// Whether the index is a calendar date.
    date_axis: bool,
    shown_revision: u64,
}

impl ChartViewer {
    pub fn new(date_axis: bool) -> Self {
        Self {
            surface: ChartSurface::new(),
            navigation: PlotNavigation::default(),
            date_axis,
            shown_revision: 0,
        }
    }

    /// Home / Pan / Zoom controls.
    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("🏠 Home").on_hover_text("Reset original view").clicked() {
                self.navigation.reset = true;
            }
            ui.separator();
            ui.toggle_value(&mut self.navigation.pan, "✋ Pan")
                .on_hover_text("Drag and scroll to move the view");
            ui.toggle_value(&mut self.navigation.zoom, "🔍 Zoom")
                .on_hover_text("Wheel or right-drag a box to zoom");
        });
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        self.show_toolbar(ui);
        ui.separator();

        if self.surface.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        // Fresh data always starts fully in view.
        if self.surface.revision() != self.shown_revision {
            self.navigation.reset = true;
            self.shown_revision = self.surface.revision();
        }

        if let Some(title) = self.surface.title() {
            ui.label(RichText::new(title).size(16.0).strong());
            ui.add_space(4.0);
        }

        let curves = self.surface.curves();
        let avail = ui.available_height();
        let per_plot = (avail / curves.len() as f32 - SUMMARY_HEIGHT - 8.0).max(MIN_PLOT_HEIGHT);
        let navigation = self.navigation;
        let date_axis = self.date_axis;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for curve in curves {
                    ChartPlotter::draw_component_chart(ui, curve, navigation, date_axis, per_plot);
                    ChartPlotter::draw_summary(ui, curve);
                    ui.add_space(4.0);
                }
            });

        self.navigation.reset = false;
    }
}
