//! Seasonal Decompose Viewer Main Application
//! Main window with control panel and chart viewer.

use crate::data::Dataset;
use crate::gui::{
    ChartViewer, ControlPanel, ControlPanelAction, DecompositionController, RunOutcome,
};
use crate::stats::{DecomposeSettings, Decomposer};
use egui::SidePanel;
use std::sync::Arc;

/// Main application window.
pub struct DecomposeApp {
    controller: DecompositionController,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DecomposeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset: Dataset,
        decomposer: Arc<dyn Decomposer>,
        settings: DecomposeSettings,
    ) -> Self {
        log::info!(
            "Indexed by '{}', {} selectable columns",
            dataset.index_column(),
            dataset.column_names().len()
        );
        let control_panel = ControlPanel::new(dataset.column_names().to_vec());
        let chart_viewer = ChartViewer::new(dataset.has_date_index());

        Self {
            controller: DecompositionController::new(dataset, decomposer, settings),
            control_panel,
            chart_viewer,
        }
    }
}

impl eframe::App for DecomposeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        match self.controller.poll(&mut self.chart_viewer.surface) {
            Some(RunOutcome::Rendered { column }) => {
                log::debug!("Chart now shows '{}'", column);
            }
            Some(RunOutcome::Failed(err)) => {
                log::debug!("Chart left unchanged after failure: {}", err);
            }
            None => {}
        }

        // Keep polling while the worker runs
        if self.controller.is_running() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &mut self.controller);

                    match action {
                        ControlPanelAction::Plot => {
                            self.controller.start();
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
