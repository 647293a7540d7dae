//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod controller;

pub use app::DecomposeApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use controller::{DecompositionController, RunOutcome, RunState};
