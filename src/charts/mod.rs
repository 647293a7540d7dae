//! Charts module - Decomposition chart surface and plotting

mod plotter;
mod surface;

pub use plotter::{ChartPlotter, PlotNavigation};
pub use surface::{ChartSurface, ComponentCurve};
