//! Seasonal Decompose Viewer - Trend / Seasonal / Residual Chart Viewer
//!
//! A Rust application for decomposing a time series column and displaying
//! its components as interactive charts.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::Context;
use config::AppConfig;
use eframe::egui;
use gui::DecomposeApp;
use stats::ClassicalDecomposer;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    log::info!("Starting with {:?}", config.decompose);

    let dataset = data::sample_dataset().context("Failed to build sample dataset")?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title(&config.title),
        ..Default::default()
    };

    let settings = config.decompose;

    // Run the application
    eframe::run_native(
        &config.title,
        options,
        Box::new(move |cc| {
            Ok(Box::new(DecomposeApp::new(
                cc,
                dataset,
                Arc::new(ClassicalDecomposer::new()),
                settings,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
