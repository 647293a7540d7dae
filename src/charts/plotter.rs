//! Chart Plotter Module
//! Draws decomposition components using egui_plot.

use crate::charts::ComponentCurve;
use crate::stats::Component;
use chrono::{NaiveDate, TimeDelta};
use egui::{Color32, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints};

pub const TREND_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const SEASONAL_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const RESIDUAL_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

/// Interaction switches shared by the three component plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotNavigation {
    pub pan: bool,
    pub zoom: bool,
    /// Fit all data on the next frame.
    pub reset: bool,
}

impl Default for PlotNavigation {
    fn default() -> Self {
        Self {
            pan: true,
            zoom: true,
            reset: false,
        }
    }
}

/// Draws component charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn component_color(component: Component) -> Color32 {
        match component {
            Component::Trend => TREND_COLOR,
            Component::Seasonal => SEASONAL_COLOR,
            Component::Residual => RESIDUAL_COLOR,
        }
    }

    /// Axis label for an index coordinate. Date indexes show calendar days on
    /// whole-day marks only.
    pub fn format_index(value: f64, date_axis: bool) -> String {
        if !date_axis {
            return format!("{}", value);
        }
        if (value - value.round()).abs() > 1e-6 {
            return String::new();
        }

        NaiveDate::from_ymd_opt(1970, 1, 1)
            .zip(TimeDelta::try_days(value.round() as i64))
            .and_then(|(epoch, offset)| epoch.checked_add_signed(offset))
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Draw one component as a line with a legend entry.
    pub fn draw_component_chart(
        ui: &mut egui::Ui,
        curve: &ComponentCurve,
        navigation: PlotNavigation,
        date_axis: bool,
        height: f32,
    ) {
        let color = Self::component_color(curve.component);

        let mut plot = Plot::new(format!("component_{}", curve.label))
            .height(height)
            .legend(Legend::default())
            .allow_zoom(navigation.zoom)
            .allow_boxed_zoom(navigation.zoom)
            .allow_drag(navigation.pan)
            .allow_scroll(navigation.pan)
            .y_axis_label(curve.label)
            .x_axis_formatter(move |mark, _range| Self::format_index(mark.value, date_axis));
        if navigation.reset {
            plot = plot.reset();
        }

        plot.show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(curve.points.clone()))
                    .color(color)
                    .width(1.5)
                    .name(curve.label),
            );
        });
    }

    /// One-line summary under a component chart.
    pub fn draw_summary(ui: &mut egui::Ui, curve: &ComponentCurve) {
        let s = &curve.summary;
        let text = if s.defined == 0 {
            format!("{} undefined points", s.undefined)
        } else {
            format!(
                "n={}  undefined={}  min={:.3}  max={:.3}  mean={:.3}  std={:.3}",
                s.defined, s.undefined, s.min, s.max, s.mean, s.std
            )
        };
        ui.label(RichText::new(text).size(11.0).color(Color32::GRAY));
    }
}
