//! Application configuration: window defaults and the initial decomposition
//! settings, with environment overrides.

use crate::stats::{DecomposeSettings, SeasonalModel};

pub const ENV_PERIOD: &str = "DECOMPOSE_PERIOD";
pub const ENV_MODEL: &str = "DECOMPOSE_MODEL";
pub const ENV_EXTRAPOLATE_TREND: &str = "DECOMPOSE_EXTRAPOLATE_TREND";

/// Startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub decompose: DecomposeSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Seasonal Decompose Viewer".to_string(),
            window_size: [1200.0, 900.0],
            min_window_size: [800.0, 600.0],
            decompose: DecomposeSettings::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `DECOMPOSE_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from `lookup`. Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_PERIOD) {
            match raw.trim().parse::<usize>() {
                Ok(period) if period > 0 => self.decompose.period = period,
                _ => log::warn!("Ignoring {}={:?}: expected a positive integer", ENV_PERIOD, raw),
            }
        }

        if let Some(raw) = lookup(ENV_MODEL) {
            match SeasonalModel::parse(&raw) {
                Some(model) => self.decompose.model = model,
                None => log::warn!(
                    "Ignoring {}={:?}: expected 'additive' or 'multiplicative'",
                    ENV_MODEL,
                    raw
                ),
            }
        }

        if let Some(raw) = lookup(ENV_EXTRAPOLATE_TREND) {
            match raw.trim().parse::<usize>() {
                Ok(points) => self.decompose.extrapolate_trend = points,
                Err(_) => log::warn!(
                    "Ignoring {}={:?}: expected a non-negative integer",
                    ENV_EXTRAPOLATE_TREND,
                    raw
                ),
            }
        }
    }
}
