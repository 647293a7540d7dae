//! Seasonal Decomposition Module
//! Classical moving-average decomposition into trend, seasonal and residual parts.

use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecomposeError {
    #[error("Period must be a positive integer")]
    InvalidPeriod,
    #[error("Series is empty")]
    EmptySeries,
    #[error("Series contains missing or non-finite values")]
    MissingValues,
    #[error("Multiplicative model requires strictly positive values")]
    NonPositiveValues,
    #[error("Series must have 2 complete cycles ({required} observations), it only has {actual}")]
    InsufficientObservations { required: usize, actual: usize },
}

/// How the seasonal component combines with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonalModel {
    /// Y = T + S + R
    #[default]
    Additive,
    /// Y = T * S * R
    Multiplicative,
}

impl SeasonalModel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "additive" | "add" | "a" => Some(SeasonalModel::Additive),
            "multiplicative" | "mul" | "m" => Some(SeasonalModel::Multiplicative),
            _ => None,
        }
    }
}

impl fmt::Display for SeasonalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonalModel::Additive => write!(f, "Additive"),
            SeasonalModel::Multiplicative => write!(f, "Multiplicative"),
        }
    }
}

/// Parameters for a single decomposition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposeSettings {
    pub period: usize,
    pub model: SeasonalModel,
    /// 0 leaves the trend boundaries undefined; n > 0 fits a line through
    /// the n + 1 nearest defined trend points and extends it to the edges.
    pub extrapolate_trend: usize,
}

impl Default for DecomposeSettings {
    fn default() -> Self {
        Self {
            period: 3,
            model: SeasonalModel::Additive,
            extrapolate_trend: 0,
        }
    }
}

/// The three decomposed parts of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Trend,
    Seasonal,
    Residual,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Trend, Component::Seasonal, Component::Residual];

    pub fn label(self) -> &'static str {
        match self {
            Component::Trend => "Trend",
            Component::Seasonal => "Seasonal",
            Component::Residual => "Residual",
        }
    }
}

/// Result of a decomposition. Undefined cells are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub resid: Vec<f64>,
    pub period: usize,
    pub model: SeasonalModel,
}

impl Decomposition {
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    pub fn component(&self, component: Component) -> &[f64] {
        match component {
            Component::Trend => &self.trend,
            Component::Seasonal => &self.seasonal,
            Component::Residual => &self.resid,
        }
    }
}

/// Anything able to split a series into trend, seasonal and residual parts.
pub trait Decomposer: Send + Sync {
    fn decompose(
        &self,
        values: &[f64],
        settings: &DecomposeSettings,
    ) -> Result<Decomposition, DecomposeError>;
}

/// Moving-average based classical decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalDecomposer;

impl ClassicalDecomposer {
    pub fn new() -> Self {
        Self
    }

    fn validate(values: &[f64], settings: &DecomposeSettings) -> Result<(), DecomposeError> {
        if settings.period == 0 {
            return Err(DecomposeError::InvalidPeriod);
        }
        if values.is_empty() {
            return Err(DecomposeError::EmptySeries);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DecomposeError::MissingValues);
        }
        if settings.model == SeasonalModel::Multiplicative && values.iter().any(|&v| v <= 0.0) {
            return Err(DecomposeError::NonPositiveValues);
        }
        let required = settings.period.saturating_mul(2);
        if values.len() < required {
            return Err(DecomposeError::InsufficientObservations {
                required,
                actual: values.len(),
            });
        }
        Ok(())
    }

    /// Centred moving-average weights. Even periods use a 2 x period filter.
    pub fn trend_filter(period: usize) -> Vec<f64> {
        let p = period as f64;
        if period % 2 == 0 {
            let mut filt = vec![1.0 / p; period + 1];
            filt[0] = 0.5 / p;
            filt[period] = 0.5 / p;
            filt
        } else {
            vec![1.0 / p; period]
        }
    }

    /// Centred moving average; the first and last `filter.len() / 2` cells stay NaN.
    pub fn moving_average(values: &[f64], period: usize) -> Vec<f64> {
        let filt = Self::trend_filter(period);
        let half = filt.len() / 2;
        let n = values.len();
        let mut trend = vec![f64::NAN; n];

        if n < filt.len() {
            return trend;
        }

        for i in half..(n - half) {
            let window = &values[i - half..=i + half];
            trend[i] = window.iter().zip(filt.iter()).map(|(v, w)| v * w).sum();
        }
        trend
    }

    /// Fill undefined trend edges with a least-squares line through up to
    /// `npoints` defined cells at each end. The back fit stops short of the
    /// last defined cell.
    pub fn extrapolate_trend(trend: &mut [f64], npoints: usize) {
        let Some(front) = trend.iter().position(|v| !v.is_nan()) else {
            return;
        };
        let Some(back) = trend.iter().rposition(|v| !v.is_nan()) else {
            return;
        };

        let front_end = front.saturating_add(npoints).min(back).max(front + 1);
        let (slope, intercept) = Self::fit_line(trend, front, front_end);
        for (i, cell) in trend.iter_mut().enumerate().take(front) {
            *cell = slope * i as f64 + intercept;
        }

        let back_start = back.saturating_sub(npoints).max(front);
        let (slope, intercept) = Self::fit_line(trend, back_start, back.max(back_start + 1));
        for (i, cell) in trend.iter_mut().enumerate().skip(back + 1) {
            *cell = slope * i as f64 + intercept;
        }
    }

    /// Ordinary least squares of `trend[start..end]` against its positions.
    fn fit_line(trend: &[f64], start: usize, end: usize) -> (f64, f64) {
        let xs: Vec<f64> = (start..end).map(|i| i as f64).collect();
        let ys = &trend[start..end];
        let x_mean = xs.iter().mean();
        let y_mean = ys.iter().mean();

        let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
        if sxx == 0.0 {
            return (0.0, y_mean);
        }
        let sxy: f64 = xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| (x - x_mean) * (y - y_mean))
            .sum();
        let slope = sxy / sxx;
        (slope, y_mean - slope * x_mean)
    }

    /// Mean detrended value per phase, centred so the averages sum to zero
    /// (additive) or average to one (multiplicative).
    pub fn period_averages(detrended: &[f64], period: usize, model: SeasonalModel) -> Vec<f64> {
        let mut averages: Vec<f64> = (0..period)
            .into_par_iter()
            .map(|phase| {
                let defined: Vec<f64> = detrended
                    .iter()
                    .skip(phase)
                    .step_by(period)
                    .copied()
                    .filter(|v| !v.is_nan())
                    .collect();
                defined.iter().mean()
            })
            .collect();

        let centre = averages.iter().mean();
        match model {
            SeasonalModel::Additive => averages.iter_mut().for_each(|a| *a -= centre),
            SeasonalModel::Multiplicative => averages.iter_mut().for_each(|a| *a /= centre),
        }
        averages
    }
}

impl Decomposer for ClassicalDecomposer {
    fn decompose(
        &self,
        values: &[f64],
        settings: &DecomposeSettings,
    ) -> Result<Decomposition, DecomposeError> {
        Self::validate(values, settings)?;

        let period = settings.period;
        let model = settings.model;
        let n = values.len();

        let mut trend = Self::moving_average(values, period);
        if settings.extrapolate_trend > 0 {
            Self::extrapolate_trend(&mut trend, settings.extrapolate_trend.saturating_add(1));
        }

        let detrended: Vec<f64> = values
            .iter()
            .zip(trend.iter())
            .map(|(v, t)| match model {
                SeasonalModel::Additive => v - t,
                SeasonalModel::Multiplicative => v / t,
            })
            .collect();

        let averages = Self::period_averages(&detrended, period, model);
        let seasonal: Vec<f64> = (0..n).map(|i| averages[i % period]).collect();

        let resid: Vec<f64> = values
            .iter()
            .zip(trend.iter())
            .zip(seasonal.iter())
            .map(|((v, t), s)| match model {
                SeasonalModel::Additive => v - t - s,
                SeasonalModel::Multiplicative => v / t / s,
            })
            .collect();

        log::debug!(
            "Decomposed {} observations (period {}, {} model)",
            n,
            period,
            model
        );

        Ok(Decomposition {
            trend,
            seasonal,
            resid,
            period,
            model,
        })
    }
}
