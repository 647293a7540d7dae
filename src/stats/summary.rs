//! Component Summary Module
//! Descriptive statistics over the defined cells of a decomposed component.

use statrs::statistics::Statistics;

/// Descriptive statistics for one component curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentSummary {
    pub defined: usize,
    pub undefined: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl Default for ComponentSummary {
    fn default() -> Self {
        Self {
            defined: 0,
            undefined: 0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std: f64::NAN,
        }
    }
}

impl ComponentSummary {
    /// Summarise `values`, skipping NaN cells.
    pub fn from_values(values: &[f64]) -> Self {
        let defined: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let undefined = values.len() - defined.len();

        if defined.is_empty() {
            return Self {
                undefined,
                ..Self::default()
            };
        }

        let min = defined.iter().copied().fold(f64::INFINITY, f64::min);
        let max = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = defined.iter().mean();
        // Sample standard deviation; a single point has no spread.
        let std = if defined.len() > 1 {
            defined.iter().std_dev()
        } else {
            0.0
        };

        Self {
            defined: defined.len(),
            undefined,
            min,
            max,
            mean,
            std,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_undefined_cells() {
        let summary = ComponentSummary::from_values(&[f64::NAN, 2.0, 4.0, 6.0, f64::NAN]);
        assert_eq!(summary.defined, 3);
        assert_eq!(summary.undefined, 2);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 6.0);
        assert!((summary.mean - 4.0).abs() < 1e-12);
        assert!((summary.std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_undefined() {
        let summary = ComponentSummary::from_values(&[f64::NAN, f64::NAN]);
        assert_eq!(summary.defined, 0);
        assert_eq!(summary.undefined, 2);
        assert!(summary.mean.is_nan());
    }

    #[test]
    fn test_single_point_has_zero_spread() {
        let summary = ComponentSummary::from_values(&[7.5]);
        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.mean, 7.5);
    }
}
