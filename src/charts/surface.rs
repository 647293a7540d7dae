//! Chart Surface Module
//! Holds the three stacked component plots independent of rendering.

use crate::stats::{Component, ComponentSummary, Decomposition};

/// One labelled curve of the decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCurve {
    pub component: Component,
    pub label: &'static str,
    /// Only defined cells; undefined boundary values are left out.
    pub points: Vec<[f64; 2]>,
    pub summary: ComponentSummary,
}

/// Three plot areas: trend, seasonal and residual.
#[derive(Debug, Default)]
pub struct ChartSurface {
    title: Option<String>,
    curves: Vec<ComponentCurve>,
    revision: u64,
}

impl ChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every plot area with the components of `decomposition`.
    pub fn render(&mut self, title: &str, index: &[f64], decomposition: &Decomposition) {
        self.curves.clear();

        for component in Component::ALL {
            let values = decomposition.component(component);
            let points = index
                .iter()
                .zip(values.iter())
                .filter(|(_, y)| !y.is_nan())
                .map(|(&x, &y)| [x, y])
                .collect();

            self.curves.push(ComponentCurve {
                component,
                label: component.label(),
                points,
                summary: ComponentSummary::from_values(values),
            });
        }

        self.title = Some(format!(
            "{} ({} model, period {})",
            title, decomposition.model, decomposition.period
        ));
        self.revision += 1;
    }

    pub fn curves(&self) -> &[ComponentCurve] {
        &self.curves
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Incremented on every render.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SeasonalModel;

    fn decomposition() -> Decomposition {
        Decomposition {
            trend: vec![f64::NAN, 2.0, 3.0, f64::NAN],
            seasonal: vec![0.5, -0.5, 0.5, -0.5],
            resid: vec![f64::NAN, 0.5, -0.5, f64::NAN],
            period: 2,
            model: SeasonalModel::Additive,
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut surface = ChartSurface::new();
        let index = [0.0, 1.0, 2.0, 3.0];
        let d = decomposition();

        surface.render("v", &index, &d);
        let first = surface.curves().to_vec();
        surface.render("v", &index, &d);

        assert_eq!(surface.curves().len(), 3);
        assert_eq!(surface.curves(), first.as_slice());
        assert_eq!(surface.revision(), 2);
        let labels: Vec<&str> = surface.curves().iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Trend", "Seasonal", "Residual"]);
    }

    #[test]
    fn test_undefined_cells_are_skipped() {
        let mut surface = ChartSurface::new();
        surface.render("v", &[10.0, 11.0, 12.0, 13.0], &decomposition());

        let trend = &surface.curves()[0];
        assert_eq!(trend.points, vec![[11.0, 2.0], [12.0, 3.0]]);
        assert_eq!(trend.summary.undefined, 2);
        assert_eq!(surface.curves()[1].points.len(), 4);
    }

    #[test]
    fn test_latest_render_wins() {
        let mut surface = ChartSurface::new();
        let index = [0.0, 1.0, 2.0, 3.0];
        surface.render("first", &index, &decomposition());

        let mut other = decomposition();
        other.seasonal = vec![9.0; 4];
        surface.render("second", &index, &other);

        assert_eq!(surface.curves().len(), 3);
        assert!(surface.curves()[1].points.iter().all(|p| p[1] == 9.0));
        assert!(surface.title().unwrap().starts_with("second"));
    }
}
