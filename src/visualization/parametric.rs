//! Parametric plots of two-coordinate functions.

use super::canvas::{get_figure_and_axes, set_figure_layout, ChartTarget, Figure, Line2D, LineStyle};
use crate::error::{FdaError, Result};
use crate::fdata::FData;
use crate::grid::FDataGrid;

/// Plot of `t -> (x(t), y(t))` for every sample.
///
/// Built from one object with a two-dimensional codomain, or from two
/// scalar objects whose coordinates are concatenated.
///
/// # Example
///
/// ```
/// use fdakit::{ChartTarget, FDataGrid, LineStyle, ParametricPlot};
///
/// let t: Vec<f64> = (0..50).map(|i| i as f64 / 49.0).collect();
/// let cos: Vec<f64> = t.iter().map(|s| (6.28 * s).cos()).collect();
/// let sin: Vec<f64> = t.iter().map(|s| (6.28 * s).sin()).collect();
/// let x = FDataGrid::from_curves(&[cos], t.clone()).unwrap();
/// let y = FDataGrid::from_curves(&[sin], t).unwrap();
///
/// let mut plot = ParametricPlot::new(x, Some(y));
/// let fig = plot.plot(ChartTarget::New, &LineStyle::new()).unwrap();
/// assert_eq!(fig.axes[0].lines.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ParametricPlot {
    fdata1: FDataGrid,
    fdata2: Option<FDataGrid>,
    fd_final: Option<FDataGrid>,
}

impl ParametricPlot {
    pub fn new(fdata1: FDataGrid, fdata2: Option<FDataGrid>) -> Self {
        Self {
            fdata1,
            fdata2,
            fd_final: None,
        }
    }

    /// The data actually plotted by the last successful concatenation.
    pub fn fd_final(&self) -> Option<&FDataGrid> {
        self.fd_final.as_ref()
    }

    /// Draw every sample as a line on `target`, with `style` applied to
    /// all of them, and return the figure.
    pub fn plot(&mut self, target: ChartTarget, style: &LineStyle) -> Result<Figure> {
        let (fig, axes) = get_figure_and_axes(target)?;

        let fd_final = match &self.fdata2 {
            Some(fdata2) => self.fdata1.concatenate_coordinates(fdata2)?,
            None => self.fdata1.clone(),
        };
        let fd_final = self.fd_final.insert(fd_final);

        if fd_final.dim_domain() != 1 || fd_final.dim_codomain() != 2 {
            return Err(FdaError::config(format!(
                "Error in data arguments, codomain or domain is not correct \
                 (domain dimension {}, codomain dimension {})",
                fd_final.dim_domain(),
                fd_final.dim_codomain()
            )));
        }

        let (mut fig, axes) = set_figure_layout(fig, axes, 2, 1)?;
        let ax = &mut fig.axes[axes[0]];

        let data = fd_final.data_matrix();
        ax.lines.extend((0..fd_final.n_samples()).map(|i| Line2D {
            xs: data[0].row(i),
            ys: data[1].row(i),
            style: style.clone(),
        }));

        if let Some(name) = fd_final.dataset_name() {
            fig.suptitle = Some(name.to_string());
        }

        let names = fd_final.coordinate_names();
        let ax = &mut fig.axes[axes[0]];
        ax.xlabel = Some(names[0].clone().unwrap_or_else(|| "Function 1".to_string()));
        ax.ylabel = Some(names[1].clone().unwrap_or_else(|| "Function 2".to_string()));

        Ok(fig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::linspace;
    use crate::visualization::canvas::Axes;
    use std::f64::consts::PI;

    fn circles(n: usize) -> (FDataGrid, FDataGrid) {
        let t = linspace(0.0, 1.0, 40);
        let radius = |i: usize| 1.0 + i as f64;
        let xs: Vec<Vec<f64>> = (0..n)
            .map(|i| t.iter().map(|&s| radius(i) * (2.0 * PI * s).cos()).collect())
            .collect();
        let ys: Vec<Vec<f64>> = (0..n)
            .map(|i| t.iter().map(|&s| radius(i) * (2.0 * PI * s).sin()).collect())
            .collect();
        (
            FDataGrid::from_curves(&xs, t.clone()).unwrap(),
            FDataGrid::from_curves(&ys, t).unwrap(),
        )
    }

    #[test]
    fn test_plot_two_scalar_objects() {
        let (x, y) = circles(3);
        let mut plot = ParametricPlot::new(x.clone(), Some(y));
        let fig = plot.plot(ChartTarget::New, &LineStyle::new()).unwrap();

        assert_eq!(fig.axes.len(), 1);
        assert_eq!(fig.axes[0].lines.len(), 3);
        assert_eq!(fig.axes[0].lines[2].xs, x.sample_curve(2, 0));
        assert_eq!(fig.axes[0].xlabel.as_deref(), Some("Function 1"));
        assert_eq!(fig.axes[0].ylabel.as_deref(), Some("Function 2"));
        assert_eq!(plot.fd_final().map(|fd| fd.dim_codomain()), Some(2));
    }

    #[test]
    fn test_plot_single_vector_object_with_names() {
        let (x, y) = circles(2);
        let xy = x
            .concatenate_coordinates(&y)
            .unwrap()
            .with_coordinate_names(vec![Some("x".into()), Some("y".into())])
            .unwrap()
            .with_dataset_name("circles");
        let mut plot = ParametricPlot::new(xy, None);
        let fig = plot.plot(ChartTarget::New, &LineStyle::new()).unwrap();
        assert_eq!(fig.suptitle.as_deref(), Some("circles"));
        assert_eq!(fig.axes[0].xlabel.as_deref(), Some("x"));
        assert_eq!(fig.axes[0].ylabel.as_deref(), Some("y"));
    }

    #[test]
    fn test_wrong_codomain_is_config_error() {
        let (x, _) = circles(2);
        let mut plot = ParametricPlot::new(x.clone(), None);
        let err = plot.plot(ChartTarget::New, &LineStyle::new()).unwrap_err();
        assert!(matches!(err, FdaError::Configuration(_)));
        assert!(err.to_string().contains("codomain or domain is not correct"));

        let xx = x.concatenate_coordinates(&x).unwrap();
        let mut plot = ParametricPlot::new(xx, Some(x));
        assert!(plot.plot(ChartTarget::New, &LineStyle::new()).is_err());
    }

    #[test]
    fn test_concatenation_error_propagates() {
        let (x, _) = circles(2);
        let (other, _) = circles(3);
        let mut plot = ParametricPlot::new(x, Some(other));
        assert!(plot.plot(ChartTarget::New, &LineStyle::new()).is_err());
        assert!(plot.fd_final().is_none());
    }

    #[test]
    fn test_style_applied_to_every_line() {
        let (x, y) = circles(4);
        let style = LineStyle::new().color("#336699").width(2);
        let mut plot = ParametricPlot::new(x, Some(y));
        let fig = plot.plot(ChartTarget::New, &style).unwrap();
        assert!(fig.axes[0].lines.iter().all(|l| l.style == style));
    }

    #[test]
    fn test_plot_is_idempotent_on_fresh_charts() {
        let (x, y) = circles(2);
        let mut plot = ParametricPlot::new(x, Some(y));
        let a = plot.plot(ChartTarget::New, &LineStyle::new()).unwrap();
        let b = plot.plot(ChartTarget::New, &LineStyle::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plot_into_existing_axes() {
        let (x, y) = circles(2);
        let mut fig = Figure::new();
        fig.axes.push(Axes::new(2));
        fig.axes.push(Axes::new(2));
        let mut plot = ParametricPlot::new(x, Some(y));
        let fig = plot
            .plot(ChartTarget::Axes(fig, 1), &LineStyle::new())
            .unwrap();
        assert!(fig.axes[0].lines.is_empty());
        assert_eq!(fig.axes[1].lines.len(), 2);
    }
}
