//! In-memory figures: what the plots draw into and what gets rendered.

use crate::error::{FdaError, Result};

/// Default figure size in pixels.
pub const DEFAULT_FIGURE_SIZE: (u32, u32) = (800, 600);

/// Style applied to a line. Unset fields fall back to the renderer's
/// defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineStyle {
    /// `#rrggbb` color.
    pub color: Option<String>,
    /// Stroke width in pixels.
    pub width: Option<u32>,
    /// Opacity in `[0, 1]`.
    pub alpha: Option<f64>,
    /// Legend entry.
    pub label: Option<String>,
}

impl LineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A polyline in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub style: LineStyle,
}

/// One panel of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Number of spatial dimensions (2 for planar plots).
    pub dim: usize,
    pub lines: Vec<Line2D>,
}

impl Axes {
    /// Empty axes of the given dimensionality.
    pub fn new(dim: usize) -> Self {
        Self {
            title: None,
            xlabel: None,
            ylabel: None,
            dim,
            lines: Vec::new(),
        }
    }
}

/// A figure: an optional title over a row of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub suptitle: Option<String>,
    pub axes: Vec<Axes>,
    pub size: (u32, u32),
}

impl Default for Figure {
    fn default() -> Self {
        Self::new()
    }
}

impl Figure {
    /// Empty figure of the default size.
    pub fn new() -> Self {
        Self {
            suptitle: None,
            axes: Vec::new(),
            size: DEFAULT_FIGURE_SIZE,
        }
    }

    /// Number of lines over all axes.
    pub fn n_lines(&self) -> usize {
        self.axes.iter().map(|ax| ax.lines.len()).sum()
    }
}

/// Where a plot should draw.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChartTarget {
    /// A new figure.
    #[default]
    New,
    /// An existing figure; the plot uses all of its axes, or creates them
    /// if it has none.
    Figure(Figure),
    /// A single axes (by index) of an existing figure.
    Axes(Figure, usize),
}

/// Resolve a chart target to a figure and the indices of the axes to use.
///
/// An empty index list means the caller should create the axes.
pub fn get_figure_and_axes(target: ChartTarget) -> Result<(Figure, Vec<usize>)> {
    match target {
        ChartTarget::New => Ok((Figure::new(), Vec::new())),
        ChartTarget::Figure(fig) => {
            let axes = (0..fig.axes.len()).collect();
            Ok((fig, axes))
        }
        ChartTarget::Axes(fig, index) => {
            if index >= fig.axes.len() {
                return Err(FdaError::config(format!(
                    "axes index {} out of range for a figure with {} axes",
                    index,
                    fig.axes.len()
                )));
            }
            Ok((fig, vec![index]))
        }
    }
}

/// Make sure `fig` has the `n_axes` axes of dimensionality `dim` to draw on.
///
/// With no axes given, `n_axes` new ones are appended to the figure.
/// Otherwise exactly `n_axes` compatible axes are required.
pub fn set_figure_layout(
    mut fig: Figure,
    axes: Vec<usize>,
    dim: usize,
    n_axes: usize,
) -> Result<(Figure, Vec<usize>)> {
    if n_axes == 0 {
        return Err(FdaError::config("the layout needs at least one axes"));
    }

    if axes.is_empty() {
        let start = fig.axes.len();
        fig.axes.extend((0..n_axes).map(|_| Axes::new(dim)));
        log::debug!("created {} axes of dimension {}", n_axes, dim);
        return Ok((fig, (start..start + n_axes).collect()));
    }

    if axes.len() != n_axes {
        return Err(FdaError::config(format!(
            "the number of axes ({}) must be {}",
            axes.len(),
            n_axes
        )));
    }
    for &i in &axes {
        let found = fig.axes.get(i).map(|ax| ax.dim);
        if found != Some(dim) {
            return Err(FdaError::config(format!(
                "axes {} cannot hold a {}-dimensional plot",
                i, dim
            )));
        }
    }
    Ok((fig, axes))
}
