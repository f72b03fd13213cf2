//! Plots of functional data.
//!
//! Plots draw into an in-memory [`Figure`], which can be inspected directly
//! or rendered to SVG with [`render_svg`].

pub mod canvas;
mod parametric;
mod render;

pub use canvas::{
    get_figure_and_axes, set_figure_layout, Axes, ChartTarget, Figure, Line2D, LineStyle,
};
pub use parametric::ParametricPlot;
pub use render::render_svg;
