//! SVG rendering of figures with `plotters`.
//!
//! Every axes becomes one panel (panels are laid out side by side) and every
//! line a line series. Text is emitted as SVG `<text>` elements, so no font
//! files are needed.

use super::canvas::{Axes, Figure, Line2D};
use crate::error::{FdaError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Colors used, in order, for lines without an explicit color.
const PALETTE: [RGBColor; 8] = [
    RED,
    BLUE,
    GREEN,
    MAGENTA,
    CYAN,
    BLACK,
    RGBColor(255, 165, 0), // Orange
    RGBColor(128, 0, 128), // Purple
];

fn render_error<E: std::fmt::Display>(e: E) -> FdaError {
    FdaError::Render(e.to_string())
}

/// Parse `#rrggbb`.
fn parse_color(spec: &str) -> Result<RGBColor> {
    let hex = spec.strip_prefix('#').unwrap_or(spec);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(FdaError::config(format!("invalid color {:?}, expected #rrggbb", spec)));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| FdaError::config(format!("invalid color {:?}, expected #rrggbb", spec)))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Range covering `values` with a 5% margin; degenerate ranges are widened.
fn padded_range<'a>(values: impl Iterator<Item = &'a f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    if max - min < f64::EPSILON {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = 0.05 * (max - min);
    (min - pad)..(max + pad)
}

fn line_style(line: &Line2D, index: usize) -> Result<ShapeStyle> {
    let color = match &line.style.color {
        Some(spec) => parse_color(spec)?,
        None => PALETTE[index % PALETTE.len()],
    };
    let alpha = line.style.alpha.unwrap_or(1.0).clamp(0.0, 1.0);
    Ok(ShapeStyle::from(color.mix(alpha)).stroke_width(line.style.width.unwrap_or(1)))
}

fn draw_axes(ax: &Axes, area: &DrawingArea<SVGBackend<'_>, Shift>) -> Result<()> {
    if ax.dim != 2 {
        return Err(FdaError::config(format!(
            "only 2-dimensional axes can be rendered, got {}",
            ax.dim
        )));
    }

    let x_range = padded_range(ax.lines.iter().flat_map(|l| l.xs.iter()));
    let y_range = padded_range(ax.lines.iter().flat_map(|l| l.ys.iter()));

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50);
    if let Some(title) = &ax.title {
        builder.caption(title, (FontFamily::SansSerif, 16).into_font());
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_error)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.label_style((FontFamily::SansSerif, 12));
        if let Some(xlabel) = &ax.xlabel {
            mesh.x_desc(xlabel.as_str());
        }
        if let Some(ylabel) = &ax.ylabel {
            mesh.y_desc(ylabel.as_str());
        }
        mesh.draw().map_err(render_error)?;
    }

    let mut has_legend = false;
    for (i, line) in ax.lines.iter().enumerate() {
        let style = line_style(line, i)?;
        let points = line
            .xs
            .iter()
            .zip(&line.ys)
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let series = chart
            .draw_series(LineSeries::new(points, style))
            .map_err(render_error)?;
        if let Some(label) = &line.style.label {
            has_legend = true;
            series
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }
    }

    if has_legend {
        chart
            .configure_series_labels()
            .label_font((FontFamily::SansSerif, 10))
            .background_style(WHITE.mix(0.5))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(render_error)?;
    }
    Ok(())
}

/// Render `fig` as an SVG document of `size` pixels.
pub fn render_svg(fig: &Figure, size: (u32, u32)) -> Result<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let root = match &fig.suptitle {
            Some(title) => root
                .titled(title, (FontFamily::SansSerif, 20))
                .map_err(render_error)?,
            None => root,
        };

        if !fig.axes.is_empty() {
            let panels = root.split_evenly((1, fig.axes.len()));
            for (ax, panel) in fig.axes.iter().zip(&panels) {
                draw_axes(ax, panel)?;
            }
        }
        root.present().map_err(render_error)?;
    }

    log::debug!(
        "rendered figure with {} axes and {} lines ({} bytes of SVG)",
        fig.axes.len(),
        fig.n_lines(),
        buffer.len()
    );
    Ok(buffer)
}
