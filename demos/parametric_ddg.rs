//! Demo: Parametric Plots, DD^G Features and Vector-Valued Bases
//!
//! Builds two classes of closed planar curves (noisy ellipses of different
//! widths), then
//! 1. plots them as parametric curves and writes the figure to SVG,
//! 2. maps them to depth-versus-depth features,
//! 3. represents them in a vector-valued Fourier basis and differentiates.

use fdakit::{
    linspace, render_svg, Basis, ChartTarget, DdgTransformer, DepthMethod, FData, FDataGrid,
    LineStyle, ParametricPlot, Transformer,
};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use std::f64::consts::PI;

fn noisy_ellipses(n_per_class: usize, m: usize, seed: u64) -> (FDataGrid, FDataGrid, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.03).unwrap();
    let t = linspace(0.0, 1.0, m);

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut labels = Vec::new();
    for class in 0..2u8 {
        for _ in 0..n_per_class {
            let a = 1.0 + 0.6 * class as f64 + rng.sample(noise) * 3.0;
            xs.push(
                t.iter()
                    .map(|&s| a * (2.0 * PI * s).cos() + rng.sample(noise))
                    .collect(),
            );
            ys.push(
                t.iter()
                    .map(|&s| (2.0 * PI * s).sin() + rng.sample(noise))
                    .collect(),
            );
            labels.push(class);
        }
    }
    (
        FDataGrid::from_curves(&xs, t.clone()).unwrap(),
        FDataGrid::from_curves(&ys, t).unwrap(),
        labels,
    )
}

fn main() -> fdakit::Result<()> {
    println!("=== Demo: Parametric Plots and DD^G Features ===\n");

    let n_per_class = 8;
    let m = 60;
    let (x, y, labels) = noisy_ellipses(n_per_class, m, 42);
    let x = x.with_dataset_name("noisy ellipses");

    println!("--- Dataset ---");
    println!("  {} curves in 2 classes, {} grid points on [0, 1]", labels.len(), m);

    // --- Section 1: Parametric plot ---
    println!("\n--- Parametric Plot ---");
    let mut plot = ParametricPlot::new(x.clone(), Some(y.clone()));
    let fig = plot.plot(ChartTarget::New, &LineStyle::new().width(2).alpha(0.7))?;
    println!("  {} lines drawn", fig.n_lines());
    let svg = render_svg(&fig, fig.size)?;
    let path = std::env::temp_dir().join("parametric_ddg.svg");
    match std::fs::write(&path, &svg) {
        Ok(()) => println!("  Wrote {} ({} bytes)", path.display(), svg.len()),
        Err(e) => println!("  Could not write {}: {}", path.display(), e),
    }

    // --- Section 2: DD^G features ---
    println!("\n--- DD^G Features (modified band, Fraiman-Muniz) ---");
    let xy = x.concatenate_coordinates(&y)?;
    let mut ddg = DdgTransformer::with_methods(vec![
        DepthMethod::ModifiedBand,
        DepthMethod::FraimanMuniz { scale: true },
    ])?;
    let features = ddg.fit_transform(&xy, &labels[..])?;
    println!("  Classes: {:?}", ddg.classes().unwrap_or_default());
    println!("  Feature matrix: {} x {}", features.nrows(), features.ncols());

    let mut correct = 0;
    for i in 0..features.nrows() {
        // nearest class by modified band depth
        let predicted = if features[(i, 0)] >= features[(i, 1)] { 0 } else { 1 };
        if predicted == labels[i] {
            correct += 1;
        }
        if i % n_per_class == 0 {
            println!("  Sample {:2}: {:?}", i, features.row(i));
        }
    }
    println!(
        "  Max-depth rule accuracy on the training set: {}/{}",
        correct,
        labels.len()
    );

    // --- Section 3: Vector-valued basis ---
    println!("\n--- Vector-Valued Fourier Basis ---");
    let basis = Basis::vector_valued(vec![
        Basis::fourier([0.0, 1.0], 5)?,
        Basis::fourier([0.0, 1.0], 5)?,
    ])?;
    let fdb = xy.to_basis(&basis)?;
    println!(
        "  {} samples, {} basis functions, codomain dimension {}",
        fdb.n_samples(),
        basis.n_basis(),
        fdb.dim_codomain()
    );
    let velocity = fdb.derivative(1)?;
    let speed = velocity.to_grid(linspace(0.0, 1.0, 5))?;
    println!(
        "  Velocity of sample 0 at t = 0, .25, .5, .75, 1:\n    x': {:.3?}\n    y': {:.3?}",
        speed.sample_curve(0, 0),
        speed.sample_curve(0, 1)
    );

    let gram = basis.gram_matrix();
    println!("  Gram matrix is {} x {}", gram.nrows(), gram.ncols());

    Ok(())
}
