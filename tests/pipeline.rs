//! End-to-end tests combining bases, depth features and plots.

use fdakit::{
    linspace, render_svg, Basis, ChartTarget, DdgTransformer, DepthMethod, FData, FDataGrid,
    LineStyle, ParametricPlot, Transformer,
};
use std::f64::consts::PI;

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Ellipses `(a cos, b sin)` with `a` around 1 (class 0) or 2 (class 1).
fn ellipses(n_per_class: usize, m: usize) -> (FDataGrid, FDataGrid, Vec<u32>) {
    let t = linspace(0.0, 1.0, m);
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut labels = Vec::new();
    for class in 0..2u32 {
        for i in 0..n_per_class {
            let a = 1.0 + class as f64 + 0.05 * i as f64;
            xs.push(t.iter().map(|&s| a * (2.0 * PI * s).cos()).collect());
            ys.push(t.iter().map(|&s| 0.5 * a * (2.0 * PI * s).sin()).collect());
            labels.push(class);
        }
    }
    (
        FDataGrid::from_curves(&xs, t.clone()).unwrap(),
        FDataGrid::from_curves(&ys, t).unwrap(),
        labels,
    )
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[test]
fn test_ddg_on_vector_valued_data() {
    let (x, y, labels) = ellipses(5, 30);
    let xy = x.concatenate_coordinates(&y).unwrap();

    let mut ddg = DdgTransformer::with_methods(vec![
        DepthMethod::ModifiedBand,
        DepthMethod::RandomProjection {
            n_projections: 10,
            seed: 3,
        },
    ])
    .unwrap();
    let features = ddg.fit_transform(&xy, &labels[..]).unwrap();
    assert_eq!(features.shape(), (10, 4));
    for v in features.as_slice() {
        assert!((0.0..=1.0).contains(v));
    }

    // Modified band depth in the own class beats the other class.
    for i in 0..10 {
        let own = labels[i] as usize;
        assert!(features[(i, own)] > features[(i, 1 - own)]);
    }
}

#[test]
fn test_parametric_plot_renders() {
    let (x, y, _) = ellipses(3, 40);
    let mut plot = ParametricPlot::new(x.with_dataset_name("ellipses"), Some(y));
    let fig = plot
        .plot(ChartTarget::New, &LineStyle::new().width(2))
        .unwrap();
    assert_eq!(fig.n_lines(), 6);
    assert_eq!(fig.suptitle.as_deref(), Some("ellipses"));

    let svg = render_svg(&fig, (640, 480)).unwrap();
    assert!(svg.contains("ellipses"));
    assert!(svg.contains("Function 2"));
}

#[test]
fn test_basis_projection_of_coordinates() {
    let (x, y, _) = ellipses(2, 60);
    let xy = x.concatenate_coordinates(&y).unwrap();
    let basis = Basis::vector_valued(vec![
        Basis::fourier([0.0, 1.0], 3).unwrap(),
        Basis::fourier([0.0, 1.0], 3).unwrap(),
    ])
    .unwrap();

    let fdb = xy.to_basis(&basis).unwrap();
    assert_eq!(fdb.coefficients().shape(), (4, 6));

    // Back on the grid the ellipses are recovered.
    let back = fdb.to_grid(xy.grid_points()[0].clone()).unwrap();
    for coord in 0..2 {
        for i in 0..4 {
            let a = back.sample_curve(i, coord);
            let b = xy.sample_curve(i, coord);
            for (p, q) in a.iter().zip(&b) {
                assert!((p - q).abs() < 1e-8);
            }
        }
    }

    // The selected coordinate plots against the other one.
    let only_x = fdb.coordinate(0).unwrap();
    assert_eq!(only_x.dim_codomain(), 1);
    assert_eq!(only_x.basis(), &Basis::fourier([0.0, 1.0], 3).unwrap());
}
