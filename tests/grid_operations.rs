//! Integration tests for grid representations: construction defaults,
//! pointwise statistics and coordinate handling.

use fdakit::{linspace, FData, FDataGrid, FdMatrix, KernelSmoother};

// ─── Helpers ────────────────────────────────────────────────────────────────

fn assert_vec_close(actual: &[f64], expected: &[f64], tol: f64, label: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: length mismatch: {} vs {}",
        label,
        actual.len(),
        expected.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "{}: element {} differs: {} vs {} (tol {})",
            label,
            i,
            a,
            e,
            tol
        );
    }
}

fn two_rows() -> FDataGrid {
    FDataGrid::from_samples(&[
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
        vec![2.0, 3.0, 4.0, 5.0, 6.0],
    ])
    .unwrap()
}

// ─── Construction ───────────────────────────────────────────────────────────

#[test]
fn test_init_default_grid_and_range() {
    let fd = two_rows();
    assert_vec_close(
        &fd.grid_points()[0],
        &[0.0, 0.25, 0.5, 0.75, 1.0],
        1e-15,
        "grid",
    );
    assert_eq!(fd.domain_range(), &[[0.0, 1.0]]);
    assert_eq!(fd.n_samples(), 2);
    assert_eq!(fd.dim_domain(), 1);
    assert_eq!(fd.dim_codomain(), 1);
    assert_eq!(fd.data_matrix()[0].row(1), vec![2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_explicit_domain_range() {
    let fd = FDataGrid::from_curves(&[vec![0.0, 1.0, 2.0]], vec![0.2, 0.5, 0.8])
        .unwrap()
        .with_domain_range(vec![[0.0, 1.0]])
        .unwrap();
    assert_eq!(fd.domain_range(), &[[0.0, 1.0]]);

    let bad = FDataGrid::from_curves(&[vec![0.0, 1.0, 2.0]], vec![0.2, 0.5, 0.8])
        .unwrap()
        .with_domain_range(vec![[0.3, 1.0]]);
    assert!(bad.is_err());
}

// ─── Pointwise statistics ───────────────────────────────────────────────────

#[test]
fn test_mean() {
    let mean = two_rows().mean();
    assert_eq!(mean.n_samples(), 1);
    assert_vec_close(
        &mean.sample_curve(0, 0),
        &[1.5, 2.5, 3.5, 4.5, 5.5],
        1e-12,
        "mean",
    );
    assert_vec_close(&mean.grid_points()[0], &linspace(0.0, 1.0, 5), 1e-15, "grid");
}

#[test]
fn test_gmean() {
    let gmean = two_rows().gmean();
    let expected: Vec<f64> = (1..=5)
        .map(|k| ((k as f64) * (k as f64 + 1.0)).sqrt())
        .collect();
    assert_vec_close(&gmean.sample_curve(0, 0), &expected, 1e-12, "gmean");
}

#[test]
fn test_var() {
    let var = two_rows().var();
    assert_vec_close(&var.sample_curve(0, 0), &[0.5; 5], 1e-12, "var");
}

// ─── Coordinates ────────────────────────────────────────────────────────────

#[test]
fn test_concatenate_and_split_coordinates() {
    let a = two_rows().with_dataset_name("rows");
    let b = FDataGrid::new(
        vec![FdMatrix::from_rows(&[vec![0.0; 5], vec![1.0; 5]]).unwrap()],
        vec![linspace(0.0, 1.0, 5)],
    )
    .unwrap();

    let both = a.concatenate_coordinates(&b).unwrap();
    assert_eq!(both.dim_codomain(), 2);
    assert_eq!(both.dataset_name(), Some("rows"));

    let first = both.coordinate(0).unwrap();
    assert_eq!(first.data_matrix(), a.data_matrix());
    let second = both.coordinate(1).unwrap();
    assert_eq!(second.data_matrix(), b.data_matrix());
}

#[test]
fn test_concatenate_samples_then_mean() {
    let a = two_rows();
    let all = a.concatenate_samples(&a).unwrap();
    assert_eq!(all.n_samples(), 4);
    assert_vec_close(
        &all.mean().sample_curve(0, 0),
        &a.mean().sample_curve(0, 0),
        1e-12,
        "mean of duplicated samples",
    );
}

// ─── Smoothing and derivatives ──────────────────────────────────────────────

#[test]
fn test_local_linear_preserves_lines() {
    let fd = two_rows();
    let smoothed = KernelSmoother::local_linear(0.3).smooth(&fd).unwrap();
    for i in 0..2 {
        assert_vec_close(
            &smoothed.sample_curve(i, 0),
            &fd.sample_curve(i, 0),
            1e-8,
            "local linear",
        );
    }
}

#[test]
fn test_derivative_of_rows() {
    let d = two_rows().derivative(1).unwrap();
    // slope 1 per grid step of 0.25
    assert_vec_close(&d.sample_curve(0, 0), &[4.0; 5], 1e-12, "derivative");
}
