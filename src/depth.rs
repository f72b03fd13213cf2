//! Depth measures for functional data.
//!
//! A depth assigns every curve a value in `[0, 1]` describing how central it
//! is within a reference sample. The free functions work on one coordinate
//! (`n_samples x n_points` matrices over a shared grid); [`DepthMethod`]
//! selects one of them and applies it to whole [`FDataGrid`] objects,
//! averaging over the codomain coordinates.

use crate::error::{FdaError, Result};
use crate::fdata::FData;
use crate::grid::FDataGrid;
use crate::helpers::NUMERICAL_EPS;
use crate::iter_maybe_parallel;
use crate::matrix::FdMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// A functional depth and its parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DepthMethod {
    /// Modified band depth: mean proportion of time inside the bands
    /// spanned by pairs of reference curves.
    ModifiedBand,
    /// Band depth: proportion of pairs whose band contains the whole curve.
    Band,
    /// Integrated univariate depth `2 min(Fn, 1 - Fn)` (or without the
    /// factor 2 when `scale` is false).
    FraimanMuniz { scale: bool },
    /// Mean univariate depth of random one-dimensional projections.
    RandomProjection { n_projections: usize, seed: u64 },
}

impl Default for DepthMethod {
    fn default() -> Self {
        DepthMethod::ModifiedBand
    }
}

impl DepthMethod {
    /// Short name, used in logs and output labels.
    pub fn name(&self) -> &'static str {
        match self {
            DepthMethod::ModifiedBand => "modified_band",
            DepthMethod::Band => "band",
            DepthMethod::FraimanMuniz { .. } => "fraiman_muniz",
            DepthMethod::RandomProjection { .. } => "random_projection",
        }
    }

    /// Depth of every sample of `data` with respect to `reference`.
    ///
    /// Both objects must share the grid and the codomain dimension. For
    /// vector-valued data the result is the mean of the coordinate depths.
    pub fn depth(&self, data: &FDataGrid, reference: &FDataGrid) -> Result<Vec<f64>> {
        self.check_inputs(data, reference)?;

        let n = data.n_samples();
        let mut total = vec![0.0; n];
        for (coord_obj, coord_ori) in data.data_matrix().iter().zip(reference.data_matrix()) {
            let depths = match self {
                DepthMethod::ModifiedBand => modified_band(coord_obj, coord_ori),
                DepthMethod::Band => band(coord_obj, coord_ori),
                DepthMethod::FraimanMuniz { scale } => fraiman_muniz(coord_obj, coord_ori, *scale),
                DepthMethod::RandomProjection {
                    n_projections,
                    seed,
                } => random_projection(coord_obj, coord_ori, *n_projections, *seed),
            };
            for (acc, d) in total.iter_mut().zip(depths) {
                *acc += d;
            }
        }

        let dim = data.dim_codomain() as f64;
        Ok(total.into_iter().map(|d| d / dim).collect())
    }

    fn check_inputs(&self, data: &FDataGrid, reference: &FDataGrid) -> Result<()> {
        if data.dim_codomain() != reference.dim_codomain() {
            return Err(FdaError::DimensionMismatch {
                what: "codomain dimension",
                expected: reference.dim_codomain(),
                found: data.dim_codomain(),
            });
        }
        if data.n_points() != reference.n_points()
            || data
                .grid_points()
                .iter()
                .flatten()
                .zip(reference.grid_points().iter().flatten())
                .any(|(a, b)| (a - b).abs() > NUMERICAL_EPS)
        {
            return Err(FdaError::config(
                "data and reference must be sampled on the same grid",
            ));
        }

        let min_reference = match self {
            DepthMethod::ModifiedBand | DepthMethod::Band => 2,
            _ => 1,
        };
        if reference.n_samples() < min_reference {
            return Err(FdaError::config(format!(
                "{} depth needs at least {} reference samples, got {}",
                self.name(),
                min_reference,
                reference.n_samples()
            )));
        }
        if let DepthMethod::RandomProjection { n_projections: 0, .. } = self {
            return Err(FdaError::config("random projection depth needs at least one projection"));
        }
        Ok(())
    }
}

/// Compute Fraiman-Muniz depth.
///
/// Uses the FM1 formula `d = 1 - |0.5 - Fn(x)|`, or with `scale`
/// `d = 2 * min(Fn(x), 1 - Fn(x))`, integrated over the grid.
///
/// # Arguments
/// * `data_obj` - Curves to compute depth for (nobj x n_points)
/// * `data_ori` - Reference curves (nori x n_points)
/// * `scale` - Whether to scale the depth values
pub fn fraiman_muniz(data_obj: &FdMatrix, data_ori: &FdMatrix, scale: bool) -> Vec<f64> {
    let (nobj, n_points) = data_obj.shape();
    let nori = data_ori.nrows();
    if nobj == 0 || nori == 0 || n_points == 0 {
        return Vec::new();
    }

    iter_maybe_parallel!(0..nobj)
        .map(|i| {
            let mut depth_sum = 0.0;

            for t in 0..n_points {
                let x_t = data_obj[(i, t)];
                let le_count = data_ori.column(t).iter().filter(|&&y| y <= x_t).count();

                let fn_x = le_count as f64 / nori as f64;
                depth_sum += if scale {
                    2.0 * fn_x.min(1.0 - fn_x)
                } else {
                    1.0 - (0.5 - fn_x).abs()
                };
            }

            depth_sum / n_points as f64
        })
        .collect()
}

/// Compute random projection depth.
///
/// Projects curves on `nproj` random unit directions and averages the
/// univariate depth of each projection. Directions are drawn from a
/// generator seeded with `seed`, so results are reproducible.
pub fn random_projection(
    data_obj: &FdMatrix,
    data_ori: &FdMatrix,
    nproj: usize,
    seed: u64,
) -> Vec<f64> {
    let (nobj, n_points) = data_obj.shape();
    let nori = data_ori.nrows();
    if nobj == 0 || nori == 0 || n_points == 0 || nproj == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let projections: Vec<Vec<f64>> = (0..nproj)
        .map(|_| {
            let mut proj: Vec<f64> = (0..n_points).map(|_| rng.sample(StandardNormal)).collect();
            let norm: f64 = proj.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                proj.iter_mut().for_each(|x| *x /= norm);
            }
            proj
        })
        .collect();

    // Reference projections do not depend on the curve being scored.
    let proj_ori: Vec<Vec<f64>> = projections
        .iter()
        .map(|proj| {
            (0..nori)
                .map(|j| (0..n_points).map(|t| data_ori[(j, t)] * proj[t]).sum())
                .collect()
        })
        .collect();

    iter_maybe_parallel!(0..nobj)
        .map(|i| {
            let mut total_depth = 0.0;

            for (proj, ori) in projections.iter().zip(&proj_ori) {
                let proj_i: f64 = (0..n_points).map(|t| data_obj[(i, t)] * proj[t]).sum();

                let below = ori.iter().filter(|&&x| x < proj_i).count();
                let above = ori.iter().filter(|&&x| x > proj_i).count();
                total_depth += (below.min(above) as f64 + 1.0) / (nori as f64 + 1.0);
            }

            total_depth / nproj as f64
        })
        .collect()
}

/// Compute band depth.
///
/// Proportion of reference pairs whose band contains the curve at every
/// grid point. Needs at least two reference curves.
pub fn band(data_obj: &FdMatrix, data_ori: &FdMatrix) -> Vec<f64> {
    let (nobj, n_points) = data_obj.shape();
    let nori = data_ori.nrows();
    if nobj == 0 || nori < 2 || n_points == 0 {
        return Vec::new();
    }

    let n_pairs = (nori * (nori - 1)) / 2;

    iter_maybe_parallel!(0..nobj)
        .map(|i| {
            let mut count_in_band = 0usize;

            for j in 0..nori {
                for k in (j + 1)..nori {
                    let inside_band = (0..n_points).all(|t| {
                        let x_t = data_obj[(i, t)];
                        let y_j_t = data_ori[(j, t)];
                        let y_k_t = data_ori[(k, t)];
                        x_t >= y_j_t.min(y_k_t) && x_t <= y_j_t.max(y_k_t)
                    });

                    if inside_band {
                        count_in_band += 1;
                    }
                }
            }

            count_in_band as f64 / n_pairs as f64
        })
        .collect()
}

/// Compute modified band depth.
///
/// For every reference pair, the proportion of grid points where the curve
/// lies inside the band; averaged over pairs.
pub fn modified_band(data_obj: &FdMatrix, data_ori: &FdMatrix) -> Vec<f64> {
    let (nobj, n_points) = data_obj.shape();
    let nori = data_ori.nrows();
    if nobj == 0 || nori < 2 || n_points == 0 {
        return Vec::new();
    }

    let n_pairs = (nori * (nori - 1)) / 2;

    iter_maybe_parallel!(0..nobj)
        .map(|i| {
            let mut total_proportion = 0.0;

            for j in 0..nori {
                for k in (j + 1)..nori {
                    let mut count_inside = 0usize;

                    for t in 0..n_points {
                        let x_t = data_obj[(i, t)];
                        let y_j_t = data_ori[(j, t)];
                        let y_k_t = data_ori[(k, t)];

                        if x_t >= y_j_t.min(y_k_t) && x_t <= y_j_t.max(y_k_t) {
                            count_inside += 1;
                        }
                    }

                    total_proportion += count_inside as f64 / n_points as f64;
                }
            }

            total_proportion / n_pairs as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn uniform_grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
    }

    fn generate_centered_data(n: usize, m: usize) -> FdMatrix {
        let argvals = uniform_grid(m);
        let mut data = FdMatrix::zeros(n, m);
        for i in 0..n {
            let offset = (i as f64 - n as f64 / 2.0) / (n as f64);
            for j in 0..m {
                data[(i, j)] = (2.0 * PI * argvals[j]).sin() + offset;
            }
        }
        data
    }

    fn centered_grid(n: usize, m: usize) -> FDataGrid {
        FDataGrid::new(vec![generate_centered_data(n, m)], vec![uniform_grid(m)]).unwrap()
    }

    fn all_methods() -> Vec<DepthMethod> {
        vec![
            DepthMethod::ModifiedBand,
            DepthMethod::Band,
            DepthMethod::FraimanMuniz { scale: true },
            DepthMethod::FraimanMuniz { scale: false },
            DepthMethod::RandomProjection {
                n_projections: 20,
                seed: 7,
            },
        ]
    }

    // ============== Per-coordinate functions ==============

    #[test]
    fn test_fraiman_muniz_central_deeper() {
        let n = 20;
        let data = generate_centered_data(n, 30);
        let depths = fraiman_muniz(&data, &data, true);
        assert!(
            depths[n / 2] > depths[0],
            "Central curve should be deeper: {} > {}",
            depths[n / 2],
            depths[0]
        );
    }

    #[test]
    fn test_fraiman_muniz_invalid() {
        assert!(fraiman_muniz(&FdMatrix::zeros(0, 0), &FdMatrix::zeros(0, 0), true).is_empty());
    }

    #[test]
    fn test_band_depth_central_deeper() {
        let n = 10;
        let data = generate_centered_data(n, 20);
        let depths = band(&data, &data);
        assert!(depths[n / 2] > depths[0]);
    }

    #[test]
    fn test_band_depth_invalid() {
        let data = generate_centered_data(1, 5);
        assert!(band(&data, &data).is_empty());
        assert!(modified_band(&data, &data).is_empty());
    }

    #[test]
    fn test_modified_band_known_value() {
        // reference 0 and 2; the curve 1 is always inside, 3 never
        let ori = FdMatrix::from_rows(&[vec![0.0, 0.0], vec![2.0, 2.0]]).unwrap();
        let obj = FdMatrix::from_rows(&[vec![1.0, 1.0], vec![3.0, 1.0]]).unwrap();
        let depths = modified_band(&obj, &ori);
        assert_eq!(depths, vec![1.0, 0.5]);
        assert_eq!(band(&obj, &ori), vec![1.0, 0.0]);
    }

    #[test]
    fn test_random_projection_reproducible() {
        let data = generate_centered_data(12, 15);
        let a = random_projection(&data, &data, 25, 42);
        let b = random_projection(&data, &data, 25, 42);
        assert_eq!(a, b);
        assert!(random_projection(&data, &data, 0, 42).is_empty());
    }

    // ============== DepthMethod ==============

    #[test]
    fn test_depth_range_all_methods() {
        let fd = centered_grid(15, 20);
        for method in all_methods() {
            let depths = method.depth(&fd, &fd).unwrap();
            assert_eq!(depths.len(), 15);
            for d in &depths {
                assert!(*d >= 0.0 && *d <= 1.0, "{} depth out of range", method.name());
            }
        }
    }

    #[test]
    fn test_depth_central_deeper_all_methods() {
        let n = 21;
        let fd = centered_grid(n, 25);
        for method in all_methods() {
            let depths = method.depth(&fd, &fd).unwrap();
            assert!(
                depths[n / 2] > depths[0],
                "{}: {} > {}",
                method.name(),
                depths[n / 2],
                depths[0]
            );
        }
    }

    #[test]
    fn test_depth_multivariate_is_mean_of_coordinates() {
        let a = centered_grid(8, 10);
        let reversed: Vec<usize> = (0..8).rev().collect();
        let b = a.select_samples(&reversed);
        let both = a.concatenate_coordinates(&b).unwrap();
        let method = DepthMethod::FraimanMuniz { scale: true };
        let da = method.depth(&a, &a).unwrap();
        let db = method.depth(&b, &b).unwrap();
        let dboth = method.depth(&both, &both).unwrap();
        for i in 0..8 {
            assert!((dboth[i] - (da[i] + db[i]) / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_depth_requires_reference_pairs() {
        let fd = centered_grid(5, 10);
        let single = fd.select_samples(&[0]);
        assert!(matches!(
            DepthMethod::ModifiedBand.depth(&fd, &single),
            Err(FdaError::Configuration(_))
        ));
        assert!(DepthMethod::FraimanMuniz { scale: true }
            .depth(&fd, &single)
            .is_ok());
    }

    #[test]
    fn test_depth_grid_mismatch() {
        let a = centered_grid(5, 10);
        let b = centered_grid(5, 11);
        assert!(DepthMethod::ModifiedBand.depth(&a, &b).is_err());
    }
}
