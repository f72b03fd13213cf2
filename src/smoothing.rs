//! Kernel smoothing of functional data.
//!
//! Every smoother is linear: the smoothed values at the output points are
//! `H y`, where `y` are the observed values at the input points and `H` is
//! the hat matrix (`n_output x n_input`). [`KernelSmoother::smooth`] applies
//! the same hat matrix to every sample and coordinate of an [`FDataGrid`].

use crate::error::{FdaError, Result};
use crate::fdata::FData;
use crate::grid::FDataGrid;
use crate::helpers::NUMERICAL_EPS;
use crate::matrix::FdMatrix;
use crate::slice_maybe_parallel;
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Kernel functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kernel {
    /// Standard normal density.
    #[default]
    Normal,
    /// `3/4 (1 - u²)` on `[-1, 1]`.
    Epanechnikov,
    /// `1/2` on `[-1, 1]`.
    Uniform,
    /// `35/32 (1 - u²)³` on `[-1, 1]`.
    TriWeight,
}

impl Kernel {
    /// Value of the kernel at `u`.
    pub fn evaluate(&self, u: f64) -> f64 {
        let inside = u.abs() <= 1.0;
        match self {
            Kernel::Normal => (-0.5 * u * u).exp() / (2.0 * std::f64::consts::PI).sqrt(),
            Kernel::Epanechnikov if inside => 0.75 * (1.0 - u * u),
            Kernel::Uniform if inside => 0.5,
            Kernel::TriWeight if inside => 35.0 / 32.0 * (1.0 - u * u).powi(3),
            _ => 0.0,
        }
    }
}

/// Linear kernel smoothers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelSmoother {
    /// Locally weighted mean.
    NadarayaWatson { bandwidth: f64, kernel: Kernel },
    /// Locally weighted linear regression, evaluated at the output point.
    LocalLinear { bandwidth: f64, kernel: Kernel },
    /// Kernel mean over the `k` nearest input points, with the bandwidth
    /// set to the distance of the `k`-th neighbour.
    Knn { k: usize, kernel: Kernel },
}

impl KernelSmoother {
    /// Nadaraya-Watson smoother with the normal kernel.
    pub fn nadaraya_watson(bandwidth: f64) -> Self {
        KernelSmoother::NadarayaWatson {
            bandwidth,
            kernel: Kernel::Normal,
        }
    }

    /// Local linear smoother with the normal kernel.
    pub fn local_linear(bandwidth: f64) -> Self {
        KernelSmoother::LocalLinear {
            bandwidth,
            kernel: Kernel::Normal,
        }
    }

    /// k-nearest-neighbours smoother with the uniform kernel.
    pub fn knn(k: usize) -> Self {
        KernelSmoother::Knn {
            k,
            kernel: Kernel::Uniform,
        }
    }

    /// Same smoother with a different kernel.
    pub fn with_kernel(self, kernel: Kernel) -> Self {
        match self {
            KernelSmoother::NadarayaWatson { bandwidth, .. } => {
                KernelSmoother::NadarayaWatson { bandwidth, kernel }
            }
            KernelSmoother::LocalLinear { bandwidth, .. } => {
                KernelSmoother::LocalLinear { bandwidth, kernel }
            }
            KernelSmoother::Knn { k, .. } => KernelSmoother::Knn { k, kernel },
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            KernelSmoother::NadarayaWatson { bandwidth, .. }
            | KernelSmoother::LocalLinear { bandwidth, .. } => {
                if !bandwidth.is_finite() || *bandwidth <= 0.0 {
                    return Err(FdaError::config(format!(
                        "bandwidth must be positive and finite, got {}",
                        bandwidth
                    )));
                }
            }
            KernelSmoother::Knn { k, .. } => {
                if *k == 0 {
                    return Err(FdaError::config("k must be at least 1"));
                }
            }
        }
        Ok(())
    }

    /// Hat matrix mapping values at `input_points` to smoothed values at
    /// `output_points`.
    ///
    /// # Arguments
    /// * `input_points` - Points where the data is observed
    /// * `output_points` - Points where the smoothed values are wanted
    ///
    /// # Returns
    /// `n_output x n_input` matrix. Kernel smoothers fail with a
    /// configuration error when an output point has no input point within
    /// the kernel's support.
    pub fn hat_matrix(&self, input_points: &[f64], output_points: &[f64]) -> Result<FdMatrix> {
        self.validate()?;
        if input_points.is_empty() {
            return Err(FdaError::config("cannot smooth without input points"));
        }

        let rows: Vec<Vec<f64>> = slice_maybe_parallel!(output_points)
            .map(|&x0| match self {
                KernelSmoother::NadarayaWatson { bandwidth, kernel } => {
                    nadaraya_watson_weights(input_points, x0, *bandwidth, *kernel)
                }
                KernelSmoother::LocalLinear { bandwidth, kernel } => {
                    local_linear_weights(input_points, x0, *bandwidth, *kernel)
                }
                KernelSmoother::Knn { k, kernel } => {
                    Ok(knn_weights(input_points, x0, *k, *kernel))
                }
            })
            .collect::<Result<_>>()?;

        let mut hat = FdMatrix::zeros(output_points.len(), input_points.len());
        for (i, row) in rows.iter().enumerate() {
            for (j, &w) in row.iter().enumerate() {
                hat[(i, j)] = w;
            }
        }
        Ok(hat)
    }

    /// Smooth every sample of `fdata` on its own grid (1-D domains only).
    pub fn smooth(&self, fdata: &FDataGrid) -> Result<FDataGrid> {
        if fdata.dim_domain() != 1 {
            return Err(FdaError::config("kernel smoothing requires a one-dimensional domain"));
        }
        let grid = &fdata.grid_points()[0];
        let hat_t = self.hat_matrix(grid, grid)?.transpose();

        let data_matrix = fdata
            .data_matrix()
            .iter()
            .map(|coord| coord.matmul(&hat_t))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "smoothed {} samples on {} points with {:?}",
            fdata.n_samples(),
            grid.len(),
            self
        );
        Ok(fdata.with_values(data_matrix))
    }
}

/// Normalize `weights` to unit sum; all-zero weights stay zero.
fn normalized(mut weights: Vec<f64>) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > NUMERICAL_EPS {
        weights.iter_mut().for_each(|w| *w /= total);
    }
    weights
}

fn nadaraya_watson_weights(x: &[f64], x0: f64, bandwidth: f64, kernel: Kernel) -> Result<Vec<f64>> {
    let weights: Vec<f64> = x
        .iter()
        .map(|&xi| kernel.evaluate((xi - x0) / bandwidth))
        .collect();
    if weights.iter().sum::<f64>() <= NUMERICAL_EPS {
        return Err(FdaError::config(format!(
            "no input point within bandwidth {} of output point {}",
            bandwidth, x0
        )));
    }
    Ok(normalized(weights))
}

fn local_linear_weights(
    x: &[f64],
    x0: f64,
    bandwidth: f64,
    kernel: Kernel,
) -> Result<Vec<f64>> {
    let w: Vec<f64> = x
        .iter()
        .map(|&xi| kernel.evaluate((xi - x0) / bandwidth))
        .collect();

    // Weighted moments
    let mut s0 = 0.0;
    let mut s1 = 0.0;
    let mut s2 = 0.0;
    for (&wi, &xi) in w.iter().zip(x) {
        let d = xi - x0;
        s0 += wi;
        s1 += wi * d;
        s2 += wi * d * d;
    }

    if s0 <= NUMERICAL_EPS {
        return Err(FdaError::config(format!(
            "no input point within bandwidth {} of output point {}",
            bandwidth, x0
        )));
    }

    let det = s0 * s2 - s1 * s1;
    if det.abs() > NUMERICAL_EPS {
        Ok(w.iter()
            .zip(x)
            .map(|(&wi, &xi)| wi * (s2 - s1 * (xi - x0)) / det)
            .collect())
    } else {
        Ok(normalized(w))
    }
}

fn knn_weights(x: &[f64], x0: f64, k: usize, kernel: Kernel) -> Vec<f64> {
    let k = k.min(x.len());

    let mut order: Vec<usize> = (0..x.len()).collect();
    order.sort_by(|&a, &b| {
        (x[a] - x0)
            .abs()
            .partial_cmp(&(x[b] - x0).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let nearest = &order[..k];

    let radius = nearest
        .iter()
        .map(|&i| (x[i] - x0).abs())
        .fold(0.0, f64::max);
    let mut weights = vec![0.0; x.len()];
    for &i in nearest {
        weights[i] = if radius > 0.0 {
            kernel.evaluate((x[i] - x0) / radius)
        } else {
            1.0
        };
    }

    // Compact kernels vanish on the radius; fall back to a plain mean.
    if weights.iter().sum::<f64>() <= NUMERICAL_EPS {
        for &i in nearest {
            weights[i] = 1.0;
        }
    }
    normalized(weights)
}
