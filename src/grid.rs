//! Discretized functional data.
//!
//! [`FDataGrid`] stores every function by its values on a common grid. Each
//! codomain coordinate has its own `n_samples x n_points` column-major
//! matrix; for multidimensional domains the grid is the tensor product of
//! the per-axis grid points, flattened row-major (last axis fastest).

use crate::basis::{Basis, FDataBasis};
use crate::error::{FdaError, Result};
use crate::fdata::{same_domain, FData};
use crate::helpers::{linspace, NUMERICAL_EPS};
use crate::iter_maybe_parallel;
use crate::matrix::FdMatrix;
use nalgebra::SVD;
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Functional data sampled on a grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FDataGrid {
    data_matrix: Vec<FdMatrix>,
    grid_points: Vec<Vec<f64>>,
    domain_range: Vec<[f64; 2]>,
    dataset_name: Option<String>,
    coordinate_names: Vec<Option<String>>,
    sample_names: Vec<Option<String>>,
}

impl FDataGrid {
    /// Create from one value matrix per codomain coordinate and one grid per
    /// domain dimension.
    ///
    /// Every matrix must be `n_samples x Π len(grid_points[k])`, and every
    /// grid must be strictly increasing.
    pub fn new(data_matrix: Vec<FdMatrix>, grid_points: Vec<Vec<f64>>) -> Result<Self> {
        if data_matrix.is_empty() {
            return Err(FdaError::config("data must have at least one coordinate"));
        }
        if grid_points.is_empty() {
            return Err(FdaError::config("grid must have at least one domain dimension"));
        }
        for axis in &grid_points {
            if axis.is_empty() {
                return Err(FdaError::config("grid axes cannot be empty"));
            }
            if axis.windows(2).any(|w| w[1] <= w[0]) {
                return Err(FdaError::config("grid points must be strictly increasing"));
            }
        }

        let n_points: usize = grid_points.iter().map(Vec::len).product();
        let n_samples = data_matrix[0].nrows();
        for coord in &data_matrix {
            if coord.nrows() != n_samples {
                return Err(FdaError::DimensionMismatch {
                    what: "samples per coordinate",
                    expected: n_samples,
                    found: coord.nrows(),
                });
            }
            if coord.ncols() != n_points {
                return Err(FdaError::DimensionMismatch {
                    what: "values per sample",
                    expected: n_points,
                    found: coord.ncols(),
                });
            }
        }

        let domain_range = grid_points
            .iter()
            .map(|axis| [axis[0], axis[axis.len() - 1]])
            .collect();
        let dim_codomain = data_matrix.len();

        Ok(Self {
            data_matrix,
            grid_points,
            domain_range,
            dataset_name: None,
            coordinate_names: vec![None; dim_codomain],
            sample_names: vec![None; n_samples],
        })
    }

    /// Scalar curves given as rows, on an equispaced grid over `[0, 1]`.
    pub fn from_samples(rows: &[Vec<f64>]) -> Result<Self> {
        let m = rows.first().map_or(0, Vec::len);
        Self::from_curves(rows, linspace(0.0, 1.0, m))
    }

    /// Scalar curves given as rows, on the given 1-D grid.
    pub fn from_curves(rows: &[Vec<f64>], grid: Vec<f64>) -> Result<Self> {
        Self::new(vec![FdMatrix::from_rows(rows)?], vec![grid])
    }

    /// Replace the domain range. It must contain every grid point.
    pub fn with_domain_range(mut self, domain_range: Vec<[f64; 2]>) -> Result<Self> {
        if domain_range.len() != self.grid_points.len() {
            return Err(FdaError::DimensionMismatch {
                what: "domain range dimensions",
                expected: self.grid_points.len(),
                found: domain_range.len(),
            });
        }
        for (axis, range) in self.grid_points.iter().zip(&domain_range) {
            if axis[0] < range[0] - NUMERICAL_EPS || axis[axis.len() - 1] > range[1] + NUMERICAL_EPS
            {
                return Err(FdaError::config("grid points must lie inside the domain range"));
            }
        }
        self.domain_range = domain_range;
        Ok(self)
    }

    /// Set the dataset name.
    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self
    }

    /// Set one optional name per codomain coordinate.
    pub fn with_coordinate_names(mut self, names: Vec<Option<String>>) -> Result<Self> {
        if names.len() != self.dim_codomain() {
            return Err(FdaError::DimensionMismatch {
                what: "coordinate names",
                expected: self.dim_codomain(),
                found: names.len(),
            });
        }
        self.coordinate_names = names;
        Ok(self)
    }

    /// Set one optional name per sample.
    pub fn with_sample_names(mut self, names: Vec<Option<String>>) -> Result<Self> {
        if names.len() != self.n_samples() {
            return Err(FdaError::DimensionMismatch {
                what: "sample names",
                expected: self.n_samples(),
                found: names.len(),
            });
        }
        self.sample_names = names;
        Ok(self)
    }

    /// Value matrices, one per codomain coordinate.
    pub fn data_matrix(&self) -> &[FdMatrix] {
        &self.data_matrix
    }

    /// Grid points, one vector per domain dimension.
    pub fn grid_points(&self) -> &[Vec<f64>] {
        &self.grid_points
    }

    /// Number of grid points (product over domain dimensions).
    pub fn n_points(&self) -> usize {
        self.data_matrix[0].ncols()
    }

    /// Values of sample `i` in coordinate `coord` at every grid point.
    pub fn sample_curve(&self, i: usize, coord: usize) -> Vec<f64> {
        self.data_matrix[coord].row(i)
    }

    /// Scalar-valued data for a single coordinate.
    pub fn coordinate(&self, coord: usize) -> Result<Self> {
        let data = self.data_matrix.get(coord).ok_or_else(|| {
            FdaError::InvalidCoordinate(format!(
                "coordinate {} out of range for codomain of dimension {}",
                coord,
                self.dim_codomain()
            ))
        })?;
        Ok(Self {
            data_matrix: vec![data.clone()],
            coordinate_names: vec![self.coordinate_names[coord].clone()],
            ..self.clone_metadata()
        })
    }

    /// Stack the codomains of `self` and `other` into one object.
    ///
    /// Both must have the same samples count and the same domain (grid
    /// points and range). The result keeps `self`'s dataset and sample
    /// names; coordinate names are concatenated.
    pub fn concatenate_coordinates(&self, other: &FDataGrid) -> Result<Self> {
        if self.n_samples() != other.n_samples() {
            return Err(FdaError::config(format!(
                "cannot concatenate coordinates of objects with {} and {} samples",
                self.n_samples(),
                other.n_samples()
            )));
        }
        self.check_same_grid(other)?;

        log::debug!(
            "concatenating coordinates: {} + {} -> {}",
            self.dim_codomain(),
            other.dim_codomain(),
            self.dim_codomain() + other.dim_codomain()
        );

        let mut data_matrix = self.data_matrix.clone();
        data_matrix.extend(other.data_matrix.iter().cloned());
        let mut coordinate_names = self.coordinate_names.clone();
        coordinate_names.extend(other.coordinate_names.iter().cloned());

        Ok(Self {
            data_matrix,
            coordinate_names,
            ..self.clone_metadata()
        })
    }

    /// Append the samples of `other` after those of `self`.
    pub fn concatenate_samples(&self, other: &FDataGrid) -> Result<Self> {
        if self.dim_codomain() != other.dim_codomain() {
            return Err(FdaError::config(format!(
                "cannot concatenate samples with codomains of dimension {} and {}",
                self.dim_codomain(),
                other.dim_codomain()
            )));
        }
        self.check_same_grid(other)?;

        let data_matrix = self
            .data_matrix
            .iter()
            .zip(&other.data_matrix)
            .map(|(a, b)| FdMatrix::vstack(&[a.clone(), b.clone()]))
            .collect::<Result<Vec<_>>>()?;
        let mut sample_names = self.sample_names.clone();
        sample_names.extend(other.sample_names.iter().cloned());

        Ok(Self {
            data_matrix,
            sample_names,
            ..self.clone_metadata()
        })
    }

    /// Subset of samples, in the given order.
    pub fn select_samples(&self, indices: &[usize]) -> Self {
        Self {
            data_matrix: self
                .data_matrix
                .iter()
                .map(|m| m.select_rows(indices))
                .collect(),
            sample_names: indices
                .iter()
                .map(|&i| self.sample_names[i].clone())
                .collect(),
            ..self.clone_metadata()
        }
    }

    /// Pointwise mean, as a single-sample object.
    pub fn mean(&self) -> Self {
        self.pointwise(|col| col.iter().sum::<f64>() / col.len() as f64)
    }

    /// Pointwise geometric mean, as a single-sample object.
    ///
    /// A zero value gives a geometric mean of zero. Points where some sample
    /// is negative have no geometric mean and are set to NaN.
    pub fn gmean(&self) -> Self {
        let result = self.pointwise(|col| {
            if col.iter().any(|&v| v < 0.0) {
                return f64::NAN;
            }
            (col.iter().map(|v| v.ln()).sum::<f64>() / col.len() as f64).exp()
        });
        if result
            .data_matrix
            .iter()
            .any(|m| m.as_slice().iter().any(|v| v.is_nan()))
        {
            log::warn!("geometric mean undefined at some points (negative values)");
        }
        result
    }

    /// Pointwise unbiased variance, as a single-sample object.
    pub fn var(&self) -> Self {
        self.pointwise(|col| {
            let n = col.len();
            if n < 2 {
                return 0.0;
            }
            let mean = col.iter().sum::<f64>() / n as f64;
            col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        })
    }

    /// Numerical derivative of the given order (1-D domains only).
    ///
    /// Uses forward/backward differences at the boundary and central
    /// differences inside.
    pub fn derivative(&self, order: usize) -> Result<Self> {
        if self.dim_domain() != 1 {
            return Err(FdaError::config(
                "finite-difference derivatives require a one-dimensional domain",
            ));
        }
        let argvals = &self.grid_points[0];
        let m = argvals.len();
        if order > 0 && m < 2 {
            return Err(FdaError::config("at least two grid points are needed to differentiate"));
        }

        let mut data_matrix = self.data_matrix.clone();
        for _ in 0..order {
            data_matrix = data_matrix
                .iter()
                .map(|coord| finite_difference(coord, argvals))
                .collect();
        }

        Ok(Self {
            data_matrix,
            ..self.clone_metadata()
        })
    }

    /// Least-squares projection of every sample on `basis`.
    ///
    /// A scalar basis projects scalar data; a vector-valued basis projects
    /// coordinate `i` on its child `i`.
    pub fn to_basis(&self, basis: &Basis) -> Result<FDataBasis> {
        if self.dim_domain() != 1 {
            return Err(FdaError::config("basis projection requires a one-dimensional domain"));
        }
        if basis.dim_codomain() != self.dim_codomain() {
            return Err(FdaError::config(format!(
                "basis codomain ({}) does not match data codomain ({})",
                basis.dim_codomain(),
                self.dim_codomain()
            )));
        }
        if !same_domain(basis.domain_range(), &self.domain_range) {
            return Err(FdaError::config("basis and data must share the domain range"));
        }

        let argvals = &self.grid_points[0];
        let children: Vec<&Basis> = match basis {
            Basis::VectorValued(vv) => vv.basis_list().iter().collect(),
            scalar => vec![scalar],
        };

        let blocks = children
            .iter()
            .zip(&self.data_matrix)
            .map(|(child, values)| least_squares_coefficients(child, values, argvals))
            .collect::<Result<Vec<_>>>()?;

        let mut fd = FDataBasis::new(basis.clone(), FdMatrix::hstack(&blocks)?)?
            .with_coordinate_names(self.coordinate_names.clone())?
            .with_sample_names(self.sample_names.clone())?;
        if let Some(name) = &self.dataset_name {
            fd = fd.with_dataset_name(name.clone());
        }
        Ok(fd)
    }

    fn check_same_grid(&self, other: &FDataGrid) -> Result<()> {
        let same_points = self.grid_points.len() == other.grid_points.len()
            && self
                .grid_points
                .iter()
                .zip(&other.grid_points)
                .all(|(a, b)| {
                    a.len() == b.len()
                        && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= NUMERICAL_EPS)
                });
        if !same_points || !same_domain(&self.domain_range, &other.domain_range) {
            return Err(FdaError::config("functional data objects must share the same domain"));
        }
        Ok(())
    }

    /// Reduce every column of every coordinate to one value.
    fn pointwise<F>(&self, reduce: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Sync + Send,
    {
        let data_matrix = self
            .data_matrix
            .iter()
            .map(|coord| {
                let m = coord.ncols();
                let values: Vec<f64> = if coord.nrows() == 0 {
                    vec![f64::NAN; m]
                } else {
                    iter_maybe_parallel!(0..m)
                        .map(|j| reduce(coord.column(j)))
                        .collect()
                };
                let mut reduced = FdMatrix::zeros(1, m);
                for (j, v) in values.into_iter().enumerate() {
                    reduced[(0, j)] = v;
                }
                reduced
            })
            .collect();

        Self {
            data_matrix,
            sample_names: vec![None],
            ..self.clone_metadata()
        }
    }

    /// Same metadata and grid, new values. Shapes must match the grid.
    pub(crate) fn with_values(&self, data_matrix: Vec<FdMatrix>) -> Self {
        Self {
            data_matrix,
            ..self.clone_metadata()
        }
    }

    /// Copy of every field except the (potentially large) value matrices.
    fn clone_metadata(&self) -> Self {
        Self {
            data_matrix: Vec::new(),
            grid_points: self.grid_points.clone(),
            domain_range: self.domain_range.clone(),
            dataset_name: self.dataset_name.clone(),
            coordinate_names: self.coordinate_names.clone(),
            sample_names: self.sample_names.clone(),
        }
    }
}

impl FData for FDataGrid {
    fn n_samples(&self) -> usize {
        self.data_matrix[0].nrows()
    }

    fn dim_domain(&self) -> usize {
        self.grid_points.len()
    }

    fn dim_codomain(&self) -> usize {
        self.data_matrix.len()
    }

    fn domain_range(&self) -> &[[f64; 2]] {
        &self.domain_range
    }

    fn dataset_name(&self) -> Option<&str> {
        self.dataset_name.as_deref()
    }

    fn coordinate_names(&self) -> &[Option<String>] {
        &self.coordinate_names
    }

    fn sample_names(&self) -> &[Option<String>] {
        &self.sample_names
    }
}

/// First derivative of every row by finite differences.
fn finite_difference(data: &FdMatrix, argvals: &[f64]) -> FdMatrix {
    let (n, m) = data.shape();
    let mut deriv = FdMatrix::zeros(n, m);

    let h0 = argvals[1] - argvals[0];
    let hn = argvals[m - 1] - argvals[m - 2];
    for i in 0..n {
        deriv[(i, 0)] = (data[(i, 1)] - data[(i, 0)]) / h0;
        for j in 1..(m - 1) {
            deriv[(i, j)] =
                (data[(i, j + 1)] - data[(i, j - 1)]) / (argvals[j + 1] - argvals[j - 1]);
        }
        deriv[(i, m - 1)] = (data[(i, m - 1)] - data[(i, m - 2)]) / hn;
    }
    deriv
}

/// Coefficients `C` minimizing `||values - C Φ||` for a scalar basis `Φ`.
fn least_squares_coefficients(basis: &Basis, values: &FdMatrix, argvals: &[f64]) -> Result<FdMatrix> {
    let phi = basis
        .evaluate(argvals)?
        .into_iter()
        .next()
        .ok_or_else(|| FdaError::config("basis evaluation produced no coordinates"))?;
    // phi: n_basis x m. Solve (Φ^T) c_i = y_i for every sample in one SVD.
    let design = phi.transpose().to_dmatrix();
    let rhs = values.transpose().to_dmatrix();
    let svd = SVD::new(design, true, true);

    let max_sv = svd.singular_values.iter().cloned().fold(0.0, f64::max);
    let rank = svd
        .singular_values
        .iter()
        .filter(|&&s| s > NUMERICAL_EPS * max_sv)
        .count();
    if rank < basis.n_basis() {
        log::warn!(
            "basis projection is rank deficient ({} of {} basis functions identifiable)",
            rank,
            basis.n_basis()
        );
    }

    let coefs = svd
        .solve(&rhs, NUMERICAL_EPS * max_sv)
        .map_err(|e| FdaError::config(format!("least squares projection failed: {}", e)))?;
    // coefs: n_basis x n_samples
    Ok(FdMatrix::from_dmatrix(&coefs).transpose())
}
