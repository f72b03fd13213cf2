//! Functional data expressed as coefficients in a basis.

use super::{Basis, CoordinateKey, VectorValued};
use crate::error::{FdaError, Result};
use crate::fdata::{same_domain, FData};
use crate::grid::FDataGrid;
use crate::matrix::FdMatrix;

/// A sample of functions `x_i = Σ_k c_ik φ_k` in a common basis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FDataBasis {
    basis: Basis,
    coefficients: FdMatrix,
    dataset_name: Option<String>,
    coordinate_names: Vec<Option<String>>,
    sample_names: Vec<Option<String>>,
}

impl FDataBasis {
    /// Create from a basis and an `n_samples x n_basis` coefficient matrix.
    pub fn new(basis: Basis, coefficients: FdMatrix) -> Result<Self> {
        if coefficients.ncols() != basis.n_basis() {
            return Err(FdaError::DimensionMismatch {
                what: "coefficient columns",
                expected: basis.n_basis(),
                found: coefficients.ncols(),
            });
        }
        let dim_codomain = basis.dim_codomain();
        let n_samples = coefficients.nrows();
        Ok(Self {
            basis,
            coefficients,
            dataset_name: None,
            coordinate_names: vec![None; dim_codomain],
            sample_names: vec![None; n_samples],
        })
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

    /// Copy sharing every attribute except the basis, coefficients and
    /// coordinate names.
    pub(crate) fn with_representation(
        &self,
        basis: Basis,
        coefficients: FdMatrix,
        coordinate_names: Vec<Option<String>>,
    ) -> Self {
        Self {
            basis,
            coefficients,
            dataset_name: self.dataset_name.clone(),
            coordinate_names,
            sample_names: self.sample_names.clone(),
        }
    }

    /// The basis.
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// The `n_samples x n_basis` coefficient matrix.
    pub fn coefficients(&self) -> &FdMatrix {
        &self.coefficients
    }

    /// Values at `points`: one `n_samples x n_points` matrix per coordinate.
    pub fn evaluate(&self, points: &[f64]) -> Result<Vec<FdMatrix>> {
        self.basis
            .evaluate(points)?
            .iter()
            .map(|phi| self.coefficients.matmul(phi))
            .collect()
    }

    /// Discretize on `points`, keeping names and the domain range.
    pub fn to_grid(&self, points: Vec<f64>) -> Result<FDataGrid> {
        let values = self.evaluate(&points)?;
        let mut grid = FDataGrid::new(values, vec![points])?
            .with_domain_range(self.basis.domain_range().to_vec())?
            .with_coordinate_names(self.coordinate_names.clone())?
            .with_sample_names(self.sample_names.clone())?;
        if let Some(name) = &self.dataset_name {
            grid = grid.with_dataset_name(name.clone());
        }
        Ok(grid)
    }

    /// Derivative of the given order, expressed in the derivative basis.
    pub fn derivative(&self, order: usize) -> Result<Self> {
        let (basis, coefficients) = self
            .basis
            .derivative_basis_and_coefs(&self.coefficients, order)?;
        Ok(self.with_representation(basis, coefficients, self.coordinate_names.clone()))
    }

    /// Select codomain coordinates.
    ///
    /// Selecting every coordinate returns an unchanged copy. Scalar bases
    /// only have coordinate 0.
    pub fn coordinate(&self, key: impl Into<CoordinateKey>) -> Result<Self> {
        let key = key.into();
        let range = key.validate(self.dim_codomain())?;
        let full = range == (0..self.dim_codomain());

        match &self.basis {
            Basis::VectorValued(vv) if !full || matches!(key, CoordinateKey::Index(_)) => {
                vv.coordinate_nonfull(self, &key)
            }
            _ => Ok(self.clone()),
        }
    }

    /// Stack the coordinates of `self` and `other` into a vector-valued
    /// representation. Vector-valued inputs contribute all their children.
    pub fn concatenate_coordinates(&self, other: &FDataBasis) -> Result<Self> {
        if self.n_samples() != other.n_samples() {
            return Err(FdaError::config(format!(
                "cannot concatenate coordinates of objects with {} and {} samples",
                self.n_samples(),
                other.n_samples()
            )));
        }
        if !same_domain(self.domain_range(), other.domain_range()) {
            return Err(FdaError::config("functional data objects must share the same domain"));
        }

        let children = |b: &Basis| -> Vec<Basis> {
            match b {
                Basis::VectorValued(vv) => vv.basis_list().to_vec(),
                scalar => vec![scalar.clone()],
            }
        };
        let mut basis_list = children(&self.basis);
        basis_list.extend(children(&other.basis));

        let basis = Basis::VectorValued(VectorValued::new(basis_list)?);
        let coefficients =
            FdMatrix::hstack(&[self.coefficients.clone(), other.coefficients.clone()])?;
        let mut coordinate_names = self.coordinate_names.clone();
        coordinate_names.extend(other.coordinate_names.iter().cloned());

        Ok(self.with_representation(basis, coefficients, coordinate_names))
    }
}

impl FData for FDataBasis {
    fn n_samples(&self) -> usize {
        self.coefficients.nrows()
    }

    fn dim_domain(&self) -> usize {
        self.basis.dim_domain()
    }

    fn dim_codomain(&self) -> usize {
        self.basis.dim_codomain()
    }

    fn domain_range(&self) -> &[[f64; 2]] {
        self.basis.domain_range()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::linspace;

    fn sample_vector_fd() -> FDataBasis {
        let basis = Basis::vector_valued(vec![
            Basis::monomial([0.0, 1.0], 3).unwrap(),
            Basis::bspline([0.0, 1.0], 4, 3).unwrap(),
            Basis::fourier([0.0, 1.0], 3).unwrap(),
        ])
        .unwrap();
        let coefs = FdMatrix::from_rows(&[
            (0..10).map(|k| k as f64).collect(),
            (0..10).map(|k| (k as f64).sin()).collect(),
        ])
        .unwrap();
        FDataBasis::new(basis, coefs)
            .unwrap()
            .with_dataset_name("curves")
            .with_coordinate_names(vec![Some("x".into()), Some("y".into()), None])
            .unwrap()
    }

    #[test]
    fn test_new_checks_coefficients() {
        let basis = Basis::monomial([0.0, 1.0], 3).unwrap();
        assert!(FDataBasis::new(basis, FdMatrix::zeros(2, 2)).is_err());
    }

    #[test]
    fn test_evaluate_scalar() {
        let basis = Basis::monomial([0.0, 1.0], 2).unwrap();
        let fd = FDataBasis::new(basis, FdMatrix::from_rows(&[vec![1.0, 2.0]]).unwrap()).unwrap();
        let vals = fd.evaluate(&[0.0, 0.5, 1.0]).unwrap();
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0].row(0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_coordinate_index_is_scalar() {
        let fd = sample_vector_fd();
        let y = fd.coordinate(1).unwrap();
        assert_eq!(y.basis(), &Basis::bspline([0.0, 1.0], 4, 3).unwrap());
        assert_eq!(y.coefficients(), &fd.coefficients().columns_range(3, 7));
        assert_eq!(y.coordinate_names(), &[Some("y".to_string())]);
        assert_eq!(y.dataset_name(), Some("curves"));
    }

    #[test]
    fn test_coordinate_prefix_matches_slicing() {
        let fd = sample_vector_fd();
        let vv = match fd.basis() {
            Basis::VectorValued(vv) => vv.clone(),
            _ => unreachable!(),
        };
        for k in 1..=3 {
            let sel = fd.coordinate(0..k).unwrap();
            let n_cols: usize = vv.basis_list()[..k].iter().map(Basis::n_basis).sum();
            assert_eq!(sel.coefficients(), &fd.coefficients().columns_range(0, n_cols));
            assert_eq!(sel.dim_codomain(), k);
        }
    }

    #[test]
    fn test_coordinate_full_range_is_unchanged() {
        let fd = sample_vector_fd();
        assert_eq!(fd.coordinate(0..3).unwrap(), fd);
    }

    #[test]
    fn test_coordinate_invalid_selection() {
        let fd = sample_vector_fd();
        assert!(matches!(fd.coordinate(3), Err(FdaError::InvalidCoordinate(_))));
        assert!(matches!(fd.coordinate(2..2), Err(FdaError::InvalidCoordinate(_))));
        assert!(matches!(fd.coordinate(1..5), Err(FdaError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_coordinate_of_scalar() {
        let basis = Basis::monomial([0.0, 1.0], 2).unwrap();
        let fd = FDataBasis::new(basis, FdMatrix::zeros(1, 2)).unwrap();
        assert_eq!(fd.coordinate(0).unwrap(), fd);
        assert!(fd.coordinate(1).is_err());
    }

    #[test]
    fn test_derivative_commutes_with_coordinates() {
        let fd = sample_vector_fd();
        let t = linspace(0.0, 1.0, 9);
        let whole = fd.derivative(1).unwrap().evaluate(&t).unwrap();
        for i in 0..3 {
            let coord = fd.coordinate(i).unwrap().derivative(1).unwrap();
            let single = coord.evaluate(&t).unwrap();
            for (a, b) in whole[i].as_slice().iter().zip(single[0].as_slice()) {
                assert!((a - b).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_to_grid_keeps_metadata() {
        let fd = sample_vector_fd();
        let grid = fd.to_grid(linspace(0.0, 1.0, 5)).unwrap();
        assert_eq!(grid.dim_codomain(), 3);
        assert_eq!(grid.n_samples(), 2);
        assert_eq!(grid.dataset_name(), Some("curves"));
        assert_eq!(grid.coordinate_names()[0], Some("x".to_string()));
    }

    #[test]
    fn test_concatenate_coordinates() {
        let a = FDataBasis::new(
            Basis::monomial([0.0, 1.0], 2).unwrap(),
            FdMatrix::from_rows(&[vec![1.0, 2.0]]).unwrap(),
        )
        .unwrap();
        let b = FDataBasis::new(
            Basis::constant([0.0, 1.0]).unwrap(),
            FdMatrix::from_rows(&[vec![7.0]]).unwrap(),
        )
        .unwrap();
        let c = a.concatenate_coordinates(&b).unwrap();
        assert_eq!(c.dim_codomain(), 2);
        assert_eq!(c.coefficients().row(0), vec![1.0, 2.0, 7.0]);
        let back = c.coordinate(1).unwrap();
        assert_eq!(back.basis(), b.basis());
        assert_eq!(back.coefficients(), b.coefficients());

        let other_domain = FDataBasis::new(
            Basis::constant([0.0, 2.0]).unwrap(),
            FdMatrix::from_rows(&[vec![7.0]]).unwrap(),
        )
        .unwrap();
        assert!(a.concatenate_coordinates(&other_domain).is_err());
    }
}
