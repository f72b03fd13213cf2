//! Basis representations of functional data.
//!
//! A [`Basis`] is a finite set of functions over a fixed domain range. Scalar
//! bases ([`Constant`], [`Monomial`], [`BSpline`], [`Fourier`]) have a
//! one-dimensional codomain; [`VectorValued`] composes several of them into a
//! basis for vector-valued functions, one coordinate per child.
//!
//! Functions are represented in a basis by an [`FDataBasis`]: the basis plus
//! an `n_samples x n_basis` coefficient matrix.

mod fdata_basis;
mod scalar;
mod vector_valued;

pub use fdata_basis::FDataBasis;
pub use scalar::{BSpline, Constant, Fourier, Monomial};
pub use vector_valued::{BasisPartition, CoordinateKey, VectorValued};

use crate::error::{FdaError, Result};
use crate::matrix::FdMatrix;
use std::hash::{Hash, Hasher};

/// A scalar or vector-valued basis.
///
/// Two bases are equal when they are the same kind of basis over the same
/// domain range with the same parameters; vector-valued bases additionally
/// compare their children in order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Basis {
    /// The constant function.
    Constant(Constant),
    /// Monomials `t^k`.
    Monomial(Monomial),
    /// Clamped B-splines.
    BSpline(BSpline),
    /// Orthonormal Fourier functions.
    Fourier(Fourier),
    /// Composition of scalar bases, one per codomain coordinate.
    VectorValued(VectorValued),
}

impl Basis {
    /// Constant basis over `domain_range`.
    pub fn constant(domain_range: [f64; 2]) -> Result<Self> {
        Constant::new(domain_range).map(Basis::Constant)
    }

    /// Monomial basis `1, t, …, t^(n_basis - 1)`.
    pub fn monomial(domain_range: [f64; 2], n_basis: usize) -> Result<Self> {
        Monomial::new(domain_range, n_basis).map(Basis::Monomial)
    }

    /// Equispaced-knot B-spline basis.
    pub fn bspline(domain_range: [f64; 2], n_basis: usize, order: usize) -> Result<Self> {
        BSpline::new(domain_range, n_basis, order).map(Basis::BSpline)
    }

    /// Fourier basis with period equal to the domain length.
    pub fn fourier(domain_range: [f64; 2], n_basis: usize) -> Result<Self> {
        Fourier::new(domain_range, n_basis).map(Basis::Fourier)
    }

    /// Vector-valued basis from scalar children.
    pub fn vector_valued(basis_list: Vec<Basis>) -> Result<Self> {
        VectorValued::new(basis_list).map(Basis::VectorValued)
    }

    /// Number of basis functions.
    pub fn n_basis(&self) -> usize {
        match self {
            Basis::Constant(_) => 1,
            Basis::Monomial(b) => b.n_basis,
            Basis::BSpline(b) => b.n_basis(),
            Basis::Fourier(b) => b.n_basis,
            Basis::VectorValued(b) => b.n_basis(),
        }
    }

    /// Dimension of the domain.
    pub fn dim_domain(&self) -> usize {
        match self {
            Basis::VectorValued(b) => b.dim_domain(),
            _ => 1,
        }
    }

    /// Dimension of the codomain.
    pub fn dim_codomain(&self) -> usize {
        match self {
            Basis::VectorValued(b) => b.dim_codomain(),
            _ => 1,
        }
    }

    /// `[min, max]` per domain dimension.
    pub fn domain_range(&self) -> &[[f64; 2]] {
        match self {
            Basis::Constant(b) => std::slice::from_ref(&b.domain_range),
            Basis::Monomial(b) => std::slice::from_ref(&b.domain_range),
            Basis::BSpline(b) => std::slice::from_ref(&b.domain_range),
            Basis::Fourier(b) => std::slice::from_ref(&b.domain_range),
            Basis::VectorValued(b) => b.domain_range(),
        }
    }

    /// Evaluate every basis function at `points`.
    ///
    /// Returns one `n_basis x n_points` matrix per codomain coordinate.
    pub fn evaluate(&self, points: &[f64]) -> Result<Vec<FdMatrix>> {
        if points.iter().any(|t| !t.is_finite()) {
            return Err(FdaError::config("evaluation points must be finite"));
        }
        Ok(match self {
            Basis::Constant(b) => vec![b.evaluate(points)],
            Basis::Monomial(b) => vec![b.evaluate(points)],
            Basis::BSpline(b) => vec![b.evaluate(points)],
            Basis::Fourier(b) => vec![b.evaluate(points)],
            Basis::VectorValued(b) => b.evaluate(points)?,
        })
    }

    /// Differentiate the functions with coefficients `coefs` in this basis.
    ///
    /// Returns the basis the derivative lives in and its coefficients.
    /// Order 0 returns this basis and a copy of `coefs`.
    pub fn derivative_basis_and_coefs(
        &self,
        coefs: &FdMatrix,
        order: usize,
    ) -> Result<(Basis, FdMatrix)> {
        if coefs.ncols() != self.n_basis() {
            return Err(FdaError::DimensionMismatch {
                what: "coefficient columns",
                expected: self.n_basis(),
                found: coefs.ncols(),
            });
        }
        if order == 0 {
            return Ok((self.clone(), coefs.clone()));
        }
        match self {
            Basis::Constant(b) => Ok((self.clone(), b.derivative_coefs(coefs, order))),
            Basis::Monomial(b) => {
                let (basis, c) = b.derivative(coefs, order);
                Ok((Basis::Monomial(basis), c))
            }
            Basis::BSpline(b) => {
                let (basis, c) = b.derivative(coefs, order)?;
                Ok((Basis::BSpline(basis), c))
            }
            Basis::Fourier(b) => Ok((self.clone(), b.derivative_coefs(coefs, order))),
            Basis::VectorValued(b) => {
                let (basis, c) = b.derivative_basis_and_coefs(coefs, order)?;
                Ok((Basis::VectorValued(basis), c))
            }
        }
    }

    /// Matrix of L2 inner products between the basis functions.
    pub fn gram_matrix(&self) -> FdMatrix {
        match self {
            Basis::Constant(b) => b.gram_matrix(),
            Basis::Monomial(b) => b.gram_matrix(),
            Basis::BSpline(b) => b.gram_matrix(),
            Basis::Fourier(b) => b.gram_matrix(),
            Basis::VectorValued(b) => b.gram_matrix(),
        }
    }
}

impl Eq for Basis {}

impl Hash for Basis {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Basis::Constant(b) => b.hash(state),
            Basis::Monomial(b) => b.hash(state),
            Basis::BSpline(b) => b.hash(state),
            Basis::Fourier(b) => b.hash(state),
            Basis::VectorValued(b) => b.hash(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(b: &Basis) -> u64 {
        let mut h = DefaultHasher::new();
        b.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_dims_scalar() {
        let b = Basis::bspline([0.0, 1.0], 6, 4).unwrap();
        assert_eq!(b.n_basis(), 6);
        assert_eq!(b.dim_domain(), 1);
        assert_eq!(b.dim_codomain(), 1);
        assert_eq!(b.domain_range(), &[[0.0, 1.0]]);
    }

    #[test]
    fn test_equality_and_hash() {
        let a = Basis::monomial([0.0, 1.0], 3).unwrap();
        let b = Basis::monomial([0.0, 1.0], 3).unwrap();
        let c = Basis::monomial([0.0, 2.0], 3).unwrap();
        let d = Basis::fourier([0.0, 1.0], 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_evaluate_rejects_non_finite() {
        let b = Basis::constant([0.0, 1.0]).unwrap();
        assert!(b.evaluate(&[0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_derivative_checks_coefficients() {
        let b = Basis::monomial([0.0, 1.0], 3).unwrap();
        assert!(b
            .derivative_basis_and_coefs(&FdMatrix::zeros(1, 2), 1)
            .is_err());
        let coefs = FdMatrix::from_rows(&[vec![1.0, 1.0, 1.0]]).unwrap();
        let (same, c) = b.derivative_basis_and_coefs(&coefs, 0).unwrap();
        assert_eq!(same, b);
        assert_eq!(c, coefs);
    }
}
