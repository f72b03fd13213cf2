//! Scalar-valued bases over a one-dimensional domain.
//!
//! Each basis evaluates to an `n_basis x n_points` matrix, knows how to
//! differentiate a coefficient matrix expressed in it, and computes its Gram
//! matrix of L2 inner products over the domain range.

use crate::error::{FdaError, Result};
use crate::helpers::{gauss_legendre, gauss_legendre_on, linspace, NUMERICAL_EPS};
use crate::matrix::FdMatrix;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

fn validate_range(domain_range: [f64; 2]) -> Result<()> {
    if !(domain_range[0].is_finite() && domain_range[1].is_finite())
        || domain_range[1] <= domain_range[0]
    {
        return Err(FdaError::config(format!(
            "invalid domain range [{}, {}]",
            domain_range[0], domain_range[1]
        )));
    }
    Ok(())
}

/// Bit pattern used for hashing, with `-0.0` folded into `0.0` so that
/// values equal under `==` hash alike.
fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

pub(crate) fn hash_range<H: Hasher>(range: &[f64; 2], state: &mut H) {
    float_bits(range[0]).hash(state);
    float_bits(range[1]).hash(state);
}

/// Gram matrix `∫ φ_i φ_j` from values on quadrature points.
fn quadrature_gram(values: &FdMatrix, weights: &[f64]) -> FdMatrix {
    let n = values.nrows();
    let mut gram = FdMatrix::zeros(n, n);
    for i in 0..n {
        for j in i..n {
            let g: f64 = weights
                .iter()
                .enumerate()
                .map(|(q, w)| w * values[(i, q)] * values[(j, q)])
                .sum();
            gram[(i, j)] = g;
            gram[(j, i)] = g;
        }
    }
    gram
}

// =============================================================================
// Constant
// =============================================================================

/// The single constant function `1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constant {
    pub(crate) domain_range: [f64; 2],
}

impl Constant {
    /// Constant basis over `domain_range`.
    pub fn new(domain_range: [f64; 2]) -> Result<Self> {
        validate_range(domain_range)?;
        Ok(Self { domain_range })
    }

    pub(crate) fn evaluate(&self, points: &[f64]) -> FdMatrix {
        let mut out = FdMatrix::zeros(1, points.len());
        for j in 0..points.len() {
            out[(0, j)] = 1.0;
        }
        out
    }

    pub(crate) fn derivative_coefs(&self, coefs: &FdMatrix, order: usize) -> FdMatrix {
        if order == 0 {
            coefs.clone()
        } else {
            FdMatrix::zeros(coefs.nrows(), 1)
        }
    }

    pub(crate) fn gram_matrix(&self) -> FdMatrix {
        let mut gram = FdMatrix::zeros(1, 1);
        gram[(0, 0)] = self.domain_range[1] - self.domain_range[0];
        gram
    }
}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_range(&self.domain_range, state);
    }
}

// =============================================================================
// Monomial
// =============================================================================

/// Monomials `1, t, t², …, t^(n_basis - 1)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monomial {
    pub(crate) domain_range: [f64; 2],
    pub(crate) n_basis: usize,
}

impl Monomial {
    /// Monomial basis with `n_basis` functions over `domain_range`.
    pub fn new(domain_range: [f64; 2], n_basis: usize) -> Result<Self> {
        validate_range(domain_range)?;
        if n_basis == 0 {
            return Err(FdaError::config("a monomial basis needs at least one function"));
        }
        Ok(Self {
            domain_range,
            n_basis,
        })
    }

    pub(crate) fn evaluate(&self, points: &[f64]) -> FdMatrix {
        let mut out = FdMatrix::zeros(self.n_basis, points.len());
        for (j, &t) in points.iter().enumerate() {
            let mut power = 1.0;
            for k in 0..self.n_basis {
                out[(k, j)] = power;
                power *= t;
            }
        }
        out
    }

    /// `d/dt^order Σ c_k t^k = Σ c_{k+order} (k+order)!/k! t^k`.
    pub(crate) fn derivative(&self, coefs: &FdMatrix, order: usize) -> (Self, FdMatrix) {
        let n = self.n_basis;
        let new_n = n.saturating_sub(order).max(1);
        let basis = Self {
            domain_range: self.domain_range,
            n_basis: new_n,
        };

        let mut out = FdMatrix::zeros(coefs.nrows(), new_n);
        if order < n {
            for k in 0..new_n {
                let factor: f64 = ((k + 1)..=(k + order)).map(|v| v as f64).product();
                let src = coefs.column(k + order);
                let dst = out.column_mut(k);
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s * factor;
                }
            }
        }
        (basis, out)
    }

    pub(crate) fn gram_matrix(&self) -> FdMatrix {
        let [a, b] = self.domain_range;
        let n = self.n_basis;
        let mut gram = FdMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                let p = (i + j + 1) as i32;
                gram[(i, j)] = (b.powi(p) - a.powi(p)) / p as f64;
            }
        }
        gram
    }
}

impl Hash for Monomial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_range(&self.domain_range, state);
        self.n_basis.hash(state);
    }
}

// =============================================================================
// B-spline
// =============================================================================

/// Clamped B-splines of a given order (degree `order - 1`).
///
/// `knots` are the distinct break points including both ends of the domain;
/// the end knots are repeated `order` times internally, so the basis has
/// `knots.len() + order - 2` functions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSpline {
    pub(crate) domain_range: [f64; 2],
    pub(crate) order: usize,
    pub(crate) knots: Vec<f64>,
}

impl BSpline {
    /// `n_basis` B-splines of the given order with equispaced knots.
    pub fn new(domain_range: [f64; 2], n_basis: usize, order: usize) -> Result<Self> {
        validate_range(domain_range)?;
        if order == 0 {
            return Err(FdaError::config("B-spline order must be at least 1"));
        }
        if n_basis < order {
            return Err(FdaError::config(format!(
                "a B-spline basis of order {} needs at least {} functions, got {}",
                order, order, n_basis
            )));
        }
        let n_knots = n_basis - order + 2;
        Self::with_knots(
            linspace(domain_range[0], domain_range[1], n_knots),
            order,
        )
    }

    /// B-splines over explicit break points (first and last define the domain).
    pub fn with_knots(knots: Vec<f64>, order: usize) -> Result<Self> {
        if order == 0 {
            return Err(FdaError::config("B-spline order must be at least 1"));
        }
        if knots.len() < 2 {
            return Err(FdaError::config("a B-spline basis needs at least two knots"));
        }
        if knots.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FdaError::config("B-spline knots must be strictly increasing"));
        }
        let domain_range = [knots[0], knots[knots.len() - 1]];
        validate_range(domain_range)?;
        Ok(Self {
            domain_range,
            order,
            knots,
        })
    }

    /// Number of basis functions.
    pub fn n_basis(&self) -> usize {
        self.knots.len() + self.order - 2
    }

    /// Spline order (degree + 1).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Distinct knots including the domain end points.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Knot vector with the end knots repeated `order` times.
    fn full_knots(&self) -> Vec<f64> {
        let first = self.knots[0];
        let last = self.knots[self.knots.len() - 1];
        let mut full = Vec::with_capacity(self.knots.len() + 2 * (self.order - 1));
        full.extend(std::iter::repeat(first).take(self.order - 1));
        full.extend_from_slice(&self.knots);
        full.extend(std::iter::repeat(last).take(self.order - 1));
        full
    }

    pub(crate) fn evaluate(&self, points: &[f64]) -> FdMatrix {
        let knots = self.full_knots();
        let nbasis = self.n_basis();
        let end = self.domain_range[1];
        // Last interval with positive length; closed on the right so the
        // domain end point is covered.
        let last_interval = knots
            .windows(2)
            .rposition(|w| w[1] - w[0] > 0.0)
            .unwrap_or(0);

        let mut out = FdMatrix::zeros(nbasis, points.len());
        for (ti, &t) in points.iter().enumerate() {
            let mut b = vec![0.0; knots.len() - 1];
            for j in 0..(knots.len() - 1) {
                let inside = if j == last_interval {
                    t >= knots[j] && t <= end
                } else {
                    t >= knots[j] && t < knots[j + 1]
                };
                if inside {
                    b[j] = 1.0;
                    break;
                }
            }

            for k in 2..=self.order {
                let mut next = vec![0.0; knots.len() - k];
                for j in 0..(knots.len() - k) {
                    let d1 = knots[j + k - 1] - knots[j];
                    let d2 = knots[j + k] - knots[j + 1];
                    let left = if d1.abs() > NUMERICAL_EPS {
                        (t - knots[j]) / d1 * b[j]
                    } else {
                        0.0
                    };
                    let right = if d2.abs() > NUMERICAL_EPS {
                        (knots[j + k] - t) / d2 * b[j + 1]
                    } else {
                        0.0
                    };
                    next[j] = left + right;
                }
                b = next;
            }

            for j in 0..nbasis {
                out[(j, ti)] = b[j];
            }
        }
        out
    }

    /// One derivative step lowers the order by one:
    /// `c'_i = (k - 1)(c_{i+1} - c_i) / (t_{i+k} - t_{i+1})`.
    pub(crate) fn derivative(&self, coefs: &FdMatrix, order: usize) -> Result<(Self, FdMatrix)> {
        if order >= self.order {
            return Err(FdaError::config(format!(
                "cannot take derivative of order {} of a B-spline basis of order {}",
                order, self.order
            )));
        }

        let mut basis = self.clone();
        let mut current = coefs.clone();
        for _ in 0..order {
            let knots = basis.full_knots();
            let k = basis.order;
            let n = basis.n_basis();
            let mut next = FdMatrix::zeros(current.nrows(), n - 1);
            for i in 0..(n - 1) {
                let span = knots[i + k] - knots[i + 1];
                if span.abs() <= NUMERICAL_EPS {
                    continue;
                }
                let scale = (k - 1) as f64 / span;
                for s in 0..current.nrows() {
                    next[(s, i)] = scale * (current[(s, i + 1)] - current[(s, i)]);
                }
            }
            basis = Self {
                domain_range: basis.domain_range,
                order: k - 1,
                knots: basis.knots,
            };
            current = next;
        }
        Ok((basis, current))
    }

    /// Gram matrix by 5-point Gauss-Legendre quadrature on every knot span.
    ///
    /// Products of order-`k` pieces have degree `2k - 2`, so the result is
    /// exact up to order 5. Higher orders are approximate; their spans are
    /// subdivided into `order` pieces to keep the error small.
    pub(crate) fn gram_matrix(&self) -> FdMatrix {
        let pieces = if self.order <= 5 { 1 } else { self.order };
        let mut breaks = Vec::with_capacity(pieces * self.knots.len() + 1);
        for w in self.knots.windows(2) {
            for p in 0..pieces {
                breaks.push(w[0] + (w[1] - w[0]) * p as f64 / pieces as f64);
            }
        }
        breaks.push(self.domain_range[1]);
        let (points, weights) = gauss_legendre_on(&breaks);
        quadrature_gram(&self.evaluate(&points), &weights)
    }
}

impl Hash for BSpline {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_range(&self.domain_range, state);
        self.order.hash(state);
        for k in &self.knots {
            float_bits(*k).hash(state);
        }
    }
}

// =============================================================================
// Fourier
// =============================================================================

/// Orthonormal Fourier basis: `1/√T`, `√(2/T)·sin(kω(t-a))`, `√(2/T)·cos(kω(t-a))`.
///
/// `n_basis` is always odd (a constant plus sine/cosine pairs).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fourier {
    pub(crate) domain_range: [f64; 2],
    pub(crate) n_basis: usize,
    pub(crate) period: f64,
}

impl Fourier {
    /// Fourier basis whose period is the length of the domain.
    pub fn new(domain_range: [f64; 2], n_basis: usize) -> Result<Self> {
        Self::with_period(domain_range, n_basis, domain_range[1] - domain_range[0])
    }

    /// Fourier basis with an explicit period. Even `n_basis` is rounded up.
    pub fn with_period(domain_range: [f64; 2], n_basis: usize, period: f64) -> Result<Self> {
        validate_range(domain_range)?;
        if n_basis == 0 {
            return Err(FdaError::config("a Fourier basis needs at least one function"));
        }
        if !(period.is_finite() && period > 0.0) {
            return Err(FdaError::config(format!("invalid Fourier period {}", period)));
        }
        let n_basis = if n_basis % 2 == 0 { n_basis + 1 } else { n_basis };
        Ok(Self {
            domain_range,
            n_basis,
            period,
        })
    }

    /// Period of the sine/cosine functions.
    pub fn period(&self) -> f64 {
        self.period
    }

    fn omega(&self) -> f64 {
        2.0 * PI / self.period
    }

    pub(crate) fn evaluate(&self, points: &[f64]) -> FdMatrix {
        let a = self.domain_range[0];
        let omega = self.omega();
        let c0 = 1.0 / self.period.sqrt();
        let c = (2.0 / self.period).sqrt();

        let mut out = FdMatrix::zeros(self.n_basis, points.len());
        for (j, &t) in points.iter().enumerate() {
            out[(0, j)] = c0;
            for freq in 1..=(self.n_basis / 2) {
                let x = freq as f64 * omega * (t - a);
                out[(2 * freq - 1, j)] = c * x.sin();
                out[(2 * freq, j)] = c * x.cos();
            }
        }
        out
    }

    /// Derivatives map each sine/cosine pair onto itself:
    /// `(s, c) -> (-kω c, kω s)`.
    pub(crate) fn derivative_coefs(&self, coefs: &FdMatrix, order: usize) -> FdMatrix {
        if order == 0 {
            return coefs.clone();
        }
        let omega = self.omega();
        let mut out = FdMatrix::zeros(coefs.nrows(), self.n_basis);
        for freq in 1..=(self.n_basis / 2) {
            let kw = freq as f64 * omega;
            for s in 0..coefs.nrows() {
                let (mut sin_c, mut cos_c) = (coefs[(s, 2 * freq - 1)], coefs[(s, 2 * freq)]);
                for _ in 0..order {
                    let next_sin = -kw * cos_c;
                    cos_c = kw * sin_c;
                    sin_c = next_sin;
                }
                out[(s, 2 * freq - 1)] = sin_c;
                out[(s, 2 * freq)] = cos_c;
            }
        }
        out
    }

    pub(crate) fn gram_matrix(&self) -> FdMatrix {
        let [a, b] = self.domain_range;
        if ((b - a) - self.period).abs() <= NUMERICAL_EPS * self.period.max(1.0) {
            return FdMatrix::identity(self.n_basis);
        }
        let (points, weights) = gauss_legendre(a, b, 20 * self.n_basis);
        quadrature_gram(&self.evaluate(&points), &weights)
    }
}

impl Hash for Fourier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_range(&self.domain_range, state);
        self.n_basis.hash(state);
        float_bits(self.period).hash(state);
    }
}
