//! # fdakit
//!
//! Functional Data Analysis components in Rust.
//!
//! This crate works on samples of functions (curves, surfaces) rather than
//! finite-dimensional vectors. It provides:
//! - Grid representations (`FDataGrid`) with mean, geometric mean, derivatives
//! - Basis representations (constant, monomial, B-spline, Fourier) and the
//!   vector-valued composition of scalar bases (`VectorValued`)
//! - Depth measures (band, modified band, Fraiman-Muniz, random projection)
//! - The generalized depth-versus-depth feature transformer (`DdgTransformer`)
//! - Kernel smoothers (Nadaraya-Watson, local linear, k-nearest neighbours)
//! - Parametric plots of two coordinate functions, rendered to SVG
//!
//! ## Data Layout
//!
//! Functional data is stored in column-major matrices ([`FdMatrix`]):
//! - For n observations with m evaluation points: `data[i + j * n]` gives observation i at point j
//! - Vector-valued data keeps one such matrix per codomain coordinate
//! - Basis coefficients are `n_samples x n_basis` matrices whose columns are
//!   partitioned contiguously per child basis of a `VectorValued` basis

#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

pub mod parallel;

pub mod basis;
pub mod ddg;
pub mod depth;
pub mod error;
pub mod estimator;
pub mod fdata;
pub mod grid;
pub mod helpers;
pub mod matrix;
pub mod smoothing;
pub mod visualization;

pub use basis::{Basis, BasisPartition, CoordinateKey, FDataBasis, VectorValued};
pub use ddg::{fit_distributions, ClassDepthDistribution, DdgTransformer};
pub use depth::DepthMethod;
pub use error::{FdaError, Result};
pub use estimator::{check_is_fitted, Estimator, Transformer};
pub use fdata::FData;
pub use grid::FDataGrid;
pub use helpers::{linspace, NUMERICAL_EPS};
pub use matrix::FdMatrix;
pub use smoothing::{Kernel, KernelSmoother};
pub use visualization::{render_svg, ChartTarget, Figure, LineStyle, ParametricPlot};
