//! Vector-valued bases built from scalar bases.
//!
//! For each coordinate of the codomain a scalar basis is used, multiplying
//! each of its functions by the unit vector of that coordinate. A basis over
//! `[0, 5]` made of `Monomial(3)` and `Monomial(2)` contains
//!
//! ```text
//! 1·i, t·i, t²·i, 1·j, t·j
//! ```
//!
//! Coefficient matrices of such a basis are partitioned into contiguous
//! column blocks, one per child in child order; [`BasisPartition`] holds that
//! layout so every operation reads the same offsets.

use super::scalar::hash_range;
use super::{Basis, FDataBasis};
use crate::error::{FdaError, Result};
use crate::fdata::{same_domain, FData};
use crate::matrix::FdMatrix;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// Contiguous column blocks of a coefficient matrix, one per child basis.
///
/// Block `i` covers columns `offsets[i]..offsets[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasisPartition {
    offsets: Vec<usize>,
}

impl BasisPartition {
    /// Build from the sizes of consecutive blocks.
    pub fn from_sizes(sizes: impl IntoIterator<Item = usize>) -> Self {
        let mut offsets = vec![0];
        let mut total = 0;
        for size in sizes {
            total += size;
            offsets.push(total);
        }
        Self { offsets }
    }

    /// Number of blocks.
    pub fn n_blocks(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of columns covered.
    pub fn total(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    /// Cumulative offsets, starting at 0 and ending at [`total`](Self::total).
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Columns owned by block `i`.
    pub fn block(&self, i: usize) -> Range<usize> {
        self.offsets[i]..self.offsets[i + 1]
    }

    /// Columns owned by the consecutive blocks in `blocks`.
    pub fn span(&self, blocks: Range<usize>) -> Range<usize> {
        self.offsets[blocks.start]..self.offsets[blocks.end]
    }

    /// Split a coefficient matrix into one column block per child.
    pub fn split_columns(&self, coefs: &FdMatrix) -> Result<Vec<FdMatrix>> {
        if coefs.ncols() != self.total() {
            return Err(FdaError::DimensionMismatch {
                what: "coefficient columns",
                expected: self.total(),
                found: coefs.ncols(),
            });
        }
        Ok((0..self.n_blocks())
            .map(|i| {
                let cols = self.block(i);
                coefs.columns_range(cols.start, cols.end)
            })
            .collect())
    }

    /// Mask over all columns, `true` exactly for the columns of `blocks`.
    pub fn column_mask(&self, blocks: Range<usize>) -> Vec<bool> {
        let cols = self.span(blocks);
        (0..self.total()).map(|j| cols.contains(&j)).collect()
    }
}

/// Selection of codomain coordinates.
///
/// An index selects one coordinate and yields a scalar result; a range
/// selects a contiguous run of coordinates and stays vector-valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateKey {
    /// A single coordinate.
    Index(usize),
    /// A contiguous run of coordinates.
    Range(Range<usize>),
}

impl CoordinateKey {
    /// The coordinates covered, as a range.
    pub fn as_range(&self) -> Range<usize> {
        match self {
            CoordinateKey::Index(i) => *i..*i + 1,
            CoordinateKey::Range(r) => r.clone(),
        }
    }

    /// Check the selection against a codomain of dimension `dim_codomain`.
    pub(crate) fn validate(&self, dim_codomain: usize) -> Result<Range<usize>> {
        let range = self.as_range();
        if range.start >= range.end {
            return Err(FdaError::InvalidCoordinate(format!(
                "empty selection {:?}",
                range
            )));
        }
        if range.end > dim_codomain {
            return Err(FdaError::InvalidCoordinate(format!(
                "selection {:?} out of range for codomain of dimension {}",
                range, dim_codomain
            )));
        }
        Ok(range)
    }
}

impl From<usize> for CoordinateKey {
    fn from(i: usize) -> Self {
        CoordinateKey::Index(i)
    }
}

impl From<Range<usize>> for CoordinateKey {
    fn from(r: Range<usize>) -> Self {
        CoordinateKey::Range(r)
    }
}

/// Vector-valued basis: one scalar basis per codomain coordinate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VectorValued {
    basis_list: Vec<Basis>,
    domain_range: Vec<[f64; 2]>,
    partition: BasisPartition,
}

impl VectorValued {
    /// Compose scalar bases.
    ///
    /// Every child must be scalar-valued, and all must share the domain
    /// dimension and range.
    pub fn new(basis_list: Vec<Basis>) -> Result<Self> {
        let first = basis_list
            .first()
            .ok_or_else(|| FdaError::config("a vector-valued basis needs at least one basis"))?;

        if basis_list.iter().any(|b| b.dim_codomain() != 1) {
            return Err(FdaError::config("The basis functions must be scalar valued"));
        }
        if basis_list.iter().any(|b| {
            b.dim_domain() != first.dim_domain() || !same_domain(b.domain_range(), first.domain_range())
        }) {
            return Err(FdaError::config(
                "The basis must all have the same domain dimension and range",
            ));
        }

        let domain_range = first.domain_range().to_vec();
        let partition = BasisPartition::from_sizes(basis_list.iter().map(Basis::n_basis));
        log::trace!(
            "vector-valued basis with block offsets {:?}",
            partition.offsets()
        );

        Ok(Self {
            basis_list,
            domain_range,
            partition,
        })
    }

    /// Child bases, in coordinate order.
    pub fn basis_list(&self) -> &[Basis] {
        &self.basis_list
    }

    /// Column layout of coefficient matrices in this basis.
    pub fn partition(&self) -> &BasisPartition {
        &self.partition
    }

    /// Sum of the children's basis counts.
    pub fn n_basis(&self) -> usize {
        self.partition.total()
    }

    /// Domain dimension of the children.
    pub fn dim_domain(&self) -> usize {
        self.basis_list[0].dim_domain()
    }

    /// One coordinate per child.
    pub fn dim_codomain(&self) -> usize {
        self.basis_list.len()
    }

    /// Domain range shared by all children.
    pub fn domain_range(&self) -> &[[f64; 2]] {
        &self.domain_range
    }

    /// Evaluate at `points`: one `n_basis x n_points` matrix per coordinate.
    ///
    /// Child `i` fills its own row block in coordinate `i`; everything else
    /// is zero.
    pub fn evaluate(&self, points: &[f64]) -> Result<Vec<FdMatrix>> {
        let n_points = points.len();
        let mut out = vec![FdMatrix::zeros(self.n_basis(), n_points); self.dim_codomain()];

        for (i, child) in self.basis_list.iter().enumerate() {
            let ev = child.evaluate(points)?;
            let rows = self.partition.block(i);
            for j in 0..n_points {
                for (k, row) in rows.clone().enumerate() {
                    out[i][(row, j)] = ev[0][(k, j)];
                }
            }
        }
        Ok(out)
    }

    /// Differentiate each child's coefficient block independently and
    /// reassemble them in the same order.
    pub fn derivative_basis_and_coefs(
        &self,
        coefs: &FdMatrix,
        order: usize,
    ) -> Result<(VectorValued, FdMatrix)> {
        let blocks = self.partition.split_columns(coefs)?;

        let mut new_basis_list = Vec::with_capacity(self.basis_list.len());
        let mut new_blocks = Vec::with_capacity(blocks.len());
        for (child, block) in self.basis_list.iter().zip(&blocks) {
            let (b, c) = child.derivative_basis_and_coefs(block, order)?;
            new_basis_list.push(b);
            new_blocks.push(c);
        }

        Ok((
            VectorValued::new(new_basis_list)?,
            FdMatrix::hstack(&new_blocks)?,
        ))
    }

    /// Block-diagonal matrix of the children's Gram matrices.
    ///
    /// Functions pointing along different unit vectors are orthogonal, so
    /// the off-diagonal blocks are exactly zero.
    pub fn gram_matrix(&self) -> FdMatrix {
        let grams: Vec<FdMatrix> = self.basis_list.iter().map(Basis::gram_matrix).collect();
        FdMatrix::block_diag(&grams)
    }

    /// Select some coordinates of `fdatabasis`, which must be expressed in
    /// this basis.
    ///
    /// Coefficient columns of the selected children are kept, as are their
    /// coordinate names; every other attribute is copied unchanged. An
    /// index key yields the child basis itself; a range key yields a new
    /// vector-valued basis of the selected children.
    pub fn coordinate_nonfull(
        &self,
        fdatabasis: &FDataBasis,
        key: &CoordinateKey,
    ) -> Result<FDataBasis> {
        let range = key.validate(self.dim_codomain())?;
        let mask = self.partition.column_mask(range.clone());

        let basis = match key {
            CoordinateKey::Index(i) => self.basis_list[*i].clone(),
            CoordinateKey::Range(_) => {
                Basis::VectorValued(VectorValued::new(self.basis_list[range.clone()].to_vec())?)
            }
        };
        let coefficients = fdatabasis.coefficients().select_columns(&mask)?;
        let coordinate_names = fdatabasis.coordinate_names()[range].to_vec();

        Ok(fdatabasis.with_representation(basis, coefficients, coordinate_names))
    }
}

impl Hash for VectorValued {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for range in &self.domain_range {
            hash_range(range, state);
        }
        self.partition.total().hash(state);
        self.basis_list.hash(state);
    }
}
