//! Column-major matrix type shared by every representation.
//!
//! [`FdMatrix`] stores an `nrows x ncols` matrix in a flat `Vec<f64>` with
//! Fortran layout: element `(row, col)` lives at `row + col * nrows`. Columns
//! are contiguous, so whole-column operations (stacking coefficient blocks,
//! masking basis columns, per-point statistics) are cheap slices.
//!
//! # Examples
//!
//! ```
//! use fdakit::matrix::FdMatrix;
//!
//! // 2 observations, 3 evaluation points
//! let mat = FdMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
//! assert_eq!(mat[(1, 2)], 6.0);
//! assert_eq!(mat.column(0), &[1.0, 4.0]);
//! ```

use crate::error::{FdaError, Result};
use nalgebra::DMatrix;

/// Column-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FdMatrix {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl FdMatrix {
    /// Create from flat column-major data.
    pub fn from_column_major(data: Vec<f64>, nrows: usize, ncols: usize) -> Result<Self> {
        if data.len() != nrows * ncols {
            return Err(FdaError::DimensionMismatch {
                what: "column-major matrix data",
                expected: nrows * ncols,
                found: data.len(),
            });
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Create from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut mat = Self::zeros(nrows, ncols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(FdaError::DimensionMismatch {
                    what: "matrix row",
                    expected: ncols,
                    found: row.len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                mat[(i, j)] = v;
            }
        }
        Ok(mat)
    }

    /// Create a zero-filled matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![0.0; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create an identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut mat = Self::zeros(n, n);
        for i in 0..n {
            mat[(i, i)] = 1.0;
        }
        mat
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Dimensions as `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Whether the matrix holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Contiguous column slice.
    ///
    /// # Panics
    /// Panics if `col >= ncols`.
    #[inline]
    pub fn column(&self, col: usize) -> &[f64] {
        let start = col * self.nrows;
        &self.data[start..start + self.nrows]
    }

    /// Mutable contiguous column slice.
    ///
    /// # Panics
    /// Panics if `col >= ncols`.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [f64] {
        let start = col * self.nrows;
        &mut self.data[start..start + self.nrows]
    }

    /// Copy of a single row (rows are strided in column-major layout).
    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.ncols)
            .map(|j| self.data[row + j * self.nrows])
            .collect()
    }

    /// Flat column-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy into a nalgebra matrix (same layout, plain memcpy).
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(self.nrows, self.ncols, &self.data)
    }

    /// Copy out of a nalgebra matrix.
    pub fn from_dmatrix(mat: &DMatrix<f64>) -> Self {
        let (nrows, ncols) = mat.shape();
        Self {
            data: mat.as_slice().to_vec(),
            nrows,
            ncols,
        }
    }

    /// Concatenate matrices horizontally (column blocks in order).
    ///
    /// All blocks must have the same number of rows. An empty list yields
    /// a `0 x 0` matrix.
    pub fn hstack(blocks: &[FdMatrix]) -> Result<Self> {
        let nrows = blocks.first().map_or(0, FdMatrix::nrows);
        let mut data = Vec::with_capacity(blocks.iter().map(FdMatrix::len).sum());
        let mut ncols = 0;
        for block in blocks {
            if block.nrows != nrows {
                return Err(FdaError::DimensionMismatch {
                    what: "hstack rows",
                    expected: nrows,
                    found: block.nrows,
                });
            }
            // Column-major: appending whole blocks appends their columns.
            data.extend_from_slice(&block.data);
            ncols += block.ncols;
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Concatenate matrices vertically (row blocks in order).
    pub fn vstack(blocks: &[FdMatrix]) -> Result<Self> {
        let ncols = blocks.first().map_or(0, FdMatrix::ncols);
        if let Some(bad) = blocks.iter().find(|b| b.ncols != ncols) {
            return Err(FdaError::DimensionMismatch {
                what: "vstack columns",
                expected: ncols,
                found: bad.ncols,
            });
        }
        let nrows = blocks.iter().map(FdMatrix::nrows).sum();
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for block in blocks {
                data.extend_from_slice(block.column(j));
            }
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Copy of the columns `start..end`.
    ///
    /// # Panics
    /// Panics if the range exceeds `ncols`.
    pub fn columns_range(&self, start: usize, end: usize) -> Self {
        Self {
            data: self.data[start * self.nrows..end * self.nrows].to_vec(),
            nrows: self.nrows,
            ncols: end - start,
        }
    }

    /// Keep only the columns whose mask entry is `true`.
    pub fn select_columns(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.ncols {
            return Err(FdaError::DimensionMismatch {
                what: "column mask",
                expected: self.ncols,
                found: mask.len(),
            });
        }
        let mut data = Vec::new();
        let mut ncols = 0;
        for (j, &keep) in mask.iter().enumerate() {
            if keep {
                data.extend_from_slice(self.column(j));
                ncols += 1;
            }
        }
        Ok(Self {
            data,
            nrows: self.nrows,
            ncols,
        })
    }

    /// Copy of the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut out = Self::zeros(rows.len(), self.ncols);
        for j in 0..self.ncols {
            let src = self.column(j);
            let dst = out.column_mut(j);
            for (k, &i) in rows.iter().enumerate() {
                dst[k] = src[i];
            }
        }
        out
    }

    /// Block-diagonal matrix with `blocks` on the diagonal and exact zeros elsewhere.
    pub fn block_diag(blocks: &[FdMatrix]) -> Self {
        let nrows = blocks.iter().map(FdMatrix::nrows).sum();
        let ncols = blocks.iter().map(FdMatrix::ncols).sum();
        let mut out = Self::zeros(nrows, ncols);
        let (mut r0, mut c0) = (0, 0);
        for block in blocks {
            for j in 0..block.ncols {
                for i in 0..block.nrows {
                    out[(r0 + i, c0 + j)] = block[(i, j)];
                }
            }
            r0 += block.nrows;
            c0 += block.ncols;
        }
        out
    }

    /// Matrix product `self * rhs`.
    pub fn matmul(&self, rhs: &FdMatrix) -> Result<Self> {
        if self.ncols != rhs.nrows {
            return Err(FdaError::DimensionMismatch {
                what: "matrix product inner dimension",
                expected: self.ncols,
                found: rhs.nrows,
            });
        }
        Ok(Self::from_dmatrix(&(self.to_dmatrix() * rhs.to_dmatrix())))
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.ncols, self.nrows);
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                out[(j, i)] = self[(i, j)];
            }
        }
        out
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }
}

impl std::ops::Index<(usize, usize)> for FdMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "FdMatrix index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &self.data[row + col * self.nrows]
    }
}

impl std::ops::IndexMut<(usize, usize)> for FdMatrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "FdMatrix index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &mut self.data[row + col * self.nrows]
    }
}

impl std::fmt::Display for FdMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FdMatrix({}x{})", self.nrows, self.ncols)
    }
}
