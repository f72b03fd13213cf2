//! Optional rayon parallelism.
//!
//! Per-sample loops (depths, smoothing, grid statistics) are written once
//! against these macros. With the `parallel` feature they run on the rayon
//! thread pool; without it (e.g. on WASM) they fall back to plain iterators
//! with the same adapter chain.
//!
//! ```ignore
//! use crate::iter_maybe_parallel;
//!
//! let depths: Vec<f64> = iter_maybe_parallel!(0..n_samples)
//!     .map(|i| depth_of(i))
//!     .collect();
//! ```

/// Iterate an owned collection or range, in parallel when available.
#[macro_export]
macro_rules! iter_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::IntoParallelIterator;

            IntoParallelIterator::into_par_iter($expr)
        }
        #[cfg(not(feature = "parallel"))]
        {
            IntoIterator::into_iter($expr)
        }
    }};
}

/// Iterate a slice by reference, in parallel when available.
#[macro_export]
macro_rules! slice_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::IntoParallelRefIterator;

            $expr.par_iter()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $expr.iter()
        }
    }};
}

pub use iter_maybe_parallel;
pub use slice_maybe_parallel;

#[cfg(test)]
mod tests {
    #[cfg(feature = "parallel")]
    use rayon::iter::ParallelIterator;

    #[test]
    fn test_range_iteration_preserves_order() {
        let squares: Vec<usize> = iter_maybe_parallel!(0..8usize).map(|i| i * i).collect();
        assert_eq!(squares, vec![0, 1, 4, 9, 16, 25, 36, 49]);
    }

    #[test]
    fn test_slice_iteration() {
        let values = vec![1.0, 2.0, 3.0];
        let doubled: Vec<f64> = slice_maybe_parallel!(values).map(|v| v * 2.0).collect();
        assert_eq!(doubled, vec![2.0, 4.0, 6.0]);
    }
}
