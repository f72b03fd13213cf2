//! Metadata shared by every functional data representation.

/// A sample of functions sharing a domain and a codomain.
///
/// Implemented by the discretized ([`FDataGrid`](crate::grid::FDataGrid)) and
/// basis ([`FDataBasis`](crate::basis::FDataBasis)) representations.
pub trait FData {
    /// Number of functions in the sample.
    fn n_samples(&self) -> usize;

    /// Dimension of the functions' input space.
    fn dim_domain(&self) -> usize;

    /// Dimension of the functions' output space.
    fn dim_codomain(&self) -> usize;

    /// `[min, max]` for each domain dimension.
    fn domain_range(&self) -> &[[f64; 2]];

    /// Optional name of the whole dataset.
    fn dataset_name(&self) -> Option<&str>;

    /// One optional name per codomain coordinate.
    fn coordinate_names(&self) -> &[Option<String>];

    /// One optional name per sample.
    fn sample_names(&self) -> &[Option<String>];
}

/// Check that two domain ranges describe the same domain.
pub(crate) fn same_domain(a: &[[f64; 2]], b: &[[f64; 2]]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(ra, rb)| {
            crate::helpers::approx_eq(ra[0], rb[0], 1e-12)
                && crate::helpers::approx_eq(ra[1], rb[1], 1e-12)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_domain() {
        assert!(same_domain(&[[0.0, 1.0]], &[[0.0, 1.0]]));
        assert!(!same_domain(&[[0.0, 1.0]], &[[0.0, 2.0]]));
        assert!(!same_domain(&[[0.0, 1.0]], &[[0.0, 1.0], [0.0, 1.0]]));
    }
}
