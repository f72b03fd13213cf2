//! Error types for functional data operations.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! distinguishes configuration problems from lifecycle violations (using an
//! estimator before fitting it) so callers can match on them.

/// Errors raised by representations, estimators and plots.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FdaError {
    /// The inputs describe an invalid combination of domains, codomains,
    /// bases or parameters.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A caller-provided array does not have the expected length or shape.
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being checked
        what: &'static str,
        /// Expected size
        expected: usize,
        /// Actual size
        found: usize,
    },

    /// An estimator was used before `fit` was called.
    #[error(
        "This {estimator} instance is not fitted yet. Call 'fit' with appropriate arguments before using this estimator"
    )]
    NotFitted {
        /// Name of the estimator type
        estimator: &'static str,
    },

    /// A coordinate selection is empty, out of range or not a contiguous
    /// run of whole coordinates.
    #[error("Invalid coordinate selection: {0}")]
    InvalidCoordinate(String),

    /// The plotting backend failed to draw the figure.
    #[error("Failed to render figure: {0}")]
    Render(String),
}

impl FdaError {
    /// Shorthand for [`FdaError::Configuration`].
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        FdaError::Configuration(msg.into())
    }
}

/// Result type for functional data operations
pub type Result<T> = std::result::Result<T, FdaError>;
