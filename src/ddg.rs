//! Generalized depth-versus-depth (DD^G) feature extraction.
//!
//! [`DdgTransformer`] maps every function to the vector of its depths with
//! respect to each training class, for each of a list of depth methods:
//!
//! ```text
//! x -> (D_1^1(x), D_1^2(x), ..., D_k^g(x))
//! ```
//!
//! where `D_j^i(x)` is the depth of `x` in class `i` under depth method `j`.
//! The resulting finite-dimensional features can be fed to any multivariate
//! classifier (Cuesta-Albertos, Febrero-Bande and Oviedo de la Fuente, 2017,
//! "The DDG-classifier in the functional setting").

use crate::depth::DepthMethod;
use crate::error::{FdaError, Result};
use crate::estimator::{check_is_fitted, Estimator, Transformer};
use crate::fdata::FData;
use crate::grid::FDataGrid;
use crate::matrix::FdMatrix;

/// Depth of new samples with respect to the training samples of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDepthDistribution {
    method: DepthMethod,
    reference: FDataGrid,
}

impl ClassDepthDistribution {
    /// Use `reference` (the samples of one class) as the depth reference.
    pub fn fit(method: DepthMethod, reference: FDataGrid) -> Self {
        Self { method, reference }
    }

    /// Depth method used for scoring.
    pub fn method(&self) -> &DepthMethod {
        &self.method
    }

    /// Number of reference samples.
    pub fn n_reference(&self) -> usize {
        self.reference.n_samples()
    }

    /// Depth of every sample of `x` in the reference class.
    pub fn predict(&self, x: &FDataGrid) -> Result<Vec<f64>> {
        self.method.depth(x, &self.reference)
    }
}

/// Sorted unique labels and, for each label, the indices of its samples.
fn group_by_class<L: Ord + Clone>(y: &[L]) -> (Vec<L>, Vec<Vec<usize>>) {
    let mut classes: Vec<L> = y.to_vec();
    classes.sort();
    classes.dedup();

    let mut members = vec![Vec::new(); classes.len()];
    for (i, label) in y.iter().enumerate() {
        if let Ok(c) = classes.binary_search(label) {
            members[c].push(i);
        }
    }
    (classes, members)
}

/// Fit one depth distribution per (depth method, class).
///
/// Returns the sorted class labels and the distributions ordered by method
/// first and class second.
///
/// # Arguments
/// * `x` - Training samples
/// * `y` - One label per training sample
/// * `methods` - Depth methods to fit
pub fn fit_distributions<L: Ord + Clone>(
    x: &FDataGrid,
    y: &[L],
    methods: &[DepthMethod],
) -> Result<(Vec<L>, Vec<ClassDepthDistribution>)> {
    if y.len() != x.n_samples() {
        return Err(FdaError::DimensionMismatch {
            what: "labels",
            expected: x.n_samples(),
            found: y.len(),
        });
    }
    if y.is_empty() {
        return Err(FdaError::config("cannot fit on an empty sample"));
    }

    let (classes, members) = group_by_class(y);
    let class_samples: Vec<FDataGrid> = members.iter().map(|idx| x.select_samples(idx)).collect();

    let distributions = methods
        .iter()
        .flat_map(|method| {
            class_samples
                .iter()
                .map(move |samples| ClassDepthDistribution::fit(method.clone(), samples.clone()))
        })
        .collect();

    Ok((classes, distributions))
}

/// Generalized depth-versus-depth transformer.
///
/// # Example
///
/// ```
/// use fdakit::{DdgTransformer, DepthMethod, FDataGrid, Transformer};
///
/// let x = FDataGrid::from_samples(&[
///     vec![0.0, 0.1, 0.0],
///     vec![0.1, 0.2, 0.1],
///     vec![0.2, 0.1, 0.2],
///     vec![5.0, 5.1, 5.0],
///     vec![5.1, 5.2, 5.1],
///     vec![5.2, 5.1, 5.2],
/// ])
/// .unwrap();
/// let y = [0, 0, 0, 1, 1, 1];
///
/// let mut ddg = DdgTransformer::new(DepthMethod::ModifiedBand);
/// let features = ddg.fit_transform(&x, &y[..]).unwrap();
/// assert_eq!(features.shape(), (6, 2));
/// ```
#[derive(Debug, Clone)]
pub struct DdgTransformer<L> {
    depth_methods: Vec<DepthMethod>,
    classes: Option<Vec<L>>,
    distributions: Option<Vec<ClassDepthDistribution>>,
}

impl<L: Ord + Clone> Default for DdgTransformer<L> {
    fn default() -> Self {
        Self::new(DepthMethod::default())
    }
}

impl<L: Ord + Clone> DdgTransformer<L> {
    /// Transformer using a single depth method.
    pub fn new(depth_method: DepthMethod) -> Self {
        Self {
            depth_methods: vec![depth_method],
            classes: None,
            distributions: None,
        }
    }

    /// Transformer using every method of `depth_methods`, in order.
    pub fn with_methods(depth_methods: Vec<DepthMethod>) -> Result<Self> {
        if depth_methods.is_empty() {
            return Err(FdaError::config("at least one depth method is required"));
        }
        Ok(Self {
            depth_methods,
            classes: None,
            distributions: None,
        })
    }

    /// Depth methods, in output order.
    pub fn depth_methods(&self) -> &[DepthMethod] {
        &self.depth_methods
    }

    /// Sorted class labels seen by `fit`.
    pub fn classes(&self) -> Option<&[L]> {
        self.classes.as_deref()
    }

    /// Fitted distributions, method-major then class.
    pub fn distributions(&self) -> Option<&[ClassDepthDistribution]> {
        self.distributions.as_deref()
    }
}

impl<L: Ord + Clone> Estimator for DdgTransformer<L> {
    type Params = Vec<DepthMethod>;

    fn get_params(&self) -> Vec<DepthMethod> {
        self.depth_methods.clone()
    }

    fn set_params(&mut self, params: Vec<DepthMethod>) {
        self.depth_methods = params;
        self.classes = None;
        self.distributions = None;
    }

    fn is_fitted(&self) -> bool {
        self.distributions.is_some()
    }
}

impl<L: Ord + Clone> Transformer<FDataGrid, [L]> for DdgTransformer<L> {
    type Output = FdMatrix;

    fn fit(&mut self, x: &FDataGrid, y: &[L]) -> Result<&mut Self> {
        if self.depth_methods.is_empty() {
            return Err(FdaError::config("at least one depth method is required"));
        }
        let (classes, distributions) = fit_distributions(x, y, &self.depth_methods)?;
        log::debug!(
            "DdgTransformer fitted: {} samples, {} classes, {} depth methods",
            x.n_samples(),
            classes.len(),
            self.depth_methods.len()
        );
        self.classes = Some(classes);
        self.distributions = Some(distributions);
        Ok(self)
    }

    /// Depths of `x`, one column per fitted distribution.
    fn transform(&self, x: &FDataGrid) -> Result<FdMatrix> {
        check_is_fitted(self, "DdgTransformer")?;
        let distributions = self.distributions.as_deref().unwrap_or_default();

        let columns = distributions
            .iter()
            .map(|d| {
                log::trace!(
                    "scoring {} samples against {} reference samples ({})",
                    x.n_samples(),
                    d.n_reference(),
                    d.method().name()
                );
                d.predict(x)
            })
            .collect::<Result<Vec<_>>>()?;

        FdMatrix::from_column_major(columns.concat(), x.n_samples(), distributions.len())
    }
}
