//! Fit/transform lifecycle shared by the estimators of the crate.

use crate::error::{FdaError, Result};

/// An estimator with typed hyperparameters and a fitted state.
pub trait Estimator {
    /// Hyperparameters
    type Params: Clone;

    /// Current hyperparameters.
    fn get_params(&self) -> Self::Params;

    /// Replace the hyperparameters. Any previous fit is discarded.
    fn set_params(&mut self, params: Self::Params);

    /// Whether `fit` has been called since construction or the last
    /// `set_params`.
    fn is_fitted(&self) -> bool;
}

/// An estimator that learns from `(x, y)` and maps new `x` to features.
pub trait Transformer<X: ?Sized, Y: ?Sized>: Estimator {
    /// Output of `transform`
    type Output;

    /// Learn from training data.
    fn fit(&mut self, x: &X, y: &Y) -> Result<&mut Self>;

    /// Map `x` using what was learned. Fails with
    /// [`FdaError::NotFitted`] before `fit`.
    fn transform(&self, x: &X) -> Result<Self::Output>;

    /// `fit` followed by `transform` on the same data.
    fn fit_transform(&mut self, x: &X, y: &Y) -> Result<Self::Output> {
        self.fit(x, y)?.transform(x)
    }
}

/// Fail with [`FdaError::NotFitted`] unless `estimator` is fitted.
pub fn check_is_fitted<E: Estimator + ?Sized>(estimator: &E, name: &'static str) -> Result<()> {
    if estimator.is_fitted() {
        Ok(())
    } else {
        Err(FdaError::NotFitted { estimator: name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Shift {
        offset: f64,
        mean: Option<f64>,
    }

    impl Estimator for Shift {
        type Params = f64;

        fn get_params(&self) -> f64 {
            self.offset
        }

        fn set_params(&mut self, params: f64) {
            self.offset = params;
            self.mean = None;
        }

        fn is_fitted(&self) -> bool {
            self.mean.is_some()
        }
    }

    impl Transformer<[f64], ()> for Shift {
        type Output = Vec<f64>;

        fn fit(&mut self, x: &[f64], _y: &()) -> Result<&mut Self> {
            self.mean = Some(x.iter().sum::<f64>() / x.len() as f64);
            Ok(self)
        }

        fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
            check_is_fitted(self, "Shift")?;
            let mean = self.mean.unwrap_or_default();
            Ok(x.iter().map(|v| v - mean + self.offset).collect())
        }
    }

    #[test]
    fn test_not_fitted() {
        let s = Shift::default();
        assert_eq!(
            s.transform(&[1.0]),
            Err(FdaError::NotFitted { estimator: "Shift" })
        );
    }

    #[test]
    fn test_fit_transform_and_reset() {
        let mut s = Shift::default();
        let out = s.fit_transform(&[1.0, 3.0], &()).unwrap();
        assert_eq!(out, vec![-1.0, 1.0]);
        assert!(s.is_fitted());
        s.set_params(10.0);
        assert!(!s.is_fitted());
        assert!(check_is_fitted(&s, "Shift").is_err());
    }
}
