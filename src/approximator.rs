//! Function-approximator seam consumed by a value model.
//!
//! A reinforcement-learning model layer only needs two things from a
//! regressor: read a value for a state encoding, and push a new target for
//! one. [`FunctionApproximator`] captures exactly that, so the model layer can
//! be written against the trait and swap regressors freely.

use crate::error::Result;
use crate::mixture::GaussianMixture;

/// A regressor from fixed-length state encodings to scalar values.
pub trait FunctionApproximator {
    /// Current estimate at `input`.
    fn value(&self, input: &[f64]) -> Result<f64>;

    /// Move the estimate at `input` toward `target`.
    fn set_value(&mut self, input: &[f64], target: f64) -> Result<()>;
}

impl FunctionApproximator for GaussianMixture {
    fn value(&self, input: &[f64]) -> Result<f64> {
        self.predict(input)
    }

    fn set_value(&mut self, input: &[f64], target: f64) -> Result<()> {
        self.update(input, target).map(|_| ())
    }
}
