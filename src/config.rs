//! Construction parameters for [`GaussianMixture`].
//!
//! [`GaussianMixture`]: crate::mixture::GaussianMixture

use crate::error::{MixtureError, Result};

/// Configuration for an incremental Gaussian mixture.
///
/// `initial_variance` and `novelty_threshold` are fixed for the lifetime of
/// the mixture. `dimension` optionally pins the input dimensionality up
/// front; when left unset it is taken from the first successful update.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixtureConfig {
    /// Variance used to seed a new cluster's covariance (`initial_variance · I`).
    /// Must be finite and > 0. Default: 1.0.
    pub initial_variance: f64,

    /// Sensitivity of the novelty test. An input is novel when no cluster's
    /// evidence exceeds `normalization · novelty_threshold`.
    ///
    /// Since evidence never exceeds a cluster's normalization, values ≥ 1.0
    /// make every input novel; 0.0 reuses a cluster whenever any evidence is
    /// non-zero. Must be finite and ≥ 0. Default: 0.01.
    pub novelty_threshold: f64,

    /// Input dimensionality, if known at construction. Default: `None`.
    pub dimension: Option<usize>,
}

impl MixtureConfig {
    /// Configuration with the given variance and threshold, dimension unset.
    pub fn new(initial_variance: f64, novelty_threshold: f64) -> Self {
        Self {
            initial_variance,
            novelty_threshold,
            dimension: None,
        }
    }

    /// Pin the input dimensionality.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Check every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_variance.is_finite() || self.initial_variance <= 0.0 {
            return Err(MixtureError::InvalidConfig {
                name: "initial_variance",
                reason: "must be finite and > 0",
            });
        }
        if !self.novelty_threshold.is_finite() || self.novelty_threshold < 0.0 {
            return Err(MixtureError::InvalidConfig {
                name: "novelty_threshold",
                reason: "must be finite and >= 0",
            });
        }
        if self.dimension == Some(0) {
            return Err(MixtureError::InvalidConfig {
                name: "dimension",
                reason: "must be >= 1",
            });
        }
        Ok(())
    }
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self::new(1.0, 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MixtureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_variance() {
        for v in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = MixtureConfig::new(v, 0.01).validate().unwrap_err();
            assert!(
                matches!(err, MixtureError::InvalidConfig { name: "initial_variance", .. }),
                "variance {} gave {:?}",
                v,
                err
            );
        }
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let err = MixtureConfig::new(1.0, -0.1).validate().unwrap_err();
        assert!(matches!(err, MixtureError::InvalidConfig { name: "novelty_threshold", .. }));
        // Zero is the "always reuse" setting and is allowed.
        assert!(MixtureConfig::new(1.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let err = MixtureConfig::default().with_dimension(0).validate().unwrap_err();
        assert!(matches!(err, MixtureError::InvalidConfig { name: "dimension", .. }));
        assert!(MixtureConfig::default().with_dimension(3).validate().is_ok());
    }
}
