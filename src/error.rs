//! Error type shared by every fallible operation in the crate.
//!
//! Every variant is a precondition violation detected *before* the mixture is
//! mutated: a failing [`GaussianMixture::update`] leaves the model exactly as
//! it was, dimensionality included. Nothing is retried internally.
//!
//! [`GaussianMixture::update`]: crate::mixture::GaussianMixture::update

/// Errors raised by the mixture engine.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MixtureError {
    /// A query was made before any cluster exists.
    #[error("mixture has no clusters")]
    EmptyMixture,

    /// Every cluster's evidence for the input underflowed to zero, or their
    /// sum is not finite, so responsibilities cannot be normalised.
    #[error("total evidence for the input is zero or not finite")]
    ZeroEvidence,

    /// Input length disagrees with the dimensionality of the mixture.
    #[error("input has dimension {found}, mixture expects {expected}")]
    DimensionMismatch {
        /// Dimensionality fixed by the configuration or the first update.
        expected: usize,
        /// Length of the offending input.
        found: usize,
    },

    /// A covariance matrix is not positive definite, is numerically
    /// ill-conditioned, or its inverse is not finite.
    ///
    /// `cluster` is `None` when the degenerate matrix belongs to a cluster
    /// that was about to be created.
    #[error("covariance of cluster {cluster:?} is singular")]
    SingularCovariance {
        /// Index of the affected cluster, if it already exists.
        cluster: Option<usize>,
    },

    /// A zero-length input vector.
    #[error("input vector is empty")]
    EmptyInput,

    /// NaN or infinity in an input vector or target.
    #[error("input or target contains a non-finite value")]
    NonFiniteInput,

    /// A construction parameter is out of range.
    #[error("invalid configuration `{name}`: {reason}")]
    InvalidConfig {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A snapshot is internally inconsistent or from an unknown version.
    #[cfg(feature = "serde")]
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, MixtureError>;
