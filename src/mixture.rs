/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! The incremental Gaussian mixture regressor.
//!
//! # Model
//!
//! ```text
//! evidence_k(x)       = N_k(x) · π_k
//! responsibility_k(x) = evidence_k(x) / Σ_j evidence_j(x)
//! predict(x)          = Σ_k value_k · responsibility_k(x)
//! ```
//!
//! # Update
//!
//! Each observation `(x, y)` is handled in a single pass:
//!
//! - **Novel** (`evidence_k(x) ≤ normalization_k · novelty_threshold` for every
//!   k): append a cluster at `x` with value `y` and covariance
//!   `initial_variance · I`, then renormalise every mixing weight.
//! - **Otherwise**: the cluster with the greatest raw evidence (the winner)
//!   takes the whole update, stepped by `responsibility / accumulated`.
//!   Mixing weights of the other clusters are left alone.
//!
//! The winner is chosen hard but stepped softly: its responsibility scales
//! the step even though no other cluster is touched.
//!
//! # Invariants
//!
//! - Clusters are append-only and addressed by stable index.
//! - Dimensionality is fixed by the configuration or the first successful
//!   update, and every later input must match.
//! - Every error is raised before any state is touched.

use alloc::vec::Vec;

use nalgebra::DVector;

use crate::cluster::Cluster;
use crate::config::MixtureConfig;
use crate::error::{MixtureError, Result};
use crate::gaussian;

/// What an [`GaussianMixture::update`] call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// The input was novel; a cluster was appended at `index`.
    Created {
        /// Index of the new cluster.
        index: usize,
    },
    /// The input was assigned to an existing cluster.
    Updated {
        /// Index of the winning cluster.
        index: usize,
        /// Normalised responsibility of the winner for the input.
        responsibility: f64,
        /// Step size applied to mean, value and covariance.
        learning_rate: f64,
    },
}

impl UpdateOutcome {
    /// Index of the cluster that was created or updated.
    pub fn index(&self) -> usize {
        match *self {
            Self::Created { index } | Self::Updated { index, .. } => index,
        }
    }

    /// `true` for a novelty event.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Online mixture-of-Gaussians regressor.
///
/// ```rust
/// use igmm_core::{GaussianMixture, MixtureConfig};
///
/// let mut gmm = GaussianMixture::new(MixtureConfig::new(1.0, 0.01)).unwrap();
/// gmm.update(&[0.0], 5.0).unwrap();
/// gmm.update(&[10.0], -5.0).unwrap();
/// assert_eq!(gmm.len(), 2);
/// assert!((gmm.predict(&[0.0]).unwrap() - 5.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct GaussianMixture {
    config: MixtureConfig,
    clusters: Vec<Cluster>,
    /// Input dimensionality, once known.
    dimension: Option<usize>,
    /// `1 / (2π)^(D/2)`, computed together with `dimension`.
    leading: f64,
}

impl GaussianMixture {
    /// Construct an empty mixture.
    ///
    /// Fails with [`MixtureError::InvalidConfig`] if a parameter is out of range.
    pub fn new(config: MixtureConfig) -> Result<Self> {
        config.validate()?;
        let dimension = config.dimension;
        Ok(Self {
            leading: dimension.map_or(0.0, gaussian::leading_factor),
            dimension,
            config,
            clusters: Vec::new(),
        })
    }

    // ── Queries ────────────────────────────────────────────────────────────

    /// Per-cluster evidence `density · mixing_weight` for `x`, in cluster order.
    ///
    /// Fails with [`MixtureError::EmptyMixture`] before the first cluster
    /// exists, whether or not the dimension is configured. Input errors are
    /// reported first when the dimension is known.
    pub fn evidences(&self, x: &[f64]) -> Result<Vec<f64>> {
        let x = self.check_input(x)?;
        if self.clusters.is_empty() {
            return Err(MixtureError::EmptyMixture);
        }
        Ok(self.evidences_of(&x))
    }

    /// Posterior `p(cluster | x)` for every cluster. Sums to 1.
    pub fn responsibilities(&self, x: &[f64]) -> Result<Vec<f64>> {
        let x = self.check_input(x)?;
        normalize(self.evidences_of(&x))
    }

    /// Responsibility-weighted blend of cluster values at `x`.
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        let responsibilities = self.responsibilities(x)?;
        Ok(self
            .clusters
            .iter()
            .zip(responsibilities.iter())
            .map(|(c, r)| c.value() * r)
            .sum())
    }

    // ── Learning ───────────────────────────────────────────────────────────

    /// Incorporate one observation.
    ///
    /// The first call on a mixture without a configured dimension fixes it
    /// to `x.len()`. On error the mixture is left unchanged.
    pub fn update(&mut self, x: &[f64], target: f64) -> Result<UpdateOutcome> {
        if !target.is_finite() {
            return Err(MixtureError::NonFiniteInput);
        }
        let (dimension, leading) = match self.dimension {
            Some(d) => (d, self.leading),
            None => (x.len(), gaussian::leading_factor(x.len())),
        };
        let x = vector_of(x, dimension)?;

        let total_before = self.total_accumulated_responsibility();
        let evidences = self.evidences_of(&x);

        let novel = self
            .clusters
            .iter()
            .zip(evidences.iter())
            .all(|(c, &e)| e <= c.normalization() * self.config.novelty_threshold);

        if novel {
            let index = self.clusters.len();
            let cluster = Cluster::seed(
                x,
                target,
                self.config.initial_variance,
                1.0 / (total_before + 1.0),
                leading,
            )?;

            let total = total_before + 1.0;
            for c in self.clusters.iter_mut() {
                let w = c.accumulated_responsibility() / total;
                c.set_mixing_weight(w);
            }
            self.clusters.push(cluster);
            self.dimension = Some(dimension);
            self.leading = leading;

            tracing::debug!(index, dimension, clusters = self.clusters.len(), "created cluster");
            return Ok(UpdateOutcome::Created { index });
        }

        let responsibilities = normalize(evidences.clone())?;
        let index = argmax(&evidences);
        let responsibility = responsibilities[index];

        let staged = self.clusters[index].stage_update(
            index,
            &x,
            target,
            responsibility,
            total_before,
            leading,
        )?;
        let learning_rate = staged.learning_rate;
        self.clusters[index].apply(staged);

        tracing::trace!(index, responsibility, learning_rate, "updated cluster");
        Ok(UpdateOutcome::Updated {
            index,
            responsibility,
            learning_rate,
        })
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Input dimensionality, if fixed yet.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// `true` before the first cluster is created.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// All clusters, in creation order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Cluster at `index`, if it exists.
    pub fn cluster(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    /// Construction parameters.
    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }

    /// Sum of accumulated responsibility over all clusters.
    pub fn total_accumulated_responsibility(&self) -> f64 {
        self.clusters
            .iter()
            .map(Cluster::accumulated_responsibility)
            .sum()
    }

    // ── Internal helpers ───────────────────────────────────────────────────

    /// Rebuild a mixture from already-validated parts.
    #[cfg(feature = "serde")]
    pub(crate) fn from_parts(
        config: MixtureConfig,
        dimension: Option<usize>,
        clusters: Vec<Cluster>,
    ) -> Self {
        Self {
            leading: dimension.map_or(0.0, gaussian::leading_factor),
            dimension,
            config,
            clusters,
        }
    }

    fn check_input(&self, x: &[f64]) -> Result<DVector<f64>> {
        match self.dimension {
            Some(d) => vector_of(x, d),
            None => {
                // Nothing has been learned yet, so there is nothing to match against.
                vector_of(x, x.len())?;
                Err(MixtureError::EmptyMixture)
            }
        }
    }

    fn evidences_of(&self, x: &DVector<f64>) -> Vec<f64> {
        self.clusters.iter().map(|c| c.evidence(x)).collect()
    }
}

/// Validate length and finiteness, then copy into a column vector.
fn vector_of(x: &[f64], dimension: usize) -> Result<DVector<f64>> {
    if x.is_empty() {
        return Err(MixtureError::EmptyInput);
    }
    if x.len() != dimension {
        return Err(MixtureError::DimensionMismatch {
            expected: dimension,
            found: x.len(),
        });
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(MixtureError::NonFiniteInput);
    }
    Ok(DVector::from_column_slice(x))
}

/// Divide every evidence by the total.
fn normalize(mut evidences: Vec<f64>) -> Result<Vec<f64>> {
    if evidences.is_empty() {
        return Err(MixtureError::EmptyMixture);
    }
    let total: f64 = evidences.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(MixtureError::ZeroEvidence);
    }
    let inv = 1.0 / total;
    for e in evidences.iter_mut() {
        *e *= inv;
    }
    Ok(evidences)
}

/// Index of the greatest value; the first one wins ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

// ─── Tests ──────────────────────────────────────────────────────────────────
