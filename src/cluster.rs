/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! A single Gaussian cluster annotated with a regression value.
//!
//! # Invariants
//!
//! - `inverse_covariance` and `normalization` always correspond to the
//!   current `covariance`; fields are private so they cannot drift apart.
//! - `accumulated_responsibility` starts at 1.0 and never decreases.
//! - An update is staged against the current state and only applied once
//!   every derived quantity has been computed, so a singular covariance
//!   never leaves a half-updated cluster behind.

use nalgebra::{DMatrix, DVector};

use crate::error::Result;
use crate::gaussian::{self, Factors};

/// One component of the mixture: a Gaussian over input space plus the scalar
/// value it predicts.
#[derive(Clone, Debug)]
pub struct Cluster {
    mean: DVector<f64>,
    covariance: DMatrix<f64>,
    inverse_covariance: DMatrix<f64>,
    value: f64,
    accumulated_responsibility: f64,
    mixing_weight: f64,
    normalization: f64,
}

/// The next state of a cluster, computed but not yet applied.
#[derive(Clone, Debug)]
pub(crate) struct StagedUpdate {
    mean: DVector<f64>,
    covariance: DMatrix<f64>,
    factors: Factors,
    value: f64,
    accumulated_responsibility: f64,
    mixing_weight: f64,
    /// Step size used for this update.
    pub(crate) learning_rate: f64,
}

impl Cluster {
    /// Seed a cluster at `mean` with covariance `initial_variance · I`.
    pub(crate) fn seed(
        mean: DVector<f64>,
        value: f64,
        initial_variance: f64,
        mixing_weight: f64,
        leading: f64,
    ) -> Result<Self> {
        let d = mean.len();
        let covariance = DMatrix::identity(d, d) * initial_variance;
        let factors = gaussian::factorize(&covariance, leading, None)?;
        Ok(Self {
            mean,
            covariance,
            inverse_covariance: factors.inverse,
            value,
            accumulated_responsibility: 1.0,
            mixing_weight,
            normalization: factors.normalization,
        })
    }

    /// Rebuild a cluster from persisted primary fields, recomputing the
    /// inverse and normalization.
    #[cfg(feature = "serde")]
    pub(crate) fn from_parts(
        mean: DVector<f64>,
        covariance: DMatrix<f64>,
        value: f64,
        accumulated_responsibility: f64,
        mixing_weight: f64,
        leading: f64,
        index: usize,
    ) -> Result<Self> {
        let factors = gaussian::factorize(&covariance, leading, Some(index))?;
        Ok(Self {
            mean,
            covariance,
            inverse_covariance: factors.inverse,
            value,
            accumulated_responsibility,
            mixing_weight,
            normalization: factors.normalization,
        })
    }

    // ── Density ────────────────────────────────────────────────────────────

    /// Gaussian likelihood of `x` under this cluster:
    /// `normalization · exp(-0.5 · (x-μ)ᵗ Σ⁻¹ (x-μ))`.
    ///
    /// `x` must have the cluster's dimensionality.
    pub fn density(&self, x: &DVector<f64>) -> f64 {
        let deviation = x - &self.mean;
        self.normalization * gaussian::kernel(&deviation, &self.inverse_covariance)
    }

    /// Unnormalised "explains this input" score: density times mixing weight.
    pub fn evidence(&self, x: &DVector<f64>) -> f64 {
        self.density(x) * self.mixing_weight
    }

    /// Step size an update with the given responsibility would use:
    /// `r / (accumulated + r)`.
    ///
    /// Shrinks toward zero as evidence accumulates.
    pub fn learning_rate_for(&self, responsibility: f64) -> f64 {
        responsibility / (self.accumulated_responsibility + responsibility)
    }

    // ── Incremental update ─────────────────────────────────────────────────

    /// Compute the state after assigning `x` (target `target`) to this cluster
    /// with the given responsibility.
    ///
    /// `total_before` is the mixture's total accumulated responsibility before
    /// this observation.
    pub(crate) fn stage_update(
        &self,
        index: usize,
        x: &DVector<f64>,
        target: f64,
        responsibility: f64,
        total_before: f64,
        leading: f64,
    ) -> Result<StagedUpdate> {
        let accumulated = self.accumulated_responsibility + responsibility;
        let learning_rate = responsibility / accumulated;

        let delta = x - &self.mean;
        let shift = &delta * learning_rate;
        let residual = &delta - &shift;

        let mean = &self.mean + &shift;
        let value = self.value + learning_rate * (target - self.value);
        let covariance = &self.covariance
            + (&residual * residual.transpose() - &self.covariance) * learning_rate;
        let factors = gaussian::factorize(&covariance, leading, Some(index))?;

        Ok(StagedUpdate {
            mean,
            covariance,
            factors,
            value,
            accumulated_responsibility: accumulated,
            mixing_weight: accumulated / (total_before + responsibility),
            learning_rate,
        })
    }

    pub(crate) fn apply(&mut self, staged: StagedUpdate) {
        self.mean = staged.mean;
        self.covariance = staged.covariance;
        self.inverse_covariance = staged.factors.inverse;
        self.normalization = staged.factors.normalization;
        self.value = staged.value;
        self.accumulated_responsibility = staged.accumulated_responsibility;
        self.mixing_weight = staged.mixing_weight;
    }

    pub(crate) fn set_mixing_weight(&mut self, mixing_weight: f64) {
        self.mixing_weight = mixing_weight;
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Cluster centroid.
    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    /// Covariance matrix.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Cached inverse of [`Cluster::covariance`].
    pub fn inverse_covariance(&self) -> &DMatrix<f64> {
        &self.inverse_covariance
    }

    /// Regression value associated with this region of input space.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Running sum of responsibilities assigned to this cluster.
    pub fn accumulated_responsibility(&self) -> f64 {
        self.accumulated_responsibility
    }

    /// Approximate prior mass of this cluster in the mixture.
    pub fn mixing_weight(&self) -> f64 {
        self.mixing_weight
    }

    /// Leading coefficient of this cluster's density.
    pub fn normalization(&self) -> f64 {
        self.normalization
    }

    /// Input dimensionality.
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian::leading_factor;

    fn seeded(mean: &[f64], value: f64) -> Cluster {
        let d = mean.len();
        Cluster::seed(DVector::from_column_slice(mean), value, 1.0, 1.0, leading_factor(d)).unwrap()
    }

    #[test]
    fn test_seed_fields() {
        let c = seeded(&[1.0, 2.0], 3.0);
        assert_eq!(c.mean().as_slice(), &[1.0, 2.0]);
        assert_eq!(c.value(), 3.0);
        assert_eq!(c.accumulated_responsibility(), 1.0);
        assert_eq!(c.covariance(), &DMatrix::identity(2, 2));
        assert_eq!(c.inverse_covariance(), &DMatrix::identity(2, 2));
        assert_eq!(c.dimension(), 2);
    }

    #[test]
    fn test_density_peaks_at_mean() {
        let c = seeded(&[0.0], 0.0);
        let at_mean = c.density(&DVector::from_vec(vec![0.0]));
        assert!((at_mean - c.normalization()).abs() < 1e-12);
        assert!(c.density(&DVector::from_vec(vec![1.0])) < at_mean);
    }

    #[test]
    fn test_evidence_scales_with_mixing_weight() {
        let mut c = seeded(&[0.0], 0.0);
        let x = DVector::from_vec(vec![0.3]);
        let full = c.evidence(&x);
        c.set_mixing_weight(0.25);
        assert!((c.evidence(&x) - 0.25 * full).abs() < 1e-12);
    }

    #[test]
    fn test_learning_rate_decays() {
        let mut c = seeded(&[0.0], 0.0);
        let x = DVector::from_vec(vec![0.0]);
        let mut previous = f64::INFINITY;
        for _ in 0..10 {
            let lr = c.learning_rate_for(1.0);
            assert!(lr < previous, "lr={} previous={}", lr, previous);
            previous = lr;
            let total = c.accumulated_responsibility();
            let staged = c.stage_update(0, &x, 0.0, 1.0, total, leading_factor(1)).unwrap();
            c.apply(staged);
        }
    }

    #[test]
    fn test_stage_update_moves_mean_value_and_covariance() {
        let c = seeded(&[0.0], 0.0);
        let x = DVector::from_vec(vec![2.0]);
        let staged = c.stage_update(0, &x, 4.0, 1.0, 1.0, leading_factor(1)).unwrap();
        // lr = 1 / (1 + 1) = 0.5
        assert!((staged.learning_rate - 0.5).abs() < 1e-12);
        let mut c2 = c.clone();
        c2.apply(staged);
        assert!((c2.mean()[0] - 1.0).abs() < 1e-12);
        assert!((c2.value() - 2.0).abs() < 1e-12);
        // residual = 2 - 1 = 1 → Σ = 1 + 0.5·(1 - 1) = 1
        assert!((c2.covariance()[(0, 0)] - 1.0).abs() < 1e-12);
        assert_eq!(c2.accumulated_responsibility(), 2.0);
        assert!((c2.mixing_weight() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stage_update_does_not_touch_original() {
        let c = seeded(&[0.0], 1.0);
        let _ = c.stage_update(0, &DVector::from_vec(vec![5.0]), 9.0, 1.0, 1.0, leading_factor(1));
        assert_eq!(c.mean()[0], 0.0);
        assert_eq!(c.value(), 1.0);
        assert_eq!(c.accumulated_responsibility(), 1.0);
    }
}
