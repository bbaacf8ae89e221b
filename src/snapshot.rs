//! Portable snapshot of a [`GaussianMixture`] for persistence and transport.
//!
//! Only primary state is stored: configuration, dimensionality and, per
//! cluster, mean, covariance (row-major), value, accumulated responsibility
//! and mixing weight. The inverse covariance and normalization are derived
//! and recomputed on [`MixtureSnapshot::restore`], which also rejects
//! snapshots that could not have come from a live mixture.
//!
//! # no_std
//!
//! This module requires the `serde` feature and only needs `alloc`.
//!
//! # Example
//!
//! ```rust,ignore
//! use igmm_core::snapshot::MixtureSnapshot;
//!
//! let snapshot = MixtureSnapshot::from_mixture(&gmm);
//! let json = serde_json::to_string(&snapshot).unwrap();
//! let restored = serde_json::from_str::<MixtureSnapshot>(&json)?.restore()?;
//! ```

use alloc::vec::Vec;

use nalgebra::{ComplexField, DMatrix, DVector};

use crate::cluster::Cluster;
use crate::config::MixtureConfig;
use crate::error::{MixtureError, Result};
use crate::gaussian;
use crate::mixture::GaussianMixture;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Largest relative difference allowed between `Σᵢⱼ` and `Σⱼᵢ` on restore.
pub const SYMMETRY_TOLERANCE: f64 = 1.0e-12;

/// A serializable snapshot of a [`GaussianMixture`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct MixtureSnapshot {
    /// Format version, always [`SNAPSHOT_VERSION`] for newly created snapshots.
    pub version: u16,
    /// Construction parameters.
    pub config: MixtureConfig,
    /// Input dimensionality, `None` if never fixed.
    pub dimension: Option<usize>,
    /// Clusters in creation order.
    pub clusters: Vec<ClusterRecord>,
}

/// Serializable primary state of one cluster.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ClusterRecord {
    /// Centroid, `dimension` entries.
    pub mean: Vec<f64>,
    /// Covariance, `dimension²` entries, row-major.
    pub covariance: Vec<f64>,
    /// Regression value.
    pub value: f64,
    /// Running responsibility sum (≥ 1).
    pub accumulated_responsibility: f64,
    /// Mixing weight in (0, 1].
    pub mixing_weight: f64,
}

impl From<&Cluster> for ClusterRecord {
    fn from(c: &Cluster) -> Self {
        // nalgebra is column-major; transpose so the flat copy reads row by row.
        let covariance = c.covariance().transpose().as_slice().to_vec();
        Self {
            mean: c.mean().as_slice().to_vec(),
            covariance,
            value: c.value(),
            accumulated_responsibility: c.accumulated_responsibility(),
            mixing_weight: c.mixing_weight(),
        }
    }
}

impl MixtureSnapshot {
    /// Capture a live mixture.
    pub fn from_mixture(mixture: &GaussianMixture) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            config: mixture.config().clone(),
            dimension: mixture.dimension(),
            clusters: mixture.clusters().iter().map(ClusterRecord::from).collect(),
        }
    }

    /// Number of clusters in this snapshot.
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Rebuild the mixture, validating every record.
    pub fn restore(&self) -> Result<GaussianMixture> {
        if self.version != SNAPSHOT_VERSION {
            return Err(MixtureError::InvalidSnapshot {
                reason: "unsupported version",
            });
        }
        self.config.validate()?;
        if let (Some(pinned), Some(d)) = (self.config.dimension, self.dimension) {
            if pinned != d {
                return Err(MixtureError::DimensionMismatch {
                    expected: pinned,
                    found: d,
                });
            }
        }

        let dimension = match self.dimension {
            Some(d) if d > 0 => d,
            Some(_) => {
                return Err(MixtureError::InvalidSnapshot {
                    reason: "zero dimension",
                })
            }
            None if self.clusters.is_empty() => {
                return Ok(GaussianMixture::from_parts(
                    self.config.clone(),
                    None,
                    Vec::new(),
                ))
            }
            None => {
                return Err(MixtureError::InvalidSnapshot {
                    reason: "clusters without a dimension",
                })
            }
        };

        let leading = gaussian::leading_factor(dimension);
        let mut clusters = Vec::with_capacity(self.clusters.len());
        for (index, record) in self.clusters.iter().enumerate() {
            clusters.push(record.to_cluster(index, dimension, leading)?);
        }

        Ok(GaussianMixture::from_parts(
            self.config.clone(),
            Some(dimension),
            clusters,
        ))
    }
}

impl ClusterRecord {
    fn to_cluster(&self, index: usize, dimension: usize, leading: f64) -> Result<Cluster> {
        if self.mean.len() != dimension {
            return Err(MixtureError::DimensionMismatch {
                expected: dimension,
                found: self.mean.len(),
            });
        }
        if self.covariance.len() != dimension * dimension {
            return Err(MixtureError::InvalidSnapshot {
                reason: "covariance has the wrong number of entries",
            });
        }
        let scalars_ok = self.value.is_finite()
            && self.accumulated_responsibility.is_finite()
            && self.accumulated_responsibility >= 1.0
            && self.mixing_weight.is_finite()
            && self.mixing_weight > 0.0
            && self.mixing_weight <= 1.0
            && self.mean.iter().all(|v| v.is_finite());
        if !scalars_ok {
            return Err(MixtureError::InvalidSnapshot {
                reason: "cluster scalar out of range",
            });
        }

        // Cholesky only reads the lower triangle; an asymmetric record would
        // restore with an inverse that disagrees with its covariance.
        let covariance = DMatrix::from_row_slice(dimension, dimension, &self.covariance);
        for i in 0..dimension {
            for j in 0..i {
                let (a, b) = (covariance[(i, j)], covariance[(j, i)]);
                let scale = ComplexField::abs(a).max(ComplexField::abs(b));
                if ComplexField::abs(a - b) > SYMMETRY_TOLERANCE * scale {
                    return Err(MixtureError::InvalidSnapshot {
                        reason: "covariance is not symmetric",
                    });
                }
            }
        }

        Cluster::from_parts(
            DVector::from_column_slice(&self.mean),
            covariance,
            self.value,
            self.accumulated_responsibility,
            self.mixing_weight,
            leading,
            index,
        )
    }
}
