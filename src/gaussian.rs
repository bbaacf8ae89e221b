/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Multivariate Gaussian kernel pieces shared by clusters.
//!
//! # Normalization
//!
//! The leading coefficient of a cluster's density is
//!
//! ```text
//! normalization = 1 / ((2π)^(D/2) · sqrt(‖Σ‖_F))
//! ```
//!
//! where `‖Σ‖_F` is the Frobenius norm of the covariance, *not* its
//! determinant. This is not the textbook Gaussian normaliser; it is kept
//! as-is because the novelty test compares evidence against exactly this
//! quantity, so changing it changes when clusters are spawned.
//!
//! # Inversion
//!
//! Covariances are symmetric positive definite, so they are inverted through
//! a Cholesky factorisation. A failed factorisation, a Cholesky diagonal
//! whose smallest-to-largest ratio is below [`MIN_CONDITIONING`], or a
//! non-finite inverse is reported as [`MixtureError::SingularCovariance`].
//! None of these depend on the overall scale of `Σ`, so large isotropic
//! covariances in high dimension are accepted even though their determinant
//! is not representable.
//!
//! Everything here is `no_std`: transcendental functions go through
//! [`ComplexField`], which resolves to `libm` without `std`.

use core::f64::consts::PI;

use nalgebra::{ComplexField, DMatrix, DVector};

use crate::error::{MixtureError, Result};

/// `1 / (2π)^(D/2)`, the dimensionality-dependent part of the density.
pub fn leading_factor(dimension: usize) -> f64 {
    1.0 / ComplexField::powf(2.0 * PI, dimension as f64 * 0.5)
}

/// Density coefficient for a covariance: `leading / sqrt(‖Σ‖_F)`.
pub fn normalization(leading: f64, covariance: &DMatrix<f64>) -> f64 {
    leading / ComplexField::sqrt(covariance.norm())
}

/// `exp(-0.5 · dᵗ Σ⁻¹ d)` for a deviation `d` from the mean.
pub fn kernel(deviation: &DVector<f64>, inverse_covariance: &DMatrix<f64>) -> f64 {
    let quad = deviation.dot(&(inverse_covariance * deviation));
    ComplexField::exp(-0.5 * quad)
}

/// Smallest accepted ratio between the smallest and largest Cholesky diagonal
/// entries. Below this, `Σ` is treated as numerically singular.
pub const MIN_CONDITIONING: f64 = 1.0e-8;

/// Inverse and normalization of a covariance matrix.
#[derive(Clone, Debug)]
pub struct Factors {
    /// `Σ⁻¹`.
    pub inverse: DMatrix<f64>,
    /// Density coefficient, see [`normalization`].
    pub normalization: f64,
}

/// Invert `covariance` and compute its normalization.
///
/// `cluster` is only used to label the error.
pub fn factorize(
    covariance: &DMatrix<f64>,
    leading: f64,
    cluster: Option<usize>,
) -> Result<Factors> {
    let singular = MixtureError::SingularCovariance { cluster };

    if covariance.iter().any(|v| !v.is_finite()) {
        return Err(singular);
    }
    let chol = match covariance.clone().cholesky() {
        Some(c) => c,
        None => {
            tracing::warn!(?cluster, "covariance is not positive definite");
            return Err(singular);
        }
    };

    // Conditioning from the Cholesky diagonal; independent of the scale of Σ.
    let diagonal = chol.l_dirty().diagonal();
    let (smallest, largest) = diagonal
        .iter()
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), &d| (lo.min(d), hi.max(d)));
    if smallest <= 0.0 || smallest / largest < MIN_CONDITIONING {
        tracing::warn!(?cluster, smallest, largest, "covariance is ill-conditioned");
        return Err(singular);
    }

    let inverse = chol.inverse();
    if inverse.iter().any(|v| !v.is_finite()) {
        tracing::warn!(?cluster, "covariance inverse is not finite");
        return Err(singular);
    }

    let normalization = normalization(leading, covariance);
    if !normalization.is_finite() || normalization <= 0.0 {
        return Err(singular);
    }

    Ok(Factors {
        inverse,
        normalization,
    })
}
