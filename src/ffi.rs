//! Python FFI bindings via PyO3.
//!
//! Exposes [`GaussianMixture`] to Python. Inputs are plain lists of floats;
//! every [`MixtureError`] surfaces as a `ValueError`.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from igmm_core import GaussianMixture
//!
//! gmm = GaussianMixture(initial_variance=1.0, novelty_threshold=0.01)
//! gmm.update([0.0, 0.0], 5.0)      # True: first cluster created
//! gmm.update([10.0, 10.0], -5.0)   # True: novel input
//! print(len(gmm), gmm.dimension)   # 2 2
//! print(gmm.predict([0.0, 0.0]))   # ~5.0
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::MixtureConfig;
use crate::error::MixtureError;
use crate::mixture::GaussianMixture;

fn to_py_err(e: MixtureError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Incremental Gaussian mixture regressor.
///
/// Example::
///
///     gmm = GaussianMixture(1.0, 0.01)
///     for x, y in samples:
///         gmm.update([x], y)
///     print(gmm.predict([0.5]))
#[pyclass(name = "GaussianMixture")]
pub struct PyGaussianMixture {
    inner: GaussianMixture,
}

#[pymethods]
impl PyGaussianMixture {
    /// Create an empty mixture.
    ///
    /// Args:
    ///     initial_variance:  variance seeding every new cluster (> 0)
    ///     novelty_threshold: novelty sensitivity (>= 0); 1.0 or more makes every input novel
    ///     dimension:         optional fixed input length; otherwise set by the first update
    #[new]
    #[pyo3(signature = (initial_variance=1.0, novelty_threshold=0.01, dimension=None))]
    pub fn new(
        initial_variance: f64,
        novelty_threshold: f64,
        dimension: Option<usize>,
    ) -> PyResult<Self> {
        let config = MixtureConfig {
            initial_variance,
            novelty_threshold,
            dimension,
        };
        Ok(Self {
            inner: GaussianMixture::new(config).map_err(to_py_err)?,
        })
    }

    /// Responsibility-weighted value estimate at `input`.
    pub fn predict(&self, input: Vec<f64>) -> PyResult<f64> {
        self.inner.predict(&input).map_err(to_py_err)
    }

    /// Incorporate one observation.
    ///
    /// Returns:
    ///     True if the input was novel and a cluster was created.
    pub fn update(&mut self, input: Vec<f64>, target: f64) -> PyResult<bool> {
        self.inner
            .update(&input, target)
            .map(|outcome| outcome.is_created())
            .map_err(to_py_err)
    }

    /// Posterior probability of every cluster for `input`.
    pub fn responsibilities(&self, input: Vec<f64>) -> PyResult<Vec<f64>> {
        self.inner.responsibilities(&input).map_err(to_py_err)
    }

    /// Cluster values in creation order.
    pub fn values(&self) -> Vec<f64> {
        self.inner.clusters().iter().map(|c| c.value()).collect()
    }

    /// Input dimensionality, or None before the first update.
    #[getter]
    pub fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }

    /// Number of clusters.
    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "GaussianMixture(initial_variance={}, novelty_threshold={}, clusters={})",
            config.initial_variance,
            config.novelty_threshold,
            self.inner.len(),
        )
    }
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Incremental Gaussian mixture regression, Python bindings.
#[pymodule]
pub fn igmm_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGaussianMixture>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
