//! # igmm-core
//!
//! Incremental Gaussian mixture regression: an online function approximator
//! that grows its own structure.
//!
//! ---
//!
//! ## One observation at a time
//!
//! Observations `(x, y)` arrive as a stream, typically from a reinforcement
//! learning loop producing state encodings and return estimates. Each one is
//! handled in a single pass, with no batch refit:
//!
//! **Novelty test.** If no existing cluster explains `x` well enough
//! relative to its own peak density, a new Gaussian is planted at `x` with
//! value `y`.
//! > "I have never been anywhere like this."
//!
//! **Winner-take-most update.** Otherwise the cluster with the strongest
//! evidence absorbs the observation. Its mean, covariance and value move
//! toward the sample by `responsibility / accumulated responsibility`, a
//! step that shrinks as the cluster gathers evidence.
//!
//! **Responsibility blend.** A query returns the cluster values weighted by
//! the posterior probability that each cluster generated the input.
//!
//! ---
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`mixture`] | [`GaussianMixture`], [`UpdateOutcome`] | Novelty test, incremental update, prediction |
//! | [`cluster`] | [`Cluster`] | One Gaussian + value; staged update with cached inverse |
//! | [`gaussian`] | [`gaussian::Factors`] | Leading factor, kernel, Cholesky inversion |
//! | [`config`] | [`MixtureConfig`] | Construction parameters and validation |
//! | [`error`] | [`MixtureError`] | Every failure mode, raised before mutation |
//! | [`approximator`] | [`FunctionApproximator`] | Seam for a value model |
//! | [`bank`] | [`MixtureBank`] | One mixture per key (e.g. per action), greedy selection |
//! | [`snapshot`] | [`snapshot::MixtureSnapshot`] | Serialisable state (requires `serde` feature) |
//!
//! ## Example
//!
//! ```rust
//! use igmm_core::{GaussianMixture, MixtureConfig, UpdateOutcome};
//!
//! let mut gmm = GaussianMixture::new(MixtureConfig::new(1.0, 0.01)).unwrap();
//! assert_eq!(gmm.update(&[0.0], 5.0).unwrap(), UpdateOutcome::Created { index: 0 });
//! assert!(!gmm.update(&[0.0], 5.0).unwrap().is_created());
//! assert!(gmm.update(&[10.0], -5.0).unwrap().is_created());
//!
//! let blend = gmm.predict(&[5.0]).unwrap();
//! assert!(blend > -5.0 && blend < 5.0);
//! ```
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default and needs only `alloc`. Enable the
//! `std` feature to build nalgebra, thiserror and tracing against `std`.
//! Enable the `serde` feature for [`snapshot`], and `python-ffi` for the PyO3
//! bindings.
//!
//! ## License
//!
//! Business Source License 1.1.

#![cfg_attr(not(any(feature = "std", feature = "python-ffi", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod approximator;
pub mod bank;
pub mod cluster;
pub mod config;
pub mod error;
pub mod gaussian;
pub mod mixture;
#[cfg(feature = "serde")]
pub mod snapshot;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use approximator::FunctionApproximator;
pub use bank::MixtureBank;
pub use cluster::Cluster;
pub use config::MixtureConfig;
pub use error::{MixtureError, Result};
pub use mixture::{GaussianMixture, UpdateOutcome};
