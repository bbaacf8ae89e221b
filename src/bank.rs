/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Key-indexed collection of independent mixtures.
//!
//! A value model typically keeps one regressor per discrete action and
//! picks the action whose estimate is highest. [`MixtureBank`] does the
//! bookkeeping: every key owns its own [`GaussianMixture`], built lazily from
//! one shared configuration, and keys never share state.
//!
//! # Invariants
//!
//! - The shared [`MixtureConfig`] is validated once, at bank construction.
//! - A key's mixture exists only after its first successful update.
//! - `no_std` compatible; uses `hashbrown::HashMap`.

use core::hash::Hash;

use hashbrown::HashMap;

use crate::config::MixtureConfig;
use crate::error::{MixtureError, Result};
use crate::mixture::{GaussianMixture, UpdateOutcome};

/// One [`GaussianMixture`] per key.
pub struct MixtureBank<K: Eq + Hash + Clone> {
    mixtures: HashMap<K, GaussianMixture>,
    config: MixtureConfig,
}

impl<K: Eq + Hash + Clone> MixtureBank<K> {
    /// Empty bank whose mixtures will all use `config`.
    pub fn new(config: MixtureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mixtures: HashMap::new(),
            config,
        })
    }

    /// Feed an observation to `key`'s mixture, creating it if needed.
    ///
    /// A mixture that would be created by this call is only kept if the
    /// update succeeds.
    pub fn update(&mut self, key: &K, x: &[f64], target: f64) -> Result<UpdateOutcome> {
        if let Some(mixture) = self.mixtures.get_mut(key) {
            return mixture.update(x, target);
        }
        let mut mixture = GaussianMixture::new(self.config.clone())?;
        let outcome = mixture.update(x, target)?;
        tracing::debug!(keys = self.mixtures.len() + 1, "added mixture to bank");
        self.mixtures.insert(key.clone(), mixture);
        Ok(outcome)
    }

    /// `key`'s estimate at `x`. An unseen key is an empty mixture.
    pub fn predict(&self, key: &K, x: &[f64]) -> Result<f64> {
        self.mixtures
            .get(key)
            .ok_or(MixtureError::EmptyMixture)?
            .predict(x)
    }

    /// Key with the highest estimate at `x`, with that estimate.
    ///
    /// Keys whose mixture has no evidence at `x` are skipped. Equal
    /// estimates resolve to the smallest key. Returns `Ok(None)` when no key
    /// can answer. Input errors (dimension, NaN) are propagated.
    pub fn greedy(&self, x: &[f64]) -> Result<Option<(&K, f64)>>
    where
        K: Ord,
    {
        let mut best: Option<(&K, f64)> = None;
        for (key, mixture) in self.mixtures.iter() {
            let estimate = match mixture.predict(x) {
                Ok(v) => v,
                Err(MixtureError::ZeroEvidence) => continue,
                Err(e) => return Err(e),
            };
            match best {
                Some((k, b)) if b > estimate || (b == estimate && k < key) => {}
                _ => best = Some((key, estimate)),
            }
        }
        Ok(best)
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Mixture for `key`, if it has been trained.
    pub fn get(&self, key: &K) -> Option<&GaussianMixture> {
        self.mixtures.get(key)
    }

    /// `true` if `key` has a mixture.
    pub fn contains(&self, key: &K) -> bool {
        self.mixtures.contains_key(key)
    }

    /// Number of keys with a mixture.
    pub fn len(&self) -> usize {
        self.mixtures.len()
    }

    /// `true` when no key has been trained.
    pub fn is_empty(&self) -> bool {
        self.mixtures.is_empty()
    }

    /// Iterate over all (key, mixture) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &GaussianMixture)> {
        self.mixtures.iter()
    }

    /// Shared configuration.
    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }
}

impl<K: Eq + Hash + Clone> core::fmt::Debug for MixtureBank<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MixtureBank")
            .field("keys", &self.mixtures.len())
            .field("config", &self.config)
            .finish()
    }
}
