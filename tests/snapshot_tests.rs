//! Snapshot round-trip integration tests.
//!
//! Verifies that a live GaussianMixture can be captured as a MixtureSnapshot,
//! serialised to JSON, deserialised back, and restored into a mixture that
//! answers and learns exactly like the original.
//!
//! Run with: `cargo test --features serde`

#[cfg(feature = "serde")]
mod tests {
    use igmm_core::snapshot::{MixtureSnapshot, SNAPSHOT_VERSION};
    use igmm_core::{GaussianMixture, MixtureConfig, MixtureError};

    // ── Helpers ──────────────────────────────────────────────────────────────

    /// Three well-separated 2-D regions with a handful of samples each.
    fn make_mixture() -> GaussianMixture {
        let mut gmm = GaussianMixture::new(MixtureConfig::new(0.5, 0.02)).unwrap();
        let samples = [
            ([0.0, 0.0], 1.0),
            ([0.2, -0.1], 1.2),
            ([0.1, 0.3], 0.8),
            ([6.0, 6.0], -2.0),
            ([5.8, 6.3], -1.5),
            ([-6.0, 4.0], 3.0),
            ([-5.7, 4.1], 3.5),
            ([0.05, 0.05], 1.1),
        ];
        for (x, y) in samples {
            gmm.update(&x, y).unwrap();
        }
        gmm
    }

    fn round_trip(snapshot: &MixtureSnapshot) -> MixtureSnapshot {
        let json = serde_json::to_string(snapshot).expect("serialise");
        serde_json::from_str(&json).expect("deserialise")
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_snapshot_captures_structure() {
        let gmm = make_mixture();
        let snapshot = MixtureSnapshot::from_mixture(&gmm);
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.cluster_count(), gmm.len());
        assert_eq!(snapshot.dimension, Some(2));
        assert_eq!(snapshot.config, *gmm.config());
        for rec in &snapshot.clusters {
            assert_eq!(rec.mean.len(), 2);
            assert_eq!(rec.covariance.len(), 4);
        }
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let snapshot = MixtureSnapshot::from_mixture(&make_mixture());
        assert_eq!(round_trip(&snapshot), snapshot);
    }

    #[test]
    fn test_restored_mixture_predicts_identically() {
        let gmm = make_mixture();
        let restored = round_trip(&MixtureSnapshot::from_mixture(&gmm))
            .restore()
            .unwrap();
        for q in [[0.0, 0.0], [6.0, 6.1], [-5.9, 4.0], [1.0, 1.0]] {
            assert_eq!(gmm.predict(&q).unwrap(), restored.predict(&q).unwrap(), "q={:?}", q);
        }
    }

    #[test]
    fn test_restored_mixture_keeps_learning_identically() {
        let mut original = make_mixture();
        let mut restored = MixtureSnapshot::from_mixture(&original).restore().unwrap();
        for (x, y) in [([0.1, 0.0], 0.9), ([20.0, 20.0], 7.0), ([6.1, 5.9], -1.8)] {
            let a = original.update(&x, y).unwrap();
            let b = restored.update(&x, y).unwrap();
            assert_eq!(a, b);
        }
        assert_eq!(
            MixtureSnapshot::from_mixture(&original),
            MixtureSnapshot::from_mixture(&restored)
        );
    }

    #[test]
    fn test_restore_rejects_tampered_dimension() {
        let mut snapshot = MixtureSnapshot::from_mixture(&make_mixture());
        snapshot.dimension = Some(3);
        assert!(matches!(
            snapshot.restore(),
            Err(MixtureError::DimensionMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_restore_rejects_invalid_config() {
        let mut snapshot = MixtureSnapshot::from_mixture(&make_mixture());
        snapshot.config.initial_variance = -1.0;
        assert!(matches!(snapshot.restore(), Err(MixtureError::InvalidConfig { .. })));
    }

    #[test]
    fn test_restore_rejects_tampered_asymmetric_covariance() {
        let mut snapshot = round_trip(&MixtureSnapshot::from_mixture(&make_mixture()));
        let record = &mut snapshot.clusters[0];
        record.covariance[1] += 0.25;
        assert!(matches!(snapshot.restore(), Err(MixtureError::InvalidSnapshot { .. })));
    }
}
