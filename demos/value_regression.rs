//! # Online Value Regression Demo
//!
//! Streams noisy samples of a 1-D return curve into a mixture, one at a time,
//! and shows how clusters appear as new regions are visited and how the blended
//! prediction tightens with experience. Then runs a two-action bank on a
//! corridor task and prints the greedy policy it settles on.
//!
//! Run with: `RUST_LOG=igmm_core=debug cargo run --example value_regression`

use igmm_core::{GaussianMixture, MixtureBank, MixtureConfig, MixtureError, UpdateOutcome};
use tracing_subscriber::EnvFilter;

// ── Environment ──────────────────────────────────────────────────────────────

/// Deterministic linear congruential generator so runs are repeatable.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Return curve the mixture has to learn: a hill at 2 and a pit at 7.
fn true_return(x: f64) -> f64 {
    3.0 * (-(x - 2.0) * (x - 2.0)).exp() - 2.0 * (-(x - 7.0) * (x - 7.0) / 2.0).exp()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Move {
    Back,
    Forward,
}

/// Corridor of length 10: the goal is at the far end, a trap sits at 3.
fn corridor_payoff(position: f64, action: Move) -> f64 {
    match action {
        Move::Forward if position > 2.0 && position < 4.0 => -1.0,
        Move::Forward => position / 10.0,
        Move::Back => 0.1,
    }
}

// ── Display helpers ───────────────────────────────────────────────────────────

fn bar(v: f64) -> String {
    let filled = ((v + 2.0) * 5.0).round().clamp(0.0, 25.0) as usize;
    format!("{}{} {:+.3}", "█".repeat(filled), "░".repeat(25 - filled), v)
}

fn curve(gmm: &GaussianMixture) -> Result<(), MixtureError> {
    for step in 0..=10 {
        let x = step as f64;
        let predicted = gmm.predict(&[x])?;
        println!("  x={:>4.1}  {}  (true {:+.3})", x, bar(predicted), true_return(x));
    }
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<(), MixtureError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║  Incremental Gaussian Mixture Regression — online value learning ║");
    println!("╚══════════════════════════════════════════════════════════════════╝\n");

    let mut rng = Lcg(0x5eed);
    let mut gmm = GaussianMixture::new(MixtureConfig::new(0.25, 0.05).with_dimension(1))?;

    for (phase, samples) in [("first pass", 50), ("after 500 samples", 450), ("after 3000 samples", 2500)] {
        let mut created = 0;
        for _ in 0..samples {
            let x = rng.next_f64() * 10.0;
            let noise = (rng.next_f64() - 0.5) * 0.2;
            if let UpdateOutcome::Created { .. } = gmm.update(&[x], true_return(x) + noise)? {
                created += 1;
            }
        }
        println!(
            "▶  {} — {} clusters ({} new), accumulated responsibility {:.1}\n",
            phase,
            gmm.len(),
            created,
            gmm.total_accumulated_responsibility()
        );
        curve(&gmm)?;
        println!();
    }

    println!("▶  Cluster summary\n");
    for (i, cluster) in gmm.clusters().iter().enumerate() {
        println!(
            "  #{:<3} mean {:>6.2}  var {:>7.4}  value {:+.3}  weight {:.3}",
            i,
            cluster.mean()[0],
            cluster.covariance()[(0, 0)],
            cluster.value(),
            cluster.mixing_weight()
        );
    }
    println!();

    // ── Two actions, one mixture each ────────────────────────────────────────
    println!("▶  Corridor: one mixture per action, greedy policy\n");

    let mut bank = MixtureBank::new(MixtureConfig::new(0.1, 0.05).with_dimension(1))?;
    for _ in 0..2000 {
        let position = rng.next_f64() * 10.0;
        for action in [Move::Back, Move::Forward] {
            bank.update(&action, &[position], corridor_payoff(position, action))?;
        }
    }
    for step in 0..10 {
        let position = step as f64 + 0.5;
        if let Some((action, value)) = bank.greedy(&[position])? {
            println!("  pos {:>4.1}  → {:?} ({:+.3})", position, action, value);
        }
    }

    Ok(())
}
