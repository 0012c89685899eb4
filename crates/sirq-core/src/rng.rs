//! Deterministic run-level RNG and seed derivation.
//!
//! # Determinism strategy
//!
//! A batch is reproducible from one master seed.  Every run gets its own
//! `SmallRng` seeded by:
//!
//!   seed = splitmix64(master_seed XOR (scenario_index * MIXING_CONSTANT))
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive indices uniformly across the seed space; the
//! SplitMix64 finalizer removes the remaining linear structure.  This means:
//!
//! - A run's seed depends only on the master seed and its scenario index,
//!   never on which worker thread picked it up or in what order.
//! - Runs never share RNG state, so they can execute in parallel.
//! - Inside one run every random draw comes from a single `RunRng`
//!   consumed in a fixed order, so the same seed replays the same run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derive an independent run seed from a master seed and a scenario index.
pub fn derive_seed(master_seed: u64, index: u64) -> u64 {
    let mut z = master_seed ^ index.wrapping_add(1).wrapping_mul(MIXING_CONSTANT);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

// ── RunRng ────────────────────────────────────────────────────────────────────

/// Per-run deterministic RNG.
///
/// Owned by exactly one run (the arrival generator holds it).  The type is
/// `Send` but not shared; parallel batches give each run its own instance.
pub struct RunRng(SmallRng);

impl RunRng {
    pub fn new(seed: u64) -> Self {
        RunRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types
    /// (`dist.sample(rng.inner())`, etc.)
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Exponentially distributed sample with the given rate (events per unit
    /// time), by inverse CDF.  Returns `f64::INFINITY` for a non-positive rate.
    pub fn exponential(&mut self, rate: f64) -> f64 {
        if rate <= 0.0 {
            return f64::INFINITY;
        }
        let u: f64 = self.0.r#gen();
        let u = u.max(1e-12); // avoid ln(0)
        -u.ln() / rate
    }
}
