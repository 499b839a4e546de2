//! Deterministic random number generation for reproducible episodes.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical trajectories
//! - **Single abstraction**: uniform draws, Bernoulli trials, Gaussian
//!   perturbations, and weighted distinct sampling all come from one
//!   engine-owned value
//!
//! The engine owns its `GameRng`; policies and the oracle borrow it for the
//! duration of a call. Consumption order is fixed, so a seed pins an entire
//! episode.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Deterministic RNG shared by the oracle and the policies.
///
/// Uses ChaCha8 for speed while maintaining high-quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was constructed with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// One Bernoulli trial with the given probability of `true`.
    ///
    /// Probabilities are clamped to `[0, 1]` so accumulated floating-point
    /// drift in callers cannot panic the underlying distribution.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Uniform draw in `[0, 1)`.
    pub fn gen_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// One draw from `Normal(mean, stdev)`.
    ///
    /// A zero (or non-finite) standard deviation returns the mean exactly,
    /// without consuming randomness.
    pub fn sample_normal(&mut self, mean: f64, stdev: f64) -> f64 {
        if stdev <= 0.0 || !stdev.is_finite() {
            return mean;
        }
        let normal = Normal::new(mean, stdev).expect("stdev checked finite and positive");
        normal.sample(&mut self.inner)
    }

    /// Choose a random element index with weighted probability.
    ///
    /// Weights do not need to sum to 1. Returns `None` if weights are empty
    /// or all zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f64>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold <= 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return the last index
        Some(weights.len() - 1)
    }

    /// Sample `k` distinct indices from `0..n` uniformly without replacement.
    ///
    /// Returned indices are in ascending order. Panics if `k > n`.
    pub fn sample_distinct_uniform(&mut self, k: usize, n: usize) -> Vec<usize> {
        assert!(k <= n, "cannot draw {k} distinct indices from {n}");

        // Partial Fisher-Yates over an index pool.
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = self.inner.gen_range(i..n);
            pool.swap(i, j);
        }
        let mut chosen = pool[..k].to_vec();
        chosen.sort_unstable();
        chosen
    }

    /// Sample `k` distinct indices from a discrete distribution, rejecting
    /// repeats.
    ///
    /// Returned indices are in ascending order. Panics if `k` exceeds the
    /// number of positive-probability entries.
    pub fn sample_distinct_weighted(&mut self, k: usize, probs: &[f64]) -> Vec<usize> {
        let positive = probs.iter().filter(|&&p| p > 0.0).count();
        assert!(
            k <= positive,
            "cannot draw {k} distinct indices from {positive} positive-probability entries"
        );

        let mut chosen: Vec<usize> = Vec::with_capacity(k);
        while chosen.len() < k {
            let idx = self
                .choose_weighted(probs)
                .expect("positive entries checked above");
            if !chosen.contains(&idx) {
                chosen.push(idx);
            }
        }
        chosen.sort_unstable();
        chosen
    }
}
