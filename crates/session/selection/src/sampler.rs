//! Proportional random selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks one candidate with probability `weight / total`.
///
/// Zero weights are raised to one so every candidate stays reachable.
#[derive(Debug)]
pub struct WeightedSampler<R = StdRng> {
    rng: R,
}

impl WeightedSampler<StdRng> {
    /// Sampler seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic sampler for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for WeightedSampler<StdRng> {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl<R: Rng> WeightedSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Sample using `weight` to score each candidate once, in order.
    pub fn sample<'a, T>(
        &mut self,
        candidates: &'a [T],
        weight: impl FnMut(&T) -> u64,
    ) -> Option<&'a T> {
        let weights: Vec<u64> = candidates.iter().map(weight).collect();
        self.sample_weighted(candidates, &weights)
    }

    /// Sample with precomputed weights, `weights[i]` belonging to `candidates[i]`.
    pub fn sample_weighted<'a, T>(&mut self, candidates: &'a [T], weights: &[u64]) -> Option<&'a T> {
        if candidates.is_empty() {
            return None;
        }
        let r: f64 = self.rng.random();
        pick(r, candidates, weights)
    }
}

/// Walk the candidates accumulating normalised weight, returning the first
/// whose running sum exceeds `r`.
///
/// When rounding leaves the sum at or below `r`, the last candidate is
/// returned. Missing weights count as one.
pub(crate) fn pick<'a, T>(r: f64, candidates: &'a [T], weights: &[u64]) -> Option<&'a T> {
    let last = candidates.last()?;
    let weight_at = |i: usize| weights.get(i).copied().unwrap_or(1).max(1) as f64;

    let total: f64 = (0..candidates.len()).map(weight_at).sum();
    let mut counted = 0.0;
    for (i, candidate) in candidates.iter().enumerate() {
        counted += weight_at(i) / total;
        if counted > r {
            return Some(candidate);
        }
    }

    Some(last)
}
