use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used when a scenario does not name one.
pub const DEFAULT_SEED: u64 = 10_000_000_000;

/// Source of uniform draws in `[0, 1)`.
///
/// A single stream is shared by every transition in a run, so the order in
/// which systems consume it is part of the model's reproducibility contract.
pub trait RandomStream {
    fn next_uniform(&mut self) -> f64;

    fn uniforms(&mut self, count: usize) -> Vec<f64> {
        (0..count).map(|_| self.next_uniform()).collect()
    }

    /// Number of draws consumed so far.
    fn draws(&self) -> u64;
}

pub struct SeededStream {
    seed: u64,
    inner: ChaCha8Rng,
    draws: u64,
}

impl SeededStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeededStream {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomStream for SeededStream {
    fn next_uniform(&mut self) -> f64 {
        self.draws += 1;
        self.inner.gen::<f64>()
    }

    fn draws(&self) -> u64 {
        self.draws
    }
}

/// Plays back a fixed list of draws, wrapping around when exhausted.
/// An empty list yields `0.0` forever.
#[derive(Debug, Clone)]
pub struct ReplayStream {
    values: Vec<f64>,
    draws: u64,
}

impl ReplayStream {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        debug_assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
        Self { values, draws: 0 }
    }
}

impl RandomStream for ReplayStream {
    fn next_uniform(&mut self) -> f64 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[(self.draws % self.values.len() as u64) as usize]
        };
        self.draws += 1;
        value
    }

    fn draws(&self) -> u64 {
        self.draws
    }
}
