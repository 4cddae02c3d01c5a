//! Random sources for spawning
//!
//! The simulation only ever asks for uniform samples in [0, 1). Hosts get a
//! seeded PCG stream; tests can script the exact sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform sample source used by the spawner and starfield
pub trait SpawnRng {
    /// Next sample in [0, 1)
    fn unit(&mut self) -> f32;

    /// Next sample in [lo, lo + span)
    fn range(&mut self, lo: f32, span: f32) -> f32 {
        lo + self.unit() * span
    }
}

/// Seeded, reproducible source
#[derive(Debug, Clone)]
pub struct PcgSource {
    seed: u64,
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SpawnRng for PcgSource {
    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
/// An empty list yields 0.0 forever.
#[derive(Debug, Clone, Default)]
pub struct SequenceRng {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Every sample is `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl SpawnRng for SequenceRng {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        // Keep scripted values inside the contract
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}
