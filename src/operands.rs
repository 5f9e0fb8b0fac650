//! Reproducible operand generation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Produces uniform `[0, 1)` single-precision matrices from one seeded stream.
///
/// A run creates a single generator, so the operands for a given size depend
/// on the seed and on the sizes drawn before it.
pub struct OperandGenerator {
    rng: ChaCha8Rng,
}

impl OperandGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Row-major data for an `n x n` matrix.
    pub fn matrix(&mut self, n: usize) -> Vec<f32> {
        (0..n * n).map(|_| self.rng.gen::<f32>()).collect()
    }

    pub fn pair(&mut self, n: usize) -> (Vec<f32>, Vec<f32>) {
        let a = self.matrix(n);
        let b = self.matrix(n);
        (a, b)
    }
}
