//! Random policy for smoke tests and baselines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::Policy;

/// Uniformly random action values in `[0, 1)`.
pub struct RandomPolicy {
    action_dim: usize,
    rng: StdRng,
}

impl RandomPolicy {
    /// Creates a new random policy.
    ///
    /// # Arguments
    ///
    /// * `action_dim` - Length of each action vector.
    /// * `seed` - RNG seed, for reproducible runs.
    pub fn new(action_dim: usize, seed: u64) -> Self {
        Self {
            action_dim,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn select_actions(&mut self, observations: &[Vec<f32>]) -> Vec<Vec<f32>> {
        (0..observations.len())
            .map(|_| (0..self.action_dim).map(|_| self.rng.gen::<f32>()).collect())
            .collect()
    }

    fn name(&self) -> &str {
        "random"
    }
}
