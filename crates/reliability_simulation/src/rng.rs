//! Seeded random number generator for simulation runs.
//!
//! [`SimulationRng`] wraps a `StdRng` and remembers its seed so that every
//! run can be reproduced from its result.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Simulation random number generator.
///
/// Implements [`RngCore`], so it can be handed to
/// [`Distribution::sample`](reliability_models::distribution::Distribution::sample)
/// as `&mut dyn RngCore`.
///
/// # Examples
///
/// ```rust
/// use reliability_simulation::rng::SimulationRng;
///
/// let mut a = SimulationRng::from_seed(12345);
/// let mut b = SimulationRng::from_seed(12345);
/// assert_eq!(a.gen_uniform(), b.gen_uniform());
/// assert_eq!(a.seed(), 12345);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationRng {
    inner: StdRng,
    seed: u64,
}

impl SimulationRng {
    /// Creates a generator initialised with `seed`.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a generator with a seed drawn from the thread-local entropy
    /// source. The seed is still recorded.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    /// Seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in [0, 1).
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Standard normal value.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Fills `buffer` with standard normal values.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }

    /// Random permutation of `0..n`.
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut self.inner);
        indices
    }
}

impl RngCore for SimulationRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimulationRng::from_seed(7);
        let mut b = SimulationRng::from_seed(7);
        for _ in 0..100 {
            assert_eq!(a.gen_normal(), b.gen_normal());
        }
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = SimulationRng::from_seed(1);
        let mut b = SimulationRng::from_seed(2);
        let xs: Vec<f64> = (0..10).map(|_| a.gen_uniform()).collect();
        let ys: Vec<f64> = (0..10).map(|_| b.gen_uniform()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_entropy_seed_recorded() {
        let rng = SimulationRng::from_entropy();
        let mut replay = SimulationRng::from_seed(rng.seed());
        let mut rng = rng;
        assert_eq!(rng.gen_uniform(), replay.gen_uniform());
    }

    #[test]
    fn test_fill_normal_moments() {
        let mut rng = SimulationRng::from_seed(42);
        let mut buffer = vec![0.0; 20_000];
        rng.fill_normal(&mut buffer);
        let mean = buffer.iter().sum::<f64>() / buffer.len() as f64;
        let var = buffer.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / buffer.len() as f64;
        assert!(mean.abs() < 0.05);
        assert!((var - 1.0).abs() < 0.05);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_permutation_is_bijection(seed in any::<u64>(), n in 0usize..200) {
            let mut rng = SimulationRng::from_seed(seed);
            let mut perm = rng.permutation(n);
            perm.sort_unstable();
            prop_assert_eq!(perm, (0..n).collect::<Vec<_>>());
        }

        #[test]
        fn prop_uniform_in_unit_interval(seed in any::<u64>()) {
            let mut rng = SimulationRng::from_seed(seed);
            for _ in 0..50 {
                let u = rng.gen_uniform();
                prop_assert!((0.0..1.0).contains(&u));
            }
        }
    }
}
