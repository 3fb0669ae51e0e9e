//! Uniform sampling without replacement (component C8).
//!
//! CLARA draws a fresh subsample of the full data set for each sampling
//! iteration. The sampler is a thin, RNG-injected wrapper so both the
//! shared-memory and distributed CLARA drivers can draw reproducible
//! samples from a seeded RNG.

use crate::matrix::Matrix;
use crate::{KMedoidsError, Result};
use ndarray::ArrayView2;
use num_traits::Float;
use rand::seq::index::sample;
use rand::RngCore;

/// Draws uniform samples without replacement from a data set.
pub struct Sampler;

impl Sampler {
    /// Copies `size` distinct rows of `data`, drawn uniformly without
    /// replacement, into a fresh [`Matrix`].
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `size` is `0` or exceeds `data.nrows()`.
    pub fn sample<T: Float>(
        &self,
        size: usize,
        data: &ArrayView2<T>,
        rng: &mut dyn RngCore,
    ) -> Result<Matrix<T>> {
        let n = data.nrows();
        if size == 0 || size > n {
            return Err(KMedoidsError::InvalidArgument(format!(
                "sample size ({size}) must be in 1..={n}"
            )));
        }
        // Row order within the sample doesn't affect which points are
        // chosen, only which are; sorting keeps a full-size sample
        // (size == n) identical in row order to `data` itself.
        let mut indices: Vec<usize> = sample(rng, n, size).into_vec();
        indices.sort_unstable();
        let source = Matrix::from_array(data.to_owned());
        Ok(source.select_rows(&indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_sample_size_matches_request() {
        let data = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let sampled = Sampler.sample(3, &data.view(), &mut rng).unwrap();
        assert_eq!(sampled.rows(), 3);
        assert_eq!(sampled.cols(), 1);
    }

    #[test]
    fn test_sample_rejects_zero_or_too_large() {
        let data = array![[0.0], [1.0]];
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert!(Sampler.sample(0, &data.view(), &mut rng).is_err());
        assert!(Sampler.sample(3, &data.view(), &mut rng).is_err());
    }

    #[test]
    fn test_sample_deterministic_given_seed() {
        let data = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let run = |seed: u64| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let sampled = Sampler.sample(2, &data.view(), &mut rng).unwrap();
            (0..sampled.rows())
                .map(|r| sampled.get(r, 0))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }
}
