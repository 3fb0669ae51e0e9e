//! The single-fit driver (component C7).
//!
//! Runs `numRepeats` independent (init, maximize) rounds from fresh random
//! restarts and keeps the best. This is the unit of work CLARA runs once per
//! drawn sample.

use crate::clusters::{ClusterResult, Clusters};
use crate::config::KMedoidsConfig;
use crate::distance::DistanceFn;
use crate::distance_matrix::DistanceMatrix;
use crate::initializer::create_initializer;
use crate::maximizer::create_maximizer;
use crate::Result;
use ndarray::ArrayView2;
use num_traits::Float;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Orchestrates one `fit`: init → maximize → compare against best-so-far,
/// repeated for `num_repeats` restarts.
pub struct KMedoids<T, D> {
    config: KMedoidsConfig<T>,
    metric: D,
    best: Option<ClusterResult<T>>,
}

impl<T, D> KMedoids<T, D>
where
    T: Float + Send + Sync + 'static,
    D: DistanceFn<T>,
{
    /// Builds a driver with the given config and distance metric.
    pub fn new(config: KMedoidsConfig<T>, metric: D) -> Self {
        Self {
            config,
            metric,
            best: None,
        }
    }

    /// Clears the best-so-far result (used between unrelated fits that
    /// share one driver instance, e.g. a CLARA worker reusing its driver).
    pub fn reset(&mut self) {
        self.best = None;
    }

    /// The best result found so far, if `fit` has been called at least once.
    pub fn get_results(&self) -> Option<&ClusterResult<T>> {
        self.best.as_ref()
    }

    /// Runs `num_repeats` independent restarts of (init, maximize) on `data`
    /// and keeps the lowest-error result.
    #[tracing::instrument(skip(self, data), fields(k, num_repeats))]
    pub fn fit(&mut self, data: &ArrayView2<T>, k: usize, num_repeats: usize) -> Result<&ClusterResult<T>> {
        let n = data.nrows();
        let initializer = create_initializer::<T>(self.config.initializer_name())?;
        let maximizer = create_maximizer::<T>(self.config.maximizer_name(), self.config.tolerance())?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed_value());

        for restart in 0..num_repeats {
            let _span = tracing::debug_span!("restart", restart).entered();

            let mut clusters = Clusters::new(n, k)?;
            let mut dist_mat = DistanceMatrix::new(data, &self.metric);
            initializer.initialize(data, &mut clusters, &mut dist_mat, &mut rng)?;
            maximizer.maximize(data, &mut clusters, &mut dist_mat, self.config.parallelism_level())?;
            clusters.check_invariants()?;

            let candidate = clusters.to_result(data);
            self.consider(candidate);
        }

        tracing::debug!(
            error = ?self.best.as_ref().map(|r| r.error),
            "best-of-N fit complete"
        );
        self.best.as_ref().ok_or_else(|| {
            crate::KMedoidsError::InvalidArgument("num_repeats must be at least 1".into())
        })
    }

    /// Compares `candidate` against the current best, keeping the
    /// lower-error one (ties keep the existing/earlier best).
    pub fn consider(&mut self, candidate: ClusterResult<T>) {
        match &self.best {
            Some(current) if !candidate.is_better_than(current) => {}
            _ => self.best = Some(candidate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::euclidean;
    use ndarray::array;

    #[test]
    fn test_fit_trivial_k_equals_n() {
        let data = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let mut driver = KMedoids::new(KMedoidsConfig::new(), euclidean);
        let result = driver.fit(&data.view(), 4, 3).unwrap();
        assert_eq!(result.error, 0.0);
    }

    #[test]
    fn test_consider_tie_keeps_first() {
        let data = array![[0.0]];
        let mut driver = KMedoids::new(KMedoidsConfig::<f64>::new(), euclidean);
        let centroids = crate::matrix::Matrix::from_array(data.clone());
        let first = ClusterResult {
            centroids: centroids.clone(),
            assignments: vec![0],
            distances: vec![0.0],
            error: 1.0,
        };
        let second = ClusterResult {
            centroids,
            assignments: vec![0],
            distances: vec![0.0],
            error: 1.0,
        };
        driver.consider(first);
        driver.consider(second);
        // Both have equal error; the first considered is kept, so the
        // driver never replaces it for a tie.
        assert_eq!(driver.get_results().unwrap().error, 1.0);
    }

    #[test]
    fn test_reset_clears_best() {
        let data = array![[0.0, 0.0], [1.0, 0.0]];
        let mut driver = KMedoids::new(KMedoidsConfig::new(), euclidean);
        driver.fit(&data.view(), 2, 1).unwrap();
        assert!(driver.get_results().is_some());
        driver.reset();
        assert!(driver.get_results().is_none());
    }
}
