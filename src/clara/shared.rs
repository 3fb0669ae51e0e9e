//! In-process CLARA driver (component C9).

use crate::clara::ClaraConfig;
use crate::clusters::ClusterResult;
use crate::distance::DistanceFn;
use crate::kmedoids::KMedoids;
use crate::sampler::Sampler;
use crate::Result;
use ndarray::ArrayView2;
use num_traits::Float;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Draws `num_sampling_iters` subsamples, fits each with [`KMedoids`], and
/// reprojects the per-sample medoid coordinates onto the full data set,
/// keeping the best full-data result.
pub struct SharedMemoryClara<T, D> {
    config: ClaraConfig<T>,
    metric: D,
}

impl<T, D> SharedMemoryClara<T, D>
where
    T: Float + Send + Sync + 'static,
    D: DistanceFn<T> + Clone,
{
    /// Builds a driver with the given CLARA config and distance metric.
    pub fn new(config: ClaraConfig<T>, metric: D) -> Self {
        Self { config, metric }
    }

    /// Runs the CLARA outer loop and returns the best full-data result.
    #[tracing::instrument(skip(self, data), fields(k, num_repeats))]
    pub fn fit(
        &self,
        data: &ArrayView2<T>,
        k: usize,
        num_repeats: usize,
    ) -> Result<ClusterResult<T>> {
        let n = data.nrows();
        let sample_size = self.config.resolve_sample_size(n, k)?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.fit_config_ref().seed_value());
        let sampler = Sampler;

        let mut best: Option<ClusterResult<T>> = None;
        for iter in 0..self.config.num_sampling_iters() {
            let _span = tracing::debug_span!("sampling_iter", iter).entered();

            let sample = sampler.sample(sample_size, data, &mut rng)?;
            let mut driver = KMedoids::new(self.config.fit_config_ref().clone(), self.metric.clone());
            let sample_result = driver.fit(&sample.as_array().view(), k, num_repeats)?;

            let reprojected =
                ClusterResult::from_centroids(data, &sample_result.centroids, &self.metric);
            tracing::debug!(iter, error = ?reprojected.error, "reprojected sample onto full data");

            match &best {
                Some(current) if !reprojected.is_better_than(current) => {}
                _ => best = Some(reprojected),
            }
        }

        tracing::debug!(error = ?best.as_ref().map(|r| r.error), "CLARA fit complete");
        best.ok_or_else(|| {
            crate::KMedoidsError::InvalidArgument("num_sampling_iters must be at least 1".into())
        })
    }
}
