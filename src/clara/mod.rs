//! CLARA: clustering large applications via repeated subsampling.
//!
//! Both drivers here run the C7 [`KMedoids`](crate::kmedoids::KMedoids) fit on
//! subsamples and reproject each result onto the full data set, keeping the
//! best. [`SharedMemoryClara`] draws and fits samples in-process;
//! [`DistributedClara`] distributes that same work across a master/worker
//! thread topology over [`transport`] channels.

pub mod distributed;
pub mod shared;
pub mod transport;

pub use distributed::DistributedClara;
pub use shared::SharedMemoryClara;

use crate::config::{default_sample_size, KMedoidsConfig};
use crate::{KMedoidsError, Result};

/// Configuration shared by both CLARA drivers: how many samples to draw, how
/// large each sample is, and the [`KMedoidsConfig`] each per-sample fit uses.
#[derive(Debug, Clone)]
pub struct ClaraConfig<T> {
    num_sampling_iters: usize,
    sample_size: Option<usize>,
    fit_config: KMedoidsConfig<T>,
}

impl<T: num_traits::Float> ClaraConfig<T> {
    /// A config with `num_sampling_iters` draws and the default
    /// `40 + 2k` sample-size heuristic.
    pub fn new(num_sampling_iters: usize) -> Self {
        Self {
            num_sampling_iters,
            sample_size: None,
            fit_config: KMedoidsConfig::new(),
        }
    }

    /// Overrides the per-sample fit configuration (initializer, maximizer,
    /// parallelism, tolerance, seed).
    pub fn fit_config(mut self, fit_config: KMedoidsConfig<T>) -> Self {
        self.fit_config = fit_config;
        self
    }

    /// Overrides the sample size instead of using `sampleSizeCalc(n, k)`.
    pub fn sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    /// Resolves the sample size to use for a fit over `n` points with `k`
    /// clusters: the configured override, or `default_sample_size(n, k)`.
    ///
    /// Does not clamp to `n`: a resolved size exceeding `n` surfaces as
    /// `InvalidArgument` from `Sampler::sample` rather than silently
    /// degrading to a smaller sample.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the resolved size is below `k`.
    pub fn resolve_sample_size(&self, n: usize, k: usize) -> Result<usize> {
        let size = self.sample_size.unwrap_or_else(|| default_sample_size(n, k));
        if size < k {
            return Err(KMedoidsError::InvalidArgument(format!(
                "sample size ({size}) must be at least k ({k})"
            )));
        }
        Ok(size)
    }

    /// The number of subsamples to draw.
    pub fn num_sampling_iters(&self) -> usize {
        self.num_sampling_iters
    }

    /// The per-sample fit configuration.
    pub fn fit_config_ref(&self) -> &KMedoidsConfig<T> {
        &self.fit_config
    }
}
