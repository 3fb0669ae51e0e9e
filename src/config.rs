//! Configuration surface for the clustering engine.
//!
//! Mirrors the builder pattern already used elsewhere in this codebase for
//! algorithm structs (chained setters returning `Self`), so the config type
//! reads the same way `KMeansBuilder`/`DBSCAN::new().metric(..)` do.

use crate::maximizer::PAM;
use crate::parallelism::Parallelism;
use num_traits::Float;

/// Shared configuration for [`crate::kmedoids::KMedoids`] and the CLARA
/// drivers.
#[derive(Debug, Clone)]
pub struct KMedoidsConfig<T> {
    initializer: String,
    maximizer: String,
    parallelism: Parallelism,
    tolerance_factor: T,
    seed: u64,
}

impl<T: Float> KMedoidsConfig<T> {
    /// A config with the default initializer (`"random"`), default
    /// maximizer (`"pam_swap"`), serial execution, tolerance factor `0.01`,
    /// and a fixed seed of `0`.
    pub fn new() -> Self {
        Self {
            initializer: crate::initializer::RANDOM.to_string(),
            maximizer: PAM.to_string(),
            parallelism: Parallelism::Serial,
            tolerance_factor: T::from(0.01).expect("0.01 representable in T"),
            seed: 0,
        }
    }

    /// Overrides the initializer factory string.
    pub fn initializer(mut self, name: impl Into<String>) -> Self {
        self.initializer = name.into();
        self
    }

    /// Overrides the maximizer factory string.
    pub fn maximizer(mut self, name: impl Into<String>) -> Self {
        self.maximizer = name.into();
        self
    }

    /// Overrides the parallelism level.
    pub fn parallelism(mut self, level: Parallelism) -> Self {
        self.parallelism = level;
        self
    }

    /// Overrides the PAM termination tolerance factor (default `0.01`).
    pub fn tolerance_factor(mut self, factor: T) -> Self {
        self.tolerance_factor = factor;
        self
    }

    /// Overrides the RNG seed used by the sampler/initializer.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub(crate) fn initializer_name(&self) -> &str {
        &self.initializer
    }

    pub(crate) fn maximizer_name(&self) -> &str {
        &self.maximizer
    }

    /// The configured parallelism level.
    pub fn parallelism_level(&self) -> Parallelism {
        self.parallelism
    }

    pub(crate) fn tolerance(&self) -> T {
        self.tolerance_factor
    }

    /// The configured RNG seed.
    pub fn seed_value(&self) -> u64 {
        self.seed
    }
}

impl<T: Float> Default for KMedoidsConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Default CLARA sample-size calculation: `40 + 2k`, per the original
/// heuristic for "large enough to be representative, small enough for PAM
/// to stay cheap".
pub fn default_sample_size(_num_data: usize, num_clusters: usize) -> usize {
    40 + 2 * num_clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = KMedoidsConfig::<f64>::new();
        assert_eq!(cfg.initializer_name(), "random");
        assert_eq!(cfg.maximizer_name(), "pam_swap");
        assert_eq!(cfg.parallelism_level(), Parallelism::Serial);
        assert_eq!(cfg.tolerance(), 0.01);
    }

    #[test]
    fn test_default_sample_size() {
        assert_eq!(default_sample_size(10_000, 5), 50);
    }
}
