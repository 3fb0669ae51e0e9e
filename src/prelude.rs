//! Convenient re-exports for common k-medoids operations

pub use crate::{KMedoidsError, Result};

pub use crate::clara::{ClaraConfig, DistributedClara, SharedMemoryClara};
pub use crate::clusters::{ClusterResult, Clusters};
pub use crate::config::KMedoidsConfig;
pub use crate::distance::{euclidean, manhattan, DistanceFn};
pub use crate::distance_matrix::DistanceMatrix;
pub use crate::initializer::{create_initializer, Initializer, RandomInitializer, RANDOM};
pub use crate::kmedoids::KMedoids;
pub use crate::matrix::Matrix;
pub use crate::maximizer::{create_maximizer, Maximizer, PamSwap, PAM};
pub use crate::parallelism::Parallelism;
pub use crate::sampler::Sampler;

// Common types
pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
