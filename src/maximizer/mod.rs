//! Maximizer contract (component C6 interface).
//!
//! A maximizer iteratively improves a [`Clusters`] under some local-search
//! neighborhood. The only shipped implementation is [`pam_swap::PamSwap`],
//! registered under the factory string [`PAM`].

pub mod pam_swap;

use crate::clusters::Clusters;
use crate::distance_matrix::DistanceMatrix;
use crate::parallelism::Parallelism;
use crate::{KMedoidsError, Result};
use ndarray::ArrayView2;
use num_traits::Float;
use std::sync::Arc;

pub use pam_swap::PamSwap;

/// Factory string for [`PamSwap`].
pub const PAM: &str = "pam_swap";

/// Improves `clusters` in place under some local-search neighborhood.
pub trait Maximizer<T>: Sync {
    /// Mutates `clusters` (and the derived fields of `dist_mat`) toward a
    /// local optimum under `parallelism`.
    fn maximize(
        &self,
        data: &ArrayView2<T>,
        clusters: &mut Clusters<T>,
        dist_mat: &mut DistanceMatrix<T>,
        parallelism: Parallelism,
    ) -> Result<()>;
}

/// Resolves a maximizer by its factory string.
///
/// # Errors
/// Returns `InvalidArgument` for any string other than [`PAM`].
pub fn create_maximizer<T>(name: &str, tolerance_factor: T) -> Result<Arc<dyn Maximizer<T> + Send + Sync>>
where
    T: Float + Send + Sync + 'static,
{
    match name {
        PAM => Ok(Arc::new(PamSwap::new(tolerance_factor))),
        other => Err(KMedoidsError::InvalidArgument(format!(
            "unrecognized maximizer: {other}"
        ))),
    }
}
