//! # kmedoids-engine
//!
//! PAM (Partition Around Medoids) and CLARA (Clustering LARge Applications)
//! k-medoids clustering, with serial, data-parallel, and distributed
//! master/worker execution behind one runtime-selectable parallelism level.
//!
//! ## Features
//!
//! - **PAM**: exact (quadratic) swap-based medoid search
//! - **CLARA**: PAM over random subsamples, best-of-N reprojected onto the full data
//! - **Parallelism**: `Serial`, `OMP` (data-parallel swap evaluation via `rayon`),
//!   `MPI` (distributed sampling over threads), `Hybrid` (both)

pub mod clara;
pub mod clusters;
pub mod config;
pub mod distance;
pub mod distance_matrix;
pub mod initializer;
pub mod kmedoids;
pub mod matrix;
pub mod maximizer;
pub mod parallelism;
pub mod prelude;
pub mod sampler;

pub use prelude::*;

/// Common error type for k-medoids operations.
#[derive(Debug, thiserror::Error)]
pub enum KMedoidsError {
    /// A caller-supplied parameter is out of range or otherwise nonsensical
    /// (k ≤ 0, k > n, a bad sample size, an unknown strategy string).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal invariant was violated (selected/unselected partition
    /// broken, an out-of-range assignment). Indicates an implementation bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The distributed transport failed to send or receive a message.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, KMedoidsError>;
