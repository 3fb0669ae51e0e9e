//! Runtime parallelism level selector (component C11).
//!
//! The original design picks parallelism at compile time via a type
//! parameter; here it is a single runtime enum so one binary can switch
//! strategies via configuration. The level governs two independent axes:
//! whether the PAM swap-evaluation inner loop runs sequentially or via
//! `rayon`, and whether CLARA's outer sampling loop runs in-process or
//! across the distributed master/worker threads.

use crate::{KMedoidsError, Result};

/// Factory string for [`Parallelism::Serial`].
pub const SERIAL: &str = "serial";
/// Factory string for [`Parallelism::Omp`].
pub const OMP: &str = "omp";
/// Factory string for [`Parallelism::Mpi`].
pub const MPI: &str = "mpi";
/// Factory string for [`Parallelism::Hybrid`].
pub const HYBRID: &str = "hybrid";

/// Selects how the swap-evaluation inner loop and CLARA's outer sampling
/// loop are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    /// Sequential inner loop, sequential (single-process) outer loop.
    Serial,
    /// `rayon`-parallel inner loop, sequential outer loop.
    Omp,
    /// Sequential inner loop, distributed master/worker outer loop.
    Mpi,
    /// `rayon`-parallel inner loop, distributed master/worker outer loop.
    Hybrid,
}

impl Parallelism {
    /// Whether the swap-evaluation inner loop should run in parallel.
    pub fn parallel_inner_loop(self) -> bool {
        matches!(self, Parallelism::Omp | Parallelism::Hybrid)
    }

    /// Whether the CLARA outer sampling loop should run distributed.
    pub fn distributed_outer_loop(self) -> bool {
        matches!(self, Parallelism::Mpi | Parallelism::Hybrid)
    }

    /// Renders the level as its canonical factory string.
    pub fn as_str(self) -> &'static str {
        match self {
            Parallelism::Serial => SERIAL,
            Parallelism::Omp => OMP,
            Parallelism::Mpi => MPI,
            Parallelism::Hybrid => HYBRID,
        }
    }

    /// Parses a level from its canonical factory string.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for any string other than `"serial"`,
    /// `"omp"`, `"mpi"`, or `"hybrid"` (case-sensitive).
    pub fn from_str_token(token: &str) -> Result<Self> {
        match token {
            SERIAL => Ok(Parallelism::Serial),
            OMP => Ok(Parallelism::Omp),
            MPI => Ok(Parallelism::Mpi),
            HYBRID => Ok(Parallelism::Hybrid),
            other => Err(KMedoidsError::InvalidArgument(format!(
                "unrecognized parallelism token: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_levels() {
        for level in [
            Parallelism::Serial,
            Parallelism::Omp,
            Parallelism::Mpi,
            Parallelism::Hybrid,
        ] {
            let token = level.as_str();
            assert_eq!(Parallelism::from_str_token(token).unwrap(), level);
        }
    }

    #[test]
    fn test_unknown_token_is_invalid_argument() {
        assert!(matches!(
            Parallelism::from_str_token("gpu"),
            Err(KMedoidsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_axis_flags() {
        assert!(!Parallelism::Serial.parallel_inner_loop());
        assert!(!Parallelism::Serial.distributed_outer_loop());
        assert!(Parallelism::Omp.parallel_inner_loop());
        assert!(!Parallelism::Omp.distributed_outer_loop());
        assert!(!Parallelism::Mpi.parallel_inner_loop());
        assert!(Parallelism::Mpi.distributed_outer_loop());
        assert!(Parallelism::Hybrid.parallel_inner_loop());
        assert!(Parallelism::Hybrid.distributed_outer_loop());
    }
}
