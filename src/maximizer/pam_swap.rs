//! PAM swap maximizer (component C6).
//!
//! Evaluates every `(medoid slot, candidate)` swap via a k×n dissimilarity
//! matrix Δ, applies the single most-improving swap, and repeats until no
//! swap improves the objective by more than a relative tolerance. Each
//! medoid slot's row of Δ is computed independently of every other slot, so
//! the [`Parallelism::Omp`]/[`Parallelism::Hybrid`] levels compute rows via
//! `rayon` and assemble them — the idiomatic equivalent of the original's
//! `#pragma omp parallel for schedule(static)` over disjoint row writes.

use crate::clusters::Clusters;
use crate::distance_matrix::DistanceMatrix;
use crate::matrix::Matrix;
use crate::maximizer::Maximizer;
use crate::parallelism::Parallelism;
use crate::Result;
use ndarray::ArrayView2;
use num_traits::Float;
use rayon::prelude::*;

/// The classic PAM swap maximizer, registered as `"pam_swap"`.
pub struct PamSwap<T> {
    /// Multiplies `error / n` to derive the termination tolerance; a swap
    /// must improve the objective by more than this relative magnitude to
    /// be accepted. Defaults to `0.01` (see [`crate::config::KMedoidsConfig`]).
    tolerance_factor: T,
}

impl<T: Float> PamSwap<T> {
    /// Builds a maximizer with the given tolerance factor.
    pub fn new(tolerance_factor: T) -> Self {
        Self { tolerance_factor }
    }
}

impl<T: Float> Default for PamSwap<T> {
    fn default() -> Self {
        Self::new(T::from(0.01).expect("0.01 representable in T"))
    }
}

impl<T> Maximizer<T> for PamSwap<T>
where
    T: Float + Send + Sync,
{
    fn maximize(
        &self,
        _data: &ArrayView2<T>,
        clusters: &mut Clusters<T>,
        dist_mat: &mut DistanceMatrix<T>,
        parallelism: Parallelism,
    ) -> Result<()> {
        clusters.recompute_from_dist_mat(dist_mat);

        let n = clusters.working_set_size();
        let tolerance = -self.tolerance_factor
            * (clusters.error() / T::from(n).expect("n representable in T"));

        loop {
            let rows = compute_dissimilarity_rows(clusters, dist_mat, parallelism.parallel_inner_loop());

            let mut dissimilarity = Matrix::filled(clusters.size(), n, T::max_value());
            for (slot, row) in rows.into_iter().enumerate() {
                let row = ndarray::Array1::from_vec(row);
                dissimilarity.set_row(slot, &row.view());
            }

            let ((slot, candidate), min_value) = dissimilarity.find_min();
            if min_value >= tolerance {
                break;
            }

            let replaced = clusters.swap_centroid(slot, candidate);
            dist_mat.update_swap(slot, candidate);
            tracing::debug!(slot, candidate, replaced, "accepted PAM swap");
        }

        clusters.recompute_from_dist_mat(dist_mat);
        Ok(())
    }
}

/// Computes one row of Δ per medoid slot, optionally via `rayon`.
fn compute_dissimilarity_rows<T>(
    clusters: &Clusters<T>,
    dist_mat: &DistanceMatrix<T>,
    parallel: bool,
) -> Vec<Vec<T>>
where
    T: Float + Send + Sync,
{
    let k = clusters.size();
    if parallel {
        (0..k)
            .into_par_iter()
            .map(|slot| dissimilarity_row(slot, clusters, dist_mat))
            .collect()
    } else {
        (0..k)
            .map(|slot| dissimilarity_row(slot, clusters, dist_mat))
            .collect()
    }
}

/// Computes Δ[slot, ·]: for each unselected candidate, the predicted change
/// in total error if `slot`'s medoid were replaced by that candidate.
fn dissimilarity_row<T>(slot: usize, clusters: &Clusters<T>, dist_mat: &DistanceMatrix<T>) -> Vec<T>
where
    T: Float,
{
    let n = clusters.working_set_size();
    let unselected = clusters.unselected();
    let mut totals = vec![T::max_value(); n];

    for &candidate in unselected {
        let mut acc = T::zero();
        for &point in unselected {
            if point == candidate {
                continue;
            }
            let a = dist_mat.distance_to_centroid(point, slot);
            let b = dist_mat.distance_to_closest_centroid(point);
            let q = dist_mat.distance_to_point(candidate, point);

            // `a` is one of point's medoid distances and `b` is the minimum
            // over all of them, so a < b cannot happen; if it ever does
            // (numerical edge case) fold it into the a == b branch below.
            let contribution = if a > b {
                let diff = q - b;
                if diff < T::zero() {
                    diff
                } else {
                    T::zero()
                }
            } else {
                let second_closest = clusters.second_closest_distance(dist_mat, point);
                let m = if second_closest < q { second_closest } else { q };
                m - b
            };
            acc = acc + contribution;
        }
        totals[candidate] = acc;
    }
    totals
}
