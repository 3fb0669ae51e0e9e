//! Mutable clustering state and the externally-exposed result bundle
//! (component C4).
//!
//! [`Clusters`] is the index-based state PAM operates on: which rows of the
//! working set are medoids, which are candidates, and the per-point
//! assignment/distance/error derived from that medoid set. [`ClusterResult`]
//! is the coordinate-based bundle exposed at the API surface (used directly
//! by CLARA's reprojection onto the full data, where a sample's medoid may
//! not correspond to any particular full-data index until it is matched by
//! coordinate).

use crate::distance::DistanceFn;
use crate::distance_matrix::{second_lowest, DistanceMatrix};
use crate::matrix::Matrix;
use crate::{KMedoidsError, Result};
use ndarray::ArrayView2;
use num_traits::Float;
use std::collections::HashSet;

/// The mutable clustering state PAM operates on.
pub struct Clusters<T> {
    k: usize,
    selected: Vec<usize>,
    unselected: Vec<usize>,
    unselected_set: HashSet<usize>,
    assignments: Vec<usize>,
    distances: Vec<T>,
    error: T,
}

impl<T> Clusters<T>
where
    T: Float,
{
    /// Creates an empty clustering over a working set of `n` points with `k`
    /// medoid slots. `selected` starts empty; an [`Initializer`](crate::initializer::Initializer)
    /// populates it.
    pub fn new(n: usize, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(KMedoidsError::InvalidArgument(
                "k must be greater than 0".into(),
            ));
        }
        if k > n {
            return Err(KMedoidsError::InvalidArgument(format!(
                "k ({k}) must not exceed the number of points ({n})"
            )));
        }
        let unselected: Vec<usize> = (0..n).collect();
        let unselected_set: HashSet<usize> = unselected.iter().copied().collect();
        Ok(Self {
            k,
            selected: Vec::with_capacity(k),
            unselected,
            unselected_set,
            assignments: vec![0; n],
            distances: vec![T::zero(); n],
            error: T::zero(),
        })
    }

    /// Number of points in the working set.
    pub fn working_set_size(&self) -> usize {
        self.selected.len() + self.unselected.len()
    }

    /// Number of medoid slots (`k`).
    pub fn size(&self) -> usize {
        self.k
    }

    /// The currently selected medoid indices, slot order.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// The candidate (non-medoid) indices, in no particular order.
    pub fn unselected(&self) -> &[usize] {
        &self.unselected
    }

    /// Number of non-medoid candidates.
    pub fn num_candidates(&self) -> usize {
        self.unselected.len()
    }

    /// Per-point distance to its assigned medoid.
    pub fn distances(&self) -> &[T] {
        &self.distances
    }

    /// Per-point assigned medoid slot.
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Sum of `distances`.
    pub fn error(&self) -> T {
        self.error
    }

    /// Replaces the entire selected set at once (used by an [`Initializer`](crate::initializer::Initializer)).
    ///
    /// `selected` must contain exactly `k` distinct indices in `0..working_set_size()`.
    pub fn set_selected(&mut self, selected: Vec<usize>) -> Result<()> {
        let n = self.working_set_size();
        if selected.len() != self.k {
            return Err(KMedoidsError::InvariantViolation(format!(
                "expected {} selected medoids, got {}",
                self.k,
                selected.len()
            )));
        }
        let unique: HashSet<usize> = selected.iter().copied().collect();
        if unique.len() != selected.len() {
            return Err(KMedoidsError::InvariantViolation(
                "selected medoid indices must be distinct".into(),
            ));
        }
        if selected.iter().any(|&i| i >= n) {
            return Err(KMedoidsError::InvariantViolation(
                "selected medoid index out of range".into(),
            ));
        }
        self.unselected_set = (0..n).filter(|i| !unique.contains(i)).collect();
        self.unselected = self.unselected_set.iter().copied().collect();
        self.selected = selected;
        Ok(())
    }

    /// Recomputes `assignments`, `distances`, and `error` from scratch,
    /// assigning every point to its nearest currently-selected medoid.
    pub fn recompute_from_dist_mat(&mut self, dist_mat: &DistanceMatrix<T>) {
        let k = self.selected.len();
        let mut error = T::zero();
        for point in 0..self.assignments.len() {
            let mut best_slot = 0;
            let mut best_dist = dist_mat.distance_to_centroid(point, 0);
            for slot in 1..k {
                let d = dist_mat.distance_to_centroid(point, slot);
                if d < best_dist {
                    best_dist = d;
                    best_slot = slot;
                }
            }
            self.assignments[point] = best_slot;
            self.distances[point] = best_dist;
            error = error + best_dist;
        }
        self.error = error;
    }

    /// Distance from `point` to its second-closest selected medoid, used by
    /// the PAM swap evaluation when the closest medoid is the one being
    /// replaced.
    pub fn second_closest_distance(&self, dist_mat: &DistanceMatrix<T>, point: usize) -> T {
        second_lowest(&dist_mat.distances_to_centroids(point))
    }

    /// Replaces the medoid in `slot` with `candidate`, maintaining the
    /// selected/unselected partition. Returns the index that left `selected`.
    ///
    /// Does not itself touch `dist_mat`; callers recompute the derived
    /// distance fields afterward (see [`DistanceMatrix::set_medoids`]).
    pub fn swap_centroid(&mut self, slot: usize, candidate: usize) -> usize {
        let old_medoid = self.selected[slot];
        self.selected[slot] = candidate;

        self.unselected_set.remove(&candidate);
        self.unselected_set.insert(old_medoid);
        if let Some(pos) = self.unselected.iter().position(|&i| i == candidate) {
            self.unselected[pos] = old_medoid;
        }

        old_medoid
    }

    /// Verifies the data-model invariants (P1, P3) hold.
    pub fn check_invariants(&self) -> Result<()> {
        let n = self.working_set_size();
        let k = self.selected.len();
        if self.assignments.len() != n || self.distances.len() != n {
            return Err(KMedoidsError::InvariantViolation(
                "assignments/distances length mismatch with working set".into(),
            ));
        }
        let selected_set: HashSet<usize> = self.selected.iter().copied().collect();
        if selected_set.len() != k {
            return Err(KMedoidsError::InvariantViolation(
                "selected indices are not distinct".into(),
            ));
        }
        if !selected_set.is_disjoint(&self.unselected_set) {
            return Err(KMedoidsError::InvariantViolation(
                "selected and unselected overlap".into(),
            ));
        }
        if selected_set.len() + self.unselected_set.len() != n {
            return Err(KMedoidsError::InvariantViolation(
                "selected and unselected do not partition the working set".into(),
            ));
        }
        if self.assignments.iter().any(|&slot| slot >= k) {
            return Err(KMedoidsError::InvariantViolation(
                "assignment slot out of range".into(),
            ));
        }
        Ok(())
    }

    /// Converts the internal state to the externally-exposed [`ClusterResult`],
    /// gathering medoid coordinates from `data`.
    pub fn to_result(&self, data: &ArrayView2<T>) -> ClusterResult<T> {
        let centroids = Matrix::from_array({
            let cols = data.ncols();
            let mut out = ndarray::Array2::zeros((self.selected.len(), cols));
            for (slot, &idx) in self.selected.iter().enumerate() {
                out.row_mut(slot).assign(&data.row(idx));
            }
            out
        });
        ClusterResult {
            centroids,
            assignments: self.assignments.clone(),
            distances: self.distances.clone(),
            error: self.error,
        }
    }
}

/// The externally-exposed result of a fit: medoid coordinates, the
/// assignment and distance vectors, and the total error.
#[derive(Debug, Clone)]
pub struct ClusterResult<T> {
    /// k×d matrix of medoid coordinates.
    pub centroids: Matrix<T>,
    /// Assigned medoid slot for every point, length n.
    pub assignments: Vec<usize>,
    /// Distance to the assigned medoid for every point, length n.
    pub distances: Vec<T>,
    /// Sum of `distances`.
    pub error: T,
}

impl<T: Float> ClusterResult<T> {
    /// Builds a result by assigning every row of `data` to its nearest row of
    /// `centroids` under `metric` — the CLARA reprojection step, where
    /// medoids are known only by coordinate, not by index into `data`.
    pub fn from_centroids<D: DistanceFn<T>>(
        data: &ArrayView2<T>,
        centroids: &Matrix<T>,
        metric: &D,
    ) -> Self {
        let n = data.nrows();
        let k = centroids.rows();
        let mut assignments = vec![0usize; n];
        let mut distances = vec![T::zero(); n];
        let mut error = T::zero();
        for i in 0..n {
            let point = data.row(i);
            let mut best_slot = 0;
            let mut best_dist = metric.distance(&point, &centroids.row(0));
            for slot in 1..k {
                let d = metric.distance(&point, &centroids.row(slot));
                if d < best_dist {
                    best_dist = d;
                    best_slot = slot;
                }
            }
            assignments[i] = best_slot;
            distances[i] = best_dist;
            error = error + best_dist;
        }
        Self {
            centroids: centroids.clone(),
            assignments,
            distances,
            error,
        }
    }

    /// Whether `self` is a strictly better fit than `other` (lower error).
    /// Ties favor `other` (the earlier-found result), matching the
    /// "first encountered wins" comparator used throughout best-of-N search.
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.error < other.error
    }
}
