//! Precomputed pairwise distances over a working set (component C3).
//!
//! Holds the full n×n pairwise distance table for the current working set
//! `W`, plus the n×k table of distances from every point to every currently
//! selected medoid and the per-point cache of the distance to the *closest*
//! medoid. The last two are derived state: they must be recomputed whenever
//! the selected medoid set changes (a swap), which [`DistanceMatrix::set_medoids`]
//! does in one pass.

use crate::distance::DistanceFn;
use crate::matrix::Matrix;
use ndarray::ArrayView2;
use num_traits::Float;

/// Pairwise distances over a working set, plus distance-to-medoid caches.
pub struct DistanceMatrix<T> {
    pairwise: Matrix<T>,
    to_medoid: Matrix<T>,
    closest: Vec<T>,
}

impl<T> DistanceMatrix<T>
where
    T: Float,
{
    /// Computes the full pairwise distance table for `data` under `metric`.
    ///
    /// `to_medoid` starts empty (zero columns); call [`set_medoids`] once the
    /// initial medoid set is known.
    ///
    /// [`set_medoids`]: DistanceMatrix::set_medoids
    pub fn new<D: DistanceFn<T>>(data: &ArrayView2<T>, metric: &D) -> Self {
        let n = data.nrows();
        let mut pairwise = Matrix::zeros(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.distance(&data.row(i), &data.row(j));
                pairwise.set(i, j, d);
                pairwise.set(j, i, d);
            }
        }
        Self {
            pairwise,
            to_medoid: Matrix::zeros(n, 0),
            closest: vec![T::zero(); n],
        }
    }

    /// Number of points in the working set.
    pub fn len(&self) -> usize {
        self.pairwise.rows()
    }

    /// Whether the working set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distance between two points of the working set.
    pub fn distance_to_point(&self, a: usize, b: usize) -> T {
        self.pairwise.get(a, b)
    }

    /// Distance from `point` to the medoid currently occupying slot `slot`.
    pub fn distance_to_centroid(&self, point: usize, slot: usize) -> T {
        self.to_medoid.get(point, slot)
    }

    /// Distance from `point` to its closest selected medoid (cached).
    pub fn distance_to_closest_centroid(&self, point: usize) -> T {
        self.closest[point]
    }

    /// All distances from `point` to every selected medoid, slot order.
    pub fn distances_to_centroids(&self, point: usize) -> Vec<T> {
        (0..self.to_medoid.cols())
            .map(|s| self.to_medoid.get(point, s))
            .collect()
    }

    /// Recomputes the distance-to-medoid table and the closest-medoid cache
    /// for the given selected medoid indices (indices into the working set).
    pub fn set_medoids(&mut self, selected: &[usize]) {
        let n = self.pairwise.rows();
        let k = selected.len();
        let mut to_medoid = Matrix::zeros(n, k);
        for point in 0..n {
            for (slot, &medoid) in selected.iter().enumerate() {
                to_medoid.set(point, slot, self.pairwise.get(point, medoid));
            }
        }
        let mut closest = vec![T::zero(); n];
        for point in 0..n {
            let mut best = to_medoid.get(point, 0);
            for slot in 1..k {
                let d = to_medoid.get(point, slot);
                if d < best {
                    best = d;
                }
            }
            closest[point] = best;
        }
        self.to_medoid = to_medoid;
        self.closest = closest;
    }

    /// Delta-updates the distance-to-medoid table and closest-medoid cache
    /// after a single swap that replaced the medoid in `slot` with
    /// `new_medoid`. Only `slot`'s column needs a fresh per-point distance;
    /// `closest` is only re-scanned for points whose previous closest medoid
    /// was the one just replaced, since every other point's closest distance
    /// can only stay the same or improve.
    pub fn update_swap(&mut self, slot: usize, new_medoid: usize) {
        let n = self.pairwise.rows();
        let k = self.to_medoid.cols();
        for point in 0..n {
            let old_value = self.to_medoid.get(point, slot);
            let new_value = self.pairwise.get(point, new_medoid);
            self.to_medoid.set(point, slot, new_value);

            if new_value < self.closest[point] {
                self.closest[point] = new_value;
            } else if old_value == self.closest[point] {
                let mut best = self.to_medoid.get(point, 0);
                for s in 1..k {
                    let d = self.to_medoid.get(point, s);
                    if d < best {
                        best = d;
                    }
                }
                self.closest[point] = best;
            }
        }
    }
}

/// Returns the second-lowest value in `values`, or the maximum representable
/// value if fewer than two entries exist. Used to find a point's
/// second-closest medoid when its current closest medoid is the one being
/// replaced in a swap.
pub fn second_lowest<T: Float>(values: &[T]) -> T {
    let mut lowest: Option<T> = None;
    let mut second: Option<T> = None;
    for &v in values {
        match lowest {
            None => lowest = Some(v),
            Some(l) if v < l => {
                second = Some(l);
                lowest = Some(v);
            }
            _ => match second {
                None => second = Some(v),
                Some(s) if v < s => second = Some(v),
                _ => {}
            },
        }
    }
    second.unwrap_or_else(T::max_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::euclidean;
    use ndarray::array;

    #[test]
    fn test_pairwise_symmetric_zero_diagonal() {
        let data = array![[0.0, 0.0], [3.0, 4.0], [6.0, 8.0]];
        let dm = DistanceMatrix::new(&data.view(), &euclidean);
        for i in 0..3 {
            assert_eq!(dm.distance_to_point(i, i), 0.0);
        }
        assert_eq!(dm.distance_to_point(0, 1), 5.0);
        assert_eq!(dm.distance_to_point(1, 0), 5.0);
    }

    #[test]
    fn test_set_medoids_closest_cache() {
        let data = array![[0.0], [1.0], [10.0]];
        let dm_base = DistanceMatrix::new(&data.view(), &euclidean);
        let mut dm = dm_base;
        dm.set_medoids(&[0, 2]);
        // point 1 is closer to medoid 0 (dist 1) than medoid 2 (dist 9)
        assert_eq!(dm.distance_to_closest_centroid(1), 1.0);
        assert_eq!(dm.distance_to_centroid(1, 0), 1.0);
        assert_eq!(dm.distance_to_centroid(1, 1), 9.0);
    }

    #[test]
    fn test_second_lowest() {
        assert_eq!(second_lowest(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(second_lowest(&[5.0]), f64::MAX);
    }

    #[test]
    fn test_update_swap_matches_full_recompute() {
        let data = array![[0.0], [1.0], [4.0], [10.0], [11.0]];
        let mut delta = DistanceMatrix::new(&data.view(), &euclidean);
        let mut full = DistanceMatrix::new(&data.view(), &euclidean);
        delta.set_medoids(&[0, 3]);
        full.set_medoids(&[0, 3]);

        // Replace the medoid in slot 1 (point 3) with point 4: both points
        // whose closest medoid was slot 1 (points 3, 4) need a rescan, point
        // 2's closest (slot 0, dist 4) is unaffected.
        delta.update_swap(1, 4);
        full.set_medoids(&[0, 4]);

        for point in 0..data.nrows() {
            assert_eq!(
                delta.distance_to_closest_centroid(point),
                full.distance_to_closest_centroid(point),
                "closest mismatch at point {point}"
            );
            assert_eq!(delta.distance_to_centroid(point, 0), full.distance_to_centroid(point, 0));
            assert_eq!(delta.distance_to_centroid(point, 1), full.distance_to_centroid(point, 1));
        }
    }

    #[test]
    fn test_update_swap_improves_closest_without_rescan() {
        // Single medoid slot: swapping to a strictly closer point must lower
        // `closest` via the direct-improvement branch, not the rescan branch.
        let data = array![[0.0], [5.0], [9.0], [10.0]];
        let mut dm = DistanceMatrix::new(&data.view(), &euclidean);
        dm.set_medoids(&[3]);
        assert_eq!(dm.distance_to_closest_centroid(1), 5.0);

        dm.update_swap(0, 2);
        assert_eq!(dm.distance_to_closest_centroid(1), 4.0);
        assert_eq!(dm.distance_to_centroid(1, 0), 4.0);
    }
}
