//! Distance metrics (component C2).
//!
//! A distance function is any scalar metric over two d-vectors that is
//! non-negative, symmetric, and zero on the diagonal (`d(x, x) == 0`). The
//! engine is generic over the choice of metric; `euclidean` and `manhattan`
//! are provided as the common concrete instances, matching the metrics this
//! codebase already ships for other clustering algorithms.

use ndarray::ArrayView1;
use num_traits::Float;

/// A distance function over two d-dimensional points.
///
/// Implementations must satisfy, for all `x`, `y`, `z`:
/// - `distance(x, y) >= 0`
/// - `distance(x, y) == distance(y, x)`
/// - `distance(x, x) == 0`
pub trait DistanceFn<T>: Sync {
    /// Computes the distance between two points of equal dimensionality.
    fn distance(&self, x: &ArrayView1<T>, y: &ArrayView1<T>) -> T;
}

impl<T, F> DistanceFn<T> for F
where
    F: Fn(&ArrayView1<T>, &ArrayView1<T>) -> T + Sync,
{
    fn distance(&self, x: &ArrayView1<T>, y: &ArrayView1<T>) -> T {
        self(x, y)
    }
}

/// Euclidean (L2) distance.
pub fn euclidean<T: Float>(x: &ArrayView1<T>, y: &ArrayView1<T>) -> T {
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| (a - b) * (a - b))
        .fold(T::zero(), |acc, v| acc + v)
        .sqrt()
}

/// Manhattan (L1) distance.
pub fn manhattan<T: Float>(x: &ArrayView1<T>, y: &ArrayView1<T>) -> T {
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| (a - b).abs())
        .fold(T::zero(), |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_euclidean_self_is_zero() {
        let p = array![1.0, 2.0, 3.0];
        assert_eq!(euclidean(&p.view(), &p.view()), 0.0);
    }

    #[test]
    fn test_euclidean_symmetric() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];
        assert_eq!(euclidean(&a.view(), &b.view()), 5.0);
        assert_eq!(euclidean(&b.view(), &a.view()), 5.0);
    }

    #[test]
    fn test_manhattan() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];
        assert_eq!(manhattan(&a.view(), &b.view()), 7.0);
    }
}
