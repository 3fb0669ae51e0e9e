//! End-to-end scenarios exercising the public API surface as a downstream
//! crate would see it.

use kmedoids_engine::prelude::*;
use ndarray::Array2;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256PlusPlus;

fn two_gaussian_clusters(n: usize, seed: u64) -> (Array2<f64>, Vec<bool>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let normal = Normal::new(0.0, 0.2).unwrap();
    let mut data = Array2::zeros((n, 2));
    let mut in_first_cluster = vec![false; n];
    for i in 0..n {
        let center = if i < n / 2 { 0.0 } else { 10.0 };
        in_first_cluster[i] = i < n / 2;
        data[[i, 0]] = center + normal.sample(&mut rng);
        data[[i, 1]] = normal.sample(&mut rng);
    }
    (data, in_first_cluster)
}

#[test]
fn separated_clusters_are_recovered() {
    let (data, in_first_cluster) = two_gaussian_clusters(100, 1234);
    let mut driver = KMedoids::new(KMedoidsConfig::new().seed(1), euclidean);
    let result = driver.fit(&data.view(), 2, 5).unwrap();

    assert!(result.error < 50.0, "error too high: {}", result.error);

    // Every point in the first gaussian shares one assignment slot, and
    // every point in the second shares the other.
    let slot_of_first = result.assignments[0];
    for (i, &is_first) in in_first_cluster.iter().enumerate() {
        let expected_slot = if is_first {
            slot_of_first
        } else {
            1 - slot_of_first
        };
        assert_eq!(
            result.assignments[i], expected_slot,
            "point {i} assigned to the wrong cluster"
        );
    }
}

#[test]
fn clara_reduces_to_pam_at_full_sample() {
    let (data, _) = two_gaussian_clusters(40, 77);

    let pam_config = KMedoidsConfig::new().seed(5);
    let mut pam = KMedoids::new(pam_config.clone(), euclidean);
    let pam_result = pam.fit(&data.view(), 2, 1).unwrap();

    let clara_config = ClaraConfig::new(1)
        .sample_size(data.nrows())
        .fit_config(pam_config);
    let clara = SharedMemoryClara::new(clara_config, euclidean);
    let clara_result = clara.fit(&data.view(), 2, 1).unwrap();

    assert_eq!(pam_result.error, clara_result.error);
}

#[test]
fn clara_best_of_n_never_worse_than_single_iteration() {
    let (data, _) = two_gaussian_clusters(200, 9);

    let single = SharedMemoryClara::new(ClaraConfig::new(1), euclidean)
        .fit(&data.view(), 2, 1)
        .unwrap();
    let many = SharedMemoryClara::new(ClaraConfig::new(10), euclidean)
        .fit(&data.view(), 2, 1)
        .unwrap();

    assert!(many.error <= single.error);
}

#[test]
fn distributed_clara_matches_shared_memory_with_one_worker() {
    let (data, _) = two_gaussian_clusters(60, 42);

    let config = ClaraConfig::new(6).fit_config(KMedoidsConfig::new().seed(3));
    let shared = SharedMemoryClara::new(config.clone(), euclidean)
        .fit(&data.view(), 2, 1)
        .unwrap();
    let distributed = DistributedClara::new(config, euclidean, 1)
        .unwrap()
        .fit(&data.view(), 2)
        .unwrap();

    assert_eq!(shared.error, distributed.error);
}

#[test]
fn trivial_k_equals_n_has_zero_error() {
    let data = ndarray::array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
    let mut driver = KMedoids::new(KMedoidsConfig::new(), euclidean);
    let result = driver.fit(&data.view(), 4, 3).unwrap();

    assert_eq!(result.error, 0.0);
    let mut medoid_rows: Vec<(i64, i64)> = (0..4)
        .map(|i| {
            (
                result.centroids.get(i, 0).round() as i64,
                result.centroids.get(i, 1).round() as i64,
            )
        })
        .collect();
    medoid_rows.sort();
    assert_eq!(medoid_rows, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
}
