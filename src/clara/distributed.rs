//! Master/worker CLARA driver (component C10).
//!
//! One master (the calling thread, rank 0) and `num_workers` worker threads
//! (ranks `1..=num_workers`) communicate over [`transport::ChannelMaster`] /
//! [`transport::ChannelWorker`]. The master draws samples and assigns them to
//! idle workers; workers fit one sample each and return medoid coordinates;
//! the master reprojects every result onto the full data set and keeps the
//! best. See [`super::transport`] for the wire shape.

use crate::clara::transport::{build_channels, ChannelWorker, ControlTag, Transport};
use crate::clara::ClaraConfig;
use crate::clusters::ClusterResult;
use crate::distance::DistanceFn;
use crate::kmedoids::KMedoids;
use crate::matrix::{from_rows, Matrix};
use crate::sampler::Sampler;
use crate::{KMedoidsError, Result};
use ndarray::ArrayView2;
use num_traits::Float;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::thread;

/// Runs CLARA's sampling loop across a master/worker thread topology instead
/// of in-process, per [`ClaraConfig::num_sampling_iters`] assigned samples.
pub struct DistributedClara<T, D> {
    config: ClaraConfig<T>,
    metric: D,
    num_workers: usize,
}

impl<T, D> DistributedClara<T, D>
where
    T: Float + Send + Sync + 'static,
    D: DistanceFn<T> + Clone + Send + Sync + 'static,
{
    /// Builds a driver with `num_workers` worker ranks.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `num_workers == 0`.
    pub fn new(config: ClaraConfig<T>, metric: D, num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(KMedoidsError::InvalidArgument(
                "distributed CLARA requires at least one worker".into(),
            ));
        }
        Ok(Self {
            config,
            metric,
            num_workers,
        })
    }

    /// Runs the master/worker CLARA loop and returns the best full-data result.
    #[tracing::instrument(skip(self, data), fields(k, num_workers = self.num_workers))]
    pub fn fit(&self, data: &ArrayView2<T>, k: usize) -> Result<ClusterResult<T>> {
        let n = data.nrows();
        let d = data.ncols();
        let sample_size = self.config.resolve_sample_size(n, k)?;

        let (master, worker_ends) = build_channels::<T>(self.num_workers);
        let handles: Vec<_> = worker_ends
            .into_iter()
            .map(|end| {
                let fit_config = self.config.fit_config_ref().clone();
                let metric = self.metric.clone();
                thread::spawn(move || worker_loop(end, fit_config, metric, sample_size, k, d))
            })
            .collect();

        match self.run_master(&master, data, sample_size, k, d) {
            Ok(best) => {
                for handle in handles {
                    handle
                        .join()
                        .map_err(|_| KMedoidsError::TransportFailure("worker thread panicked".into()))??;
                }
                Ok(best)
            }
            Err(err) => {
                for worker in 1..=self.num_workers {
                    if let Err(e) = master.send(worker, ControlTag::Terminate, None) {
                        tracing::warn!(worker, error = %e, "best-effort terminate during error unwind failed");
                    }
                }
                for handle in handles {
                    let _ = handle.join();
                }
                Err(err)
            }
        }
    }

    fn run_master(
        &self,
        master: &impl Transport<T>,
        data: &ArrayView2<T>,
        sample_size: usize,
        k: usize,
        d: usize,
    ) -> Result<ClusterResult<T>> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.fit_config_ref().seed_value());
        let sampler = Sampler;
        let target = self.config.num_sampling_iters();

        let mut issued = 0usize;
        let mut best: Option<ClusterResult<T>> = None;

        while issued < target {
            let (source, tag, payload) = master.recv()?;
            match tag {
                ControlTag::Request => {
                    let sample = sampler.sample(sample_size, data, &mut rng)?;
                    master.send(source, ControlTag::Request, Some(flatten(&sample)))?;
                    issued += 1;
                }
                ControlTag::Completed => {
                    self.reproject_into(&mut best, data, payload, k, d)?;
                    if issued < target {
                        let sample = sampler.sample(sample_size, data, &mut rng)?;
                        master.send(source, ControlTag::Request, Some(flatten(&sample)))?;
                        issued += 1;
                    }
                }
                ControlTag::Terminate => {
                    return Err(KMedoidsError::TransportFailure(
                        "master received a TERMINATE message".into(),
                    ))
                }
            }
        }

        // Termination phase: drain exactly one more control message per
        // worker, processing it if it's a completion the main loop never
        // got to issue a follow-up for, then terminate that source
        // immediately. A worker whose initial REQUEST was never answered
        // (num_workers > num_sampling_iters) is drained here too, its
        // request simply discarded.
        for _ in 0..self.num_workers {
            let (source, tag, payload) = master.recv()?;
            if tag == ControlTag::Completed {
                self.reproject_into(&mut best, data, payload, k, d)?;
            }
            master.send(source, ControlTag::Terminate, None)?;
        }

        best.ok_or_else(|| {
            KMedoidsError::InvalidArgument("num_sampling_iters must be at least 1".into())
        })
    }

    fn reproject_into(
        &self,
        best: &mut Option<ClusterResult<T>>,
        data: &ArrayView2<T>,
        payload: Option<Vec<T>>,
        k: usize,
        d: usize,
    ) -> Result<()> {
        let flat = payload.ok_or_else(|| {
            KMedoidsError::TransportFailure("COMPLETED message carried no payload".into())
        })?;
        let centroids = from_rows(k, d, flat).map_err(KMedoidsError::InvariantViolation)?;
        let reprojected = ClusterResult::from_centroids(data, &centroids, &self.metric);
        match best {
            Some(current) if !reprojected.is_better_than(current) => {}
            _ => *best = Some(reprojected),
        }
        Ok(())
    }
}

fn flatten<T: Float>(matrix: &Matrix<T>) -> Vec<T> {
    matrix.as_array().iter().copied().collect()
}

/// A worker's lifecycle: request a sample, fit it with one repeat, report
/// medoid coordinates, repeat until TERMINATE.
fn worker_loop<T, D>(
    transport: ChannelWorker<T>,
    fit_config: crate::config::KMedoidsConfig<T>,
    metric: D,
    sample_size: usize,
    k: usize,
    d: usize,
) -> Result<()>
where
    T: Float + Send + Sync + 'static,
    D: DistanceFn<T> + Clone,
{
    transport.send(0, ControlTag::Request, None)?;
    loop {
        let (_source, tag, payload) = transport.recv()?;
        match tag {
            ControlTag::Terminate => return Ok(()),
            ControlTag::Request => {
                let flat = payload.ok_or_else(|| {
                    KMedoidsError::TransportFailure("REQUEST message carried no payload".into())
                })?;
                let sample = from_rows(sample_size, d, flat).map_err(KMedoidsError::InvariantViolation)?;
                let mut driver = KMedoids::new(fit_config.clone(), metric.clone());
                let result = driver.fit(&sample.as_array().view(), k, 1)?;
                transport.send(0, ControlTag::Completed, Some(flatten(&result.centroids)))?;
            }
            ControlTag::Completed => {
                return Err(KMedoidsError::TransportFailure(
                    "worker received a COMPLETED message".into(),
                ))
            }
        }
    }
}
