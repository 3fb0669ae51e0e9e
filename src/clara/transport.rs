//! Message transport for the distributed CLARA master/worker topology.
//!
//! Ranks exchange two kinds of message: a control tag, and (for REQUEST and
//! COMPLETED) a row-major payload of `T`. [`Transport`] abstracts the send/recv
//! shape so a future out-of-process transport could stand in for
//! [`ChannelMaster`]/[`ChannelWorker`] without touching [`super::distributed`].
//!
//! Agreement on column count `d` and sample size happens by shared
//! configuration rather than a wire handshake, since every rank here is a
//! thread in the same process with access to the same `ClaraConfig`.

use crate::{KMedoidsError, Result};
use std::sync::mpsc::{self, Receiver, Sender};

/// Control tag carried by every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTag {
    /// A worker asking the master for a sample to process.
    Request = 1,
    /// A worker returning the medoid coordinates it computed.
    Completed = 2,
    /// The master instructing a worker to exit its loop.
    Terminate = 3,
}

/// One message: a tag plus an optional row-major payload.
pub struct Envelope<T> {
    pub tag: ControlTag,
    pub payload: Option<Vec<T>>,
}

/// Sends and receives [`Envelope`]s. The master side addresses a specific
/// worker rank on send and receives from whichever rank next has something
/// to say; the worker side always talks to rank 0 (the master) and ignores
/// the `to` parameter on send.
pub trait Transport<T>: Send {
    /// Sends `tag`/`payload` to worker rank `to` (ignored on the worker side).
    fn send(&self, to: usize, tag: ControlTag, payload: Option<Vec<T>>) -> Result<()>;
    /// Blocks until the next message arrives, returning its source rank
    /// (`0` from the worker side, since workers only ever hear from the
    /// master) alongside its tag and payload.
    fn recv(&self) -> Result<(usize, ControlTag, Option<Vec<T>>)>;
}

/// The master's end of the channel topology: one outgoing sender per worker,
/// and a single shared receiver workers all send completions/requests into.
pub struct ChannelMaster<T> {
    to_workers: Vec<Sender<Envelope<T>>>,
    from_workers: Receiver<(usize, Envelope<T>)>,
}

/// One worker's end: its dedicated inbox from the master, and a clone of the
/// shared sender back to the master's `from_workers` receiver.
pub struct ChannelWorker<T> {
    rank: usize,
    to_master: Sender<(usize, Envelope<T>)>,
    from_master: Receiver<Envelope<T>>,
}

/// Builds the channel topology for `num_workers` workers, ranked `1..=num_workers`.
pub fn build_channels<T: Send + 'static>(
    num_workers: usize,
) -> (ChannelMaster<T>, Vec<ChannelWorker<T>>) {
    let (to_master, from_workers) = mpsc::channel();
    let mut to_workers = Vec::with_capacity(num_workers);
    let mut workers = Vec::with_capacity(num_workers);
    for rank in 1..=num_workers {
        let (tx, rx) = mpsc::channel();
        to_workers.push(tx);
        workers.push(ChannelWorker {
            rank,
            to_master: to_master.clone(),
            from_master: rx,
        });
    }
    (
        ChannelMaster {
            to_workers,
            from_workers,
        },
        workers,
    )
}

impl<T: Send> Transport<T> for ChannelMaster<T> {
    fn send(&self, to: usize, tag: ControlTag, payload: Option<Vec<T>>) -> Result<()> {
        let idx = to
            .checked_sub(1)
            .filter(|&i| i < self.to_workers.len())
            .ok_or_else(|| KMedoidsError::TransportFailure(format!("no such worker rank: {to}")))?;
        self.to_workers[idx]
            .send(Envelope { tag, payload })
            .map_err(|_| KMedoidsError::TransportFailure(format!("worker {to} channel closed")))
    }

    fn recv(&self) -> Result<(usize, ControlTag, Option<Vec<T>>)> {
        let (source, env) = self
            .from_workers
            .recv()
            .map_err(|_| KMedoidsError::TransportFailure("all worker channels closed".into()))?;
        Ok((source, env.tag, env.payload))
    }
}

impl<T: Send> Transport<T> for ChannelWorker<T> {
    fn send(&self, _to: usize, tag: ControlTag, payload: Option<Vec<T>>) -> Result<()> {
        self.to_master
            .send((self.rank, Envelope { tag, payload }))
            .map_err(|_| KMedoidsError::TransportFailure("master channel closed".into()))
    }

    fn recv(&self) -> Result<(usize, ControlTag, Option<Vec<T>>)> {
        let env = self.from_master.recv().map_err(|_| {
            KMedoidsError::TransportFailure(format!("master channel closed for worker {}", self.rank))
        })?;
        Ok((0, env.tag, env.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_then_terminate_round_trip() {
        let (master, mut workers) = build_channels::<f64>(1);
        let worker = workers.pop().unwrap();

        worker.send(0, ControlTag::Request, None).unwrap();
        let (source, tag, payload) = master.recv().unwrap();
        assert_eq!(source, 1);
        assert_eq!(tag, ControlTag::Request);
        assert!(payload.is_none());

        master
            .send(1, ControlTag::Request, Some(vec![1.0, 2.0]))
            .unwrap();
        let (source, tag, payload) = worker.recv().unwrap();
        assert_eq!(source, 0);
        assert_eq!(tag, ControlTag::Request);
        assert_eq!(payload, Some(vec![1.0, 2.0]));

        master.send(1, ControlTag::Terminate, None).unwrap();
        let (_, tag, _) = worker.recv().unwrap();
        assert_eq!(tag, ControlTag::Terminate);
    }

    #[test]
    fn test_send_to_unknown_rank_is_transport_failure() {
        let (master, _workers) = build_channels::<f64>(1);
        assert!(matches!(
            master.send(5, ControlTag::Terminate, None),
            Err(KMedoidsError::TransportFailure(_))
        ));
    }
}
