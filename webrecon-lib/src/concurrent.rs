//! Concurrency primitives shared by the scanners.
//!
//! - [`AdmissionGate`]: counting semaphore bounding in-flight work
//! - [`JobQueue`]: a channel receiver shared by a fixed pool of workers
//! - [`ResultSink`]: a collection mutated only through one lock

use crate::error::ReconError;
use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};

/// Bounds the number of simultaneously running units of work.
///
/// A unit holds an [`OwnedSemaphorePermit`] for its whole lifetime; dropping
/// the permit (on success, failure, timeout or panic) frees the slot.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    pub async fn admit(&self) -> Result<OwnedSemaphorePermit, ReconError> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ReconError::internal("admission gate closed"))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held by any unit.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Receiving half of a jobs channel, shared by a worker pool.
///
/// Workers take turns pulling from the channel; [`JobQueue::next`] returns
/// `None` only once every sender is dropped and the buffer is drained.
#[derive(Debug)]
pub struct JobQueue<T> {
    rx: Arc<tokio::sync::Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for JobQueue<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> JobQueue<T> {
    /// Create a bounded jobs channel and its shared receiving end.
    pub fn channel(buffer: usize) -> (mpsc::Sender<T>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (
            tx,
            Self {
                rx: Arc::new(tokio::sync::Mutex::new(rx)),
            },
        )
    }

    pub async fn next(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }
}

/// Result collection guarded by a single mutex.
///
/// The lock is held only while an item is inserted; callers do their I/O
/// before calling [`ResultSink::record`].
#[derive(Debug)]
pub struct ResultSink<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for ResultSink<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Default> Default for ResultSink<C> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(C::default())),
        }
    }
}

impl<C: Default> ResultSink<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<T>(&self, item: T)
    where
        C: Extend<T>,
    {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.extend(std::iter::once(item));
    }

    /// Take the accumulated collection, leaving an empty one behind.
    ///
    /// Call only after every writer has finished.
    pub fn take(&self) -> C {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        mem::take(&mut *guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn gate_releases_on_drop() {
        let gate = AdmissionGate::new(2);
        let first = gate.admit().await.unwrap();
        let _second = gate.admit().await.unwrap();
        assert_eq!(gate.available(), 0);

        drop(first);
        assert_eq!(gate.available(), 1);
        assert_eq!(gate.capacity(), 2);
    }

    #[tokio::test]
    async fn zero_capacity_gate_still_admits() {
        let gate = AdmissionGate::new(0);
        assert_eq!(gate.capacity(), 1);
        assert!(gate.admit().await.is_ok());
    }

    #[tokio::test]
    async fn job_queue_drains_before_closing() {
        let (tx, queue) = JobQueue::channel(4);
        let other = queue.clone();

        tx.send("a").await.unwrap();
        tx.send("b").await.unwrap();
        drop(tx);

        assert_eq!(queue.next().await, Some("a"));
        assert_eq!(other.next().await, Some("b"));
        assert_eq!(queue.next().await, None);
        assert_eq!(other.next().await, None);
    }

    #[test]
    fn sink_deduplicates_into_set() {
        let sink: ResultSink<HashSet<String>> = ResultSink::new();
        let writer = sink.clone();

        writer.record("www.example.com".to_string());
        writer.record("www.example.com".to_string());
        writer.record("mail.example.com".to_string());

        let found = sink.take();
        assert_eq!(found.len(), 2);
        assert!(sink.take().is_empty());
    }
}
