//! Job queue feeding the search worker pool
//!
//! All jobs are known once partitioning finishes, so the coordinator submits
//! every job up front and then closes the queue. Workers pull until the
//! queue is closed and drained, which is what lets `join` act as the
//! completion barrier.

use crate::error::WorkerError;
use crate::walker::partition::{CandidateEntry, PrefixKey};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One unit of concurrent work: a key and the subtrees to search for it
#[derive(Debug, Clone)]
pub struct SearchJob {
    /// Key this job searches for
    pub key: PrefixKey,

    /// Candidate subtrees, in listing order
    pub candidates: Vec<CandidateEntry>,

    /// Literal file name suffix
    pub suffix: Arc<str>,

    /// Depth bound below each candidate (candidate itself is depth 0)
    pub max_depth: usize,

    /// Follow symlinks during traversal
    pub follow_links: bool,
}

impl SearchJob {
    pub fn new(
        key: PrefixKey,
        candidates: Vec<CandidateEntry>,
        suffix: Arc<str>,
        max_depth: usize,
        follow_links: bool,
    ) -> Self {
        Self {
            key,
            candidates,
            suffix,
            max_depth,
            follow_links,
        }
    }
}

/// Statistics for the job queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total jobs submitted
    pub enqueued: AtomicU64,

    /// Total jobs taken by workers
    pub dequeued: AtomicU64,
}

impl QueueStats {
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }
}

/// Multi-consumer job queue
pub struct JobQueue {
    /// Sender for submitting jobs; `None` once closed
    sender: Option<Sender<SearchJob>>,

    /// Receiver template cloned into each worker
    receiver: Receiver<SearchJob>,

    /// Queue statistics
    stats: Arc<QueueStats>,
}

impl JobQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();

        Self {
            sender: Some(sender),
            receiver,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Submit a job
    pub fn submit(&self, job: SearchJob) -> Result<(), WorkerError> {
        let key = job.key.to_string();
        let sender = self
            .sender
            .as_ref()
            .ok_or(WorkerError::QueueSendFailed { key: key.clone() })?;

        sender
            .send(job)
            .map_err(|_| WorkerError::QueueSendFailed { key })?;
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Stop accepting jobs; workers exit once the remaining jobs drain
    pub fn close(&mut self) {
        self.sender.take();
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_none()
    }

    /// Get a receiver for this queue (one per worker)
    pub fn receiver(&self) -> JobQueueReceiver {
        JobQueueReceiver {
            receiver: self.receiver.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Jobs waiting to be picked up
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker-side end of the queue
#[derive(Clone)]
pub struct JobQueueReceiver {
    receiver: Receiver<SearchJob>,
    stats: Arc<QueueStats>,
}

impl JobQueueReceiver {
    /// Block for the next job; `None` once the queue is closed and drained
    pub fn recv(&self) -> Option<SearchJob> {
        let job = self.receiver.recv().ok()?;
        self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
        Some(job)
    }
}
