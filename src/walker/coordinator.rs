//! Search coordinator - orchestrates the partitioned parallel search
//!
//! The coordinator is responsible for:
//! - Listing the root directory exactly once
//! - Partitioning the listing by prefix key
//! - Submitting one job per non-empty partition to a bounded worker pool
//! - Waiting for every worker to finish
//! - Final statistics

use crate::config::SearchConfig;
use crate::error::{Result, WalkerError};
use crate::output::ResultWriter;
use crate::walker::partition::{list_children, partition};
use crate::walker::queue::{JobQueue, SearchJob};
use crate::walker::worker::{aggregate_stats, JobReport, Worker, WorkerStats};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a completed search
#[derive(Debug, Default)]
pub struct SearchResult {
    /// Immediate children of the root
    pub root_children: usize,

    /// Jobs submitted (one per non-empty partition)
    pub jobs: usize,

    /// Pool threads started
    pub workers: usize,

    /// Worker threads that panicked; their reports are lost
    pub worker_failures: usize,

    /// One report per finished job, in completion order per worker
    pub reports: Vec<JobReport>,

    /// Time taken for the search
    pub duration: Duration,
}

impl SearchResult {
    pub fn total_matches(&self) -> usize {
        self.reports.iter().map(|r| r.matches).sum()
    }

    pub fn files_written(&self) -> usize {
        self.reports.iter().filter(|r| r.output.is_some()).count()
    }

    /// Subtree, record, and file errors across all jobs
    pub fn errors(&self) -> usize {
        self.reports
            .iter()
            .map(|r| r.failed_subtrees + r.records_failed + usize::from(r.write_error.is_some()))
            .sum::<usize>()
            + self.worker_failures
    }

    /// Report for a key, if a job ran for it
    pub fn report(&self, key: &str) -> Option<&JobReport> {
        self.reports.iter().find(|r| r.key.as_str() == key)
    }
}

/// Coordinates the partitioned parallel search
pub struct SearchCoordinator {
    /// Configuration
    config: Arc<SearchConfig>,

    /// Shared by every worker; each job writes its own file
    writer: Arc<ResultWriter>,
}

impl SearchCoordinator {
    /// Create a new search coordinator
    pub fn new(config: SearchConfig) -> Self {
        let writer = Arc::new(ResultWriter::from_config(&config));
        Self {
            config: Arc::new(config),
            writer,
        }
    }

    /// Run the search
    pub fn run(self) -> Result<SearchResult> {
        let start_time = Instant::now();

        info!(
            root = %self.config.root.display(),
            suffix = %self.config.suffix,
            keys = self.config.keys.len(),
            max_depth = self.config.max_depth,
            "Starting search"
        );

        // Listing and partitioning finish before any worker exists
        let children = list_children(&self.config.root).map_err(|source| WalkerError::ListRoot {
            path: self.config.root.clone(),
            source,
        })?;
        let partitions = partition(&children, &self.config.keys);

        let suffix: Arc<str> = Arc::from(self.config.suffix.as_str());
        let jobs: Vec<SearchJob> = partitions
            .into_non_empty()
            .map(|bucket| {
                SearchJob::new(
                    bucket.key,
                    bucket.entries,
                    Arc::clone(&suffix),
                    self.config.max_depth,
                    self.config.follow_links,
                )
            })
            .collect();

        debug!(
            children = children.len(),
            jobs = jobs.len(),
            "Root partitioned"
        );

        let mut result = SearchResult {
            root_children: children.len(),
            jobs: jobs.len(),
            ..Default::default()
        };

        if jobs.is_empty() {
            info!("No top-level entries matched any prefix key");
            result.duration = start_time.elapsed();
            return Ok(result);
        }

        let pool_size = self.config.worker_count.min(jobs.len());

        let mut queue = JobQueue::new();
        for job in jobs {
            queue.submit(job)?;
        }
        queue.close();

        let workers = self.spawn_workers(&queue, pool_size)?;
        result.workers = workers.len();

        let (reports, failures) = join_workers(workers);

        // Non-empty only if every worker died before draining the queue
        let queue_stats = queue.stats();
        if !queue.is_empty() {
            warn!(
                pending = queue.len(),
                enqueued = queue_stats.enqueued(),
                dequeued = queue_stats.dequeued(),
                "Jobs left unprocessed"
            );
        }

        result.reports = reports;
        result.worker_failures = failures;
        result.duration = start_time.elapsed();

        info!(
            jobs = result.jobs,
            matches = result.total_matches(),
            files = result.files_written(),
            errors = result.errors(),
            duration_ms = result.duration.as_millis() as u64,
            "Search completed"
        );

        Ok(result)
    }

    /// Spawn pool threads over a closed, pre-filled queue
    fn spawn_workers(&self, queue: &JobQueue, count: usize) -> Result<Vec<Worker>> {
        let mut workers = Vec::with_capacity(count);

        for id in 0..count {
            match Worker::spawn(id, queue.receiver(), Arc::clone(&self.writer)) {
                Ok(worker) => workers.push(worker),
                // Workers already started still drain the whole queue
                Err(e) if !workers.is_empty() => {
                    warn!(error = %e, started = workers.len(), "Worker pool smaller than requested");
                    break;
                }
                Err(e) => return Err(WalkerError::Worker(e)),
            }
        }

        info!(count = workers.len(), "Workers spawned");
        Ok(workers)
    }
}

/// Join every worker (the completion barrier) and collect their reports
fn join_workers(workers: Vec<Worker>) -> (Vec<JobReport>, usize) {
    let stats: Vec<Arc<WorkerStats>> = workers.iter().map(Worker::stats).collect();

    let mut reports = Vec::new();
    let mut failures = 0;

    for worker in workers {
        let id = worker.id();
        match worker.join() {
            Ok(mut worker_reports) => reports.append(&mut worker_reports),
            Err(e) => {
                failures += 1;
                warn!(worker = id, error = %e, "Worker failed to join cleanly");
            }
        }
    }

    let (jobs, subtrees, matches, errors) = aggregate_stats(&stats);
    debug!(jobs, subtrees, matches, errors, "Workers joined");

    (reports, failures)
}
