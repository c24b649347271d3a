//! Search workers
//!
//! Each worker:
//! - Pulls search jobs from the job queue until it is closed and drained
//! - Walks every candidate subtree of the job up to the depth bound
//! - Writes the job's matches to the key's CSV file (if there are any)
//!
//! Failures stay inside the job: a broken subtree is logged and the walk
//! moves on to the next candidate, a broken record is logged and the
//! writer moves on to the next record.

use crate::error::{WalkOutcome, WorkerError};
use crate::output::ResultWriter;
use crate::walker::partition::{CandidateEntry, PrefixKey};
use crate::walker::queue::{JobQueueReceiver, SearchJob};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

/// A file (or directory) whose name ends with the target suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Final path component
    pub name: String,

    /// Absolute path
    pub path: PathBuf,

    /// Depth below the candidate root (0 = the candidate itself)
    pub depth: usize,
}

/// Matches collected by one job, plus how each subtree went
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Matches in traversal-discovery order
    pub matches: Vec<MatchRecord>,

    /// One outcome per candidate subtree
    pub subtrees: Vec<WalkOutcome>,
}

impl SearchOutcome {
    /// Number of subtrees whose traversal stopped on an error
    pub fn failed_subtrees(&self) -> usize {
        self.subtrees.iter().filter(|o| !o.is_success()).count()
    }
}

/// Final report for one job
#[derive(Debug, Clone)]
pub struct JobReport {
    pub key: PrefixKey,

    /// Candidate subtrees searched
    pub subtrees: usize,

    /// Subtrees whose traversal stopped early
    pub failed_subtrees: usize,

    /// Matches found
    pub matches: usize,

    /// Output file, if one was written
    pub output: Option<PathBuf>,

    /// Rows written to the output file
    pub records_written: usize,

    /// Rows that could not be written
    pub records_failed: usize,

    /// Why the output file could not be written, if it could not
    pub write_error: Option<String>,
}

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Jobs completed
    pub jobs_completed: AtomicU64,

    /// Candidate subtrees walked
    pub subtrees_searched: AtomicU64,

    /// Matches found
    pub matches_found: AtomicU64,

    /// Traversal and write errors
    pub errors: AtomicU64,
}

impl WorkerStats {
    fn record_job(&self, report: &JobReport) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
        self.subtrees_searched
            .fetch_add(report.subtrees as u64, Ordering::Relaxed);
        self.matches_found
            .fetch_add(report.matches as u64, Ordering::Relaxed);

        let errors = report.failed_subtrees
            + report.records_failed
            + usize::from(report.write_error.is_some());
        self.errors.fetch_add(errors as u64, Ordering::Relaxed);
    }
}

/// A pool thread that processes search jobs
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle; yields the reports of every job this worker ran
    handle: Option<JoinHandle<Vec<JobReport>>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        queue_rx: JobQueueReceiver,
        writer: Arc<ResultWriter>,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("search-{}", id))
            .spawn(move || worker_loop(id, queue_rx, writer, stats_clone))
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Shared handle to the worker's statistics; stays valid after `join`
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Wait for the worker to drain the queue and exit
    pub fn join(mut self) -> Result<Vec<JobReport>, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|panic| WorkerError::Panicked {
                id: self.id,
                message: panic_message(panic.as_ref()),
            }),
            None => Ok(Vec::new()),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Worker thread panicked".to_string()
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    queue_rx: JobQueueReceiver,
    writer: Arc<ResultWriter>,
    stats: Arc<WorkerStats>,
) -> Vec<JobReport> {
    debug!(worker = id, "Worker starting");

    let mut reports = Vec::new();
    while let Some(job) = queue_rx.recv() {
        let report = run_job(&job, &writer);
        stats.record_job(&report);
        reports.push(report);
    }

    debug!(
        worker = id,
        jobs = stats.jobs_completed.load(Ordering::Relaxed),
        matches = stats.matches_found.load(Ordering::Relaxed),
        "Worker shutting down"
    );

    reports
}

/// Search one job and write its output file
pub fn run_job(job: &SearchJob, writer: &ResultWriter) -> JobReport {
    debug!(key = %job.key, candidates = job.candidates.len(), "Search job starting");

    let outcome = search(job);
    let mut report = JobReport {
        key: job.key.clone(),
        subtrees: outcome.subtrees.len(),
        failed_subtrees: outcome.failed_subtrees(),
        matches: outcome.matches.len(),
        output: None,
        records_written: 0,
        records_failed: 0,
        write_error: None,
    };

    if outcome.matches.is_empty() {
        debug!(key = %job.key, "No matches, skipping output file");
        return report;
    }

    match writer.write(&job.key, &outcome.matches) {
        Ok(summary) => {
            info!(
                key = %job.key,
                matches = report.matches,
                file = %summary.path.display(),
                "Results written"
            );
            report.records_written = summary.records_written;
            report.records_failed = summary.records_failed;
            report.output = Some(summary.path);
        }
        Err(e) => {
            warn!(key = %job.key, error = %e, "Failed to write results");
            report.write_error = Some(e.to_string());
        }
    }

    report
}

/// Walk every candidate subtree of a job and collect matches
pub fn search(job: &SearchJob) -> SearchOutcome {
    let mut outcome = SearchOutcome::default();

    for candidate in &job.candidates {
        let walk = search_subtree(candidate, job, &mut outcome.matches);
        match &walk {
            WalkOutcome::Success { path, matches } => {
                trace!(key = %job.key, path = %path.display(), matches, "Subtree searched");
            }
            WalkOutcome::Failed {
                path,
                matches,
                error,
            } => {
                warn!(
                    key = %job.key,
                    path = %path.display(),
                    matches,
                    error = %error,
                    "Subtree search stopped"
                );
            }
        }
        outcome.subtrees.push(walk);
    }

    outcome
}

/// Walk one candidate subtree, appending matches to `matches`
///
/// The first traversal error abandons the rest of the subtree. Matches
/// already found are kept.
fn search_subtree(
    candidate: &CandidateEntry,
    job: &SearchJob,
    matches: &mut Vec<MatchRecord>,
) -> WalkOutcome {
    let walker = WalkDir::new(&candidate.path)
        .max_depth(job.max_depth)
        .follow_links(job.follow_links);

    let mut found = 0;
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                return WalkOutcome::Failed {
                    path: candidate.path.clone(),
                    matches: found,
                    error,
                };
            }
        };

        // Literal suffix test on the raw name, not an extension comparison
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(&*job.suffix) {
            matches.push(MatchRecord {
                name: name.into_owned(),
                path: entry.path().to_path_buf(),
                depth: entry.depth(),
            });
            found += 1;
        }
    }

    WalkOutcome::Success {
        path: candidate.path.clone(),
        matches: found,
    }
}

/// Aggregate statistics from multiple workers: (jobs, subtrees, matches, errors)
pub fn aggregate_stats(stats: &[Arc<WorkerStats>]) -> (u64, u64, u64, u64) {
    let mut jobs = 0u64;
    let mut subtrees = 0u64;
    let mut matches = 0u64;
    let mut errors = 0u64;

    for worker in stats {
        jobs += worker.jobs_completed.load(Ordering::Relaxed);
        subtrees += worker.subtrees_searched.load(Ordering::Relaxed);
        matches += worker.matches_found.load(Ordering::Relaxed);
        errors += worker.errors.load(Ordering::Relaxed);
    }

    (jobs, subtrees, matches, errors)
}
