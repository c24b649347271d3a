//! Error types for prefix-finder
//!
//! This module defines the error hierarchy that covers:
//! - Configuration and CLI errors
//! - Root listing failures (the only fatal runtime error)
//! - CSV output errors
//! - Worker pool errors
//!
//! Failures scoped to one subtree, one output record or one output file
//! never become a `WalkerError`; they are logged and counted where they
//! happen.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the prefix-finder application
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Failed to list the immediate children of the root directory
    #[error("Failed to list root directory '{path}': {source}")]
    ListRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Root directory does not exist
    #[error("Unable to find root directory '{path}'")]
    RootNotFound { path: PathBuf },

    /// Root exists but could not be resolved to an absolute path
    #[error("Invalid root directory '{path}': {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// No usable prefix keys after normalization
    #[error("No prefix keys in '{input}'")]
    EmptyKeys { input: String },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Output directory error
    #[error("Invalid output directory '{path}': {reason}")]
    InvalidOutputDir { path: PathBuf, reason: String },

    /// Output basename error
    #[error("Invalid output basename '{name}': {reason}")]
    InvalidBasename { name: String, reason: String },
}

/// CSV output errors
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to create the output file
    #[error("Failed to create '{path}': {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to write the header row
    #[error("Failed to write header to '{path}': {source}")]
    HeaderFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to flush buffered rows to disk
    #[error("Failed to flush '{path}': {source}")]
    FlushFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Worker pool errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker thread could not be started
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Job queue closed before all jobs were submitted
    #[error("Failed to submit search job for key '{key}': queue closed")]
    QueueSendFailed { key: String },
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for OutputError
pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Represents the outcome of walking a single candidate subtree
#[derive(Debug)]
pub enum WalkOutcome {
    /// Walked the whole subtree (up to the depth bound)
    Success { path: PathBuf, matches: usize },

    /// Traversal stopped early; matches found before the failure are kept
    Failed {
        path: PathBuf,
        matches: usize,
        error: walkdir::Error,
    },
}

impl WalkOutcome {
    /// Returns true if this outcome represents success
    pub fn is_success(&self) -> bool {
        matches!(self, WalkOutcome::Success { .. })
    }

    /// Returns the candidate path associated with this outcome
    pub fn path(&self) -> &PathBuf {
        match self {
            WalkOutcome::Success { path, .. } => path,
            WalkOutcome::Failed { path, .. } => path,
        }
    }

    /// Number of matches contributed by this subtree
    pub fn matches(&self) -> usize {
        match self {
            WalkOutcome::Success { matches, .. } => *matches,
            WalkOutcome::Failed { matches, .. } => *matches,
        }
    }
}
