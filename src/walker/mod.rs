//! Partitioned parallel file search
//!
//! This module implements the search pipeline: the root is listed once,
//! its children are bucketed by prefix key, and every non-empty bucket is
//! searched by a pool thread that writes its own output file.
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │   SearchCoordinator     │
//!                     │  - list root (once)     │
//!                     │  - partition by prefix  │
//!                     └───────────┬─────────────┘
//!                                 │ SearchJob per non-empty key
//!                                 ▼
//!                     ┌─────────────────────────┐
//!                     │   JobQueue (crossbeam)  │
//!                     └───────────┬─────────────┘
//!       ┌─────────────────────────┼─────────────────────────┐
//!       │                         │                         │
//! ┌─────▼─────┐             ┌─────▼─────┐             ┌─────▼─────┐
//! │ search-0  │             │ search-1  │             │ search-N  │
//! │  walkdir  │             │  walkdir  │             │  walkdir  │
//! │  CSV out  │             │  CSV out  │             │  CSV out  │
//! └───────────┘             └───────────┘             └───────────┘
//! ```

pub mod coordinator;
pub mod partition;
pub mod queue;
pub mod worker;

pub use coordinator::{SearchCoordinator, SearchResult};
pub use partition::{partition, Bucket, CandidateEntry, PartitionMap, PrefixKey};
pub use queue::{JobQueue, SearchJob};
pub use worker::{search, JobReport, MatchRecord, SearchOutcome};
