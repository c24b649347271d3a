//! prefix-finder - Partitioned Parallel File Finder
//!
//! Finds files whose names end with a given suffix beneath a root
//! directory. Built for large, often network-mounted trees where a single
//! sequential walk is too slow.
//!
//! # How it works
//!
//! - **One listing**: the root directory is read once.
//!
//! - **Prefix partitioning**: every immediate child is assigned to each
//!   prefix key its uppercased name starts with (default keys: `1`-`9`,
//!   `0`, `_`, `A`-`Z`).
//!
//! - **Parallel search**: each non-empty partition becomes a job on a
//!   bounded thread pool; the job walks its subtrees up to a maximum depth.
//!
//! - **Per-key output**: each job writes `<KEY>_output.csv` with the
//!   columns `File Name` and `Path`. Keys without matches get no file.
//!
//! # Example
//!
//! ```bash
//! # Search the whole alphabet, depth 5
//! prefix-finder /mnt/share pdf
//!
//! # Only entries starting with A or B, depth 3, results in /tmp/out
//! prefix-finder /mnt/share .log A,B 3 -o /tmp/out
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod walker;

pub use config::{CliArgs, SearchConfig};
pub use error::{Result, WalkerError};
pub use walker::{SearchCoordinator, SearchResult};
