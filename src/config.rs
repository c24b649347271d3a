//! Configuration types for prefix-finder
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - Lenient parsing of the positional depth argument

use crate::error::ConfigError;
use crate::walker::partition::{parse_prefix_keys, PrefixKey, DEFAULT_PREFIX_KEYS};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Depth used when none is given or the given one is unusable
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Basename appended to each key to form the output file name
pub const DEFAULT_OUTPUT_BASENAME: &str = "output.csv";

/// Find files by suffix, searching top-level prefix groups in parallel
#[derive(Parser, Debug, Clone)]
#[command(
    name = "prefix-finder",
    version,
    about = "Find files by suffix, searching top-level prefix groups in parallel",
    long_about = "Lists the root directory once, groups its children by the first characters \
                  of their names, and searches every non-empty group in parallel up to a maximum \
                  depth.\n\n\
                  Each group writes its matches to <KEY>_output.csv with the columns \
                  'File Name' and 'Path'. Groups without matches produce no file.",
    after_help = "EXAMPLES:\n    \
        prefix-finder \"/mnt/favorite photos\" pdf\n    \
        prefix-finder /mnt/share .log A,B,C 3\n    \
        prefix-finder /data csv 1,2,3 -o /tmp/results -w 16"
)]
pub struct CliArgs {
    /// Root directory to search
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// File name suffix to match (literal, case-sensitive)
    #[arg(value_name = "SUFFIX")]
    pub suffix: String,

    /// Comma-separated prefix keys (case-insensitive)
    #[arg(value_name = "PREFIX_KEYS")]
    pub prefix_keys: Option<String>,

    /// Maximum traversal depth below each top-level entry
    #[arg(value_name = "MAX_DEPTH", allow_negative_numbers = true)]
    pub max_depth: Option<String>,

    /// Directory where the CSV files are written
    #[arg(short = 'o', long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Basename appended to each key ("<KEY>_<BASENAME>")
    #[arg(long, default_value = DEFAULT_OUTPUT_BASENAME, value_name = "NAME")]
    pub basename: String,

    /// Maximum number of concurrent search workers
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Follow symbolic links while searching
    #[arg(short = 'L', long)]
    pub follow_links: bool,

    /// Quiet mode - suppress header and summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn default_workers() -> usize {
    // Traversal is I/O bound, especially on network mounts
    (num_cpus::get() * 2).min(MAX_WORKERS)
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Absolute root directory
    pub root: PathBuf,

    /// Literal file name suffix (empty matches every entry)
    pub suffix: String,

    /// Normalized, de-duplicated prefix keys in user order
    pub keys: Vec<PrefixKey>,

    /// Depth bound applied to each candidate subtree
    pub max_depth: usize,

    /// Directory receiving the CSV files
    pub output_dir: PathBuf,

    /// Output basename
    pub basename: String,

    /// Worker pool cap
    pub worker_count: usize,

    /// Follow symlinks during traversal
    pub follow_links: bool,

    /// Print header and summary
    pub show_summary: bool,
}

impl SearchConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if !args.root.exists() {
            return Err(ConfigError::RootNotFound { path: args.root });
        }

        let root = std::path::absolute(&args.root).map_err(|e| ConfigError::InvalidRoot {
            path: args.root.clone(),
            reason: e.to_string(),
        })?;

        let raw_keys = args.prefix_keys.as_deref().unwrap_or(DEFAULT_PREFIX_KEYS);
        let keys = parse_prefix_keys(raw_keys);
        if keys.is_empty() {
            return Err(ConfigError::EmptyKeys {
                input: raw_keys.to_string(),
            });
        }

        let max_depth = parse_max_depth(args.max_depth.as_deref());

        // Validate worker count
        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        validate_output_dir(&args.output_dir)?;
        validate_basename(&args.basename)?;

        Ok(Self {
            root,
            suffix: args.suffix,
            keys,
            max_depth,
            output_dir: args.output_dir,
            basename: args.basename,
            worker_count: args.workers,
            follow_links: args.follow_links,
            show_summary: !args.quiet,
        })
    }
}

/// Parse the positional depth argument, falling back to the default
///
/// Missing input silently yields [`DEFAULT_MAX_DEPTH`]. Non-numeric or
/// non-positive input is logged and also yields the default.
pub fn parse_max_depth(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_MAX_DEPTH;
    };

    match raw.trim().parse::<usize>() {
        Ok(depth) if depth > 0 => depth,
        Ok(_) => {
            warn!(value = raw, default = DEFAULT_MAX_DEPTH, "invalid depth parameter: must be positive");
            DEFAULT_MAX_DEPTH
        }
        Err(e) => {
            warn!(value = raw, default = DEFAULT_MAX_DEPTH, error = %e, "invalid depth parameter");
            DEFAULT_MAX_DEPTH
        }
    }
}

fn validate_output_dir(dir: &Path) -> Result<(), ConfigError> {
    if !dir.is_dir() {
        return Err(ConfigError::InvalidOutputDir {
            path: dir.to_path_buf(),
            reason: "not an existing directory".to_string(),
        });
    }
    Ok(())
}

fn validate_basename(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidBasename {
            name: name.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(ConfigError::InvalidBasename {
            name: name.to_string(),
            reason: "must not contain path separators".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> CliArgs {
        let mut argv = vec!["prefix-finder"];
        argv.extend_from_slice(list);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_max_depth() {
        assert_eq!(parse_max_depth(None), DEFAULT_MAX_DEPTH);
        assert_eq!(parse_max_depth(Some("3")), 3);
        assert_eq!(parse_max_depth(Some(" 12 ")), 12);
        assert_eq!(parse_max_depth(Some("abc")), DEFAULT_MAX_DEPTH);
        assert_eq!(parse_max_depth(Some("0")), DEFAULT_MAX_DEPTH);
        assert_eq!(parse_max_depth(Some("-4")), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_negative_depth_positional_falls_back() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let config = SearchConfig::from_args(args(&[root, "pdf", "A", "-4", "-o", root])).unwrap();

        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        let keys: Vec<&str> = config.keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["A"]);
    }

    #[test]
    fn test_empty_suffix_accepted() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let config = SearchConfig::from_args(args(&[root, "", "A", "-o", root])).unwrap();
        assert_eq!(config.suffix, "");
    }

    #[test]
    fn test_too_few_positionals_is_usage_error() {
        assert!(CliArgs::try_parse_from(["prefix-finder"]).is_err());
        assert!(CliArgs::try_parse_from(["prefix-finder", "/tmp"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let config = SearchConfig::from_args(args(&[root, "pdf", "-o", root])).unwrap();

        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.keys.len(), 37);
        assert_eq!(config.basename, DEFAULT_OUTPUT_BASENAME);
        assert!(config.root.is_absolute());
        assert!(!config.follow_links);
    }

    #[test]
    fn test_keys_and_depth_positionals() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let config =
            SearchConfig::from_args(args(&[root, "pdf", "a,b", "abc", "-o", root])).unwrap();

        let keys: Vec<&str> = config.keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = SearchConfig::from_args(args(&[missing.to_str().unwrap(), "pdf"])).unwrap_err();
        assert!(matches!(err, ConfigError::RootNotFound { .. }));
    }

    #[test]
    fn test_invalid_worker_count() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let err = SearchConfig::from_args(args(&[root, "pdf", "-w", "0", "-o", root])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { .. }));
    }

    #[test]
    fn test_empty_keys_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let err = SearchConfig::from_args(args(&[root, "pdf", " , ", "-o", root])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyKeys { .. }));
    }

    #[test]
    fn test_basename_with_separator_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let err = SearchConfig::from_args(args(&[root, "pdf", "--basename", "a/b.csv", "-o", root]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBasename { .. }));
    }
}
