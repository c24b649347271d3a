//! prefix-finder - Partitioned Parallel File Finder
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use prefix_finder::config::{CliArgs, SearchConfig};
use prefix_finder::report::{print_header, print_summary};
use prefix_finder::walker::SearchCoordinator;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments (prints usage and exits on too few arguments)
    let args = CliArgs::parse();

    // Setup logging before validation so depth warnings are visible
    setup_logging(args.verbose);

    let config = SearchConfig::from_args(args).context("Invalid configuration")?;

    if config.show_summary {
        print_header(&config);
    }
    let show_summary = config.show_summary;

    let result = SearchCoordinator::new(config)
        .run()
        .context("Search failed")?;

    if show_summary {
        print_summary(&result);
    }

    if result.errors() > 0 {
        info!(errors = result.errors(), "Search completed with errors");
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("prefix_finder=debug,warn")
    } else {
        EnvFilter::new("prefix_finder=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
