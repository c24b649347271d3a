//! Console header and summary for a search run

use crate::config::SearchConfig;
use crate::walker::SearchResult;
use chrono::Local;
use console::style;

/// Timestamp format used in the run header
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a header at the start of the search
pub fn print_header(config: &SearchConfig) {
    println!();
    println!(
        "{} {}",
        style("prefix-finder").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Searching for files:").bold(),
        Local::now().format(TIMESTAMP_FORMAT)
    );
    println!("  {} {}", style("Root:").bold(), config.root.display());
    println!("  {} {}", style("Suffix:").bold(), config.suffix);
    println!("  {} {}", style("Prefix keys:").bold(), config.keys.len());
    println!("  {} {}", style("Search depth:").bold(), config.max_depth);
    println!("  {} {}", style("Workers:").bold(), config.worker_count);
    println!("  {} {}", style("Output:").bold(), config.output_dir.display());
    println!();
}

/// Print a summary of the search results
pub fn print_summary(result: &SearchResult) {
    let duration_secs = result.duration.as_secs_f64();

    println!();
    println!("{}", style("Search Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Top-level entries:").bold(),
        format_number(result.root_children as u64)
    );
    println!(
        "  {} {} ({} workers)",
        style("Jobs:").bold(),
        format_number(result.jobs as u64),
        result.workers
    );
    println!(
        "  {} {}",
        style("Matches:").bold(),
        format_number(result.total_matches() as u64)
    );
    println!(
        "  {} {}",
        style("Files written:").bold(),
        format_number(result.files_written() as u64)
    );
    println!("  {} {:.1}s", style("Duration:").bold(), duration_secs);
    if result.errors() > 0 {
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(result.errors() as u64)
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
