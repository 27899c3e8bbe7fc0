//! Run summary rendering
//!
//! Turns a finished [`RunReport`] into the block of text the CLI prints
//! after a crawl or sitemap sync.

use crate::crawler::RunReport;
use std::fmt::Write;

/// Number of activity log lines included in the summary
pub const LOG_TAIL_LINES: usize = 10;

/// Renders the run summary
pub fn format_summary(report: &RunReport) -> String {
    let stats = report.context.stats;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Summary ===\n");
    let _ = writeln!(out, "Status: {}", report.state);
    let _ = writeln!(out, "  URLs visited: {}", report.visited);
    let _ = writeln!(out, "  Queue size: {}", report.pending);
    let _ = writeln!(out, "  Articles found: {}", stats.found);
    let _ = writeln!(out, "  Articles saved: {}", stats.added);
    let _ = writeln!(out, "  Errors: {}", stats.errors);

    let save_rate = if stats.found > 0 {
        (stats.added as f64 / stats.found as f64) * 100.0
    } else {
        0.0
    };
    let _ = writeln!(
        out,
        "\nSave Rate: {:.1}% ({} / {} articles stored)",
        save_rate, stats.added, stats.found
    );

    let log = &report.context.log;
    if !log.is_empty() {
        let skip = log.len().saturating_sub(LOG_TAIL_LINES);
        let _ = writeln!(out, "\nRecent Activity:");
        for line in log.entries().skip(skip) {
            let _ = writeln!(out, "  {}", line);
        }
    }

    out
}

/// Prints the run summary to stdout
pub fn print_summary(report: &RunReport) {
    print!("{}", format_summary(report));
}
