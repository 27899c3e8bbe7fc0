//! Output module for reporting crawl results
//!
//! This module handles:
//! - Rendering the end-of-run statistics summary
//! - Printing it for the CLI

pub mod stats;

pub use stats::{format_summary, print_summary, LOG_TAIL_LINES};
