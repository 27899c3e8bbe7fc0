//! State module for tracking a crawl run
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of the orchestrator (idle, running, stopped, drained)
//! - `RunContext`: counters and the bounded activity log for one run

mod context;
mod crawl_state;

// Re-export main types
pub use context::{ActivityLog, CrawlStats, RunContext, LOG_CAPACITY};
pub use crawl_state::CrawlState;
