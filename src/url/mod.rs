//! URL handling module
//!
//! This module provides URL normalization and resolution, netloc extraction,
//! and the filters that decide which discovered links may be crawled.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::netloc;
pub use filter::{is_junk, is_on_domain, is_valid_url, matching_ignore_pattern, JUNK_MARKERS};
pub use normalize::{normalize_url, resolve_href};
