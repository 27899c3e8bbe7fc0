//! Orchestrator lifecycle states
//!
//! A run moves `Idle -> Running` once the seed URL and the sink have been
//! checked, then ends in either `Stopped` (stop signal observed) or
//! `Drained` (frontier empty).

use std::fmt;

/// Represents the current state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Created but not started
    Idle,

    /// Loop is processing frontier items
    Running,

    // ===== Terminal States =====
    /// Stop signal observed between iterations; frontier left as is
    Stopped,

    /// Frontier ran empty
    Drained,
}

impl CrawlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Drained)
    }

    /// Returns true if the transition `self -> to` is legal
    pub fn can_transition_to(&self, to: CrawlState) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Stopped)
                | (Self::Running, Self::Drained)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Drained => "drained",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
