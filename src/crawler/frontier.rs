//! Crawl frontier: the pending-URL queue plus the visited set
//!
//! Priority links are unshifted to the head so topic and listing pages are
//! explored depth-first; normal links are appended to the tail. A URL enters
//! the pending queue at most once and, once dequeued, is never queued again.

use crate::crawler::links::ExtractedLinks;
use std::collections::{HashSet, VecDeque};

/// How many links an `offer` call actually queued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfferOutcome {
    pub priority_added: usize,
    pub normal_added: usize,
}

impl OfferOutcome {
    pub fn total(&self) -> usize {
        self.priority_added + self.normal_added
    }
}

/// Ordered work queue of crawl URLs
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, head first
    pending: VecDeque<String>,

    /// Mirror of `pending` for membership checks
    queued: HashSet<String>,

    /// URLs already handed out by `next`
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding one seed URL
    pub fn seed(url: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.push_back(url.into());
        frontier
    }

    /// Creates a frontier from a flat URL list, keeping the first occurrence
    /// of each URL
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frontier = Self::default();
        for url in urls {
            frontier.push_back(url.into());
        }
        frontier
    }

    /// Pops the next URL to crawl and marks it visited
    ///
    /// Returns None when nothing is pending.
    pub fn next(&mut self) -> Option<String> {
        while let Some(url) = self.pending.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Queues the links from one page
    ///
    /// The priority batch is placed at the head as a block, in its given
    /// order, ahead of everything already pending. Normal links go to the
    /// tail. Links already pending or visited are dropped.
    pub fn offer(&mut self, links: ExtractedLinks) -> OfferOutcome {
        let mut batch = Vec::with_capacity(links.priority.len());
        for url in links.priority {
            if self.is_known(&url) {
                continue;
            }
            self.queued.insert(url.clone());
            batch.push(url);
        }

        let priority_added = batch.len();
        for url in batch.into_iter().rev() {
            self.pending.push_front(url);
        }

        let mut normal_added = 0;
        for url in links.normal {
            if self.push_back(url) {
                normal_added += 1;
            }
        }

        OfferOutcome {
            priority_added,
            normal_added,
        }
    }

    fn push_back(&mut self, url: String) -> bool {
        if self.is_known(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    fn is_known(&self, url: &str) -> bool {
        self.visited.contains(url) || self.queued.contains(url)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Pending URLs, head first
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn peek_front(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
