//! Page Cache Counters
//!
//! Process-local tallies of how `get_page` requests were answered. The store
//! only keeps per-URL access counts, so these live beside the page cache.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// How a single `get_page` call was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Fetched,
    FetchFailed,
}

/// Counters shared by concurrent `get_page` calls.
#[derive(Debug, Default)]
pub struct PageCounters {
    hits: AtomicU64,
    fetched: AtomicU64,
    failed: AtomicU64,
}

impl PageCounters {
    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Hit => &self.hits,
            Outcome::Fetched => &self.fetched,
            Outcome::FetchFailed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PageStats {
        let fetched = self.fetched.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        PageStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: fetched + failed,
            fetch_errors: failed,
        }
    }
}

/// Point-in-time copy of [`PageCounters`].
///
/// `misses` counts every request that went to the network, failed fetches
/// included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageStats {
    pub hits: u64,
    pub misses: u64,
    pub fetch_errors: u64,
}

impl PageStats {
    /// Share of requests served without a fetch, 0.0 before any request.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_counters_are_zero() {
        let stats = PageCounters::default().snapshot();
        assert_eq!(stats, PageStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_failed_fetch_counts_as_miss() {
        let counters = PageCounters::default();
        counters.record(Outcome::Hit);
        counters.record(Outcome::Fetched);
        counters.record(Outcome::FetchFailed);
        counters.record(Outcome::Hit);

        let stats = counters.snapshot();
        assert_eq!(
            stats,
            PageStats {
                hits: 2,
                misses: 2,
                fetch_errors: 1
            }
        );
        assert_eq!(stats.hit_rate(), 0.5);
    }
}
