//! Expiring Page Cache
//!
//! Counts accesses per URL and keeps fetched bodies for a short TTL.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::kv::{read_counter, SharedStore};
use crate::web::stats::{Outcome, PageCounters};
use crate::web::{PageFetcher, PageStats};

/// TTL applied to cached bodies unless configured otherwise.
pub const DEFAULT_PAGE_TTL: u64 = 10;

/// Key of the per-URL access counter.
pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

/// Key of the cached body for a URL.
pub fn cached_key(url: &str) -> String {
    format!("cached:{}", url)
}

/// A body returned by [`PageCache::get_page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub url: String,
    pub body: String,
    /// True when served from the store without a fetch
    pub cached: bool,
}

// == Page Cache ==
pub struct PageCache {
    kv: SharedStore,
    fetcher: Arc<dyn PageFetcher>,
    ttl_secs: u64,
    counters: PageCounters,
}

impl PageCache {
    /// Creates a page cache writing bodies with `ttl_secs` expiration.
    pub fn new(kv: SharedStore, fetcher: Arc<dyn PageFetcher>, ttl_secs: u64) -> Self {
        Self {
            kv,
            fetcher,
            ttl_secs,
            counters: PageCounters::default(),
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    // == Get Page ==
    /// Returns the body of `url`, from the store when a cached copy is live.
    ///
    /// The access counter is bumped on every call. An empty cached body is
    /// treated as absent and refetched. Fetch errors propagate and nothing is
    /// cached for them.
    pub async fn get_page(&self, url: &str) -> Result<Page> {
        let visits = self.kv.incr(&count_key(url)).await?;
        let key = cached_key(url);

        if let Some(body) = self.kv.get(&key).await?.filter(|b| !b.is_empty()) {
            self.counters.record(Outcome::Hit);
            debug!("Cache hit for {} (access #{})", url, visits);
            return Ok(Page {
                url: url.to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
                cached: true,
            });
        }

        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                self.counters.record(Outcome::FetchFailed);
                warn!("Fetch of {} failed: {}", url, e);
                return Err(e);
            }
        };
        self.counters.record(Outcome::Fetched);
        self.kv.setex(&key, self.ttl_secs, body.as_bytes()).await?;
        info!(
            "Cached {} bytes for {} for {}s (access #{})",
            body.len(),
            url,
            self.ttl_secs,
            visits
        );

        Ok(Page {
            url: url.to_string(),
            body,
            cached: false,
        })
    }

    /// Number of `get_page` calls recorded for `url`, zero if none.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        read_counter(self.kv.as_ref(), &count_key(url)).await
    }

    /// Snapshot of how this process's `get_page` calls were answered.
    pub fn stats(&self) -> PageStats {
        self.counters.snapshot()
    }
}
