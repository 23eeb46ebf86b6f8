//! Web Module
//!
//! URL fetching behind a short-lived cache in the key-value store.

mod fetcher;
mod page_cache;
mod stats;

pub use fetcher::{HttpFetcher, PageFetcher};
pub use page_cache::{cached_key, count_key, Page, PageCache, DEFAULT_PAGE_TTL};
pub use stats::PageStats;
