//! Response DTOs for the recorder API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::web::{Page, PageStats};

/// Response body for POST /store
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Key the payload was stored under
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The decoded value (byte array, string, or number)
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for GET /page
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub url: String,
    pub body: String,
    /// True when served from the cache
    pub cached: bool,
    /// Accesses recorded for this URL, including this one
    pub access_count: i64,
}

impl PageResponse {
    pub fn new(page: Page, access_count: i64) -> Self {
        Self {
            url: page.url,
            body: page.body,
            cached: page.cached,
            access_count,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Page requests served from the cache
    pub hits: u64,
    /// Page requests that triggered a fetch
    pub misses: u64,
    /// Misses whose fetch failed
    pub fetch_errors: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// TTL applied to cached pages, in seconds
    pub page_ttl: u64,
}

impl StatsResponse {
    pub fn new(stats: &PageStats, page_ttl: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            fetch_errors: stats.fetch_errors,
            hit_rate: stats.hit_rate(),
            page_ttl,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
