//! Key-Value Store Module
//!
//! The command surface the recorder and page cache rely on, with a Redis
//! backend and an in-process backend that mirrors Redis semantics.

mod entry;
mod memory;
mod redis_store;


use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{RecorderError, Result};

// Re-export public types
pub use entry::{Entry, StoredValue};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Shared handle to a key-value backend.
pub type SharedStore = Arc<dyn KvStore>;

// == KvStore Trait ==
/// Redis-style key-value primitives.
///
/// Each method is a single command and is atomic on its own. Callers that
/// issue several commands get no transaction across them.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// `SET key value`. Clears any expiration on the key.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// `GET key`. Absent and expired keys read as `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// `INCR key`. A missing key starts from zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// `RPUSH key value`. Returns the list length after the push.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// `LRANGE key start stop` with inclusive stop and negative indexing.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// `SETEX key ttl value`. `ttl_secs` must be positive.
    async fn setex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()>;

    /// `FLUSHDB`
    async fn flushdb(&self) -> Result<()>;
}

/// Largest TTL accepted by `setex`. The absolute expiry in milliseconds,
/// current time included, must fit an `i64` as it does in Redis.
pub const MAX_TTL_SECS: u64 = (i64::MAX as u64 - (1 << 42)) / 1000;

/// Rejects TTLs `SETEX` would refuse: zero, or too large to express as an
/// expiry time.
pub fn validate_ttl(ttl_secs: u64) -> Result<()> {
    if ttl_secs == 0 || ttl_secs > MAX_TTL_SECS {
        return Err(RecorderError::InvalidRequest(format!(
            "invalid expire time in 'setex' command: {}",
            ttl_secs
        )));
    }
    Ok(())
}

/// Reads an integer counter, treating missing, non-numeric or wrong-typed
/// values as zero.
///
/// Store failures still propagate.
pub async fn read_counter(kv: &dyn KvStore, key: &str) -> Result<i64> {
    let raw = match kv.get(key).await {
        Ok(raw) => raw,
        Err(RecorderError::WrongType(_)) => return Ok(0),
        Err(e) => return Err(e),
    };
    Ok(raw
        .as_deref()
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0))
}
