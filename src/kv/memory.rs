//! Memory Store Module
//!
//! In-process key-value backend with Redis command semantics and lazy TTL expiry.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{RecorderError, Result};
use crate::kv::{validate_ttl, Entry, KvStore, StoredValue};

const NOT_AN_INTEGER: &str = "ERR value is not an integer or out of range";

// == Memory Store ==
/// HashMap-backed store that answers the same commands as Redis.
///
/// Expired keys are invisible to every command. They are physically removed
/// on access or by [`MemoryStore::cleanup_expired`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of live (unexpired) keys.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|entry| !entry.is_expired()).count()
    }

    // == Is Empty ==
    /// Returns true if no live keys remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == TTL ==
    /// Remaining TTL of a live key in milliseconds, None if the key has no
    /// expiration or does not exist.
    pub async fn ttl_ms(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(Entry::ttl_remaining_ms)
    }
}

/// Looks up a key, dropping it first if it has expired.
fn live_entry<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(Entry::is_expired) {
        entries.remove(key);
        debug!("Dropped expired key {}", key);
    }
    entries.get_mut(key)
}

/// Resolves Redis-style inclusive range indices against a list length.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start >= len || stop < start {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry::new(StoredValue::Bytes(value.to_vec()), None),
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            None => Ok(None),
            Some(entry) => match &entry.value {
                StoredValue::Bytes(bytes) => Ok(Some(bytes.clone())),
                StoredValue::List(_) => Err(RecorderError::WrongType(key.to_string())),
            },
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            None => {
                entries.insert(
                    key.to_string(),
                    Entry::new(StoredValue::Bytes(b"1".to_vec()), None),
                );
                Ok(1)
            }
            Some(entry) => {
                let StoredValue::Bytes(bytes) = &mut entry.value else {
                    return Err(RecorderError::WrongType(key.to_string()));
                };
                let next = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .and_then(|n| n.checked_add(1))
                    .ok_or_else(|| RecorderError::Store(NOT_AN_INTEGER.to_string()))?;
                // Expiration is left untouched, as Redis does.
                *bytes = next.to_string().into_bytes();
                Ok(next)
            }
        }
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            None => {
                entries.insert(
                    key.to_string(),
                    Entry::new(StoredValue::List(vec![value.to_vec()]), None),
                );
                Ok(1)
            }
            Some(entry) => match &mut entry.value {
                StoredValue::List(items) => {
                    items.push(value.to_vec());
                    Ok(items.len())
                }
                StoredValue::Bytes(_) => Err(RecorderError::WrongType(key.to_string())),
            },
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            None => Ok(Vec::new()),
            Some(entry) => match &entry.value {
                StoredValue::List(items) => Ok(resolve_range(items.len(), start, stop)
                    .map(|(from, to)| items[from..=to].to_vec())
                    .unwrap_or_default()),
                StoredValue::Bytes(_) => Err(RecorderError::WrongType(key.to_string())),
            },
        }
    }

    async fn setex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()> {
        validate_ttl(ttl_secs)?;

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry::new(StoredValue::Bytes(value.to_vec()), Some(ttl_secs)),
        );
        Ok(())
    }

    async fn flushdb(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        debug!("Flushed {} keys", removed);
        Ok(())
    }
}
