//! Recording Cache
//!
//! Stores payloads under random keys and records every `store` call.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{RecorderError, Result};
use crate::kv::{read_counter, SharedStore};
use crate::recorder::{replay, CallLog, CallRecorder, Payload};

/// Name under which `Cache::store` calls are counted and recorded.
pub const STORE_OPERATION: &str = "Cache.store";

// == Cache ==
/// Value store whose `store` operation is counted and recorded.
#[derive(Clone)]
pub struct Cache {
    kv: SharedStore,
    store_calls: CallRecorder,
}

impl Cache {
    // == Constructor ==
    /// Takes ownership of the database behind `kv` and flushes it.
    pub async fn new(kv: SharedStore) -> Result<Self> {
        kv.flushdb().await?;
        info!("Database flushed for new cache");

        Ok(Self {
            store_calls: CallRecorder::new(kv.clone(), STORE_OPERATION),
            kv,
        })
    }

    // == Store ==
    /// Stores `data` under a fresh random key and returns the key.
    pub async fn store(&self, data: impl Into<Payload>) -> Result<String> {
        let payload = data.into();
        let args = payload.args_repr();

        self.store_calls
            .run(args, async {
                let key = Uuid::new_v4().to_string();
                self.kv.set(&key, &payload.to_bytes()).await?;
                debug!("Stored {} under {}", payload.repr(), key);
                Ok(key)
            })
            .await
    }

    // == Readers ==
    /// Raw value under `key`, `None` if absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.kv.get(key).await
    }

    /// Raw value under `key`, passed through `convert`.
    pub async fn get_with<T, F>(&self, key: &str, convert: F) -> Result<T>
    where
        F: FnOnce(Option<Vec<u8>>) -> T,
    {
        Ok(convert(self.get(key).await?))
    }

    /// Value decoded as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        match self.get(key).await? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| {
                RecorderError::Parse(format!("value at '{}' is not valid UTF-8", key))
            }),
        }
    }

    /// Value parsed as an integer. Missing or malformed values read as 0.
    pub async fn get_int(&self, key: &str) -> Result<i64> {
        match self.try_get_int(key).await {
            Err(RecorderError::NotFound(_)) | Err(RecorderError::Parse(_)) => Ok(0),
            other => other,
        }
    }

    /// Value parsed as an integer, failing on missing or malformed values.
    pub async fn try_get_int(&self, key: &str) -> Result<i64> {
        let text = self
            .get_str(key)
            .await?
            .ok_or_else(|| RecorderError::NotFound(key.to_string()))?;
        text.trim().parse().map_err(|_| {
            RecorderError::Parse(format!("value at '{}' is not an integer", key))
        })
    }

    /// Value parsed as a float.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        match self.get_str(key).await? {
            None => Ok(None),
            Some(text) => text.trim().parse().map(Some).map_err(|_| {
                RecorderError::Parse(format!("value at '{}' is not a float", key))
            }),
        }
    }

    // == History ==
    /// Call count of `operation`, zero if unreadable.
    pub async fn calls(&self, operation: &str) -> Result<i64> {
        read_counter(self.kv.as_ref(), operation).await
    }

    /// Recorded history of `operation`.
    pub async fn replay(&self, operation: &str) -> Result<CallLog> {
        replay(self.kv.as_ref(), operation).await
    }
}
