//! Expiry Sweep Task
//!
//! Background task that periodically drops expired keys from the in-process store.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::kv::MemoryStore;

/// Spawns a background task that periodically removes expired keys.
///
/// Expired keys are already invisible to reads. The sweep only reclaims
/// memory held by keys nobody touches again.
///
/// # Arguments
/// * `store` - Shared in-process store
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(store: Arc<MemoryStore>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;

            if removed > 0 {
                info!("Expiry sweep: removed {} expired keys", removed);
            } else {
                debug!("Expiry sweep: no expired keys found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::KvStore;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_keys() {
        let store = Arc::new(MemoryStore::new());
        store.setex("cached:http://a.test", 1, b"body").await.unwrap();
        store.set("count:http://a.test", b"1").await.unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Only the counter survives; cleanup_expired finds nothing left to do.
        assert_eq!(store.len().await, 1);
        assert_eq!(store.cleanup_expired().await, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_live_keys() {
        let store = Arc::new(MemoryStore::new());
        store.setex("long_lived", 3600, b"value").await.unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.get("long_lived").await.unwrap(), Some(b"value".to_vec()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(MemoryStore::new());

        let handle = spawn_cleanup_task(store, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
