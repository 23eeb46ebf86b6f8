//! Call-History Replay
//!
//! Reads back the counter and history lists of an instrumented operation.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::kv::{read_counter, KvStore};
use crate::recorder::{inputs_key, outputs_key};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

/// Recorded history of an operation, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallLog {
    pub operation: String,
    pub calls: i64,
    pub entries: Vec<CallRecord>,
}

impl CallLog {
    /// Writes the report to stdout.
    pub fn print(&self) {
        print!("{}", self);
    }
}

impl fmt::Display for CallLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times", self.operation, self.calls)?;
        for entry in &self.entries {
            writeln!(f, "{}(*{}) -> {}", self.operation, entry.input, entry.output)?;
        }
        Ok(())
    }
}

// == Replay ==
/// Collects the call history of `operation`.
///
/// The counter reads as zero when missing or non-numeric. Inputs and outputs
/// are paired by position and truncated to the shorter list. Entries that are
/// not valid UTF-8 read as empty strings.
pub async fn replay(kv: &dyn KvStore, operation: &str) -> Result<CallLog> {
    let calls = read_counter(kv, operation).await?;
    let inputs = kv.lrange(&inputs_key(operation), 0, -1).await?;
    let outputs = kv.lrange(&outputs_key(operation), 0, -1).await?;

    let entries = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| CallRecord {
            input: String::from_utf8(input).unwrap_or_default(),
            output: String::from_utf8(output).unwrap_or_default(),
        })
        .collect();

    Ok(CallLog {
        operation: operation.to_string(),
        calls,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[tokio::test]
    async fn test_replay_empty_operation() {
        let store = MemoryStore::new();

        let log = replay(&store, "Cache.store").await.unwrap();
        assert_eq!(log.calls, 0);
        assert!(log.entries.is_empty());
        assert_eq!(log.to_string(), "Cache.store was called 0 times\n");
    }

    #[tokio::test]
    async fn test_replay_formats_lines() {
        let store = MemoryStore::new();
        store.incr("Cache.store").await.unwrap();
        store.rpush("Cache.store:inputs", b"('foo',)").await.unwrap();
        store.rpush("Cache.store:outputs", b"k1").await.unwrap();

        let log = replay(&store, "Cache.store").await.unwrap();
        assert_eq!(
            log.to_string(),
            "Cache.store was called 1 times\nCache.store(*('foo',)) -> k1\n"
        );
        log.print();
    }

    #[tokio::test]
    async fn test_replay_truncates_to_shorter_list() {
        let store = MemoryStore::new();
        store.rpush("op:inputs", b"(1,)").await.unwrap();
        store.rpush("op:inputs", b"(2,)").await.unwrap();
        store.rpush("op:outputs", b"a").await.unwrap();

        let log = replay(&store, "op").await.unwrap();
        assert_eq!(
            log.entries,
            vec![CallRecord {
                input: "(1,)".to_string(),
                output: "a".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_replay_swallows_bad_counter_and_utf8() {
        let store = MemoryStore::new();
        store.set("op", b"many").await.unwrap();
        store.rpush("op:inputs", &[0xff, 0xfe]).await.unwrap();
        store.rpush("op:outputs", b"ok").await.unwrap();

        let log = replay(&store, "op").await.unwrap();
        assert_eq!(log.calls, 0);
        assert_eq!(log.entries[0].input, "");
        assert_eq!(log.entries[0].output, "ok");
    }

    #[tokio::test]
    async fn test_replay_of_list_key_counts_zero() {
        let store = MemoryStore::new();
        store.rpush("Cache.store:inputs", b"('foo',)").await.unwrap();

        let log = replay(&store, "Cache.store:inputs").await.unwrap();
        assert_eq!(log.calls, 0);
        assert_eq!(log.to_string(), "Cache.store:inputs was called 0 times\n");
    }
}
