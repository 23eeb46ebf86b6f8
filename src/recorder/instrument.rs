//! Call Instrumentation
//!
//! Wraps an operation so every invocation bumps a call counter and appends its
//! input and output to history lists in the key-value store.

use std::fmt::Display;
use std::future::Future;

use tracing::debug;

use crate::error::Result;
use crate::kv::{read_counter, SharedStore};

/// List key holding the recorded inputs of `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{}:inputs", operation)
}

/// List key holding the recorded outputs of `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{}:outputs", operation)
}

// == Call Recorder ==
/// Counter and history bookkeeping for one named operation.
///
/// The counter lives at the operation name itself, the histories at
/// `<name>:inputs` and `<name>:outputs`.
#[derive(Clone)]
pub struct CallRecorder {
    kv: SharedStore,
    operation: String,
}

impl CallRecorder {
    pub fn new(kv: SharedStore, operation: impl Into<String>) -> Self {
        Self {
            kv,
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    // == Run ==
    /// Runs `op` as one recorded invocation.
    ///
    /// Order: append input, increment counter, run, append output. The steps
    /// are separate commands, so a failing `op` leaves an input without a
    /// matching output.
    pub async fn run<T, F>(&self, args_repr: String, op: F) -> Result<T>
    where
        T: Display,
        F: Future<Output = Result<T>>,
    {
        self.kv
            .rpush(&inputs_key(&self.operation), args_repr.as_bytes())
            .await?;
        let calls = self.kv.incr(&self.operation).await?;

        let output = op.await?;

        self.kv
            .rpush(&outputs_key(&self.operation), output.to_string().as_bytes())
            .await?;
        debug!("{} call #{} recorded", self.operation, calls);
        Ok(output)
    }

    /// Current call count, zero if never called.
    pub async fn calls(&self) -> Result<i64> {
        read_counter(self.kv.as_ref(), &self.operation).await
    }
}
