//! Recorder Module
//!
//! A value store with call counting and call history, plus replay of the
//! recorded history.

mod cache;
mod history;
mod instrument;
mod payload;

// Re-export public types
pub use cache::{Cache, STORE_OPERATION};
pub use history::{replay, CallLog, CallRecord};
pub use instrument::{inputs_key, outputs_key, CallRecorder};
pub use payload::Payload;
