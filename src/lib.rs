//! kv_recorder - Call-recording store wrapper and expiring page cache
//!
//! Stores values in a Redis-style key-value store while counting and recording
//! each store call, and caches fetched web pages for a short TTL.

pub mod api;
pub mod config;
pub mod error;
pub mod kv;
pub mod models;
pub mod recorder;
pub mod tasks;
pub mod web;

pub use api::AppState;
pub use config::Config;
pub use error::{RecorderError, Result};
pub use kv::{KvStore, MemoryStore, RedisStore, SharedStore};
pub use recorder::{replay, Cache, CallLog, Payload, STORE_OPERATION};
pub use tasks::spawn_cleanup_task;
pub use web::{HttpFetcher, Page, PageCache, PageFetcher};
