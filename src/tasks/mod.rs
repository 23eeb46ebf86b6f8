//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: Removes expired keys from the in-process store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
