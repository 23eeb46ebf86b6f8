//! Request and Response models for the recorder API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{GetQuery, PageQuery, ReadAs, StoreRequest};
pub use responses::{GetResponse, HealthResponse, PageResponse, StatsResponse, StoreResponse};
