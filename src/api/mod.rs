//! API Module
//!
//! HTTP handlers and routing for the recorder REST API.
//!
//! # Endpoints
//! - `POST /store` - Store a payload under a new key
//! - `GET /get/:key` - Read a stored value
//! - `GET /replay/:operation` - Recorded call history
//! - `GET /page?url=` - Fetch a page through the expiring cache
//! - `GET /stats` - Page cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
