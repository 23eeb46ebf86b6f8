//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::kv::MAX_TTL_SECS;
use crate::web::DEFAULT_PAGE_TTL;

/// Default Redis endpoint, matching the client's implicit local connection.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

/// Which key-value backend the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// External Redis server
    Redis,
    /// In-process store with Redis command semantics
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Backend::Redis),
            "memory" | "mem" => Ok(Backend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key-value backend selection
    pub backend: Backend,
    /// Redis connection URL (ignored by the memory backend)
    pub redis_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Page cache TTL in seconds
    pub page_ttl: u64,
    /// Memory backend expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_URL` - Redis endpoint (default: redis://127.0.0.1:6379/)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PAGE_TTL` - Page cache TTL in seconds, 1 to `MAX_TTL_SECS` (default: 10)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: parse_var("STORE_BACKEND").unwrap_or(defaults.backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            page_ttl: parse_var::<u64>("PAGE_TTL")
                .filter(|ttl| valid_page_ttl(*ttl))
                .unwrap_or(defaults.page_ttl),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

/// A page TTL `setex` will accept.
fn valid_page_ttl(ttl: u64) -> bool {
    (1..=MAX_TTL_SECS).contains(&ttl)
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Redis,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            server_port: 3000,
            page_ttl: DEFAULT_PAGE_TTL,
            cleanup_interval: 1,
        }
    }
}
