//! API Handlers
//!
//! HTTP request handlers for each recorder endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::config::{Backend, Config};
use crate::error::{RecorderError, Result};
use crate::kv::{MemoryStore, RedisStore, SharedStore};
use crate::models::{
    GetQuery, GetResponse, HealthResponse, PageQuery, PageResponse, ReadAs, StatsResponse,
    StoreRequest, StoreResponse,
};
use crate::recorder::{Cache, CallLog};
use crate::web::{HttpFetcher, PageCache, PageFetcher};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Recording value store
    pub cache: Arc<Cache>,
    /// Expiring page cache
    pub pages: Arc<PageCache>,
    /// Set when running on the in-process backend, for expiry sweeps
    pub memory: Option<Arc<MemoryStore>>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: Cache, pages: PageCache) -> Self {
        Self {
            cache: Arc::new(cache),
            pages: Arc::new(pages),
            memory: None,
        }
    }

    /// Builds the cache and page cache on `kv`. Flushes the database.
    pub async fn with_store(
        kv: SharedStore,
        fetcher: Arc<dyn PageFetcher>,
        page_ttl: u64,
    ) -> Result<Self> {
        let cache = Cache::new(kv.clone()).await?;
        let pages = PageCache::new(kv, fetcher, page_ttl);
        Ok(Self::new(cache, pages))
    }

    /// Creates an AppState on a fresh in-process store.
    pub async fn in_memory(fetcher: Arc<dyn PageFetcher>, page_ttl: u64) -> Result<Self> {
        let memory = Arc::new(MemoryStore::new());
        let mut state = Self::with_store(memory.clone(), fetcher, page_ttl).await?;
        state.memory = Some(memory);
        Ok(state)
    }

    /// Creates an AppState from configuration.
    ///
    /// Connects to the configured backend and uses a real HTTP fetcher.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new());
        match config.backend {
            Backend::Memory => Self::in_memory(fetcher, config.page_ttl).await,
            Backend::Redis => {
                let kv = Arc::new(RedisStore::connect(&config.redis_url).await?);
                Self::with_store(kv, fetcher, config.page_ttl).await
            }
        }
    }
}

/// Handler for POST /store
///
/// Stores the payload under a new random key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let payload = req.into_payload().map_err(RecorderError::InvalidRequest)?;
    let key = state.cache.store(payload).await?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Reads a value, decoded according to the `as` query parameter.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    let cache = &state.cache;
    let missing = || RecorderError::NotFound(key.clone());

    let value = match query.read_as {
        ReadAs::Raw => cache
            .get_with(&key, |raw| raw.map(Value::from))
            .await?
            .ok_or_else(missing)?,
        ReadAs::Str => Value::from(cache.get_str(&key).await?.ok_or_else(missing)?),
        ReadAs::Int => Value::from(cache.get_int(&key).await?),
        ReadAs::Float => Value::from(cache.get_float(&key).await?.ok_or_else(missing)?),
    };

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /replay/:operation
///
/// Returns the recorded call history of an operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<CallLog>> {
    let log = state.cache.replay(&operation).await?;
    Ok(Json(log))
}

/// Handler for GET /page?url=...
///
/// Returns the page body, from cache when a live copy exists.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(RecorderError::InvalidRequest(error_msg));
    }

    let page = state.pages.get_page(&query.url).await?;
    let access_count = state.pages.access_count(&query.url).await?;

    Ok(Json(PageResponse::new(page, access_count)))
}

/// Handler for GET /stats
///
/// Returns page cache hit/miss statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.pages.stats();
    Json(StatsResponse::new(&stats, state.pages.ttl_secs()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
