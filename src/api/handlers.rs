//! API Handlers
//!
//! HTTP request handlers exposing the cache facade.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{Cache, ExpiringCache, HttpFetcher};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    AccessCountResponse, GetQuery, GetResponse, HealthResponse, PageQuery, ReplayResponse,
    StoreRequest, StoreResponse, ValueFormat,
};
use crate::store::SharedStore;

/// Application state shared across all handlers.
///
/// Both facades share one store handle and hold no other state.
#[derive(Clone)]
pub struct AppState {
    /// Instrumented value cache
    pub cache: Arc<Cache>,
    /// Expiring page cache
    pub pages: Arc<ExpiringCache>,
}

impl AppState {
    /// Creates a new AppState from the two facades.
    pub fn new(cache: Cache, pages: ExpiringCache) -> Self {
        Self {
            cache: Arc::new(cache),
            pages: Arc::new(pages),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Flushes the store first when `flush_on_start` is set, and fetches
    /// pages over HTTP with the configured timeout and TTL.
    pub async fn from_config(store: SharedStore, config: &Config) -> Result<Self> {
        let cache = if config.flush_on_start {
            Cache::flushed(store.clone()).await?
        } else {
            Cache::new(store.clone())
        };

        let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout))?;
        let pages = ExpiringCache::configure(store, config.page_cache_ttl, fetcher)?;

        Ok(Self::new(cache, pages))
    }
}

/// Handler for POST /store
///
/// Stores a value under a newly generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let value = req.into_cache_value().map_err(CacheError::InvalidRequest)?;

    let key = state.cache.store(value).await?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Reads a value back, decoded as text or as an integer.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    let value: Option<Value> = match query.format {
        ValueFormat::Text => state.cache.get_str(&key).await?.map(Value::from),
        ValueFormat::Int => state.cache.get_int(&key).await?.map(Value::from),
    };

    match value {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /replay
///
/// Returns the recorded history of the store operation.
pub async fn replay_handler(State(state): State<AppState>) -> Result<Json<ReplayResponse>> {
    let replay = state.cache.replay().await?;
    Ok(Json(ReplayResponse::from(replay)))
}

/// Handler for GET /page?url=...
///
/// Returns the page body, served from the expiring cache when fresh.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<String> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.pages.call(&query.url).await
}

/// Handler for GET /page/count?url=...
///
/// Returns how many times the page has been requested.
pub async fn page_count_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<AccessCountResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let count = state.pages.access_count(&query.url).await?;

    Ok(Json(AccessCountResponse {
        url: query.url,
        count,
    }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
