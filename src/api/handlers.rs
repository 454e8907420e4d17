//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{shared, Cache, Selector, SharedCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, GetResponse, HealthResponse, KeyResponse, RemoveResponse, SetRequest,
    StatsResponse, UpdateRequest,
};
use crate::remote::{InvalidationMessage, WebSocketTransport};

/// Application state shared across all handlers.
///
/// Contains the cache wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache
    pub cache: SharedCache,
    /// TTL in milliseconds applied when a set request has none
    pub default_ttl_ms: u64,
}

impl AppState {
    /// Creates a new AppState with the given cache and no default TTL.
    pub fn new(cache: Cache) -> Self {
        Self {
            cache: shared(cache),
            default_ttl_ms: 0,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The cache opens remote channels over WebSocket.
    pub fn from_config(config: &Config) -> Self {
        let transport = Arc::new(WebSocketTransport::new());
        let cache = Cache::with_transport(config.cache_config(), transport);
        Self {
            cache: shared(cache),
            default_ttl_ms: config.default_ttl_ms,
        }
    }
}

/// Handler for PUT /set
///
/// Stores a value with optional TTL, dependencies and remote channel.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }
    let options = req.to_options(state.default_ttl_ms)?;

    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value, options);

    Ok(Json(KeyResponse::set(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: an expired entry is removed on read
    let mut cache = state.cache.write().await;
    let value = cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for PUT /update
///
/// Replaces the value of an existing entry, keeping its TTL window.
pub async fn update_handler(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<KeyResponse>> {
    let mut cache = state.cache.write().await;
    if !cache.update(&req.key, req.value) {
        return Err(CacheError::NotFound(req.key));
    }

    Ok(Json(KeyResponse::updated(req.key)))
}

/// Handler for DELETE /del/:key
///
/// Removes a key and every entry depending on it.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RemoveResponse>> {
    let mut cache = state.cache.write().await;
    let removed = cache.remove(&Selector::plain(key.clone()));

    Ok(Json(RemoveResponse::new(key, removed)))
}

/// Handler for POST /invalidate
///
/// Accepts the same message format as remote invalidation channels.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(message): Json<InvalidationMessage>,
) -> Result<Json<RemoveResponse>> {
    let selector = message.to_selector()?;

    let mut cache = state.cache.write().await;
    let removed = cache.remove(&selector);

    Ok(Json(RemoveResponse::new(selector.to_string(), removed)))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.write().await.clear();
    Json(ClearResponse::new())
}

/// Handler for GET /stats
///
/// Returns current cache diagnostics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(&cache.diagnostics(), cache.open_channels()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
