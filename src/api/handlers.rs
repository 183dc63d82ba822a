//! API Handlers
//!
//! Each guarded handler passes its rate-limit gate first, then serves from
//! the cache, and only reaches the backend on a miss.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::backend::{Backend, BackupRecord};
use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{ApiError, BackendError, Result};
use crate::models::{
    CacheStatsResponse, ClearCacheResponse, CreateBackupRequest, HealthResponse, StatusQuery,
};
use crate::ratelimit::{ClientToken, Gate, RateLimiter};

// == Cache Keys and Freshness ==
pub const BACKUPS_LIST_KEY: &str = "backups:list";
pub const BACKUPS_STATS_KEY: &str = "backups:stats";

pub const LIST_TTL: Duration = Duration::from_secs(60);
pub const STATS_TTL: Duration = Duration::from_secs(300);
pub const STATUS_TTL: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Memoized backend responses
    pub cache: TtlCache<Value>,
    /// Gate for expensive or mutating operations
    pub strict: Gate,
    /// Gate for read paths
    pub lenient: Gate,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(cache: TtlCache<Value>, strict: Gate, lenient: Gate, backend: Arc<dyn Backend>) -> Self {
        Self {
            cache,
            strict,
            lenient,
            backend,
        }
    }

    /// Builds the cache and both gates from configuration.
    pub fn from_config(config: &Config, backend: Arc<dyn Backend>) -> Self {
        let interval = config.limiter_interval();
        let strict = Gate::new(
            RateLimiter::new("strict", interval, config.rate_limit_max_tokens),
            config.strict_limit,
        );
        let lenient = Gate::new(
            RateLimiter::new("lenient", interval, config.rate_limit_max_tokens),
            config.lenient_limit,
        );

        Self::new(TtlCache::new(config.default_ttl()), strict, lenient, backend)
    }
}

/// Serves `key` from the cache, filling it from `fetch` on a miss.
async fn cached<T, F, Fut>(state: &AppState, key: &str, ttl: Duration, fetch: F) -> Result<Value>
where
    T: Serialize,
    F: FnOnce(Arc<dyn Backend>) -> Fut,
    Fut: Future<Output = std::result::Result<T, BackendError>>,
{
    let backend = Arc::clone(&state.backend);
    state
        .cache
        .get_or_set(key, Some(ttl), || async move {
            let fresh = fetch(backend).await?;
            Ok::<_, ApiError>(serde_json::to_value(fresh)?)
        })
        .await
}

/// Handler for GET /api/backups
pub async fn list_backups_handler(
    State(state): State<AppState>,
    ClientToken(token): ClientToken,
) -> Result<Json<Value>> {
    state.lenient.check(&token).await?;

    let backups = cached(&state, BACKUPS_LIST_KEY, LIST_TTL, |backend| async move {
        backend.list_backups().await
    })
    .await?;

    Ok(Json(backups))
}

/// Handler for GET /api/backups/stats
pub async fn backup_stats_handler(
    State(state): State<AppState>,
    ClientToken(token): ClientToken,
) -> Result<Json<Value>> {
    state.lenient.check(&token).await?;

    let stats = cached(&state, BACKUPS_STATS_KEY, STATS_TTL, |backend| async move {
        backend.backup_stats().await
    })
    .await?;

    Ok(Json(stats))
}

/// Handler for GET /api/system/status
pub async fn system_status_handler(
    State(state): State<AppState>,
    ClientToken(token): ClientToken,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Value>> {
    state.lenient.check(&token).await?;

    let status = cached(&state, query.cache_key(), STATUS_TTL, |backend| async move {
        backend.system_status(query.verbose).await
    })
    .await?;

    Ok(Json(status))
}

/// Handler for POST /api/backups
///
/// Creates a backup and invalidates every cached view that includes it.
pub async fn create_backup_handler(
    State(state): State<AppState>,
    ClientToken(token): ClientToken,
    Json(req): Json<CreateBackupRequest>,
) -> Result<(StatusCode, Json<BackupRecord>)> {
    state.strict.check(&token).await?;

    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let record = state.backend.create_backup(req.label).await?;

    for key in [
        BACKUPS_LIST_KEY,
        BACKUPS_STATS_KEY,
        StatusQuery { verbose: false }.cache_key(),
        StatusQuery { verbose: true }.cache_key(),
    ] {
        state.cache.delete(key).await;
    }

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for DELETE /api/cache
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    ClientToken(token): ClientToken,
) -> Result<Json<ClearCacheResponse>> {
    state.strict.check(&token).await?;

    let cleared = state.cache.stats().await.size;
    state.cache.clear().await;
    info!(cleared, "cache cleared");

    Ok(Json(ClearCacheResponse::new(cleared)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    fn test_state(backend: Arc<InMemoryBackend>) -> AppState {
        AppState::from_config(&Config::default(), backend)
    }

    fn token(t: &str) -> ClientToken {
        ClientToken(t.to_string())
    }

    #[tokio::test]
    async fn test_list_served_from_cache() {
        let backend = Arc::new(InMemoryBackend::new());
        let state = test_state(backend.clone());

        for _ in 0..3 {
            let Json(list) = list_backups_handler(State(state.clone()), token("1.2.3.4"))
                .await
                .unwrap();
            assert_eq!(list, serde_json::json!([]));
        }

        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_create_invalidates_list() {
        let backend = Arc::new(InMemoryBackend::new());
        let state = test_state(backend.clone());

        list_backups_handler(State(state.clone()), token("a")).await.unwrap();

        let (status, Json(record)) = create_backup_handler(
            State(state.clone()),
            token("a"),
            Json(CreateBackupRequest {
                label: Some("nightly".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record.id, "backup-1");

        let Json(list) = list_backups_handler(State(state), token("a")).await.unwrap();
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_strict_gate_rejects_fourth_create() {
        let state = test_state(Arc::new(InMemoryBackend::new()));

        for _ in 0..3 {
            create_backup_handler(State(state.clone()), token("1.2.3.4"), Json(Default::default()))
                .await
                .unwrap();
        }

        let result =
            create_backup_handler(State(state), token("1.2.3.4"), Json(Default::default())).await;
        assert!(matches!(result, Err(ApiError::RateLimited(_))));
    }

    #[tokio::test]
    async fn test_backend_failure_not_cached() {
        let backend = Arc::new(InMemoryBackend::new());
        let state = test_state(backend.clone());

        backend.set_failing(true);
        let result = backup_stats_handler(State(state.clone()), token("a")).await;
        assert!(matches!(result, Err(ApiError::Backend(_))));
        assert!(!state.cache.has(BACKUPS_STATS_KEY).await);

        backend.set_failing(false);
        assert!(backup_stats_handler(State(state), token("a")).await.is_ok());
    }

    #[tokio::test]
    async fn test_status_variants_cached_separately() {
        let backend = Arc::new(InMemoryBackend::new());
        let state = test_state(backend.clone());

        let Json(brief) = system_status_handler(
            State(state.clone()),
            token("a"),
            Query(StatusQuery { verbose: false }),
        )
        .await
        .unwrap();
        let Json(verbose) = system_status_handler(
            State(state.clone()),
            token("a"),
            Query(StatusQuery { verbose: true }),
        )
        .await
        .unwrap();

        assert!(brief.get("components").is_none());
        assert!(verbose.get("components").is_some());
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_handler() {
        let state = test_state(Arc::new(InMemoryBackend::new()));
        list_backups_handler(State(state.clone()), token("a")).await.unwrap();

        let Json(resp) = clear_cache_handler(State(state.clone()), token("a")).await.unwrap();
        assert_eq!(resp.cleared, 1);

        let Json(stats) = cache_stats_handler(State(state)).await;
        assert_eq!(stats.size, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
