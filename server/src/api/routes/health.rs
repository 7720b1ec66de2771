//! Health check endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::SqliteService;
use crate::data::cache::CacheService;

#[derive(Clone)]
pub struct HealthState {
    pub database: Arc<SqliteService>,
    pub cache: Arc<CacheService>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn routes(database: Arc<SqliteService>, cache: Arc<CacheService>) -> Router<()> {
    Router::new()
        .route("/", get(health))
        .with_state(HealthState { database, cache })
}

/// Health check endpoint
///
/// Reports `degraded` with 503 when the database or cache does not respond.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database or cache unavailable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<HealthState>) -> impl IntoResponse {
    let database = state.database.ping().await;
    let cache = state.cache.health_check().await;

    let status = match (&database, &cache) {
        (Ok(()), Ok(())) => StatusCode::OK,
        _ => {
            if let Err(e) = &database {
                tracing::warn!(error = %e, "Database health check failed");
            }
            if let Err(e) = &cache {
                tracing::warn!(error = %e, "Cache health check failed");
            }
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (
        status,
        Json(HealthResponse {
            status: if status == StatusCode::OK { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::core::config::CacheConfig;

    async fn setup() -> (Router, Arc<SqliteService>) {
        let database = Arc::new(SqliteService::connect("sqlite::memory:").await.unwrap());
        let cache = Arc::new(CacheService::new(&CacheConfig::default()));
        (routes(database.clone(), cache), database)
    }

    async fn get_health(router: Router) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_ok() {
        let (router, _db) = setup().await;
        let (status, body) = get_health(router).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_health_degraded_after_close() {
        let (router, db) = setup().await;
        db.close().await;
        let (status, body) = get_health(router).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }
}
