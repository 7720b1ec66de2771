//! Cache revalidation endpoint
//!
//! Errors use a flat `{message}` / `{message, error}` body instead of the
//! `ActionError` envelope.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::data::cache::CacheService;
use crate::utils::time::now_millis;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RevalidateQuery {
    /// Cache tag to drop
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    /// Milliseconds since the Unix epoch
    pub now: i64,
    pub tag: String,
}

pub fn routes(cache: Arc<CacheService>) -> Router<()> {
    Router::new().route("/", post(revalidate)).with_state(cache)
}

/// Drop every cached entry under a tag
#[utoipa::path(
    post,
    path = "/api/revalidate",
    tag = "cache",
    params(RevalidateQuery),
    responses(
        (status = 200, description = "Tag revalidated", body = RevalidateResponse),
        (status = 400, description = "Missing tag"),
        (status = 500, description = "Cache failure")
    )
)]
pub async fn revalidate(
    State(cache): State<Arc<CacheService>>,
    Query(query): Query<RevalidateQuery>,
) -> Response {
    let Some(tag) = query.tag.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": "Missing tag param" })),
        )
            .into_response();
    };

    match cache.revalidate_tag(&tag).await {
        Ok(deleted) => {
            tracing::info!(%tag, deleted, "Cache tag revalidated");
            Json(RevalidateResponse {
                revalidated: true,
                now: now_millis(),
                tag,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(%tag, error = %e, "Cache revalidation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "message": "Error revalidating cache",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
