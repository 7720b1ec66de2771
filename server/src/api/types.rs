//! Shared API types
//!
//! Error rendering for task actions and the paginated response envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationError;

use crate::core::constants::BATCH_DELETE_MAX;
use crate::data::DataError;
use crate::data::sqlite::SqliteError;

/// Maximum ID length
pub const MAX_ID_LENGTH: usize = 256;

/// Validator function for delete ID lists
pub fn validate_ids_batch<T: AsRef<[String]>>(ids: T) -> Result<(), ValidationError> {
    let ids = ids.as_ref();
    if ids.is_empty() {
        return Err(ValidationError::new("ids_empty").with_message("IDs cannot be empty".into()));
    }
    if ids.len() > BATCH_DELETE_MAX {
        return Err(ValidationError::new("ids_too_many").with_message(
            format!("Cannot process more than {} IDs at once", BATCH_DELETE_MAX).into(),
        ));
    }
    for id in ids {
        if id.is_empty() || id.len() > MAX_ID_LENGTH {
            return Err(ValidationError::new("id_length")
                .with_message(format!("ID must be 1-{} chars", MAX_ID_LENGTH).into()));
        }
    }
    Ok(())
}

/// Error outcome of a task action
///
/// Rendered as `{error, code, message}`.
#[derive(Debug)]
pub enum ActionError {
    NotFound { code: String, message: String },
    ValidationFailed { code: String, message: String },
    StoreUnavailable { message: String },
    Unknown { message: String },
}

impl ActionError {
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn validation_failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        if e.is_transient() {
            tracing::warn!(error = %e, "Store unavailable");
            return Self::store_unavailable("Database is temporarily unavailable");
        }
        match e {
            DataError::Conflict(message) => Self::validation_failed("CONFLICT", message),
            e => {
                tracing::error!(error = %e, "Data error");
                Self::unknown("Database operation failed")
            }
        }
    }

    pub fn from_sqlite(e: SqliteError) -> Self {
        Self::from_data(e.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unknown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, code, message) = match self {
            Self::NotFound { code, message } => ("not_found", code, message),
            Self::ValidationFailed { code, message } => ("bad_request", code, message),
            Self::StoreUnavailable { message } => (
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Unknown { message } => ("internal_error", "INTERNAL".to_string(), message),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// Pagination metadata in response
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Generic paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total_items: u64, total_pages: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                limit,
                total_items,
                total_pages,
            },
        }
    }
}
