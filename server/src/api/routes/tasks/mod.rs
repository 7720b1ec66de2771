//! Task API endpoints
//!
//! The list endpoint takes the table query state straight from the URL
//! (`page`, `perPage`, `sort`, `filters`, `joinOperator`, per-column params).

pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::extractors::{TaskPath, ValidatedJson};
use crate::api::types::{ActionError, PaginatedResponse};
use crate::data::cache::CacheService;
use crate::data::filters::columns::tasks::TABLE;
use crate::data::filters::{BuildContext, ColumnConfig, ColumnVariant};
use crate::data::sqlite::{SqliteService, repositories};
use crate::data::types::{TaskRow, TaskUpdate};
use crate::domain::QueryStateSnapshot;
use crate::domain::tasks::generate_tasks;
use crate::utils::time::now_millis;

use types::{
    ColumnDto, CreateTaskRequest, DeleteTasksBody, DeleteTasksResponse, RangeResponse,
    SeedTasksRequest, SeedTasksResponse, UpdateLabelRequest, UpdatePriorityRequest,
    UpdateStatusRequest, UpdateTaskRequest,
};

/// Shared state for Tasks API endpoints
#[derive(Clone)]
pub struct TasksApiState {
    pub database: Arc<SqliteService>,
    pub cache: Arc<CacheService>,
}

/// Build Tasks API routes
pub fn routes(database: Arc<SqliteService>, cache: Arc<CacheService>) -> Router<()> {
    let state = TasksApiState { database, cache };

    Router::new()
        .route("/", get(list_tasks).post(create_task).delete(delete_tasks))
        .route("/columns", get(list_columns))
        .route("/counts/{column}", get(get_counts))
        .route("/range/{column}", get(get_range))
        .route("/seed", post(seed_tasks))
        .route("/{task_id}", get(get_task).patch(update_task))
        .route("/{task_id}/label", patch(update_label))
        .route("/{task_id}/status", patch(update_status))
        .route("/{task_id}/priority", patch(update_priority))
        .with_state(state)
}

fn task_not_found(task_id: &str) -> ActionError {
    ActionError::not_found("TASK_NOT_FOUND", format!("Task not found: {}", task_id))
}

fn lookup_column(id: &str) -> Result<&'static ColumnConfig, ActionError> {
    TABLE
        .column(id)
        .ok_or_else(|| ActionError::validation_failed("INVALID_COLUMN", format!("Unknown column: {}", id)))
}

/// List tasks for the table query state in the URL
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "tasks",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-based, default 1)"),
        ("perPage" = Option<u32>, Query, description = "Rows per page (default 10, max 100)"),
        ("sort" = Option<String>, Query, description = "`column.asc|desc` or JSON array of {id, desc}"),
        ("filters" = Option<String>, Query, description = "JSON array of {id, value, type, operator}"),
        ("joinOperator" = Option<String>, Query, description = "`and` (default) or `or`"),
        ("search" = Option<String>, Query, description = "Free-text search over code and title")
    ),
    responses(
        (status = 200, description = "Page of tasks with pagination metadata"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn list_tasks(
    State(state): State<TasksApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PaginatedResponse<TaskRow>>, ActionError> {
    let snapshot = QueryStateSnapshot::from_query(&params, &TABLE);
    tracing::debug!(query = %snapshot.canonical(), "Listing tasks");

    let page = repositories::list_tasks(
        state.database.pool(),
        Some(&state.cache),
        &snapshot,
        &BuildContext::default(),
    )
    .await
    .map_err(ActionError::from_sqlite)?;

    Ok(Json(PaginatedResponse::new(
        page.rows,
        snapshot.pagination.page(),
        snapshot.pagination.page_size,
        page.total_count,
        page.page_count,
    )))
}

/// Column metadata with the filter operators each column supports
#[utoipa::path(
    get,
    path = "/api/v1/tasks/columns",
    tag = "tasks",
    responses(
        (status = 200, description = "Column metadata in display order")
    )
)]
pub async fn list_columns() -> Json<Vec<ColumnDto>> {
    Json(TABLE.columns.iter().map(ColumnDto::from).collect())
}

/// Task counts per option of a select column
///
/// Options with no tasks are reported as zero.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/counts/{column}",
    tag = "tasks",
    params(
        ("column" = String, Path, description = "Column id (status, label, priority)")
    ),
    responses(
        (status = 200, description = "Map of option value to task count"),
        (status = 400, description = "Column has no options")
    )
)]
pub async fn get_counts(
    State(state): State<TasksApiState>,
    Path(column): Path<String>,
) -> Result<Json<serde_json::Map<String, serde_json::Value>>, ActionError> {
    let column = lookup_column(&column)?;
    if column.options.is_empty() {
        return Err(ActionError::validation_failed(
            "INVALID_COLUMN",
            format!("Column has no options: {}", column.id),
        ));
    }

    let counts = repositories::task_counts(state.database.pool(), Some(&state.cache), column)
        .await
        .map_err(ActionError::from_sqlite)?;

    let mut result: serde_json::Map<String, serde_json::Value> = column
        .options
        .iter()
        .map(|opt| (opt.value.to_string(), 0.into()))
        .collect();
    for (value, count) in counts {
        result.insert(value, count.into());
    }
    Ok(Json(result))
}

/// Min/max of a number or date column
#[utoipa::path(
    get,
    path = "/api/v1/tasks/range/{column}",
    tag = "tasks",
    params(
        ("column" = String, Path, description = "Column id (estimatedHours, createdAt, updatedAt)")
    ),
    responses(
        (status = 200, description = "Column range", body = RangeResponse),
        (status = 400, description = "Column is not numeric")
    )
)]
pub async fn get_range(
    State(state): State<TasksApiState>,
    Path(column): Path<String>,
) -> Result<Json<RangeResponse>, ActionError> {
    let column = lookup_column(&column)?;
    if !matches!(column.variant, ColumnVariant::Number | ColumnVariant::Date) {
        return Err(ActionError::validation_failed(
            "INVALID_COLUMN",
            format!("Column is not numeric: {}", column.id),
        ));
    }

    let range = repositories::task_range(state.database.pool(), Some(&state.cache), column)
        .await
        .map_err(ActionError::from_sqlite)?;

    Ok(Json(RangeResponse {
        min: range.map(|(min, _)| min),
        max: range.map(|(_, max)| max),
    }))
}

/// Get a single task by ID
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}",
    tag = "tasks",
    params(
        ("task_id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task details", body = TaskRow),
        (status = 404, description = "Task not found")
    )
)]
pub async fn get_task(
    State(state): State<TasksApiState>,
    path: TaskPath,
) -> Result<Json<TaskRow>, ActionError> {
    let task = repositories::get_task(state.database.pool(), Some(&state.cache), &path.task_id)
        .await
        .map_err(ActionError::from_sqlite)?
        .ok_or_else(|| task_not_found(&path.task_id))?;

    Ok(Json(task))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskRow),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_task(
    State(state): State<TasksApiState>,
    ValidatedJson(body): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskRow>), ActionError> {
    let task = repositories::create_task(state.database.pool(), Some(&state.cache), &body.into())
        .await
        .map_err(ActionError::from_sqlite)?;

    tracing::info!(id = %task.id, code = %task.code, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// Replace all tasks with generated data
#[utoipa::path(
    post,
    path = "/api/v1/tasks/seed",
    tag = "tasks",
    request_body = SeedTasksRequest,
    responses(
        (status = 200, description = "Tasks replaced", body = SeedTasksResponse),
        (status = 400, description = "Count out of range")
    )
)]
pub async fn seed_tasks(
    State(state): State<TasksApiState>,
    ValidatedJson(body): ValidatedJson<SeedTasksRequest>,
) -> Result<Json<SeedTasksResponse>, ActionError> {
    let rows = generate_tasks(&mut rand::thread_rng(), body.count, now_millis());

    let inserted = repositories::replace_tasks(state.database.pool(), Some(&state.cache), &rows)
        .await
        .map_err(ActionError::from_sqlite)?;

    tracing::info!(inserted, "Tasks seeded");
    Ok(Json(SeedTasksResponse { inserted }))
}

async fn apply_update(
    state: &TasksApiState,
    task_id: &str,
    update: &TaskUpdate,
) -> Result<Json<TaskRow>, ActionError> {
    let task = repositories::update_task(state.database.pool(), Some(&state.cache), task_id, update)
        .await
        .map_err(ActionError::from_sqlite)?
        .ok_or_else(|| task_not_found(task_id))?;

    tracing::debug!(id = %task.id, "Task updated");
    Ok(Json(task))
}

/// Update several fields of a task
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{task_id}",
    tag = "tasks",
    params(
        ("task_id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskRow),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_task(
    State(state): State<TasksApiState>,
    path: TaskPath,
    ValidatedJson(body): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<TaskRow>, ActionError> {
    apply_update(&state, &path.task_id, &body.into()).await
}

/// Set a task's label
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{task_id}/label",
    tag = "tasks",
    params(
        ("task_id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateLabelRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskRow),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_label(
    State(state): State<TasksApiState>,
    path: TaskPath,
    ValidatedJson(body): ValidatedJson<UpdateLabelRequest>,
) -> Result<Json<TaskRow>, ActionError> {
    let update = TaskUpdate {
        label: Some(body.label),
        ..Default::default()
    };
    apply_update(&state, &path.task_id, &update).await
}

/// Set a task's status
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{task_id}/status",
    tag = "tasks",
    params(
        ("task_id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskRow),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_status(
    State(state): State<TasksApiState>,
    path: TaskPath,
    ValidatedJson(body): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<TaskRow>, ActionError> {
    let update = TaskUpdate {
        status: Some(body.status),
        ..Default::default()
    };
    apply_update(&state, &path.task_id, &update).await
}

/// Set a task's priority
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{task_id}/priority",
    tag = "tasks",
    params(
        ("task_id" = String, Path, description = "Task ID")
    ),
    request_body = UpdatePriorityRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskRow),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_priority(
    State(state): State<TasksApiState>,
    path: TaskPath,
    ValidatedJson(body): ValidatedJson<UpdatePriorityRequest>,
) -> Result<Json<TaskRow>, ActionError> {
    let update = TaskUpdate {
        priority: Some(body.priority),
        ..Default::default()
    };
    apply_update(&state, &path.task_id, &update).await
}

/// Delete tasks by ID
#[utoipa::path(
    delete,
    path = "/api/v1/tasks",
    tag = "tasks",
    request_body = DeleteTasksBody,
    responses(
        (status = 200, description = "Tasks deleted", body = DeleteTasksResponse),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn delete_tasks(
    State(state): State<TasksApiState>,
    ValidatedJson(body): ValidatedJson<DeleteTasksBody>,
) -> Result<Json<DeleteTasksResponse>, ActionError> {
    let deleted = repositories::delete_tasks(state.database.pool(), Some(&state.cache), &body.ids)
        .await
        .map_err(ActionError::from_sqlite)?;

    tracing::info!(requested = body.ids.len(), deleted, "Tasks deleted");
    Ok(Json(DeleteTasksResponse { deleted }))
}
