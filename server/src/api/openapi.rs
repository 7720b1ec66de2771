//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, revalidate, tasks};
use crate::api::types::PaginationMeta;
use crate::data::filters::{ColumnVariant, FilterOperator, FilterWire, JoinOperator, SortItem};
use crate::data::types::{TaskLabel, TaskPriority, TaskRow, TaskStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TaskTable API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Filterable, sortable, paginated task table"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "tasks", description = "Task table queries and actions"),
        (name = "cache", description = "Cache revalidation")
    ),
    paths(
        // Health
        health::health,
        // Tasks
        tasks::list_tasks,
        tasks::list_columns,
        tasks::get_counts,
        tasks::get_range,
        tasks::get_task,
        tasks::create_task,
        tasks::seed_tasks,
        tasks::update_task,
        tasks::update_label,
        tasks::update_status,
        tasks::update_priority,
        tasks::delete_tasks,
        // Cache
        revalidate::revalidate,
    ),
    components(schemas(
        // API types
        PaginationMeta,
        // Health
        health::HealthResponse,
        // Tasks
        TaskRow,
        TaskStatus,
        TaskLabel,
        TaskPriority,
        tasks::types::CreateTaskRequest,
        tasks::types::UpdateTaskRequest,
        tasks::types::UpdateLabelRequest,
        tasks::types::UpdateStatusRequest,
        tasks::types::UpdatePriorityRequest,
        tasks::types::SeedTasksRequest,
        tasks::types::SeedTasksResponse,
        tasks::types::DeleteTasksBody,
        tasks::types::DeleteTasksResponse,
        tasks::types::RangeResponse,
        // Query state
        FilterWire,
        SortItem,
        ColumnVariant,
        FilterOperator,
        JoinOperator,
        // Cache
        revalidate::RevalidateResponse,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>TaskTable API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
