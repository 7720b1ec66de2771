//! Task API types

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::types::validate_ids_batch;
use crate::data::filters::{ColumnConfig, FilterOperator, OperatorOption, default_filter_operator, filter_operators};
use crate::data::types::{NewTask, TaskLabel, TaskPriority, TaskStatus, TaskUpdate};

/// Maximum title length, matching the table constraint
pub const MAX_TITLE_LENGTH: usize = 200;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::new("title_length").with_message(
            format!("Title must be at most {} characters", MAX_TITLE_LENGTH).into(),
        ));
    }
    Ok(())
}

/// Request body for creating a task
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub label: Option<TaskLabel>,
    pub priority: Option<TaskPriority>,
    #[validate(range(min = 0.0, max = 24.0, message = "Estimated hours must be 0-24"))]
    pub estimated_hours: Option<f64>,
    pub archived: Option<bool>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            status: req.status.unwrap_or_default(),
            label: req.label.unwrap_or_default(),
            priority: req.priority.unwrap_or_default(),
            estimated_hours: req.estimated_hours.unwrap_or(0.0),
            archived: req.archived.unwrap_or(false),
        }
    }
}

fn validate_update(req: &UpdateTaskRequest) -> Result<(), ValidationError> {
    if let Some(Some(title)) = &req.title {
        validate_title(title)?;
    }
    if req.title.is_none()
        && req.status.is_none()
        && req.label.is_none()
        && req.priority.is_none()
        && req.estimated_hours.is_none()
        && req.archived.is_none()
    {
        return Err(ValidationError::new("update_empty")
            .with_message("At least one field must be provided".into()));
    }
    Ok(())
}

/// Request body for a multi-field task update
///
/// `title: null` clears the title; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update"))]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub label: Option<TaskLabel>,
    pub priority: Option<TaskPriority>,
    #[validate(range(min = 0.0, max = 24.0, message = "Estimated hours must be 0-24"))]
    pub estimated_hours: Option<f64>,
    pub archived: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskUpdate {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            status: req.status,
            label: req.label,
            priority: req.priority,
            estimated_hours: req.estimated_hours,
            archived: req.archived,
        }
    }
}

/// Request body for `PATCH /{task_id}/label`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLabelRequest {
    pub label: TaskLabel,
}

/// Request body for `PATCH /{task_id}/status`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

/// Request body for `PATCH /{task_id}/priority`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePriorityRequest {
    pub priority: TaskPriority,
}

/// Request body for replacing all tasks with generated data
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SeedTasksRequest {
    #[validate(range(min = 1, max = 500, message = "Count must be 1-500"))]
    pub count: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedTasksResponse {
    pub inserted: u64,
}

/// Request body for batch deleting tasks
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeleteTasksBody {
    #[validate(custom(function = "validate_ids_batch"))]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteTasksResponse {
    pub deleted: u64,
}

/// Column metadata for building filter controls
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDto {
    #[serde(flatten)]
    pub column: &'static ColumnConfig,
    pub operators: &'static [OperatorOption],
    pub default_operator: FilterOperator,
}

impl From<&'static ColumnConfig> for ColumnDto {
    fn from(column: &'static ColumnConfig) -> Self {
        Self {
            column,
            operators: filter_operators(column.variant),
            default_operator: default_filter_operator(column.variant),
        }
    }
}

/// Min/max of a numeric column; both `null` when the table is empty
#[derive(Debug, Serialize, ToSchema)]
pub struct RangeResponse {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::columns::tasks;

    #[test]
    fn test_update_title_null_vs_absent() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(req.title, Some(None));
        assert!(req.validate().is_ok());

        let req: UpdateTaskRequest = serde_json::from_str(r#"{"status": "done"}"#).unwrap();
        assert_eq!(req.title, None);
        assert_eq!(req.status, Some(TaskStatus::Done));
    }

    #[test]
    fn test_update_requires_a_field() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_title_too_long() {
        let req = UpdateTaskRequest {
            title: Some(Some("x".repeat(MAX_TITLE_LENGTH + 1))),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_defaults() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "Write docs", "estimatedHours": 3}"#).unwrap();
        assert!(req.validate().is_ok());
        let task = NewTask::from(req);
        assert_eq!(task.title.as_deref(), Some("Write docs"));
        assert_eq!(task.estimated_hours, 3.0);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(!task.archived);
    }

    #[test]
    fn test_create_rejects_negative_hours() {
        let req = CreateTaskRequest {
            estimated_hours: Some(-1.0),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_hours_bounds_match_column_range() {
        let (min, max) = tasks::TABLE.column("estimatedHours").unwrap().range.unwrap();
        let create = |hours| CreateTaskRequest {
            estimated_hours: Some(hours),
            ..Default::default()
        };
        let update = |hours| UpdateTaskRequest {
            estimated_hours: Some(hours),
            ..Default::default()
        };

        assert!(create(min).validate().is_ok());
        assert!(create(max).validate().is_ok());
        assert!(create(max + 0.25).validate().is_err());
        assert!(update(max).validate().is_ok());
        assert!(update(max + 0.25).validate().is_err());
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        assert!(serde_json::from_str::<UpdateStatusRequest>(r#"{"status": "blocked"}"#).is_err());
        let req: UpdateStatusRequest =
            serde_json::from_str(r#"{"status": "in-progress"}"#).unwrap();
        assert_eq!(req.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_seed_count_range() {
        assert!(SeedTasksRequest { count: 0 }.validate().is_err());
        assert!(SeedTasksRequest { count: 1 }.validate().is_ok());
        assert!(SeedTasksRequest { count: 500 }.validate().is_ok());
        assert!(SeedTasksRequest { count: 501 }.validate().is_err());
    }

    #[test]
    fn test_column_dto_serialization() {
        let dto = ColumnDto::from(tasks::TABLE.column("title").unwrap());
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["id"], "title");
        assert_eq!(json["variant"], "text");
        assert_eq!(json["defaultOperator"], "iLike");
        assert!(json["operators"].as_array().is_some_and(|ops| !ops.is_empty()));
        assert!(json.get("column").is_none());
    }
}
