//! Task row and its enumerated fields

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// ============================================================================
// Enumerated fields
// ============================================================================

/// Task workflow status
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Canceled,
}

impl TaskStatus {
    pub const ALL: [Self; 4] = [Self::Todo, Self::InProgress, Self::Done, Self::Canceled];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }
}

/// Task category
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskLabel {
    #[default]
    Bug,
    Feature,
    Enhancement,
    Documentation,
}

impl TaskLabel {
    pub const ALL: [Self; 4] = [
        Self::Bug,
        Self::Feature,
        Self::Enhancement,
        Self::Documentation,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Enhancement => "enhancement",
            Self::Documentation => "documentation",
        }
    }
}

/// Task priority
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Task row from database
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub id: String,
    pub code: String,
    pub title: Option<String>,
    pub status: TaskStatus,
    pub label: TaskLabel,
    pub priority: TaskPriority,
    pub estimated_hours: f64,
    pub archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields for a new task; `id`, `code` and timestamps are assigned on insert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: Option<String>,
    pub status: TaskStatus,
    pub label: TaskLabel,
    pub priority: TaskPriority,
    pub estimated_hours: f64,
    pub archived: bool,
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    /// `Some(None)` clears the title
    pub title: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub label: Option<TaskLabel>,
    pub priority: Option<TaskPriority>,
    pub estimated_hours: Option<f64>,
    pub archived: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.label.is_none()
            && self.priority.is_none()
            && self.estimated_hours.is_none()
            && self.archived.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::columns::tasks;

    #[test]
    fn test_enum_strings_match_column_options() {
        let status: Vec<_> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        let options: Vec<_> = tasks::STATUS_OPTIONS.iter().map(|o| o.value).collect();
        assert_eq!(status, options);

        let label: Vec<_> = TaskLabel::ALL.iter().map(|s| s.as_str()).collect();
        let options: Vec<_> = tasks::LABEL_OPTIONS.iter().map(|o| o.value).collect();
        assert_eq!(label, options);

        let priority: Vec<_> = TaskPriority::ALL.iter().map(|s| s.as_str()).collect();
        let options: Vec<_> = tasks::PRIORITY_OPTIONS.iter().map(|o| o.value).collect();
        assert_eq!(priority, options);
    }

    #[test]
    fn test_enum_serde_matches_as_str() {
        for status in TaskStatus::ALL {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::json!(status.as_str())
            );
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("In-Progress"), None);
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn test_task_row_json_is_camel_case() {
        let row = TaskRow {
            id: "t1".into(),
            code: "TASK-1".into(),
            title: None,
            status: TaskStatus::InProgress,
            label: TaskLabel::Feature,
            priority: TaskPriority::High,
            estimated_hours: 1.5,
            archived: false,
            created_at: 1,
            updated_at: 2,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["estimatedHours"], 1.5);
        assert_eq!(json["createdAt"], 1);
    }

    #[test]
    fn test_task_update_is_empty() {
        assert!(TaskUpdate::default().is_empty());
        let update = TaskUpdate {
            title: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
