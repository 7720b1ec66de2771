//! Column configuration
//!
//! Explicit per-column metadata shared by the URL parsers, the predicate
//! builder and the column-metadata endpoint. Only columns listed here are
//! filterable or sortable; anything else coming from a URL is dropped.

use serde::Serialize;

use super::operators::ColumnVariant;

/// A selectable value for select/multiSelect columns
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

/// Metadata for one queryable column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    /// Identifier used in URLs and filter entries
    pub id: &'static str,
    /// Database column name
    #[serde(skip)]
    pub column: &'static str,
    pub label: &'static str,
    pub variant: ColumnVariant,
    pub options: &'static [SelectOption],
    /// Inclusive slider bounds for number columns
    pub range: Option<(f64, f64)>,
    pub sortable: bool,
    /// Dedicated URL parameter for simple (non-advanced) filtering
    pub url_param: Option<&'static str>,
    /// Included in free-text search
    pub searchable: bool,
}

impl ColumnConfig {
    const fn new(id: &'static str, column: &'static str, variant: ColumnVariant) -> Self {
        Self {
            id,
            column,
            label: id,
            variant,
            options: &[],
            range: None,
            sortable: true,
            url_param: None,
            searchable: false,
        }
    }

    const fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    const fn options(mut self, options: &'static [SelectOption]) -> Self {
        self.options = options;
        self
    }

    const fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    const fn url_param(mut self, param: &'static str) -> Self {
        self.url_param = Some(param);
        self
    }

    const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Whether `value` is one of the configured options (always true without options)
    pub fn accepts_option(&self, value: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|o| o.value == value)
    }
}

/// Table-level configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableConfig {
    #[serde(skip)]
    pub table: &'static str,
    /// Column used for the default `DESC` ordering and as sort tiebreaker
    #[serde(skip)]
    pub primary_key: &'static str,
    pub columns: &'static [ColumnConfig],
}

impl TableConfig {
    /// Look up a column by its identifier
    pub fn column(&self, id: &str) -> Option<&'static ColumnConfig> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Look up a sortable column by its identifier
    pub fn sortable(&self, id: &str) -> Option<&'static ColumnConfig> {
        self.column(id).filter(|c| c.sortable)
    }

    pub fn searchable(&self) -> impl Iterator<Item = &'static ColumnConfig> {
        self.columns.iter().filter(|c| c.searchable)
    }

    pub fn with_url_param(&self) -> impl Iterator<Item = (&'static str, &'static ColumnConfig)> {
        self.columns
            .iter()
            .filter_map(|c| c.url_param.map(|p| (p, c)))
    }
}

/// The `tasks` table
pub mod tasks {
    use super::{ColumnConfig, ColumnVariant, SelectOption, TableConfig};

    pub const STATUS_OPTIONS: &[SelectOption] = &[
        SelectOption { label: "Todo", value: "todo" },
        SelectOption { label: "In Progress", value: "in-progress" },
        SelectOption { label: "Done", value: "done" },
        SelectOption { label: "Canceled", value: "canceled" },
    ];

    pub const LABEL_OPTIONS: &[SelectOption] = &[
        SelectOption { label: "Bug", value: "bug" },
        SelectOption { label: "Feature", value: "feature" },
        SelectOption { label: "Enhancement", value: "enhancement" },
        SelectOption { label: "Documentation", value: "documentation" },
    ];

    pub const PRIORITY_OPTIONS: &[SelectOption] = &[
        SelectOption { label: "Low", value: "low" },
        SelectOption { label: "Medium", value: "medium" },
        SelectOption { label: "High", value: "high" },
    ];

    pub const COLUMNS: &[ColumnConfig] = &[
        ColumnConfig::new("id", "id", ColumnVariant::Text).label("ID"),
        ColumnConfig::new("code", "code", ColumnVariant::Text)
            .label("Task")
            .searchable(),
        ColumnConfig::new("title", "title", ColumnVariant::Text)
            .label("Title")
            .url_param("title")
            .searchable(),
        ColumnConfig::new("status", "status", ColumnVariant::MultiSelect)
            .label("Status")
            .options(STATUS_OPTIONS)
            .url_param("status"),
        ColumnConfig::new("label", "label", ColumnVariant::Select)
            .label("Label")
            .options(LABEL_OPTIONS),
        ColumnConfig::new("priority", "priority", ColumnVariant::MultiSelect)
            .label("Priority")
            .options(PRIORITY_OPTIONS)
            .url_param("priority"),
        ColumnConfig::new("estimatedHours", "estimated_hours", ColumnVariant::Number)
            .label("Est. Hours")
            .range(0.0, 24.0)
            .url_param("estimatedHours"),
        ColumnConfig::new("archived", "archived", ColumnVariant::Boolean).label("Archived"),
        ColumnConfig::new("createdAt", "created_at", ColumnVariant::Date)
            .label("Created At")
            .url_param("createdAt"),
        ColumnConfig::new("updatedAt", "updated_at", ColumnVariant::Date).label("Updated At"),
    ];

    pub const TABLE: TableConfig = TableConfig {
        table: "tasks",
        primary_key: "id",
        columns: COLUMNS,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        let col = tasks::TABLE.column("estimatedHours").unwrap();
        assert_eq!(col.column, "estimated_hours");
        assert_eq!(col.range, Some((0.0, 24.0)));
        assert!(tasks::TABLE.column("estimated_hours").is_none());
    }

    #[test]
    fn searchable_columns() {
        let ids: Vec<_> = tasks::TABLE.searchable().map(|c| c.id).collect();
        assert_eq!(ids, vec!["code", "title"]);
    }

    #[test]
    fn url_params() {
        let params: Vec<_> = tasks::TABLE.with_url_param().map(|(p, _)| p).collect();
        assert_eq!(
            params,
            vec!["title", "status", "priority", "estimatedHours", "createdAt"]
        );
    }

    #[test]
    fn option_membership() {
        let status = tasks::TABLE.column("status").unwrap();
        assert!(status.accepts_option("in-progress"));
        assert!(!status.accepts_option("blocked"));
        assert!(tasks::TABLE.column("title").unwrap().accepts_option("anything"));
    }

    #[test]
    fn serializes_without_db_names() {
        let json = serde_json::to_value(tasks::TABLE.column("createdAt").unwrap()).unwrap();
        assert_eq!(json["id"], "createdAt");
        assert_eq!(json["variant"], "date");
        assert_eq!(json["urlParam"], "createdAt");
        assert!(json.get("column").is_none());
    }
}
