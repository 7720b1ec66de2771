//! Table filter system
//!
//! Operator taxonomy, typed filter entries, validation and SQL predicate
//! generation for the data-table API.
//!
//! ## Usage
//!
//! ```no_run
//! use tasktable_server::data::filters::{
//!     BuildContext, Filter, JoinOperator, columns, get_valid_filters, table_predicate,
//! };
//!
//! let json = r#"[{"id": "title", "value": "bug", "type": "text", "operator": "iLike"}]"#;
//! let filters: Vec<Filter> = serde_json::from_str(json).unwrap();
//! let valid = get_valid_filters(&filters);
//! let predicate = table_predicate(
//!     &columns::tasks::TABLE,
//!     &valid,
//!     JoinOperator::And,
//!     None,
//!     &BuildContext::default(),
//! );
//! ```

mod builder;
pub mod columns;
mod operators;
mod types;
mod validate;

pub use builder::{
    BuildContext, Predicate, SqlValue, build_filter, combine, filter_column, legacy_label,
    parse_legacy_filter, search_predicate, table_predicate,
};
pub use columns::{ColumnConfig, SelectOption, TableConfig};
pub use operators::{
    BOOLEAN_OPERATORS, ColumnVariant, DATE_OPERATORS, FilterOperator, JOIN_OPERATORS, JoinOperator,
    MULTI_SELECT_OPERATORS, NUMERIC_OPERATORS, OperatorOption, SELECT_OPERATORS, TEXT_OPERATORS,
    default_filter_operator, filter_operators, filter_operators_by_name,
};
pub use types::{Filter, FilterSchemaError, FilterValue, FilterWire, SortItem, SortSpec, parse_relative};
pub use validate::get_valid_filters;
