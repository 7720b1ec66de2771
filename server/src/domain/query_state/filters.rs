//! Filter state codecs
//!
//! Two URL encodings feed the same filter list:
//!
//! - advanced mode: a `filters` JSON array, validated entry by entry
//! - simple mode: one parameter per column (`status=todo,done`,
//!   `estimatedHours=2~8`, `title=fix.is`), declared in the column config.
//!   Text params use the legacy `"<term>.<operator-label>"` form.

use std::collections::HashMap;

use super::parsers::{
    ArrayParser, BooleanParser, FloatParser, QueryParser, RangeParser, StringParser,
    TimestampParser,
};
use crate::data::filters::{
    ColumnConfig, ColumnVariant, Filter, FilterOperator, FilterValue, TableConfig,
    default_filter_operator, legacy_label, parse_legacy_filter,
};

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of filters allowed
pub const MAX_FILTERS: usize = 50;

/// JSON filter list, fail-open per entry
#[derive(Debug, Clone, Copy)]
pub struct FiltersParser {
    table: &'static TableConfig,
}

impl FiltersParser {
    pub fn new(table: &'static TableConfig) -> Self {
        Self { table }
    }

    fn accept(&self, entry: serde_json::Value) -> Option<Filter> {
        let filter: Filter = match serde_json::from_value(entry) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping invalid filter entry");
                return None;
            }
        };
        let Some(column) = self.table.column(&filter.id) else {
            tracing::debug!(column = %filter.id, "Dropping filter on unknown column");
            return None;
        };
        if column.variant != filter.variant {
            tracing::debug!(
                column = %filter.id,
                expected = column.variant.as_str(),
                "Dropping filter with mismatched variant"
            );
            return None;
        }
        Some(filter)
    }
}

impl QueryParser for FiltersParser {
    type Value = Vec<Filter>;

    fn parse(&self, raw: &str) -> Option<Vec<Filter>> {
        if raw.len() > MAX_FILTER_JSON_SIZE {
            tracing::debug!(size = raw.len(), "Filter JSON exceeds size limit");
            return None;
        }
        let entries: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
        if entries.len() > MAX_FILTERS {
            tracing::debug!(count = entries.len(), "Too many filters");
            return None;
        }
        let filters: Vec<Filter> = entries.into_iter().filter_map(|e| self.accept(e)).collect();
        (!filters.is_empty()).then_some(filters)
    }

    fn serialize(&self, value: &Vec<Filter>) -> String {
        if value.is_empty() {
            return String::new();
        }
        serde_json::to_string(value).unwrap_or_default()
    }
}

/// Build filters from per-column URL parameters
pub fn parse_url_filters(params: &HashMap<String, String>, table: &TableConfig) -> Vec<Filter> {
    table
        .with_url_param()
        .filter_map(|(param, column)| {
            let raw = params.get(param)?;
            url_filter(raw, column)
        })
        .collect()
}

fn url_filter(raw: &str, column: &ColumnConfig) -> Option<Filter> {
    let (value, operator) = match column.variant {
        ColumnVariant::Text => {
            let (term, operator) = parse_legacy_filter(raw.trim())?;
            (FilterValue::Scalar(term.to_string()), operator)
        }
        ColumnVariant::Select | ColumnVariant::MultiSelect => {
            let values: Vec<String> = ArrayParser::new(StringParser)
                .parse(raw)?
                .into_iter()
                .filter(|v| column.accepts_option(v))
                .collect();
            if values.is_empty() {
                return None;
            }
            (FilterValue::MultiSelect(values), FilterOperator::Eq)
        }
        ColumnVariant::Number => {
            let (lo, hi) = RangeParser::new(FloatParser).parse(raw)?;
            (FilterValue::Range(lo, hi), FilterOperator::IsBetween)
        }
        ColumnVariant::Date => {
            let (lo, hi) = RangeParser::new(TimestampParser).parse(raw)?;
            let millis = |d: Option<chrono::DateTime<chrono::Utc>>| {
                d.map(|d| d.timestamp_millis() as f64)
            };
            (FilterValue::Range(millis(lo), millis(hi)), FilterOperator::IsBetween)
        }
        ColumnVariant::Boolean => {
            let flag = BooleanParser.parse(raw)?;
            (
                FilterValue::Scalar(flag.to_string()),
                default_filter_operator(ColumnVariant::Boolean),
            )
        }
    };
    Some(Filter::new(column.id, value, column.variant, operator))
}

/// Serialize filters back to per-column URL parameters
///
/// Filters without a dedicated parameter, or whose shape the simple encoding
/// cannot express, are omitted.
pub fn serialize_url_filters(filters: &[Filter], table: &TableConfig) -> Vec<(String, String)> {
    filters
        .iter()
        .filter_map(|f| {
            let column = table.column(&f.id)?;
            let param = column.url_param?;
            let raw = match (&f.value, f.operator) {
                // A term containing the label separator has no legacy encoding
                (FilterValue::Scalar(s), _) if column.variant == ColumnVariant::Text => {
                    if s.contains('.') {
                        return None;
                    }
                    match f.operator {
                        FilterOperator::ILike => s.clone(),
                        op => format!("{s}.{}", legacy_label(op)?),
                    }
                }
                (FilterValue::Scalar(s), FilterOperator::ILike | FilterOperator::Eq) => s.clone(),
                (FilterValue::MultiSelect(items), FilterOperator::Eq) => {
                    ArrayParser::new(StringParser).serialize(items)
                }
                (FilterValue::Range(lo, hi), FilterOperator::IsBetween) => {
                    let as_int = column.variant == ColumnVariant::Date;
                    let side = |v: &Option<f64>| match v {
                        Some(v) if as_int => Some(*v as i64 as f64),
                        other => *other,
                    };
                    RangeParser::new(FloatParser).serialize(&(side(lo), side(hi)))
                }
                _ => return None,
            };
            (!raw.is_empty()).then(|| (param.to_string(), raw))
        })
        .collect()
}
