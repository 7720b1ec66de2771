//! Filter type definitions
//!
//! A `Filter` is validated against its own schema when it is deserialized:
//! the operator must be legal for the variant and the value shape must match
//! the operator's arity. Entries that fail are rejected as a whole.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::operators::{ColumnVariant, FilterOperator};
use crate::utils::time::{RelativeUnit, parse_timestamp};

/// Typed filter operand
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// No operand (null, empty string or empty array on the wire)
    Empty,
    Scalar(String),
    /// Two bounds; `None` leaves that side open. Dates are epoch millis.
    Range(Option<f64>, Option<f64>),
    MultiSelect(Vec<String>),
}

impl FilterValue {
    /// Whether the value carries no usable operand
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Scalar(s) => s.is_empty(),
            Self::MultiSelect(items) => items.is_empty(),
            Self::Range(..) => false,
        }
    }

    /// Coerce a wire value into the operand shape required by `operator`
    pub fn coerce(
        raw: &serde_json::Value,
        variant: ColumnVariant,
        operator: FilterOperator,
    ) -> Result<Self, FilterSchemaError> {
        let raw = RawValue::from_json(raw)?;

        if operator.is_emptiness() {
            return Ok(Self::Empty);
        }

        let raw = match raw {
            RawValue::Missing => return Ok(Self::Empty),
            RawValue::One(s) if s.is_empty() => return Ok(Self::Empty),
            RawValue::Many(items) if items.is_empty() => return Ok(Self::Empty),
            other => other,
        };

        match (operator, raw) {
            (FilterOperator::IsBetween, RawValue::Many(items)) => {
                if items.len() != 2 {
                    return Err(FilterSchemaError::Arity {
                        operator,
                        expected: 2,
                        actual: items.len(),
                    });
                }
                Ok(Self::Range(
                    parse_bound(&items[0], variant)?,
                    parse_bound(&items[1], variant)?,
                ))
            }
            (FilterOperator::IsRelativeToToday, RawValue::One(s)) => {
                parse_relative(&s).ok_or(FilterSchemaError::InvalidValue {
                    variant,
                    value: s.clone(),
                })?;
                Ok(Self::Scalar(s))
            }
            (FilterOperator::Eq | FilterOperator::Ne, RawValue::Many(items))
                if matches!(variant, ColumnVariant::Select | ColumnVariant::MultiSelect) =>
            {
                Ok(Self::MultiSelect(items))
            }
            (FilterOperator::IsBetween | FilterOperator::IsRelativeToToday, _) => {
                Err(FilterSchemaError::Shape { operator })
            }
            (_, RawValue::Many(_)) => Err(FilterSchemaError::Shape { operator }),
            (_, RawValue::One(s)) => {
                check_scalar(&s, variant)?;
                Ok(Self::Scalar(s))
            }
            (_, RawValue::Missing) => Ok(Self::Empty),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Self::Empty => Value::String(String::new()),
            Self::Scalar(s) => Value::String(s.clone()),
            Self::Range(lo, hi) => Value::Array(vec![
                Value::String(format_bound(*lo)),
                Value::String(format_bound(*hi)),
            ]),
            Self::MultiSelect(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// Parse a relative date expression such as `"-7 days"` or `"2 weeks"`
pub fn parse_relative(expr: &str) -> Option<(i64, RelativeUnit)> {
    let mut parts = expr.split_whitespace();
    let amount = parts.next()?.parse::<i64>().ok()?;
    let unit = RelativeUnit::parse(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((amount, unit))
}

fn parse_bound(raw: &str, variant: ColumnVariant) -> Result<Option<f64>, FilterSchemaError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let parsed = match variant {
        ColumnVariant::Number => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
        ColumnVariant::Date => parse_timestamp(raw).map(|dt| dt.timestamp_millis() as f64),
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| FilterSchemaError::InvalidValue {
        variant,
        value: raw.to_string(),
    })
}

fn format_bound(bound: Option<f64>) -> String {
    bound.map(|v| v.to_string()).unwrap_or_default()
}

fn check_scalar(raw: &str, variant: ColumnVariant) -> Result<(), FilterSchemaError> {
    let ok = match variant {
        ColumnVariant::Number => raw.trim().parse::<f64>().is_ok_and(|v| v.is_finite()),
        ColumnVariant::Date => parse_timestamp(raw).is_some(),
        ColumnVariant::Boolean => matches!(raw, "true" | "false"),
        ColumnVariant::Text | ColumnVariant::Select | ColumnVariant::MultiSelect => true,
    };
    if ok {
        Ok(())
    } else {
        Err(FilterSchemaError::InvalidValue {
            variant,
            value: raw.to_string(),
        })
    }
}

/// Untyped wire value: a string, a list of strings, or nothing
enum RawValue {
    Missing,
    One(String),
    Many(Vec<String>),
}

impl RawValue {
    fn from_json(value: &serde_json::Value) -> Result<Self, FilterSchemaError> {
        use serde_json::Value;
        match value {
            Value::Null => Ok(Self::Missing),
            Value::Array(items) => items
                .iter()
                .map(scalar_to_string)
                .collect::<Option<Vec<_>>>()
                .map(Self::Many)
                .ok_or(FilterSchemaError::ValueType),
            other => scalar_to_string(other)
                .map(Self::One)
                .ok_or(FilterSchemaError::ValueType),
        }
    }
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reasons a filter entry fails schema validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterSchemaError {
    #[error("operator {} is not valid for {} columns", operator.as_str(), variant.as_str())]
    IllegalOperator {
        operator: FilterOperator,
        variant: ColumnVariant,
    },
    #[error("operator {} expects {expected} values, got {actual}", operator.as_str())]
    Arity {
        operator: FilterOperator,
        expected: usize,
        actual: usize,
    },
    #[error("value shape does not match operator {}", operator.as_str())]
    Shape { operator: FilterOperator },
    #[error("invalid {} value: {value}", variant.as_str())]
    InvalidValue {
        variant: ColumnVariant,
        value: String,
    },
    #[error("filter value must be a string, number, boolean or array of those")]
    ValueType,
}

/// A single column filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FilterWire", into = "FilterWire")]
pub struct Filter {
    /// Column identifier
    pub id: String,
    pub value: FilterValue,
    pub variant: ColumnVariant,
    pub operator: FilterOperator,
    /// Client-side row id for the filter editor
    pub filter_id: Option<String>,
}

impl Filter {
    pub fn new(
        id: impl Into<String>,
        value: FilterValue,
        variant: ColumnVariant,
        operator: FilterOperator,
    ) -> Self {
        Self {
            id: id.into(),
            value,
            variant,
            operator,
            filter_id: None,
        }
    }
}

/// JSON shape of a filter in the `filters` URL parameter
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterWire {
    pub id: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub variant: ColumnVariant,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<String>,
}

impl TryFrom<FilterWire> for Filter {
    type Error = FilterSchemaError;

    fn try_from(wire: FilterWire) -> Result<Self, Self::Error> {
        if !wire.operator.is_valid_for(wire.variant) {
            return Err(FilterSchemaError::IllegalOperator {
                operator: wire.operator,
                variant: wire.variant,
            });
        }
        let value = FilterValue::coerce(&wire.value, wire.variant, wire.operator)?;
        Ok(Self {
            id: wire.id,
            value,
            variant: wire.variant,
            operator: wire.operator,
            filter_id: wire.filter_id,
        })
    }
}

impl From<Filter> for FilterWire {
    fn from(filter: Filter) -> Self {
        Self {
            value: filter.value.to_json(),
            id: filter.id,
            variant: filter.variant,
            operator: filter.operator,
            filter_id: filter.filter_id,
        }
    }
}

/// One entry of a sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortItem {
    pub id: String,
    pub desc: bool,
}

impl SortItem {
    pub fn new(id: impl Into<String>, desc: bool) -> Self {
        Self {
            id: id.into(),
            desc,
        }
    }
}

/// Ordered sort specification; empty means default ordering
pub type SortSpec = Vec<SortItem>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<Filter, String> {
        serde_json::from_value::<Filter>(value).map_err(|e| e.to_string())
    }

    #[test]
    fn text_filter_parses() {
        let f = parse(json!({"id": "title", "value": "bug", "type": "text", "operator": "iLike"}))
            .unwrap();
        assert_eq!(f.value, FilterValue::Scalar("bug".to_string()));
        assert_eq!(f.variant, ColumnVariant::Text);
        assert_eq!(f.operator, FilterOperator::ILike);
        assert!(f.filter_id.is_none());
    }

    #[test]
    fn illegal_operator_is_rejected() {
        let err = parse(json!({"id": "title", "value": ["1", "2"], "type": "text", "operator": "isBetween"}))
            .unwrap_err();
        assert!(err.contains("not valid for text"));
    }

    #[test]
    fn range_requires_two_values() {
        assert!(
            parse(json!({"id": "estimatedHours", "value": ["1"], "type": "number", "operator": "isBetween"}))
                .is_err()
        );
        let f = parse(json!({"id": "estimatedHours", "value": ["1", ""], "type": "number", "operator": "isBetween"}))
            .unwrap();
        assert_eq!(f.value, FilterValue::Range(Some(1.0), None));
    }

    #[test]
    fn date_range_accepts_rfc3339_and_millis() {
        let f = parse(json!({
            "id": "createdAt",
            "value": ["2024-01-01T00:00:00Z", 1704153600000i64],
            "type": "date",
            "operator": "isBetween"
        }))
        .unwrap();
        assert_eq!(
            f.value,
            FilterValue::Range(Some(1704067200000.0), Some(1704153600000.0))
        );
    }

    #[test]
    fn emptiness_operator_ignores_value() {
        let f = parse(json!({"id": "title", "value": ["whatever"], "type": "text", "operator": "isEmpty"}))
            .unwrap();
        assert_eq!(f.value, FilterValue::Empty);
    }

    #[test]
    fn empty_wire_values_become_empty() {
        for value in [json!(null), json!(""), json!([])] {
            let f = parse(json!({"id": "title", "value": value, "type": "text", "operator": "iLike"}))
                .unwrap();
            assert_eq!(f.value, FilterValue::Empty);
        }
        let f = parse(json!({"id": "title", "type": "text", "operator": "eq"})).unwrap();
        assert_eq!(f.value, FilterValue::Empty);
    }

    #[test]
    fn multi_select_accepts_list() {
        let f = parse(json!({"id": "status", "value": ["todo", "done"], "type": "multiSelect", "operator": "eq"}))
            .unwrap();
        assert_eq!(
            f.value,
            FilterValue::MultiSelect(vec!["todo".to_string(), "done".to_string()])
        );
    }

    #[test]
    fn list_on_text_column_is_rejected() {
        assert!(
            parse(json!({"id": "title", "value": ["a", "b"], "type": "text", "operator": "eq"}))
                .is_err()
        );
    }

    #[test]
    fn number_scalar_must_be_numeric() {
        assert!(
            parse(json!({"id": "estimatedHours", "value": "abc", "type": "number", "operator": "gt"}))
                .is_err()
        );
        let f = parse(json!({"id": "estimatedHours", "value": 3, "type": "number", "operator": "gt"}))
            .unwrap();
        assert_eq!(f.value, FilterValue::Scalar("3".to_string()));
    }

    #[test]
    fn relative_date_expression() {
        assert!(
            parse(json!({"id": "createdAt", "value": "-7 days", "type": "date", "operator": "isRelativeToToday"}))
                .is_ok()
        );
        assert!(
            parse(json!({"id": "createdAt", "value": "soon", "type": "date", "operator": "isRelativeToToday"}))
                .is_err()
        );
        assert_eq!(parse_relative("2 weeks"), Some((2, RelativeUnit::Weeks)));
        assert_eq!(parse_relative("2 weeks ago"), None);
    }

    #[test]
    fn object_values_are_rejected() {
        assert!(
            parse(json!({"id": "title", "value": {"a": 1}, "type": "text", "operator": "eq"}))
                .is_err()
        );
    }

    #[test]
    fn serializes_to_wire_shape() {
        let mut f = Filter::new(
            "estimatedHours",
            FilterValue::Range(Some(2.5), None),
            ColumnVariant::Number,
            FilterOperator::IsBetween,
        );
        f.filter_id = Some("abc".to_string());
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(
            json,
            json!({
                "id": "estimatedHours",
                "value": ["2.5", ""],
                "type": "number",
                "operator": "isBetween",
                "filterId": "abc"
            })
        );
        let back: Filter = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn is_empty_checks() {
        assert!(FilterValue::Empty.is_empty());
        assert!(FilterValue::Scalar(String::new()).is_empty());
        assert!(FilterValue::MultiSelect(vec![]).is_empty());
        assert!(!FilterValue::Range(None, None).is_empty());
        assert!(!FilterValue::Scalar("x".to_string()).is_empty());
    }
}
