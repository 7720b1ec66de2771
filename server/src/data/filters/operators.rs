//! Filter operator taxonomy
//!
//! Static lookup tables mapping each column variant to the operators a
//! filter UI may offer for it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Semantic data type of a table column as seen by the filter UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ColumnVariant {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    MultiSelect,
}

impl ColumnVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::MultiSelect => "multiSelect",
        }
    }

    /// Strict parse, used by filter schema validation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "date" => Some(Self::Date),
            "boolean" => Some(Self::Boolean),
            "select" => Some(Self::Select),
            "multiSelect" => Some(Self::MultiSelect),
            _ => None,
        }
    }

    /// Lenient parse: unknown variants are treated as text
    pub fn parse_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::debug!(variant = %s, "Unknown column variant, falling back to text");
            Self::Text
        })
    }

    /// Whether values of this variant are compared as strings
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Text | Self::Select | Self::MultiSelect)
    }
}

/// Operator applied by a single filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum FilterOperator {
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "ne")]
    Ne,
    #[serde(rename = "iLike")]
    ILike,
    #[serde(rename = "notILike")]
    NotILike,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "lte")]
    Lte,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "gte")]
    Gte,
    #[serde(rename = "isEmpty")]
    IsEmpty,
    #[serde(rename = "isNotEmpty")]
    IsNotEmpty,
    #[serde(rename = "isBetween")]
    IsBetween,
    #[serde(rename = "isRelativeToToday")]
    IsRelativeToToday,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::ILike => "iLike",
            Self::NotILike => "notILike",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::IsEmpty => "isEmpty",
            Self::IsNotEmpty => "isNotEmpty",
            Self::IsBetween => "isBetween",
            Self::IsRelativeToToday => "isRelativeToToday",
        }
    }

    /// Emptiness checks carry no operand
    pub fn is_emptiness(&self) -> bool {
        matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }

    /// Whether this operator appears in the operator list for `variant`
    pub fn is_valid_for(&self, variant: ColumnVariant) -> bool {
        filter_operators(variant).iter().any(|o| o.value == *self)
    }
}

/// Boolean combinator applied across a filter list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JoinOperator {
    #[default]
    And,
    Or,
}

impl JoinOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            _ => None,
        }
    }

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A labelled operator choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatorOption {
    pub label: &'static str,
    pub value: FilterOperator,
}

const fn op(label: &'static str, value: FilterOperator) -> OperatorOption {
    OperatorOption { label, value }
}

pub const TEXT_OPERATORS: &[OperatorOption] = &[
    op("Contains", FilterOperator::ILike),
    op("Does not contain", FilterOperator::NotILike),
    op("Is", FilterOperator::Eq),
    op("Is not", FilterOperator::Ne),
    op("Is empty", FilterOperator::IsEmpty),
    op("Is not empty", FilterOperator::IsNotEmpty),
];

pub const NUMERIC_OPERATORS: &[OperatorOption] = &[
    op("Is", FilterOperator::Eq),
    op("Is not", FilterOperator::Ne),
    op("Is less than", FilterOperator::Lt),
    op("Is less than or equal to", FilterOperator::Lte),
    op("Is greater than", FilterOperator::Gt),
    op("Is greater than or equal to", FilterOperator::Gte),
    op("Is between", FilterOperator::IsBetween),
    op("Is empty", FilterOperator::IsEmpty),
    op("Is not empty", FilterOperator::IsNotEmpty),
];

pub const DATE_OPERATORS: &[OperatorOption] = &[
    op("Is", FilterOperator::Eq),
    op("Is not", FilterOperator::Ne),
    op("Is before", FilterOperator::Lt),
    op("Is after", FilterOperator::Gt),
    op("Is on or before", FilterOperator::Lte),
    op("Is on or after", FilterOperator::Gte),
    op("Is between", FilterOperator::IsBetween),
    op("Is relative to today", FilterOperator::IsRelativeToToday),
    op("Is empty", FilterOperator::IsEmpty),
    op("Is not empty", FilterOperator::IsNotEmpty),
];

pub const SELECT_OPERATORS: &[OperatorOption] = &[
    op("Is", FilterOperator::Eq),
    op("Is not", FilterOperator::Ne),
    op("Is empty", FilterOperator::IsEmpty),
    op("Is not empty", FilterOperator::IsNotEmpty),
];

pub const MULTI_SELECT_OPERATORS: &[OperatorOption] = &[
    op("Has any of", FilterOperator::Eq),
    op("Has none of", FilterOperator::Ne),
    op("Is empty", FilterOperator::IsEmpty),
    op("Is not empty", FilterOperator::IsNotEmpty),
];

pub const BOOLEAN_OPERATORS: &[OperatorOption] = &[
    op("Is", FilterOperator::Eq),
    op("Is not", FilterOperator::Ne),
];

/// Labelled join operators, in display order
pub const JOIN_OPERATORS: &[(&str, JoinOperator)] =
    &[("And", JoinOperator::And), ("Or", JoinOperator::Or)];

/// Ordered operator list for a variant
pub fn filter_operators(variant: ColumnVariant) -> &'static [OperatorOption] {
    match variant {
        ColumnVariant::Text => TEXT_OPERATORS,
        ColumnVariant::Number => NUMERIC_OPERATORS,
        ColumnVariant::Date => DATE_OPERATORS,
        ColumnVariant::Boolean => BOOLEAN_OPERATORS,
        ColumnVariant::Select => SELECT_OPERATORS,
        ColumnVariant::MultiSelect => MULTI_SELECT_OPERATORS,
    }
}

/// Operator list for a variant given by name; unknown names get the text set
pub fn filter_operators_by_name(variant: &str) -> &'static [OperatorOption] {
    filter_operators(ColumnVariant::parse_lossy(variant))
}

/// Operator used when none is chosen explicitly
pub fn default_filter_operator(variant: ColumnVariant) -> FilterOperator {
    match variant {
        ColumnVariant::Text => FilterOperator::ILike,
        _ => FilterOperator::Eq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_operators_start_with_contains() {
        let ops = filter_operators(ColumnVariant::Text);
        assert_eq!(ops[0].label, "Contains");
        assert_eq!(ops[0].value, FilterOperator::ILike);
        assert_eq!(ops.len(), 6);
    }

    #[test]
    fn unknown_variant_falls_back_to_text_operators() {
        assert_eq!(filter_operators_by_name("currency"), TEXT_OPERATORS);
        assert_eq!(filter_operators_by_name("date"), DATE_OPERATORS);
    }

    #[test]
    fn default_operator_per_variant() {
        assert_eq!(
            default_filter_operator(ColumnVariant::Text),
            FilterOperator::ILike
        );
        for variant in [
            ColumnVariant::Number,
            ColumnVariant::Date,
            ColumnVariant::Boolean,
            ColumnVariant::Select,
            ColumnVariant::MultiSelect,
        ] {
            assert_eq!(default_filter_operator(variant), FilterOperator::Eq);
        }
    }

    #[test]
    fn operator_legality_is_variant_dependent() {
        assert!(FilterOperator::ILike.is_valid_for(ColumnVariant::Text));
        assert!(!FilterOperator::ILike.is_valid_for(ColumnVariant::Number));
        assert!(FilterOperator::IsBetween.is_valid_for(ColumnVariant::Number));
        assert!(FilterOperator::IsBetween.is_valid_for(ColumnVariant::Date));
        assert!(!FilterOperator::IsBetween.is_valid_for(ColumnVariant::Text));
        assert!(FilterOperator::IsRelativeToToday.is_valid_for(ColumnVariant::Date));
        assert!(!FilterOperator::IsEmpty.is_valid_for(ColumnVariant::Boolean));
    }

    #[test]
    fn operator_serde_names() {
        let json = serde_json::to_string(&FilterOperator::NotILike).unwrap();
        assert_eq!(json, "\"notILike\"");
        let parsed: FilterOperator = serde_json::from_str("\"isRelativeToToday\"").unwrap();
        assert_eq!(parsed, FilterOperator::IsRelativeToToday);
        assert_eq!(FilterOperator::IsBetween.as_str(), "isBetween");
    }

    #[test]
    fn variant_serde_uses_camel_case() {
        let json = serde_json::to_string(&ColumnVariant::MultiSelect).unwrap();
        assert_eq!(json, "\"multiSelect\"");
        assert_eq!(ColumnVariant::parse("multiSelect"), Some(ColumnVariant::MultiSelect));
        assert_eq!(ColumnVariant::parse("multi-select"), None);
        assert_eq!(ColumnVariant::parse_lossy("multi-select"), ColumnVariant::Text);
    }

    #[test]
    fn join_operator_parse_and_sql() {
        assert_eq!(JoinOperator::parse("or"), Some(JoinOperator::Or));
        assert_eq!(JoinOperator::parse("OR"), None);
        assert_eq!(JoinOperator::default().sql_keyword(), "AND");
        assert_eq!(JOIN_OPERATORS.len(), 2);
    }
}
