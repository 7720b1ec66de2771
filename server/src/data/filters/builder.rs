//! SQL predicate builder
//!
//! Maps validated filters onto parameterized SQLite WHERE fragments. A
//! filter that yields no constraint produces `None`, which callers omit from
//! the combination rather than treating as "match nothing".

use chrono::{DateTime, Utc};

use super::columns::{ColumnConfig, TableConfig};
use super::operators::{ColumnVariant, FilterOperator, JoinOperator};
use super::types::{Filter, FilterValue, parse_relative};
use crate::utils::sql::{contains_pattern, placeholders};
use crate::utils::time::{end_of_day, parse_timestamp, shift, start_of_day};

/// Bind parameter for a predicate fragment
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

/// A composable WHERE fragment with its positional binds
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

impl Predicate {
    fn new(sql: impl Into<String>, binds: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    fn bare(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Inputs the builder needs besides the filter itself
#[derive(Debug, Clone, Copy)]
pub struct BuildContext {
    /// Reference instant for relative date filters
    pub now: DateTime<Utc>,
}

impl BuildContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

/// Split a legacy `"<term>.<operator-label>"` value into term and operator
///
/// Missing or unrecognized labels mean `iLike`. An empty term yields `None`.
pub fn parse_legacy_filter(value: &str) -> Option<(&str, FilterOperator)> {
    let mut parts = value.split('.');
    let term = parts.next().filter(|t| !t.is_empty())?;
    let operator = match parts.next() {
        Some("does not contain") => FilterOperator::NotILike,
        Some("is") => FilterOperator::Eq,
        Some("is not") => FilterOperator::Ne,
        _ => FilterOperator::ILike,
    };
    Some((term, operator))
}

/// Label of `operator` in the legacy string form, if it has one
pub fn legacy_label(operator: FilterOperator) -> Option<&'static str> {
    match operator {
        FilterOperator::ILike => Some("contains"),
        FilterOperator::NotILike => Some("does not contain"),
        FilterOperator::Eq => Some("is"),
        FilterOperator::Ne => Some("is not"),
        _ => None,
    }
}

/// Legacy string filter: `value` encodes `"<term>.<operator-label>"`
///
/// Unrecognized labels behave like `contains`. An empty term yields no constraint.
pub fn filter_column(column: &str, value: &str) -> Option<Predicate> {
    let (term, operator) = parse_legacy_filter(value)?;

    Some(match operator {
        FilterOperator::NotILike => Predicate::new(
            format!("LOWER({column}) NOT LIKE ? ESCAPE '\\'"),
            vec![SqlValue::Text(contains_pattern(term))],
        ),
        FilterOperator::Eq => Predicate::new(format!("{column} = ?"), vec![SqlValue::Text(term.into())]),
        FilterOperator::Ne => Predicate::new(
            format!("NOT ({column} = ?)"),
            vec![SqlValue::Text(term.into())],
        ),
        _ => Predicate::new(
            format!("LOWER({column}) LIKE ? ESCAPE '\\'"),
            vec![SqlValue::Text(contains_pattern(term))],
        ),
    })
}

/// Build the fragment for one filter against its resolved column
pub fn build_filter(filter: &Filter, column: &ColumnConfig, ctx: &BuildContext) -> Option<Predicate> {
    let col = column.column;
    let variant = column.variant;

    if filter.variant != variant {
        tracing::debug!(
            column = column.id,
            expected = variant.as_str(),
            actual = filter.variant.as_str(),
            "Filter variant does not match column, skipping"
        );
        return None;
    }

    match filter.operator {
        FilterOperator::IsEmpty => Some(Predicate::bare(if variant.is_textual() {
            format!("({col} IS NULL OR {col} = '')")
        } else {
            format!("{col} IS NULL")
        })),
        FilterOperator::IsNotEmpty => Some(Predicate::bare(if variant.is_textual() {
            format!("({col} IS NOT NULL AND {col} <> '')")
        } else {
            format!("{col} IS NOT NULL")
        })),
        FilterOperator::IsBetween => match &filter.value {
            FilterValue::Range(lo, hi) => between(col, variant, *lo, *hi),
            _ => None,
        },
        FilterOperator::IsRelativeToToday => match &filter.value {
            FilterValue::Scalar(expr) => relative_to_today(col, expr, ctx),
            _ => None,
        },
        FilterOperator::ILike | FilterOperator::NotILike => {
            let FilterValue::Scalar(term) = &filter.value else {
                return None;
            };
            if term.is_empty() {
                return None;
            }
            let op = if filter.operator == FilterOperator::ILike {
                "LIKE"
            } else {
                "NOT LIKE"
            };
            Some(Predicate::new(
                format!("LOWER({col}) {op} ? ESCAPE '\\'"),
                vec![SqlValue::Text(contains_pattern(term))],
            ))
        }
        op @ (FilterOperator::Eq | FilterOperator::Ne) => match &filter.value {
            FilterValue::MultiSelect(items) if !items.is_empty() => {
                let keyword = if op == FilterOperator::Eq { "IN" } else { "NOT IN" };
                Some(Predicate::new(
                    format!("{col} {keyword} ({})", placeholders(items.len())),
                    items.iter().cloned().map(SqlValue::Text).collect(),
                ))
            }
            FilterValue::Scalar(raw) => equality(col, variant, op, raw),
            _ => None,
        },
        op @ (FilterOperator::Lt | FilterOperator::Lte | FilterOperator::Gt | FilterOperator::Gte) => {
            let FilterValue::Scalar(raw) = &filter.value else {
                return None;
            };
            comparison(col, variant, op, raw)
        }
    }
}

fn equality(col: &str, variant: ColumnVariant, op: FilterOperator, raw: &str) -> Option<Predicate> {
    let negate = op == FilterOperator::Ne;
    match variant {
        ColumnVariant::Date => {
            let millis = parse_timestamp(raw)?.timestamp_millis();
            let (start, end) = (start_of_day(millis), end_of_day(millis));
            let sql = if negate {
                format!("({col} < ? OR {col} > ?)")
            } else {
                format!("{col} BETWEEN ? AND ?")
            };
            Some(Predicate::new(
                sql,
                vec![SqlValue::Integer(start), SqlValue::Integer(end)],
            ))
        }
        _ => {
            let bind = scalar_bind(variant, raw)?;
            let sym = if negate { "<>" } else { "=" };
            Some(Predicate::new(format!("{col} {sym} ?"), vec![bind]))
        }
    }
}

fn comparison(col: &str, variant: ColumnVariant, op: FilterOperator, raw: &str) -> Option<Predicate> {
    let sym = match op {
        FilterOperator::Lt => "<",
        FilterOperator::Lte => "<=",
        FilterOperator::Gt => ">",
        FilterOperator::Gte => ">=",
        _ => return None,
    };
    let bind = match variant {
        ColumnVariant::Date => {
            let millis = parse_timestamp(raw)?.timestamp_millis();
            // Whole-day semantics: "before" a day excludes all of it
            let bound = match op {
                FilterOperator::Lt | FilterOperator::Gte => start_of_day(millis),
                _ => end_of_day(millis),
            };
            SqlValue::Integer(bound)
        }
        _ => scalar_bind(variant, raw)?,
    };
    Some(Predicate::new(format!("{col} {sym} ?"), vec![bind]))
}

fn between(col: &str, variant: ColumnVariant, lo: Option<f64>, hi: Option<f64>) -> Option<Predicate> {
    let bound = |v: f64, upper: bool| match variant {
        ColumnVariant::Date => {
            let millis = v as i64;
            SqlValue::Integer(if upper {
                end_of_day(millis)
            } else {
                start_of_day(millis)
            })
        }
        _ => SqlValue::Real(v),
    };

    match (lo, hi) {
        (Some(lo), Some(hi)) => Some(Predicate::new(
            format!("{col} BETWEEN ? AND ?"),
            vec![bound(lo, false), bound(hi, true)],
        )),
        (Some(lo), None) => Some(Predicate::new(format!("{col} >= ?"), vec![bound(lo, false)])),
        (None, Some(hi)) => Some(Predicate::new(format!("{col} <= ?"), vec![bound(hi, true)])),
        (None, None) => None,
    }
}

fn relative_to_today(col: &str, expr: &str, ctx: &BuildContext) -> Option<Predicate> {
    let (amount, unit) = parse_relative(expr)?;
    let target = shift(ctx.now, amount, unit)?.timestamp_millis();
    let now = ctx.now.timestamp_millis();
    let (from, to) = if amount < 0 {
        (start_of_day(target), end_of_day(now))
    } else {
        (start_of_day(now), end_of_day(target))
    };
    Some(Predicate::new(
        format!("{col} BETWEEN ? AND ?"),
        vec![SqlValue::Integer(from), SqlValue::Integer(to)],
    ))
}

fn scalar_bind(variant: ColumnVariant, raw: &str) -> Option<SqlValue> {
    match variant {
        ColumnVariant::Number => raw.trim().parse::<f64>().ok().map(SqlValue::Real),
        ColumnVariant::Boolean => match raw {
            "true" => Some(SqlValue::Integer(1)),
            "false" => Some(SqlValue::Integer(0)),
            _ => None,
        },
        ColumnVariant::Date => parse_timestamp(raw).map(|dt| SqlValue::Integer(dt.timestamp_millis())),
        ColumnVariant::Text | ColumnVariant::Select | ColumnVariant::MultiSelect => {
            Some(SqlValue::Text(raw.to_string()))
        }
    }
}

/// Combine fragments uniformly with one join operator
///
/// Returns `None` for an empty list.
pub fn combine(fragments: Vec<Predicate>, join: JoinOperator) -> Option<Predicate> {
    if fragments.len() <= 1 {
        return fragments.into_iter().next();
    }
    let separator = format!(" {} ", join.sql_keyword());
    let mut binds = Vec::new();
    let mut parts = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        parts.push(format!("({})", fragment.sql));
        binds.extend(fragment.binds);
    }
    Some(Predicate::new(parts.join(&separator), binds))
}

/// Case-insensitive substring search across the searchable columns
pub fn search_predicate(table: &TableConfig, term: &str) -> Option<Predicate> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let pattern = contains_pattern(term);
    let fragments = table
        .searchable()
        .map(|c| {
            Predicate::new(
                format!("LOWER({}) LIKE ? ESCAPE '\\'", c.column),
                vec![SqlValue::Text(pattern.clone())],
            )
        })
        .collect();
    combine(fragments, JoinOperator::Or)
}

/// Build the full WHERE predicate for a table query
///
/// Filters are joined with `join`; the search predicate is always ANDed on top.
/// Filters naming unknown columns are skipped.
pub fn table_predicate(
    table: &TableConfig,
    filters: &[Filter],
    join: JoinOperator,
    search: Option<&str>,
    ctx: &BuildContext,
) -> Option<Predicate> {
    let fragments = filters
        .iter()
        .filter_map(|f| {
            let Some(column) = table.column(&f.id) else {
                tracing::debug!(column = %f.id, "Unknown filter column, skipping");
                return None;
            };
            build_filter(f, column, ctx)
        })
        .collect();

    let filtered = combine(fragments, join);
    let searched = search.and_then(|s| search_predicate(table, s));
    combine(filtered.into_iter().chain(searched).collect(), JoinOperator::And)
}
