//! Parsed table state for one fetch

use std::collections::HashMap;

use super::filters::{FiltersParser, parse_url_filters, serialize_url_filters};
use super::pagination::PaginationState;
use super::parsers::QueryParser;
use super::sort::SortParser;
use crate::data::filters::{
    BuildContext, Filter, FilterOperator, JoinOperator, Predicate, SortSpec, TableConfig,
    get_valid_filters, table_predicate,
};

pub const PARAM_PAGE: &str = "page";
pub const PARAM_PER_PAGE: &str = "perPage";
pub const PARAM_PER_PAGE_ALT: &str = "per_page";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_FILTERS: &str = "filters";
pub const PARAM_JOIN_OPERATOR: &str = "joinOperator";
pub const PARAM_SEARCH: &str = "search";

/// Immutable projection of the URL query string
///
/// Built fresh for every request; a state change produces a new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStateSnapshot {
    pub table: &'static TableConfig,
    pub sort: SortSpec,
    pub filters: Vec<Filter>,
    pub join_operator: JoinOperator,
    pub pagination: PaginationState,
    pub search: Option<String>,
    /// Filters came from the `filters` JSON param rather than per-column params
    pub advanced: bool,
}

impl QueryStateSnapshot {
    /// Snapshot with default sort, no filters and the first page
    pub fn new(table: &'static TableConfig) -> Self {
        Self {
            table,
            sort: Vec::new(),
            filters: Vec::new(),
            join_operator: JoinOperator::default(),
            pagination: PaginationState::default(),
            search: None,
            advanced: false,
        }
    }

    pub fn from_query(params: &HashMap<String, String>, table: &'static TableConfig) -> Self {
        let get = |key: &str| params.get(key).map(String::as_str);

        let pagination = PaginationState::from_params(
            get(PARAM_PAGE),
            get(PARAM_PER_PAGE).or_else(|| get(PARAM_PER_PAGE_ALT)),
        );

        let sort = get(PARAM_SORT)
            .and_then(|raw| SortParser::new(table).parse(raw))
            .unwrap_or_default();

        let (filters, advanced) = match get(PARAM_FILTERS) {
            Some(raw) => (
                FiltersParser::new(table).parse(raw).unwrap_or_default(),
                true,
            ),
            None => (parse_url_filters(params, table), false),
        };

        let join_operator = get(PARAM_JOIN_OPERATOR)
            .and_then(JoinOperator::parse)
            .unwrap_or_default();

        let search = get(PARAM_SEARCH)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            table,
            sort,
            filters,
            join_operator,
            pagination,
            search,
            advanced,
        }
    }

    /// Serialize back to query parameters, omitting defaults
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let mut push = |key: &str, value: String| {
            if !value.is_empty() {
                out.push((key.to_string(), value));
            }
        };

        let (page, per_page) = self.pagination.to_params();
        push(PARAM_PAGE, page);
        push(PARAM_PER_PAGE, per_page);
        push(PARAM_SORT, SortParser::new(self.table).serialize(&self.sort));
        if self.advanced {
            push(
                PARAM_FILTERS,
                FiltersParser::new(self.table).serialize(&self.filters),
            );
        }
        if self.join_operator != JoinOperator::default() {
            push(PARAM_JOIN_OPERATOR, self.join_operator.as_str().to_string());
        }
        if let Some(search) = &self.search {
            push(PARAM_SEARCH, search.clone());
        }
        if !self.advanced {
            for (key, value) in serialize_url_filters(&self.filters, self.table) {
                push(&key, value);
            }
        }
        out
    }

    /// Stable string form used for cache keys
    pub fn canonical(&self) -> String {
        let mut pairs = self.to_query();
        pairs.sort();
        pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Cache identity of the page this snapshot fetches under `ctx`
    ///
    /// Relative date filters resolve against `ctx.now`, so their UTC day is
    /// part of the key.
    pub fn cache_key(&self, ctx: &BuildContext) -> String {
        let canonical = self.canonical();
        let relative = self
            .filters
            .iter()
            .any(|f| f.operator == FilterOperator::IsRelativeToToday);
        if relative {
            format!("{canonical}#day={}", ctx.now.format("%Y-%m-%d"))
        } else {
            canonical
        }
    }

    /// WHERE predicate for this snapshot; empty filters are dropped first
    pub fn predicate(&self, ctx: &BuildContext) -> Option<Predicate> {
        let filters = get_valid_filters(&self.filters);
        table_predicate(
            self.table,
            &filters,
            self.join_operator,
            self.search.as_deref(),
            ctx,
        )
    }
}
