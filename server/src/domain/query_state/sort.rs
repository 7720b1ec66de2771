//! Sort state codec
//!
//! Accepts `"<column>.<asc|desc>"` or a JSON list of `{id, desc}`. The JSON
//! form is all-or-nothing: one bad entry discards the whole list.

use super::parsers::QueryParser;
use crate::data::filters::{SortItem, SortSpec, TableConfig};

#[derive(Debug, Clone, Copy)]
pub struct SortParser {
    table: &'static TableConfig,
}

impl SortParser {
    pub fn new(table: &'static TableConfig) -> Self {
        Self { table }
    }

    fn parse_single(&self, raw: &str) -> Option<SortSpec> {
        let (column, direction) = raw.rsplit_once('.')?;
        let desc = match direction {
            "asc" => false,
            "desc" => true,
            _ => return None,
        };
        self.table.sortable(column)?;
        Some(vec![SortItem::new(column, desc)])
    }

    fn parse_json(&self, raw: &str) -> Option<SortSpec> {
        let items: Vec<SortItem> = match serde_json::from_str(raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding malformed sort state");
                return None;
            }
        };
        if items.is_empty() {
            return None;
        }
        if let Some(bad) = items.iter().find(|i| self.table.sortable(&i.id).is_none()) {
            tracing::debug!(column = %bad.id, "Discarding sort state with unknown column");
            return None;
        }
        Some(items)
    }
}

impl QueryParser for SortParser {
    type Value = SortSpec;

    fn parse(&self, raw: &str) -> Option<SortSpec> {
        let raw = raw.trim();
        if raw.starts_with('[') {
            self.parse_json(raw)
        } else {
            self.parse_single(raw)
        }
    }

    fn serialize(&self, value: &SortSpec) -> String {
        match value.as_slice() {
            [] => String::new(),
            [item] => format!("{}.{}", item.id, if item.desc { "desc" } else { "asc" }),
            items => serde_json::to_string(items).unwrap_or_default(),
        }
    }
}
