//! Pagination state
//!
//! `page` is 1-based in the URL and 0-based internally.

use serde::Serialize;

use super::parsers::{IntegerParser, QueryParser, WithDefault};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size: clamp_page_size(i64::from(page_size)),
        }
    }

    pub fn from_params(page: Option<&str>, per_page: Option<&str>) -> Self {
        Self {
            page_index: page.map(parse_page_index).unwrap_or(0),
            page_size: parse_page_size(per_page),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page_index) * i64::from(self.page_size)
    }

    /// 1-based page number as shown in URLs
    pub fn page(&self) -> u32 {
        self.page_index.saturating_add(1)
    }

    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size))
    }

    /// `page` and `perPage` URL values; defaults serialize to empty strings
    pub fn to_params(&self) -> (String, String) {
        (
            page_parser().serialize(&i64::from(self.page())),
            page_size_parser().serialize(&i64::from(self.page_size)),
        )
    }
}

fn page_parser() -> WithDefault<IntegerParser> {
    WithDefault::new(IntegerParser, 1)
}

fn page_size_parser() -> WithDefault<IntegerParser> {
    WithDefault::new(IntegerParser, i64::from(DEFAULT_PAGE_SIZE))
}

/// Map a 1-based `page` parameter to a 0-based index
///
/// Anything below 1 or non-numeric maps to the first page.
pub fn parse_page_index(raw: &str) -> u32 {
    let page = page_parser().parse_or_default(Some(raw));
    if page < 1 {
        return 0;
    }
    u32::try_from(page - 1).unwrap_or(u32::MAX)
}

/// Parse `perPage`; missing, non-numeric or non-positive gives the default
pub fn parse_page_size(raw: Option<&str>) -> u32 {
    clamp_page_size(page_size_parser().parse_or_default(raw))
}

fn clamp_page_size(size: i64) -> u32 {
    if size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        size.min(i64::from(MAX_PAGE_SIZE)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_index_clamping() {
        assert_eq!(parse_page_index("0"), 0);
        assert_eq!(parse_page_index("-5"), 0);
        assert_eq!(parse_page_index("abc"), 0);
        assert_eq!(parse_page_index("1"), 0);
        assert_eq!(parse_page_index("3"), 2);
    }

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(parse_page_size(None), 10);
        assert_eq!(parse_page_size(Some("abc")), 10);
        assert_eq!(parse_page_size(Some("0")), 10);
        assert_eq!(parse_page_size(Some("-3")), 10);
        assert_eq!(parse_page_size(Some("25")), 25);
        assert_eq!(parse_page_size(Some("5000")), 100);
    }

    #[test]
    fn offsets_and_page_count() {
        let state = PaginationState::from_params(Some("3"), Some("10"));
        assert_eq!(state.offset(), 20);
        assert_eq!(state.limit(), 10);
        assert_eq!(state.page(), 3);
        assert_eq!(state.page_count(25), 3);
        assert_eq!(state.page_count(0), 0);
        assert_eq!(state.page_count(30), 3);
    }

    #[test]
    fn params_omit_defaults() {
        assert_eq!(
            PaginationState::default().to_params(),
            (String::new(), String::new())
        );
        let state = PaginationState::new(2, 25);
        assert_eq!(state.to_params(), ("3".to_string(), "25".to_string()));

        let (page, per_page) = state.to_params();
        assert_eq!(
            PaginationState::from_params(Some(page.as_str()), Some(per_page.as_str())),
            state
        );
    }

    #[test]
    fn new_clamps_size() {
        assert_eq!(PaginationState::new(0, 0).page_size, 10);
        assert_eq!(PaginationState::new(0, 1000).page_size, 100);
    }
}
