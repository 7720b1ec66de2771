//! URL query-state
//!
//! The URL is the source of truth for table state. These codecs turn query
//! parameters into a typed [`QueryStateSnapshot`] and back. Malformed input
//! never errors: filters are dropped per entry, sort state is dropped whole,
//! and pagination falls back to defaults.

mod filters;
mod pagination;
mod parsers;
mod snapshot;
mod sort;

pub use filters::{
    FiltersParser, MAX_FILTER_JSON_SIZE, MAX_FILTERS, parse_url_filters, serialize_url_filters,
};
pub use pagination::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PaginationState, parse_page_index, parse_page_size,
};
pub use parsers::{
    ARRAY_DELIMITER, ArrayParser, BooleanParser, FloatParser, IntegerParser, QueryParser,
    RANGE_DELIMITER, RangeParser, StringParser, TimestampParser, WithDefault,
};
pub use snapshot::{
    PARAM_FILTERS, PARAM_JOIN_OPERATOR, PARAM_PAGE, PARAM_PER_PAGE, PARAM_PER_PAGE_ALT,
    PARAM_SEARCH, PARAM_SORT, QueryStateSnapshot,
};
pub use sort::SortParser;
