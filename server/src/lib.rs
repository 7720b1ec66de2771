//! Task table server
//!
//! Serves a filterable, sortable, paginated task table over HTTP. Table state
//! lives in the URL query string and is translated into SQLite predicates.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
