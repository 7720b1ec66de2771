//! Domain logic for the task table
//!
//! - `query_state` - URL query-state codecs and the parsed table snapshot
//! - `tasks` - Task seeding

pub mod query_state;
pub mod tasks;

pub use query_state::{PaginationState, QueryStateSnapshot};
