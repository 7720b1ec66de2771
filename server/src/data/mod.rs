//! Data storage layer
//!
//! - `sqlite` - Database service, migrations, table orchestration and repositories
//! - `filters` - Operator taxonomy, filter entries and SQL predicate building
//! - `cache` - In-memory caching with tag revalidation
//! - `types` - Row types
//! - `error` - Unified error type

pub mod cache;
pub mod error;
pub mod filters;
pub mod sqlite;
pub mod types;

pub use cache::CacheService;
pub use error::DataError;
pub use sqlite::SqliteService;
