// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "TaskTable";

/// Application name in lowercase (for paths, log targets and identifiers)
pub const APP_NAME_LOWER: &str = "tasktable";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tasktable.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TASKTABLE_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "TASKTABLE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "TASKTABLE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TASKTABLE_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5380;

/// Graceful shutdown timeout for background tasks
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SQLite Database
// =============================================================================

/// Environment variable for the database connection string
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Default database connection string
pub const DEFAULT_DATABASE_URL: &str = "sqlite://tasktable.db";

/// Maximum connections in the SQLite pool
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// Busy timeout for SQLite lock contention
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite page cache size (negative = KiB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// Pages written before an automatic WAL checkpoint
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval for the background WAL checkpoint task
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Cache
// =============================================================================

/// Environment variable for cache capacity
pub const ENV_CACHE_MAX_ENTRIES: &str = "TASKTABLE_CACHE_MAX_ENTRIES";

/// Default cache capacity
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;

/// Cache key version prefix; bump to invalidate everything on format changes
pub const CACHE_KEY_VERSION: &str = "v1";

/// Cache tag covering all task table reads
pub const CACHE_TAG_TASKS: &str = "tasks";

/// TTL for cached table pages and facet counts
pub const CACHE_TTL_TABLE: u64 = 60;


// =============================================================================
// Task Actions
// =============================================================================

/// Default number of generated tasks for `seed`
pub const SEED_DEFAULT_COUNT: u32 = 100;

/// Maximum number of generated tasks for `seed`
pub const SEED_MAX_COUNT: u32 = 500;

/// Maximum number of ids in a batch delete
pub const BATCH_DELETE_MAX: usize = 100;

// =============================================================================
// API
// =============================================================================

/// Versioned API prefix
pub const API_PREFIX: &str = "/api/v1";

/// Maximum request body size
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
