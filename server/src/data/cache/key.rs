//! Type-safe cache key builder with versioning and tags

use crate::core::constants::{CACHE_KEY_VERSION, CACHE_TAG_TASKS};
use crate::utils::crypto::sha256_hex;

/// Type-safe cache key builder
///
/// All keys are prefixed with a version (e.g., "v1:") to allow
/// invalidating all cached data on format changes. Keys that belong to a
/// revalidation tag live under `v1:tag:<tag>:` so a whole tag can be dropped
/// with one pattern delete.
pub struct CacheKey;

impl CacheKey {
    // =========================================================================
    // Tags
    // =========================================================================

    /// Key grouped under a revalidation tag
    pub fn tagged(tag: &str, rest: &str) -> String {
        format!("{}:tag:{}:{}", CACHE_KEY_VERSION, tag, rest)
    }

    /// Pattern matching every key under a tag
    pub fn tag_pattern(tag: &str) -> String {
        format!("{}:tag:{}:*", CACHE_KEY_VERSION, tag)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Cache key for one page of the tasks table
    ///
    /// Uses a 16-char hash of the canonical query state to keep keys short
    pub fn task_table(canonical_query: &str) -> String {
        let hash = &sha256_hex(canonical_query)[..16];
        Self::tagged(CACHE_TAG_TASKS, &format!("table:{}", hash))
    }

    /// Cache key for a single task
    pub fn task(id: &str) -> String {
        Self::tagged(CACHE_TAG_TASKS, &format!("task:{}", id))
    }

    /// Cache key for per-value counts of a column
    pub fn task_counts(column: &str) -> String {
        Self::tagged(CACHE_TAG_TASKS, &format!("counts:{}", column))
    }

    /// Cache key for the min/max of a numeric column
    pub fn task_range(column: &str) -> String {
        Self::tagged(CACHE_TAG_TASKS, &format!("range:{}", column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_keys() {
        assert_eq!(CacheKey::tagged("tasks", "x"), "v1:tag:tasks:x");
        assert_eq!(CacheKey::tag_pattern("tasks"), "v1:tag:tasks:*");
    }

    #[test]
    fn test_task_keys_live_under_tasks_tag() {
        let prefix = CacheKey::tag_pattern(CACHE_TAG_TASKS);
        let prefix = prefix.trim_end_matches('*');
        assert_eq!(CacheKey::task("t1"), "v1:tag:tasks:task:t1");
        assert_eq!(CacheKey::task_counts("status"), "v1:tag:tasks:counts:status");
        assert_eq!(
            CacheKey::task_range("estimated_hours"),
            "v1:tag:tasks:range:estimated_hours"
        );
        assert!(CacheKey::task_table("page=2").starts_with(prefix));
    }

    #[test]
    fn test_task_table_key_is_stable_and_short() {
        let a = CacheKey::task_table("page=2&sort=title.asc");
        let b = CacheKey::task_table("page=2&sort=title.asc");
        let c = CacheKey::task_table("page=3&sort=title.asc");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), "v1:tag:tasks:table:".len() + 16);
    }
}
