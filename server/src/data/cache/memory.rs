//! In-memory cache implementation using moka
//!
//! Uses moka for the cache with TinyLFU eviction and per-entry TTLs.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::backend::CacheBackend;
use super::error::CacheError;

/// Cache entry with data and metadata
#[derive(Clone)]
struct CacheEntry {
    data: Vec<u8>,
    ttl: Option<Duration>,
    created_at: Instant,
}

/// Per-entry expiry tracking for variable TTLs
struct VariableTtlExpiry;

impl Expiry<String, CacheEntry> for VariableTtlExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_read(
        &self,
        _key: &String,
        _value: &CacheEntry,
        _read_at: Instant,
        duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        duration_until_expiry
    }
}

/// In-memory cache implementation
pub struct InMemoryCache {
    cache: Cache<String, CacheEntry>,
}

impl InMemoryCache {
    /// Create a new in-memory cache holding at most `max_entries` entries
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            // Set initial capacity to reduce rehashing during warmup
            .initial_capacity((max_entries as usize / 4).min(10_000))
            .expire_after(VariableTtlExpiry)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.cache.get(key).await.map(|entry| entry.data))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry {
            data: value,
            ttl,
            created_at: Instant::now(),
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.cache.contains_key(key))
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        let Some(entry) = self.cache.get(key).await else {
            return Ok(None);
        };
        // Entries without TTL never expire
        let Some(ttl) = entry.ttl else {
            return Ok(None);
        };
        Ok(ttl
            .checked_sub(entry.created_at.elapsed())
            .filter(|remaining| *remaining > Duration::ZERO))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        // Only trailing globs are supported, matched as a prefix
        let prefix = pattern.trim_end_matches('*');
        if prefix.is_empty() {
            return Err(CacheError::Operation(
                "refusing to delete with an empty pattern".to_string(),
            ));
        }

        // Collect keys first; moka iter yields Arc<String> keys
        let keys_to_delete: Vec<String> = self
            .cache
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| (*k).clone())
            .collect();

        let mut count = 0u64;
        for key in keys_to_delete {
            self.cache.invalidate(&key).await;
            count += 1;
        }

        Ok(count)
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> InMemoryCache {
        InMemoryCache::new(1000)
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = cache();

        cache.set("key1", b"value1".to_vec(), None).await.unwrap();
        let result = cache.get("key1").await.unwrap();
        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = cache();
        assert_eq!(cache.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = cache();

        cache.set("key1", b"value1".to_vec(), None).await.unwrap();
        assert!(cache.delete("key1").await.unwrap());
        assert_eq!(cache.get("key1").await.unwrap(), None);
        assert!(!cache.delete("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists() {
        let cache = cache();

        assert!(!cache.exists("key1").await.unwrap());
        cache.set("key1", b"value1".to_vec(), None).await.unwrap();
        assert!(cache.exists("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = cache();

        cache
            .set("key1", b"value1".to_vec(), Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(cache.exists("key1").await.unwrap());

        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.cache.run_pending_tasks().await;

        assert_eq!(cache.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_remaining() {
        let cache = cache();

        cache
            .set("key1", b"value1".to_vec(), Some(Duration::from_secs(60)))
            .await
            .unwrap();
        let ttl_secs = cache.ttl("key1").await.unwrap().unwrap().as_secs();
        assert!((58..=60).contains(&ttl_secs));

        cache.set("key2", b"value2".to_vec(), None).await.unwrap();
        assert!(cache.ttl("key2").await.unwrap().is_none());
        assert!(cache.ttl("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_pattern() {
        let cache = cache();

        cache.set("v1:tag:tasks:a", b"a".to_vec(), None).await.unwrap();
        cache.set("v1:tag:tasks:b", b"b".to_vec(), None).await.unwrap();
        cache.set("v1:tag:other:c", b"c".to_vec(), None).await.unwrap();

        let deleted = cache.delete_pattern("v1:tag:tasks:*").await.unwrap();
        assert_eq!(deleted, 2);

        assert!(!cache.exists("v1:tag:tasks:a").await.unwrap());
        assert!(!cache.exists("v1:tag:tasks:b").await.unwrap());
        assert!(cache.exists("v1:tag:other:c").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_pattern_rejects_match_all() {
        let cache = cache();
        assert!(matches!(
            cache.delete_pattern("*").await,
            Err(CacheError::Operation(_))
        ));
    }

    #[tokio::test]
    async fn test_backend_name() {
        assert_eq!(cache().backend_name(), "memory");
    }
}
