//! Cache store port: a key-value store with atomic put and timestamped
//! entries, used by the knowledge fetcher to avoid redundant network
//! fetches within a TTL window.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial CacheStorePort trait.

/// One cached entry: the serialized `KnowledgeSource` plus when it was
/// fetched, used by the caller to compute TTL expiry.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct CacheEntry {
    pub fetched_at_unix_seconds: u64,
    pub source: crate::domain::knowledge_source::KnowledgeSource,
}

/// Port for the shared, read-mostly knowledge cache.
///
/// Readers must tolerate missing or corrupt entries by treating them as a
/// cache miss; writes must be atomic (e.g. write-then-rename) to avoid
/// partial entries being observed by concurrent readers.
#[async_trait::async_trait]
pub trait CacheStorePort: std::marker::Send + std::marker::Sync {
    /// Looks up a cached entry by its stable key. Returns `Ok(None)` on a
    /// miss or a corrupt/unreadable entry; cache I/O errors are logged
    /// internally by the implementation and also treated as a miss.
    async fn get(&self, key: &str) -> std::option::Option<CacheEntry>;

    /// Stores an entry atomically under `key`. Failures are logged by the
    /// implementation and do not propagate to the pipeline.
    async fn put(&self, key: &str, entry: &CacheEntry);
}
