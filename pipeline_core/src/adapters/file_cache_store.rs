//! On-disk cache store adapter: one JSON file per key under a configured
//! directory, keyed by a stable SHA-256 hash of the cache key, written via
//! write-to-temp-then-rename for atomicity.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial FileCacheStore adapter.

/// File-backed cache store.
pub struct FileCacheStore {
    dir: std::path::PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        FileCacheStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        let mut hasher = <sha2::Sha256 as sha2::Digest>::new();
        sha2::Digest::update(&mut hasher, key.as_bytes());
        let digest = sha2::Digest::finalize(hasher);
        let hex: std::string::String = digest.iter().map(|b| std::format!("{:02x}", b)).collect();
        self.dir.join(std::format!("{}.json", hex))
    }
}

#[async_trait::async_trait]
impl crate::ports::cache_store_port::CacheStorePort for FileCacheStore {
    async fn get(&self, key: &str) -> std::option::Option<crate::ports::cache_store_port::CacheEntry> {
        let path = self.path_for(key);
        let contents = match tokio::fs::read(&path).await {
            std::result::Result::Ok(bytes) => bytes,
            std::result::Result::Err(_) => return std::option::Option::None,
        };
        match serde_json::from_slice::<crate::ports::cache_store_port::CacheEntry>(&contents) {
            std::result::Result::Ok(entry) => std::option::Option::Some(entry),
            std::result::Result::Err(e) => {
                eprintln!("[cache] corrupt entry at {}: {}; treating as miss", path.display(), e);
                std::option::Option::None
            }
        }
    }

    async fn put(&self, key: &str, entry: &crate::ports::cache_store_port::CacheEntry) {
        if let std::result::Result::Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            eprintln!("[cache] failed to create cache dir {}: {}", self.dir.display(), e);
            return;
        }
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        let body = match serde_json::to_vec(entry) {
            std::result::Result::Ok(bytes) => bytes,
            std::result::Result::Err(e) => {
                eprintln!("[cache] failed to serialize entry for {}: {}", key, e);
                return;
            }
        };
        if let std::result::Result::Err(e) = tokio::fs::write(&tmp_path, &body).await {
            eprintln!("[cache] failed to write temp entry {}: {}", tmp_path.display(), e);
            return;
        }
        if let std::result::Result::Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            eprintln!("[cache] failed to atomically rename {} -> {}: {}", tmp_path.display(), path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::cache_store_port::CacheStorePort;

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let dir = std::env::temp_dir().join(std::format!("pipeline_cache_test_{}", uuid::Uuid::new_v4()));
        let store = FileCacheStore::new(&dir);

        let source = crate::domain::knowledge_source::KnowledgeSource {
            url: std::string::String::from("https://example.com"),
            title: std::string::String::from("Example"),
            content: std::string::String::from("content"),
            media_type: crate::domain::knowledge_source::MediaType::Web,
            error: None,
        };
        let entry = crate::ports::cache_store_port::CacheEntry {
            fetched_at_unix_seconds: 1_700_000_000,
            source,
        };

        store.put("https://example.com", &entry).await;
        let fetched = store.get("https://example.com").await;
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().source.url, "https://example.com");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let dir = std::env::temp_dir().join(std::format!("pipeline_cache_test_{}", uuid::Uuid::new_v4()));
        let store = FileCacheStore::new(&dir);
        assert!(store.get("https://nowhere.example").await.is_none());
    }
}
