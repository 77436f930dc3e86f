use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use tracing::debug;

use crate::cache::ListCache;
use crate::storage::SnippetSummary;

/// Per-entry TTL passed in at insert time.
struct TtlExpiry;

type Entry = (Vec<SnippetSummary>, u64);

impl Expiry<String, Entry> for TtlExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Duration::from_secs(value.1))
    }
}

pub struct MokaListCache {
    inner: Cache<String, Entry>,
}

impl MokaListCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(TtlExpiry)
            .support_invalidation_closures()
            .build();

        debug!("MokaListCache initialized with max capacity: {}", max_capacity);
        Self { inner }
    }
}

#[async_trait]
impl ListCache for MokaListCache {
    async fn get(&self, key: &str) -> Option<Vec<SnippetSummary>> {
        self.inner.get(key).await.map(|(value, _)| value)
    }

    async fn set(&self, key: String, value: Vec<SnippetSummary>, ttl_secs: u64) {
        self.inner.insert(key, (value, ttl_secs)).await;
    }

    async fn invalidate_prefix(&self, prefix: &str) {
        let prefix = prefix.to_string();
        if let Err(e) = self
            .inner
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            debug!("Cache prefix invalidation failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(short_id: &str) -> SnippetSummary {
        SnippetSummary {
            short_id: short_id.to_string(),
            title: None,
            language: "rust".to_string(),
            created_at: chrono::Utc::now(),
            expires_at: None,
            view_count: 0,
            view_limit: None,
            is_password_protected: false,
        }
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = MokaListCache::new(16);
        cache.set("snippets:recent:10".into(), vec![summary("a")], 60).await;

        let hit = cache.get("snippets:recent:10").await.unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].short_id, "a");
        assert!(cache.get("snippets:recent:20").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_prefix() {
        let cache = MokaListCache::new(16);
        cache.set("snippets:recent:10".into(), vec![summary("a")], 60).await;
        cache.set("other:key".into(), vec![summary("b")], 60).await;

        cache.invalidate_prefix("snippets:").await;
        // invalidate_entries_if 是异步生效的，run_pending_tasks 强制执行
        cache.inner.run_pending_tasks().await;

        assert!(cache.get("snippets:recent:10").await.is_none());
        assert!(cache.get("other:key").await.is_some());
    }
}
