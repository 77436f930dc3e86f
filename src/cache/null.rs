use async_trait::async_trait;

use crate::cache::ListCache;
use crate::storage::SnippetSummary;

/// No-op cache; every lookup is a miss.
pub struct NullListCache;

#[async_trait]
impl ListCache for NullListCache {
    async fn get(&self, _key: &str) -> Option<Vec<SnippetSummary>> {
        None
    }

    async fn set(&self, _key: String, _value: Vec<SnippetSummary>, _ttl_secs: u64) {}

    async fn invalidate_prefix(&self, _prefix: &str) {}
}
