use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::storage::SnippetSummary;

pub mod moka;
pub mod null;

pub use moka::MokaListCache;
pub use null::NullListCache;

/// Best-effort result cache for listing surfaces.
///
/// The lifecycle engine never consults this for authorization or lifecycle
/// decisions; it only shields the store from redundant list queries.
/// Every mutating call invalidates the listing prefix.
#[async_trait]
pub trait ListCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<SnippetSummary>>;
    async fn set(&self, key: String, value: Vec<SnippetSummary>, ttl_secs: u64);
    async fn invalidate_prefix(&self, prefix: &str);
}

pub struct CacheFactory;

impl CacheFactory {
    pub fn create(config: &Config) -> Arc<dyn ListCache> {
        match config.cache.backend.as_str() {
            "off" | "null" => Arc::new(null::NullListCache),
            _ => Arc::new(moka::MokaListCache::new(config.cache.max_capacity)),
        }
    }
}
