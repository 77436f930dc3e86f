use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::error;

use crate::config::Config;
use crate::errors::{Result, SnipbinError};

pub mod backends;
pub mod models;

pub use models::{Snippet, SnippetSummary};

/// Persistence boundary for snippet records.
///
/// Per-row atomicity is assumed, cross-call transactions are not; the one
/// place that matters is `increment_view`, which must be a single
/// conditional statement on the database side.
#[async_trait::async_trait]
pub trait SnippetStore: Send + Sync {
    async fn insert(&self, snippet: Snippet) -> Result<()>;
    async fn get(&self, short_id: &str) -> Result<Option<Snippet>>;
    async fn update(&self, snippet: Snippet) -> Result<()>;
    /// Removes a record; absent records report NotFound, not success.
    async fn remove(&self, short_id: &str) -> Result<()>;

    /// Atomic view-count increment in one round-trip.
    ///
    /// With a finite `limit` the increment only applies while the stored
    /// count is below it. Returns the new count, or `None` when the quota is
    /// already exhausted (or the row vanished concurrently).
    async fn increment_view(&self, short_id: &str, limit: Option<i64>) -> Result<Option<i64>>;

    /// Deletes every record whose deadline has passed. Idempotent.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;

    /// Newest-first listing for display surfaces.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Snippet>>;

    async fn backend_name(&self) -> String;
}

pub struct StoreFactory;

impl StoreFactory {
    pub async fn create(config: &Config) -> Result<Arc<dyn SnippetStore>> {
        let backend = &config.database.backend;
        let database_url = &config.database.database_url;

        match backend.as_str() {
            "sqlite" | "postgres" => {
                let store = backends::sea_orm::SeaOrmStore::new(database_url, backend).await?;
                Ok(Arc::new(store) as Arc<dyn SnippetStore>)
            }
            _ => {
                error!("Unknown storage backend: {}", backend);
                Err(SnipbinError::database_config(format!(
                    "Unknown storage backend: {}. Supported: sqlite, postgres",
                    backend
                )))
            }
        }
    }
}
