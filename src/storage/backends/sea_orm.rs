use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    ExprTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use tracing::{error, info, warn};

use crate::errors::{Result, SnipbinError};
use crate::storage::{Snippet, SnippetStore};

use migration::{Migrator, MigratorTrait, entities::snippet};

#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStore {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(SnipbinError::database_config("DATABASE_URL is not set"));
        }

        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, backend_name).await?
        };

        let store = SeaOrmStore {
            db,
            backend_name: backend_name.to_string(),
        };

        store.run_migrations().await?;

        warn!("{} snippet store initialized.", store.backend_name.to_uppercase());
        Ok(store)
    }

    /// 连接 SQLite 数据库（带自动创建和性能优化）
    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| SnipbinError::database_config(format!("SQLite URL parse failed: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            SnipbinError::database_connection(format!("Cannot connect to SQLite database: {}", e))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 连接 PostgreSQL
    async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(std::time::Duration::from_secs(8))
            .acquire_timeout(std::time::Duration::from_secs(8))
            .idle_timeout(std::time::Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            SnipbinError::database_connection(format!(
                "Cannot connect to {} database: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| SnipbinError::database_operation(format!("Migration failed: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    fn model_to_snippet(model: snippet::Model) -> Snippet {
        Snippet {
            short_id: model.short_id,
            title: model.title,
            content: model.content,
            content_nonce: model.content_nonce,
            language: model.language,
            theme: model.theme,
            created_at: model.created_at,
            expires_at: model.expires_at,
            view_limit: model.view_limit,
            view_count: model.view_count,
            owner_code_hash: model.owner_code_hash,
            edit_code_hash: model.edit_code_hash,
            delete_code_hash: model.delete_code_hash,
            password_hash: model.password_hash,
            user_id: model.user_id,
        }
    }

    fn snippet_to_active_model(snippet: &Snippet, is_new: bool) -> snippet::ActiveModel {
        use sea_orm::ActiveValue::*;

        snippet::ActiveModel {
            short_id: Set(snippet.short_id.clone()),
            title: Set(snippet.title.clone()),
            content: Set(snippet.content.clone()),
            content_nonce: Set(snippet.content_nonce.clone()),
            language: Set(snippet.language.clone()),
            theme: Set(snippet.theme.clone()),
            created_at: if is_new { Set(snippet.created_at) } else { NotSet },
            expires_at: Set(snippet.expires_at),
            view_limit: Set(snippet.view_limit),
            // 计数只走 increment_view 的原子路径
            view_count: if is_new { Set(0) } else { NotSet },
            owner_code_hash: if is_new { Set(snippet.owner_code_hash.clone()) } else { NotSet },
            edit_code_hash: if is_new { Set(snippet.edit_code_hash.clone()) } else { NotSet },
            delete_code_hash: if is_new { Set(snippet.delete_code_hash.clone()) } else { NotSet },
            password_hash: Set(snippet.password_hash.clone()),
            user_id: if is_new { Set(snippet.user_id.clone()) } else { NotSet },
        }
    }

    /// 判断是否是唯一约束冲突错误
    fn is_unique_violation(err: &sea_orm::sqlx::Error) -> bool {
        use sea_orm::sqlx::Error;

        match err {
            Error::Database(db_err) => {
                let code = db_err.code();
                // SQLite: SQLITE_CONSTRAINT_PRIMARYKEY (1555) / SQLITE_CONSTRAINT (2067)
                // PostgreSQL: unique_violation (23505)
                code.as_ref()
                    .map(|c| c == "1555" || c == "2067" || c == "23505")
                    .unwrap_or(false)
            }
            _ => false,
        }
    }
}

#[async_trait]
impl SnippetStore for SeaOrmStore {
    async fn insert(&self, snippet: Snippet) -> Result<()> {
        let active_model = Self::snippet_to_active_model(&snippet, true);

        match active_model.insert(&self.db).await {
            Ok(_) => {
                info!("Snippet created: {}", snippet.short_id);
                Ok(())
            }
            Err(sea_orm::DbErr::Exec(sea_orm::RuntimeErr::SqlxError(sqlx_err)))
                if Self::is_unique_violation(&sqlx_err) =>
            {
                Err(SnipbinError::database_operation(format!(
                    "Short id collision: {}",
                    snippet.short_id
                )))
            }
            Err(e) => Err(SnipbinError::database_operation(format!(
                "Failed to insert snippet: {}",
                e
            ))),
        }
    }

    async fn get(&self, short_id: &str) -> Result<Option<Snippet>> {
        let result = snippet::Entity::find_by_id(short_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                SnipbinError::database_operation(format!("Failed to fetch snippet: {}", e))
            })?;

        Ok(result.map(Self::model_to_snippet))
    }

    async fn update(&self, snippet: Snippet) -> Result<()> {
        let short_id = snippet.short_id.clone();
        let active_model = Self::snippet_to_active_model(&snippet, false);

        match active_model.update(&self.db).await {
            Ok(_) => {
                info!("Snippet updated: {}", short_id);
                Ok(())
            }
            Err(sea_orm::DbErr::RecordNotUpdated) => Err(SnipbinError::not_found(format!(
                "Snippet does not exist: {}",
                short_id
            ))),
            Err(e) => Err(SnipbinError::database_operation(format!(
                "Failed to update snippet: {}",
                e
            ))),
        }
    }

    async fn remove(&self, short_id: &str) -> Result<()> {
        let result = snippet::Entity::delete_by_id(short_id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                SnipbinError::database_operation(format!("Failed to delete snippet: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(SnipbinError::not_found(format!(
                "Snippet does not exist: {}",
                short_id
            )));
        }

        info!("Snippet deleted: {}", short_id);
        Ok(())
    }

    async fn increment_view(&self, short_id: &str, limit: Option<i64>) -> Result<Option<i64>> {
        // 单条条件 UPDATE，增量和上限检查在数据库侧一次完成
        let mut update = snippet::Entity::update_many()
            .col_expr(
                snippet::Column::ViewCount,
                Expr::col(snippet::Column::ViewCount).add(1),
            )
            .filter(snippet::Column::ShortId.eq(short_id));

        if let Some(limit) = limit {
            update = update.filter(snippet::Column::ViewCount.lt(limit));
        }

        let result = update.exec(&self.db).await.map_err(|e| {
            SnipbinError::database_operation(format!("Failed to increment view count: {}", e))
        })?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let model = snippet::Entity::find_by_id(short_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                SnipbinError::database_operation(format!("Failed to re-read view count: {}", e))
            })?;

        Ok(model.map(|m| m.view_count))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = snippet::Entity::delete_many()
            .filter(snippet::Column::ExpiresAt.is_not_null())
            .filter(snippet::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .map_err(|e| {
                SnipbinError::database_operation(format!("Failed to sweep expired snippets: {}", e))
            })?;

        if result.rows_affected > 0 {
            info!("Swept {} expired snippets", result.rows_affected);
        }
        Ok(result.rows_affected)
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Snippet>> {
        let models = snippet::Entity::find()
            .order_by_desc(snippet::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to list snippets: {}", e);
                SnipbinError::database_operation(format!("Failed to list snippets: {}", e))
            })?;

        Ok(models.into_iter().map(Self::model_to_snippet).collect())
    }

    async fn backend_name(&self) -> String {
        self.backend_name.clone()
    }
}
