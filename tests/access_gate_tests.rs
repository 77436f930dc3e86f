//! AccessGate 集成测试
//!
//! 两条独立的能力检查都必须 fail closed：缺失记录、过期记录、
//! 未设置的哈希，一律判不通过。

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use snipbin::cache::{ListCache, NullListCache};
use snipbin::services::{AccessGate, CreateSnippetRequest, SnippetService};
use snipbin::storage::backends::sea_orm::SeaOrmStore;
use snipbin::storage::{Snippet, SnippetStore};

async fn test_env() -> (TempDir, Arc<dyn SnippetStore>, Arc<SnippetService>, AccessGate) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("gate_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let store: Arc<dyn SnippetStore> = Arc::new(
        SeaOrmStore::new(&db_url, "sqlite")
            .await
            .expect("连接 SQLite 失败"),
    );
    let cache: Arc<dyn ListCache> = Arc::new(NullListCache);
    let service = Arc::new(SnippetService::new(store.clone(), cache, None, 8, 60));
    let gate = AccessGate::new(store.clone());
    (temp_dir, store, service, gate)
}

fn create_request(password: Option<&str>) -> CreateSnippetRequest {
    CreateSnippetRequest {
        title: None,
        content: "gated".to_string(),
        language: "text".to_string(),
        expiration: "never".to_string(),
        view_limit: "unlimited".to_string(),
        password: password.map(String::from),
        theme: None,
        user_id: None,
    }
}

#[tokio::test]
async fn test_authorize_owner() {
    let (_dir, _store, service, gate) = test_env().await;

    let created = service.create(create_request(None)).await.unwrap();

    assert!(gate
        .authorize_owner(&created.short_id, &created.owner_code)
        .await
        .unwrap());

    // 格式合法但错误的 code
    assert!(!gate
        .authorize_owner(&created.short_id, "OWN-ZZZZZZZZZ")
        .await
        .unwrap());

    // 格式不合法：不查库直接判否
    assert!(!gate.authorize_owner(&created.short_id, "garbage").await.unwrap());
    assert!(!gate
        .authorize_owner(&created.short_id, &created.edit_code)
        .await
        .unwrap());

    // 不存在的 snippet
    assert!(!gate.authorize_owner("missing1", &created.owner_code).await.unwrap());
}

#[tokio::test]
async fn test_authorize_password() {
    let (_dir, _store, service, gate) = test_env().await;

    let created = service.create(create_request(Some("hunter2"))).await.unwrap();

    assert!(gate.authorize_password(&created.short_id, "hunter2").await.unwrap());
    assert!(!gate.authorize_password(&created.short_id, "wrong").await.unwrap());
    assert!(!gate.authorize_password("missing1", "hunter2").await.unwrap());
}

#[tokio::test]
async fn test_no_stored_hash_fails_closed() {
    let (_dir, store, service, gate) = test_env().await;

    // 没有密码的 snippet，任何密码都不通过
    let created = service.create(create_request(None)).await.unwrap();
    assert!(!gate.authorize_password(&created.short_id, "anything").await.unwrap());

    // 直接塞一条没有 owner hash 的记录（匿名/遗留形态）
    store
        .insert(Snippet {
            short_id: "anon0001".to_string(),
            title: None,
            content: "legacy".to_string(),
            content_nonce: None,
            language: "text".to_string(),
            theme: None,
            created_at: Utc::now(),
            expires_at: None,
            view_limit: None,
            view_count: 0,
            owner_code_hash: None,
            edit_code_hash: None,
            delete_code_hash: None,
            password_hash: None,
            user_id: None,
        })
        .await
        .unwrap();
    assert!(!gate.authorize_owner("anon0001", "OWN-ABCDEFGHI").await.unwrap());
}

#[tokio::test]
async fn test_expired_snippet_never_authorizes() {
    let (_dir, store, service, gate) = test_env().await;

    let created = service.create(create_request(Some("hunter2"))).await.unwrap();

    // 把记录改成已过期
    let mut snippet = store.get(&created.short_id).await.unwrap().unwrap();
    snippet.expires_at = Some(Utc::now() - Duration::minutes(1));
    store.update(snippet).await.unwrap();

    assert!(!gate
        .authorize_owner(&created.short_id, &created.owner_code)
        .await
        .unwrap());
    assert!(!gate.authorize_password(&created.short_id, "hunter2").await.unwrap());

    // 纯检查路径不做清理
    assert!(store.get(&created.short_id).await.unwrap().is_some());
}
