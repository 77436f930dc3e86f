//! API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::CreateSnippetResult;
use crate::storage::Snippet;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn default_expiration() -> String {
    "never".to_string()
}

fn default_view_limit() -> String {
    "unlimited".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostNewSnippet {
    pub title: Option<String>,
    pub content: String,
    pub language: String,
    #[serde(default = "default_expiration")]
    pub expiration: String,
    #[serde(default = "default_view_limit")]
    pub view_limit: String,
    pub password: Option<String>,
    pub theme: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PutSnippet {
    pub owner_code: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub theme: Option<String>,
    pub expiration: Option<String>,
    pub view_limit: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeleteSnippet {
    pub owner_code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VerifyCode {
    pub code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Unlock {
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GetSnippetQuery {
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RecentQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreatedSnippet {
    pub short_id: String,
    pub owner_code: String,
    pub edit_code: String,
    pub delete_code: String,
}

impl From<CreateSnippetResult> for CreatedSnippet {
    fn from(result: CreateSnippetResult) -> Self {
        Self {
            short_id: result.short_id,
            owner_code: result.owner_code,
            edit_code: result.edit_code,
            delete_code: result.delete_code,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SnippetResponse {
    pub short_id: String,
    pub title: Option<String>,
    pub content: String,
    pub language: String,
    pub theme: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub view_limit: Option<i64>,
    pub view_count: i64,
    pub is_password_protected: bool,
}

impl From<Snippet> for SnippetResponse {
    fn from(snippet: Snippet) -> Self {
        let is_password_protected = snippet.is_password_protected();
        Self {
            short_id: snippet.short_id,
            title: snippet.title,
            content: snippet.content,
            language: snippet.language,
            theme: snippet.theme,
            created_at: snippet.created_at,
            expires_at: snippet.expires_at,
            view_limit: snippet.view_limit,
            view_count: snippet.view_count,
            is_password_protected,
        }
    }
}
