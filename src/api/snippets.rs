//! Snippet API handlers
//!
//! Thin HTTP layer over the lifecycle service and the access gate. All
//! business rules live in the service; handlers translate transport
//! details (headers, query params, JSON bodies) and map typed errors to
//! status codes.

use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{
    AccessGate, CreateSnippetRequest, SnippetService, UpdateSnippetRequest,
};

use super::helpers::{created_response, error_from_snipbin, success_response};
use super::types::{
    CreatedSnippet, DeleteSnippet, GetSnippetQuery, PostNewSnippet, PutSnippet, RecentQuery,
    SnippetResponse, Unlock, VerifyCode,
};

/// 创建新 snippet
pub async fn create_snippet(
    payload: web::Json<PostNewSnippet>,
    service: web::Data<Arc<SnippetService>>,
) -> ActixResult<impl Responder> {
    let payload = payload.into_inner();
    trace!("API: create snippet request, language: {}", payload.language);

    let req = CreateSnippetRequest {
        title: payload.title,
        content: payload.content,
        language: payload.language,
        expiration: payload.expiration,
        view_limit: payload.view_limit,
        password: payload.password,
        theme: payload.theme,
        user_id: None,
    };

    match service.create(req).await {
        Ok(result) => {
            info!("API: snippet created - {}", result.short_id);
            Ok(created_response(CreatedSnippet::from(result)))
        }
        Err(e) => Ok(error_from_snipbin(&e)),
    }
}

/// 获取 snippet（计入一次查看）
pub async fn get_snippet(
    req: HttpRequest,
    short_id: web::Path<String>,
    query: web::Query<GetSnippetQuery>,
    service: web::Data<Arc<SnippetService>>,
) -> ActixResult<impl Responder> {
    // Header takes precedence; the query param exists for plain share links.
    let header_password = req
        .headers()
        .get("X-Snippet-Password")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let password = header_password.or_else(|| query.password.clone());

    match service.get(&short_id, password.as_deref()).await {
        Ok(snippet) => Ok(success_response(SnippetResponse::from(snippet))),
        Err(e) => Ok(error_from_snipbin(&e)),
    }
}

/// 更新 snippet（需要 owner code）
pub async fn update_snippet(
    short_id: web::Path<String>,
    payload: web::Json<PutSnippet>,
    service: web::Data<Arc<SnippetService>>,
) -> ActixResult<impl Responder> {
    let payload = payload.into_inner();

    let patch = UpdateSnippetRequest {
        title: payload.title,
        content: payload.content,
        language: payload.language,
        theme: payload.theme,
        expiration: payload.expiration,
        view_limit: payload.view_limit,
        password: payload.password,
    };

    match service.update(&short_id, &payload.owner_code, patch).await {
        Ok(snippet) => {
            info!("API: snippet updated - {}", short_id);
            Ok(success_response(SnippetResponse::from(snippet)))
        }
        Err(e) => Ok(error_from_snipbin(&e)),
    }
}

/// 删除 snippet（需要 owner code）
pub async fn delete_snippet(
    short_id: web::Path<String>,
    payload: web::Json<DeleteSnippet>,
    service: web::Data<Arc<SnippetService>>,
) -> ActixResult<impl Responder> {
    match service.delete(&short_id, &payload.owner_code).await {
        Ok(()) => {
            info!("API: snippet deleted - {}", short_id);
            Ok(success_response(serde_json::json!({
                "message": "Snippet deleted successfully"
            })))
        }
        Err(e) => Ok(error_from_snipbin(&e)),
    }
}

/// Owner code 预校验（无副作用），供客户端决定是否展示编辑/删除入口
pub async fn verify_owner_code(
    short_id: web::Path<String>,
    payload: web::Json<VerifyCode>,
    service: web::Data<Arc<SnippetService>>,
) -> ActixResult<impl Responder> {
    match service.verify_owner_code(&short_id, &payload.code).await {
        Ok(valid) => Ok(success_response(serde_json::json!({ "valid": valid }))),
        Err(e) => Ok(error_from_snipbin(&e)),
    }
}

/// 密码预校验（无副作用，不消耗查看次数）
pub async fn unlock_snippet(
    short_id: web::Path<String>,
    payload: web::Json<Unlock>,
    gate: web::Data<Arc<AccessGate>>,
) -> ActixResult<impl Responder> {
    match gate.authorize_password(&short_id, &payload.password).await {
        Ok(valid) => Ok(success_response(serde_json::json!({ "valid": valid }))),
        Err(e) => Ok(error_from_snipbin(&e)),
    }
}

/// 最近创建的 snippet 列表（走缓存，不带内容）
pub async fn recent_snippets(
    query: web::Query<RecentQuery>,
    service: web::Data<Arc<SnippetService>>,
) -> ActixResult<impl Responder> {
    let limit = query.limit.unwrap_or(crate::config::get_config().features.recent_list_limit);

    match service.list_recent(limit).await {
        Ok(summaries) => Ok(success_response(summaries)),
        Err(e) => Ok(error_from_snipbin(&e)),
    }
}

/// 兜底：未知路径统一 404
pub async fn not_found() -> HttpResponse {
    super::helpers::error_response(actix_web::http::StatusCode::NOT_FOUND, "Not Found")
}
