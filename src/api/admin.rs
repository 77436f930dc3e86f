//! Maintenance endpoints
//!
//! The expiry sweep is externally scheduled (cron, systemd timer) and
//! guarded by a bearer token. An empty configured token disables the
//! endpoint entirely.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::info;

use crate::config::get_config;
use crate::services::SnippetService;
use crate::storage::SnippetStore;

use super::helpers::{error_response, success_response};

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// 过期清理：删除所有 expires_at 已过去的 snippet，幂等
pub async fn sweep_expired(
    req: HttpRequest,
    service: web::Data<Arc<SnippetService>>,
) -> ActixResult<impl Responder> {
    let admin_token = &get_config().api.admin_token;
    if admin_token.is_empty() {
        return Ok(error_response(StatusCode::NOT_FOUND, "Not Found"));
    }

    if bearer_token(&req) != Some(admin_token.as_str()) {
        return Ok(error_response(StatusCode::UNAUTHORIZED, "Invalid admin token"));
    }

    match service.sweep_expired().await {
        Ok(removed) => {
            info!("Admin API: sweep removed {} snippets", removed);
            Ok(success_response(serde_json::json!({ "removed": removed })))
        }
        Err(e) => Ok(super::helpers::error_from_snipbin(&e)),
    }
}

pub async fn health_check(
    store: web::Data<Arc<dyn SnippetStore>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(serde_json::json!({
        "status": "ok",
        "backend": store.backend_name().await,
    })))
}
