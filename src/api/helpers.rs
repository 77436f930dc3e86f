//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::SnipbinError;

use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: if status.is_success() { 0 } else { status.as_u16() as i32 },
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response::<()>(status, message, None)
}

/// 从 SnipbinError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_from_snipbin(err: &SnipbinError) -> HttpResponse {
    error_response(err.http_status(), err.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_status() {
        let response = success_response("data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(StatusCode::BAD_REQUEST, "bad input");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_mapping() {
        let response = error_from_snipbin(&SnipbinError::not_found("missing"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = error_from_snipbin(&SnipbinError::authorization("wrong code"));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = error_from_snipbin(&SnipbinError::validation("empty"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_from_snipbin(&SnipbinError::database_operation("down"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
