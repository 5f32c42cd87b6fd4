//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, error, web};
use serde::Serialize;
use tracing::debug;

use crate::errors::ChatcasterError;

use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ApiResponse::ok(data))
}

/// 从 ChatcasterError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_response(err: &ChatcasterError) -> HttpResponse {
    debug!("API error {}: {}", err.code(), err.message());
    json_response::<()>(err.http_status(), ApiResponse::failure(err.message()))
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: Result<T, ChatcasterError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_response(&e),
    }
}

/// JSON body 解析失败时同样返回 envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| {
            let response =
                error_response(&ChatcasterError::validation(format!("Invalid JSON body: {}", err)));
            error::InternalError::from_response(err, response).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_response_envelope() {
        let response = error_response(&ChatcasterError::not_connected("Not connected"));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Not connected"})
        );
    }
}
