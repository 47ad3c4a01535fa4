use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::errors::AnalyticsError;
use crate::models::ApiResponse;

/// 查询参数解析失败时返回统一格式的 400 响应
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Invalid query string on {}: {}", req.path(), err);
    let invalid = AnalyticsError::validation(format!("查询参数错误: {err}"));
    let response = HttpResponse::BadRequest().json(ApiResponse::from_error(&invalid));
    InternalError::from_response(err, response).into()
}
