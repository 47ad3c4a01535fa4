//! 路径参数提取器
//!
//! 直接从 match_info 读取并校验 ID，非法值返回统一格式的 400 响应。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::errors::AnalyticsError;
use crate::models::ApiResponse;

fn bad_path(message: String) -> Error {
    let err = AnalyticsError::validation(message);
    let response = HttpResponse::BadRequest().json(ApiResponse::from_error(&err));
    InternalError::from_response(err, response).into()
}

/// 解析正整数 ID
fn parse_id(req: &HttpRequest, name: &str) -> Result<i64, Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path(format!("缺少路径参数: {name}")))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path(format!("路径参数 {name} 无效: {raw}"))),
    }
}

/// `{course_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeCourseIdI64(pub i64);

impl FromRequest for SafeCourseIdI64 {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_id(req, "course_id").map(SafeCourseIdI64))
    }
}

/// `{course_id}` + `{student_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeCourseStudentPath {
    pub course_id: i64,
    pub student_id: i64,
}

impl FromRequest for SafeCourseStudentPath {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = parse_id(req, "course_id").and_then(|course_id| {
            parse_id(req, "student_id").map(|student_id| SafeCourseStudentPath {
                course_id,
                student_id,
            })
        });
        ready(result)
    }
}
