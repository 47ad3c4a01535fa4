//! 数据模型定义
//!
//! - `common`: 统一响应结构与分页
//! - `analytics`: 课程统计相关的业务实体、请求参数与响应

pub mod analytics;
pub mod common;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo};

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1006,

    // 统计分析
    CourseNotFound = 5000,
    StudentNotFound = 5001,
    UpstreamUnavailable = 5002,
}
