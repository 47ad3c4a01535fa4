use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::{AnalyticsService, CourseScope, course_not_found, error_response, load_course_scope};
use crate::analytics::enrollment_window;
use crate::models::ApiResponse;
use crate::models::analytics::responses::CourseSummaryResponse;

pub async fn get_course_summary(
    service: &AnalyticsService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = match service.get_storage(request) {
        Ok(storage) => storage,
        Err(e) => return Ok(error_response("Failed to get storage", &e)),
    };

    let scope = match load_course_scope(&storage, course_id).await {
        Ok(Some(scope)) => scope,
        Ok(None) => return Ok(course_not_found(course_id)),
        Err(e) => return Ok(error_response("Failed to load course", &e)),
    };

    // 概览只依赖课程与花名册，已在上面加载，不走缓存
    let response = build_course_summary(&scope, Utc::now());
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "获取课程统计概览成功",
    )))
}

pub(crate) fn build_course_summary(
    scope: &CourseScope,
    now: DateTime<Utc>,
) -> CourseSummaryResponse {
    let (start_date, end_date) = enrollment_window(&scope.course, &scope.enrollments, now);
    CourseSummaryResponse {
        course_id: scope.course.id,
        available: !scope.roster.is_empty(),
        start_date,
        end_date,
        student_count: scope.roster.len() as i64,
    }
}
