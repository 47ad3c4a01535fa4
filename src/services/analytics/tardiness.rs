use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::{
    AnalyticsService, CourseScope, cache_key, course_not_found, error_response, load_course_scope,
    load_override_index, student_not_found,
};
use crate::analytics::TardinessAggregator;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::analytics::responses::StudentTardinessResponse;
use crate::storage::Storage;

pub async fn get_student_tardiness(
    service: &AnalyticsService,
    request: &HttpRequest,
    course_id: i64,
    student_id: i64,
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

    if !scope.contains_student(student_id) {
        return Ok(student_not_found(course_id, student_id));
    }

    let key = cache_key(course_id, "tardiness", &[("student", student_id)]);
    let result = service
        .cached(request, key, || {
            build_student_tardiness(&storage, &scope, student_id, Utc::now())
        })
        .await;

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "获取学生按时情况成功",
        ))),
        Err(e) => Ok(error_response("Failed to build student tardiness", &e)),
    }
}

pub(crate) async fn build_student_tardiness(
    storage: &Arc<dyn Storage>,
    scope: &CourseScope,
    student_id: i64,
    now: DateTime<Utc>,
) -> Result<StudentTardinessResponse> {
    let course_id = scope.course.id;
    let assignments = storage.list_course_assignments(course_id).await?;
    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let overrides = load_override_index(storage, &assignments, &scope.enrollments).await?;
    let submissions = storage
        .list_submissions(&assignment_ids, &[student_id])
        .await?;

    let mut aggregator = TardinessAggregator::new(&overrides, now);
    let tardiness_breakdown = aggregator.breakdown_for(student_id, &assignments, &submissions)?;

    Ok(StudentTardinessResponse {
        course_id,
        student_id,
        tardiness_breakdown,
    })
}
