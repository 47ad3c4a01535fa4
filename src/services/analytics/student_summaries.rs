use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use super::{
    AnalyticsService, CourseScope, cache_key, course_not_found, error_response, load_course_scope,
    load_override_index,
};
use crate::analytics::{TardinessAggregator, course_maxima, page_views_by_student};
use crate::errors::Result;
use crate::models::analytics::requests::StudentSummaryParams;
use crate::models::analytics::responses::{StudentSummary, StudentSummaryListResponse};
use crate::models::{ApiResponse, PaginationInfo};
use crate::storage::Storage;

pub async fn list_student_summaries(
    service: &AnalyticsService,
    request: &HttpRequest,
    course_id: i64,
    query: StudentSummaryParams,
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

    let settings = service.settings();
    let (page, size) = query.normalize(settings.default_page_size, settings.max_page_size);
    let key = cache_key(
        course_id,
        "student_summaries",
        &[("page", page), ("size", size)],
    );

    let result = service
        .cached(request, key, || {
            build_student_summaries(&storage, &scope, page, size, Utc::now())
        })
        .await;

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "获取学生概览成功",
        ))),
        Err(e) => Ok(error_response("Failed to build student summaries", &e)),
    }
}

/// 学生概览分两步计算：
/// 1. 在完整花名册上计算访问与参与次数的最大值
/// 2. 只为当前页的学生计算按时情况，并附上第一步得到的最大值
pub(crate) async fn build_student_summaries(
    storage: &Arc<dyn Storage>,
    scope: &CourseScope,
    page: i64,
    size: i64,
    now: DateTime<Utc>,
) -> Result<StudentSummaryListResponse> {
    let course_id = scope.course.id;
    let students = storage.list_course_students(course_id).await?;
    let rollups = storage.list_page_views_rollups(course_id).await?;

    let counts = page_views_by_student(&rollups);
    let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let maxima = course_maxima(&counts, &student_ids);

    let pagination = PaginationInfo::new(page, size, students.len() as i64);
    let page_students = &students[pagination.slice_range()];

    let assignments = storage.list_course_assignments(course_id).await?;
    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let page_ids: Vec<i64> = page_students.iter().map(|s| s.id).collect();
    let overrides = load_override_index(storage, &assignments, &scope.enrollments).await?;
    let submissions = storage.list_submissions(&assignment_ids, &page_ids).await?;

    debug!(
        "Computing student summaries for course {}: page {} ({} of {} students)",
        course_id,
        page,
        page_students.len(),
        students.len()
    );

    let mut aggregator = TardinessAggregator::new(&overrides, now);
    let mut items = Vec::with_capacity(page_students.len());
    for student in page_students {
        let own = counts.get(&student.id).copied().unwrap_or_default();
        items.push(StudentSummary {
            id: student.id,
            name: student.name.clone(),
            page_views: own.page_views,
            max_page_views: maxima.max_page_views,
            participations: own.participations,
            max_participations: maxima.max_participations,
            tardiness_breakdown: aggregator.breakdown_for(student.id, &assignments, &submissions)?,
        });
    }

    Ok(StudentSummaryListResponse { items, pagination })
}
