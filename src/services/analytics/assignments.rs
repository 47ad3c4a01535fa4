use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use super::{
    AnalyticsService, CourseScope, cache_key, course_not_found, error_response, load_course_scope,
    load_override_index,
};
use crate::analytics::TardinessAggregator;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::analytics::responses::{AssignmentTardinessItem, AssignmentTardinessResponse};
use crate::storage::Storage;

pub async fn get_assignment_tardiness(
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

    let result = service
        .cached(request, cache_key(course_id, "assignments", &[]), || {
            build_assignment_tardiness(&storage, &scope, Utc::now())
        })
        .await;

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "获取作业按时情况成功",
        ))),
        Err(e) => Ok(error_response("Failed to build assignment tardiness", &e)),
    }
}

/// 每个作业的全班按时占比，分母为花名册人数
pub(crate) async fn build_assignment_tardiness(
    storage: &Arc<dyn Storage>,
    scope: &CourseScope,
    now: DateTime<Utc>,
) -> Result<AssignmentTardinessResponse> {
    let course_id = scope.course.id;
    let assignments = storage.list_course_assignments(course_id).await?;
    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let overrides = load_override_index(storage, &assignments, &scope.enrollments).await?;
    let submissions = storage
        .list_submissions(&assignment_ids, &scope.roster)
        .await?;

    debug!(
        "Computing assignment tardiness for course {}: {} assignments, {} students, {} submissions",
        course_id,
        assignments.len(),
        scope.roster.len(),
        submissions.len()
    );

    let mut aggregator = TardinessAggregator::new(&overrides, now);
    let mut items = Vec::with_capacity(assignments.len());
    for assignment in &assignments {
        let ratios = aggregator.course_breakdown(assignment, &submissions, scope.roster.len())?;
        items.push(AssignmentTardinessItem {
            assignment_id: assignment.id,
            title: assignment.title.clone(),
            due_at: assignment.due_at,
            tardiness_breakdown: ratios,
        });
    }

    Ok(AssignmentTardinessResponse {
        course_id,
        student_count: scope.roster.len() as i64,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analytics::fixtures::{MemoryStorage, service_for, test_request};
    use crate::services::analytics::load_course_scope;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[actix_web::test]
    async fn test_ratios_use_roster_as_denominator() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::biology());
        let scope = load_course_scope(&storage, 1).await.unwrap().unwrap();
        let response = build_assignment_tardiness(&storage, &scope, Utc::now())
            .await
            .unwrap();

        assert_eq!(response.student_count, 3);
        assert_eq!(response.items.len(), 3);

        // 作业统一截止时间之后提交的按迟交计，即使该学生有延期覆盖
        let essay = &response.items[0].tardiness_breakdown;
        assert!(approx(essay.on_time, 1.0 / 3.0));
        assert!(approx(essay.late, 1.0 / 3.0));
        assert!(approx(essay.missing, 1.0 / 3.0));

        // 线下作业已评分视为按截止时间提交
        let lab = &response.items[1].tardiness_breakdown;
        assert!(approx(lab.on_time, 1.0 / 3.0));
        assert!(approx(lab.late, 0.0));
        assert!(approx(lab.missing, 2.0 / 3.0));

        let final_exam = &response.items[2].tardiness_breakdown;
        assert!(approx(final_exam.on_time, 1.0 / 3.0));
        assert_eq!(final_exam.late, 0.0);
        assert_eq!(final_exam.missing, 0.0);

        for item in &response.items[..2] {
            let r = &item.tardiness_breakdown;
            assert!(approx(r.on_time + r.late + r.missing, 1.0));
        }
    }

    #[actix_web::test]
    async fn test_empty_roster_yields_zero_ratios() {
        let service = service_for(MemoryStorage::empty_course(9));
        let resp = service
            .get_assignment_tardiness(&test_request(), 9)
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_override_failure_is_service_unavailable() {
        let mut storage = MemoryStorage::biology();
        storage.fail_overrides = true;
        let service = service_for(storage);

        let resp = service
            .get_assignment_tardiness(&test_request(), 1)
            .await
            .unwrap();
        assert_eq!(resp.status(), 503);
    }
}
