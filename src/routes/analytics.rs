use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::analytics::requests::StudentSummaryParams;
use crate::services::AnalyticsService;
use crate::utils::{SafeCourseIdI64, SafeCourseStudentPath};

// 懒加载的全局 AnalyticsService 实例
static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);

// 课程统计概览
pub async fn get_course_summary(
    req: HttpRequest,
    path: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.get_course_summary(&req, path.0).await
}

// 课程参与度趋势
pub async fn get_course_participation(
    req: HttpRequest,
    path: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.get_course_participation(&req, path.0).await
}

// 作业维度的全班按时情况
pub async fn get_assignment_tardiness(
    req: HttpRequest,
    path: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.get_assignment_tardiness(&req, path.0).await
}

// 学生概览（分页）
pub async fn list_student_summaries(
    req: HttpRequest,
    path: SafeCourseIdI64,
    query: web::Query<StudentSummaryParams>,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .list_student_summaries(&req, path.0, query.into_inner())
        .await
}

// 单个学生的按时情况
pub async fn get_student_tardiness(
    req: HttpRequest,
    path: SafeCourseStudentPath,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .get_student_tardiness(&req, path.course_id, path.student_id)
        .await
}

// 单个学生的作业明细
pub async fn get_student_assignments(
    req: HttpRequest,
    path: SafeCourseStudentPath,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .get_student_assignments(&req, path.course_id, path.student_id)
        .await
}

// 配置路由
pub fn configure_analytics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/analytics")
            .service(web::resource("").route(web::get().to(get_course_summary)))
            .service(web::resource("/participation").route(web::get().to(get_course_participation)))
            .service(web::resource("/assignments").route(web::get().to(get_assignment_tardiness)))
            .service(
                web::resource("/student_summaries").route(web::get().to(list_student_summaries)),
            )
            .service(
                web::resource("/users/{student_id}/tardiness")
                    .route(web::get().to(get_student_tardiness)),
            )
            .service(
                web::resource("/users/{student_id}/assignments")
                    .route(web::get().to(get_student_assignments)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analytics::fixtures::MemoryStorage;
    use crate::storage::Storage;
    use crate::utils::query_error_handler;
    use actix_web::{App, test};
    use std::sync::Arc;

    fn storage() -> web::Data<Arc<dyn Storage>> {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::biology());
        web::Data::new(storage)
    }

    #[actix_web::test]
    async fn test_routes_resolve() {
        let app = test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(storage())
                .configure(configure_analytics_routes),
        )
        .await;

        for (uri, status) in [
            ("/api/v1/courses/1/analytics", 200),
            ("/api/v1/courses/1/analytics/participation", 200),
            ("/api/v1/courses/1/analytics/assignments", 200),
            ("/api/v1/courses/1/analytics/student_summaries?page=1&size=2", 200),
            ("/api/v1/courses/1/analytics/users/1/tardiness", 200),
            ("/api/v1/courses/1/analytics/users/1/assignments", 200),
            ("/api/v1/courses/2/analytics", 404),
            ("/api/v1/courses/1/analytics/users/4/tardiness", 404),
            ("/api/v1/courses/abc/analytics", 400),
            ("/api/v1/courses/1/analytics/student_summaries?page=x", 400),
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), status, "{uri}");
        }
    }
}
