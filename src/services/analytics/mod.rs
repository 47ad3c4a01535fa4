pub mod assignments;
pub mod participation;
pub mod student_assignments;
pub mod student_summaries;
pub mod summary;
pub mod tardiness;

#[cfg(test)]
pub(crate) mod fixtures;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::analytics::{OverrideIndex, roster_student_ids};
use crate::cache::ObjectCache;
use crate::config::{AnalyticsConfig, AppConfig};
use crate::errors::{AnalyticsError, Result};
use crate::models::analytics::entities::{Assignment, Course, Enrollment};
use crate::models::analytics::requests::StudentSummaryParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AnalyticsService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
    settings: Option<AnalyticsConfig>,
}

impl AnalyticsService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            cache: None,
            settings: None,
        }
    }

    /// 直接持有存储与缓存，不依赖 app_data 与全局配置
    pub fn with_backends(
        storage: Arc<dyn Storage>,
        cache: Option<Arc<dyn ObjectCache>>,
        settings: AnalyticsConfig,
    ) -> Self {
        Self {
            storage: Some(storage),
            cache,
            settings: Some(settings),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        if let Some(storage) = &self.storage {
            return Ok(storage.clone());
        }
        request
            .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
            .map(|data| data.get_ref().clone())
            .ok_or_else(|| AnalyticsError::database_config("Storage not found in app data"))
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        if let Some(cache) = &self.cache {
            return Some(cache.clone());
        }
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    /// 未初始化全局配置时使用默认值
    pub(crate) fn settings(&self) -> AnalyticsConfig {
        match &self.settings {
            Some(settings) => settings.clone(),
            None => AppConfig::try_get()
                .map(|config| config.analytics.clone())
                .unwrap_or_default(),
        }
    }

    /// 先查缓存，未命中时计算并写回；计算失败不写缓存
    pub(crate) async fn cached<T, F, Fut>(
        &self,
        request: &HttpRequest,
        key: String,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let settings = self.settings();
        let cache = match self.get_cache(request) {
            Some(cache) if settings.cache_enabled => cache,
            _ => return compute().await,
        };

        if let Some(value) = cache.get_json::<T>(&key).await {
            debug!("Analytics cache hit: {}", key);
            return Ok(value);
        }

        debug!("Analytics cache miss: {}", key);
        let value = compute().await?;
        cache.insert_json(key, &value, 0).await;
        Ok(value)
    }

    pub async fn get_course_summary(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        summary::get_course_summary(self, request, course_id).await
    }

    pub async fn get_course_participation(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        participation::get_course_participation(self, request, course_id).await
    }

    pub async fn get_assignment_tardiness(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::get_assignment_tardiness(self, request, course_id).await
    }

    pub async fn list_student_summaries(
        &self,
        request: &HttpRequest,
        course_id: i64,
        query: StudentSummaryParams,
    ) -> ActixResult<HttpResponse> {
        student_summaries::list_student_summaries(self, request, course_id, query).await
    }

    pub async fn get_student_tardiness(
        &self,
        request: &HttpRequest,
        course_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        tardiness::get_student_tardiness(self, request, course_id, student_id).await
    }

    pub async fn get_student_assignments(
        &self,
        request: &HttpRequest,
        course_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        student_assignments::get_student_assignments(self, request, course_id, student_id).await
    }
}

/// 统计结果缓存键：`analytics:{course_id}:{view}[:{params}]`
pub(crate) fn cache_key(course_id: i64, view: &str, params: &[(&str, i64)]) -> String {
    let mut key = format!("analytics:{course_id}:{view}");
    for (name, value) in params {
        key.push_str(&format!(":{name}={value}"));
    }
    key
}

/// 课程及其花名册
pub(crate) struct CourseScope {
    pub course: Course,
    pub enrollments: Vec<Enrollment>,
    pub roster: Vec<i64>,
}

impl CourseScope {
    pub fn contains_student(&self, student_id: i64) -> bool {
        self.roster.binary_search(&student_id).is_ok()
    }
}

/// 加载课程与花名册，课程不存在时返回 None
pub(crate) async fn load_course_scope(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> Result<Option<CourseScope>> {
    let Some(course) = storage.get_course_by_id(course_id).await? else {
        return Ok(None);
    };
    let enrollments = storage.list_course_enrollments(course_id).await?;
    let roster = roster_student_ids(&enrollments);
    Ok(Some(CourseScope {
        course,
        enrollments,
        roster,
    }))
}

/// 一次性加载全部作业的截止时间覆盖
pub(crate) async fn load_override_index(
    storage: &Arc<dyn Storage>,
    assignments: &[Assignment],
    enrollments: &[Enrollment],
) -> Result<OverrideIndex> {
    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let overrides = storage.list_assignment_overrides(&assignment_ids).await?;
    Ok(OverrideIndex::new(assignments, overrides, enrollments))
}

/// 将内部错误转换为 HTTP 响应
pub(crate) fn error_response(context: &str, err: &AnalyticsError) -> HttpResponse {
    let body = ApiResponse::from_error(err);
    match err {
        err if err.is_upstream() => {
            warn!("{}: upstream data unavailable: {}", context, err);
            HttpResponse::ServiceUnavailable().json(body)
        }
        AnalyticsError::Validation(_) => HttpResponse::BadRequest().json(body),
        _ => {
            error!("{}: {}", context, err);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

pub(crate) fn course_not_found(course_id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::CourseNotFound,
        format!("课程 {course_id} 不存在"),
    ))
}

pub(crate) fn student_not_found(course_id: i64, student_id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::StudentNotFound,
        format!("学生 {student_id} 不在课程 {course_id} 的花名册中"),
    ))
}
