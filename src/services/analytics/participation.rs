use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{AnalyticsService, cache_key, course_not_found, error_response};
use crate::analytics::participation_by_date;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::analytics::responses::ParticipationResponse;
use crate::storage::Storage;

pub async fn get_course_participation(
    service: &AnalyticsService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = match service.get_storage(request) {
        Ok(storage) => storage,
        Err(e) => return Ok(error_response("Failed to get storage", &e)),
    };

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(course_not_found(course_id)),
        Err(e) => return Ok(error_response("Failed to load course", &e)),
    }

    let result = service
        .cached(request, cache_key(course_id, "participation", &[]), || {
            build_participation(&storage, course_id)
        })
        .await;

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "获取课程参与度成功",
        ))),
        Err(e) => Ok(error_response("Failed to build participation", &e)),
    }
}

pub(crate) async fn build_participation(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> Result<ParticipationResponse> {
    let rollups = storage.list_page_views_rollups(course_id).await?;
    Ok(ParticipationResponse {
        course_id,
        items: participation_by_date(&rollups),
    })
}
