//! 页面访问汇总存储操作

use super::SeaOrmStorage;
use crate::entity::page_views_rollups::{Column, Entity as PageViewsRollups};
use crate::errors::{AnalyticsError, Result};
use crate::models::analytics::entities::PageViewsRollup;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 列出课程的页面访问按日汇总
    pub async fn list_page_views_rollups_impl(
        &self,
        course_id: i64,
    ) -> Result<Vec<PageViewsRollup>> {
        let results = PageViewsRollups::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| {
                AnalyticsError::database_operation(format!("查询页面访问汇总失败: {e}"))
            })?;

        results.into_iter().map(|m| m.into_rollup()).collect()
    }
}
