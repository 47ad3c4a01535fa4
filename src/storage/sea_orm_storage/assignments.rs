//! 作业与截止时间覆盖存储操作

use super::SeaOrmStorage;
use crate::entity::assignment_overrides::{Column as OverrideColumn, Entity as AssignmentOverrides};
use crate::entity::assignments::{Column, Entity as Assignments};
use crate::errors::{AnalyticsError, Result};
use crate::models::analytics::entities::{Assignment, AssignmentOverride};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 列出课程内已发布的作业
    pub async fn list_course_assignments_impl(&self, course_id: i64) -> Result<Vec<Assignment>> {
        let results = Assignments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::WorkflowState.eq("published"))
            .order_by_asc(Column::Position)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AnalyticsError::database_operation(format!("查询作业失败: {e}")))?;

        results.into_iter().map(|m| m.into_assignment()).collect()
    }

    /// 列出给定作业的截止时间覆盖
    pub async fn list_assignment_overrides_impl(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<AssignmentOverride>> {
        if assignment_ids.is_empty() {
            return Ok(vec![]);
        }

        let results = AssignmentOverrides::find()
            .filter(OverrideColumn::AssignmentId.is_in(assignment_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| {
                AnalyticsError::upstream_unavailable(format!("查询截止时间覆盖失败: {e}"))
            })?;

        results.into_iter().map(|m| m.into_override()).collect()
    }
}
