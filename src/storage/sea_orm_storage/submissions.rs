//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{Column, Entity as Submissions};
use crate::errors::{AnalyticsError, Result};
use crate::models::analytics::entities::Submission;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 按作业集合与学生集合筛选提交记录
    pub async fn list_submissions_impl(
        &self,
        assignment_ids: &[i64],
        student_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if assignment_ids.is_empty() || student_ids.is_empty() {
            return Ok(vec![]);
        }

        let results = Submissions::find()
            .filter(Column::AssignmentId.is_in(assignment_ids.to_vec()))
            .filter(Column::UserId.is_in(student_ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AnalyticsError::database_operation(format!("查询提交记录失败: {e}")))?;

        results.into_iter().map(|m| m.into_submission()).collect()
    }
}
