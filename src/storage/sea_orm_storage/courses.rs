//! 课程与花名册存储操作

use super::SeaOrmStorage;
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{AnalyticsError, Result};
use crate::models::analytics::entities::{Course, Enrollment, EnrollmentState, Student};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

impl SeaOrmStorage {
    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| AnalyticsError::database_operation(format!("查询课程失败: {e}")))?;

        result.map(|m| m.into_course()).transpose()
    }

    /// 列出计入花名册的选课记录
    pub async fn list_course_enrollments_impl(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        let results = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::WorkflowState.is_in(roster_state_names()))
            .order_by_asc(EnrollmentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AnalyticsError::database_operation(format!("查询选课记录失败: {e}")))?;

        results.into_iter().map(|m| m.into_enrollment()).collect()
    }

    /// 列出花名册中的学生
    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<Student>> {
        let user_ids: Vec<i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::UserId)
            .distinct()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::WorkflowState.is_in(roster_state_names()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AnalyticsError::database_operation(format!("查询花名册失败: {e}")))?;

        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        let results = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .order_by_asc(UserColumn::SortableName)
            .order_by_asc(UserColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AnalyticsError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_student()).collect())
    }
}

fn roster_state_names() -> Vec<String> {
    EnrollmentState::roster_states()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
