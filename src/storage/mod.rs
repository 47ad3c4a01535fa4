use std::sync::Arc;

use crate::errors::Result;
use crate::models::analytics::entities::{
    Assignment, AssignmentOverride, Course, Enrollment, PageViewsRollup, Student, Submission,
};

pub mod sea_orm_storage;

/// 统计计算依赖的数据来源
///
/// 每次请求按需查询一次，查询结果在同一次计算中复用。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 课程
    // 通过ID获取课程
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;

    /// 花名册
    // 列出课程内 active / completed 的选课记录
    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>>;
    // 列出花名册中的学生（去重，按 sortable_name 排序）
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<Student>>;

    /// 作业
    // 列出课程内已发布的作业
    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>>;
    // 列出给定作业的截止时间覆盖
    async fn list_assignment_overrides(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<AssignmentOverride>>;

    /// 提交
    // 按作业集合与学生集合筛选提交记录
    async fn list_submissions(
        &self,
        assignment_ids: &[i64],
        student_ids: &[i64],
    ) -> Result<Vec<Submission>>;

    /// 页面访问
    // 列出课程的页面访问按日汇总
    async fn list_page_views_rollups(&self, course_id: i64) -> Result<Vec<PageViewsRollup>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
