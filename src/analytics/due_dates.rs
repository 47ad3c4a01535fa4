//! 学生个人截止时间解析
//!
//! 作业可以针对单个学生或整个教学班覆盖截止时间。某个学生适用的截止时间为：
//! - 没有适用的覆盖时，取作业自身的 `due_at`
//! - 否则取最宽松的覆盖：任一覆盖取消了截止时间则为 `None`，否则取最晚的时间

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::trace;

use crate::errors::{AnalyticsError, Result};
use crate::models::analytics::entities::{Assignment, AssignmentOverride, Enrollment};

/// 截止时间覆盖查询（外部协作方）
pub trait DueDateLookup {
    fn due_at_for(&self, assignment: &Assignment, student_id: i64)
    -> Result<Option<DateTime<Utc>>>;
}

/// 不考虑任何覆盖，直接使用作业的统一截止时间
pub struct NominalDueDates;

impl DueDateLookup for NominalDueDates {
    fn due_at_for(
        &self,
        assignment: &Assignment,
        _student_id: i64,
    ) -> Result<Option<DateTime<Utc>>> {
        Ok(assignment.due_at)
    }
}

/// 基于一次性加载的覆盖记录与选课记录构建的索引
#[derive(Debug, Default)]
pub struct OverrideIndex {
    loaded: HashSet<i64>,
    by_assignment: HashMap<i64, Vec<AssignmentOverride>>,
    sections_by_student: HashMap<i64, HashSet<i64>>,
}

impl OverrideIndex {
    /// `assignments` 为已查询过覆盖记录的作业集合，
    /// 对集合之外的作业查询会返回 `UpstreamUnavailable`
    pub fn new(
        assignments: &[Assignment],
        overrides: Vec<AssignmentOverride>,
        enrollments: &[Enrollment],
    ) -> Self {
        let loaded: HashSet<i64> = assignments.iter().map(|a| a.id).collect();

        let mut by_assignment: HashMap<i64, Vec<AssignmentOverride>> = HashMap::new();
        for item in overrides {
            by_assignment
                .entry(item.assignment_id)
                .or_default()
                .push(item);
        }

        let mut sections_by_student: HashMap<i64, HashSet<i64>> = HashMap::new();
        for enrollment in enrollments {
            if let Some(section_id) = enrollment.course_section_id {
                sections_by_student
                    .entry(enrollment.user_id)
                    .or_default()
                    .insert(section_id);
            }
        }

        Self {
            loaded,
            by_assignment,
            sections_by_student,
        }
    }

    fn applies_to(&self, item: &AssignmentOverride, student_id: i64) -> bool {
        if item.student_id == Some(student_id) {
            return true;
        }
        match (item.course_section_id, self.sections_by_student.get(&student_id)) {
            (Some(section_id), Some(sections)) => sections.contains(&section_id),
            _ => false,
        }
    }
}

impl DueDateLookup for OverrideIndex {
    fn due_at_for(
        &self,
        assignment: &Assignment,
        student_id: i64,
    ) -> Result<Option<DateTime<Utc>>> {
        if !self.loaded.contains(&assignment.id) {
            return Err(AnalyticsError::upstream_unavailable(format!(
                "作业 {} 的截止时间覆盖数据未加载",
                assignment.id
            )));
        }

        let applicable = self
            .by_assignment
            .get(&assignment.id)
            .into_iter()
            .flatten()
            .filter(|item| self.applies_to(item, student_id));

        Ok(most_lenient(applicable).unwrap_or(assignment.due_at))
    }
}

/// 外层 None 表示没有适用的覆盖
fn most_lenient<'a, I>(overrides: I) -> Option<Option<DateTime<Utc>>>
where
    I: IntoIterator<Item = &'a AssignmentOverride>,
{
    overrides.into_iter().fold(None, |acc, item| {
        Some(match (acc, item.due_at) {
            (None, due) => due,
            (Some(None), _) | (_, None) => None,
            (Some(Some(current)), Some(due)) => Some(current.max(due)),
        })
    })
}

/// 按 (作业, 学生) 记忆化的截止时间查询
///
/// 由一次统计计算持有并显式传递，同一组合最多触发一次底层查询。
/// 查询失败不会被缓存。
pub struct VariedDueDates<'a> {
    lookup: &'a dyn DueDateLookup,
    memo: HashMap<(i64, i64), Option<DateTime<Utc>>>,
}

impl<'a> VariedDueDates<'a> {
    pub fn new(lookup: &'a dyn DueDateLookup) -> Self {
        Self {
            lookup,
            memo: HashMap::new(),
        }
    }

    pub fn due_at_for(
        &mut self,
        assignment: &Assignment,
        student_id: i64,
    ) -> Result<Option<DateTime<Utc>>> {
        let key = (assignment.id, student_id);
        if let Some(due_at) = self.memo.get(&key) {
            return Ok(*due_at);
        }

        let due_at = self.lookup.due_at_for(assignment, student_id)?;
        trace!(
            "Resolved varied due date for assignment {} / student {}: {:?}",
            assignment.id, student_id, due_at
        );
        self.memo.insert(key, due_at);
        Ok(due_at)
    }
}
