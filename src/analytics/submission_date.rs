//! 推断提交时间
//!
//! 对一个 (作业, 学生, 提交记录) 组合给出"视为交作业的时间"，按顺序尝试：
//! 1. 提交记录的 `submitted_at`
//! 2. 作业不支持在线提交且已评分时，取该学生适用的截止时间（线下作业评分即视为按时交）
//! 3. 提交记录的 `graded_at`（评分行为视为提交的替代证据）
//! 4. 以上都没有则返回 None

use chrono::{DateTime, Utc};
use tracing::trace;

use super::due_dates::VariedDueDates;
use crate::errors::Result;
use crate::models::analytics::entities::{Assignment, Submission};

/// 提交时间推断规则，按 [`SubmissionDateRule::ORDER`] 依次尝试，第一个有值的生效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionDateRule {
    SubmittedAt,
    GradedOffline,
    GradedAt,
}

impl SubmissionDateRule {
    pub const ORDER: [SubmissionDateRule; 3] = [
        SubmissionDateRule::SubmittedAt,
        SubmissionDateRule::GradedOffline,
        SubmissionDateRule::GradedAt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SubmissionDateRule::SubmittedAt => "submitted_at",
            SubmissionDateRule::GradedOffline => "varied_due_date",
            SubmissionDateRule::GradedAt => "graded_at",
        }
    }

    /// 只有 GradedOffline 规则会触发截止时间查询，且仅在条件满足时
    pub fn apply(
        self,
        assignment: &Assignment,
        student_id: i64,
        submission: &Submission,
        due_dates: &mut VariedDueDates<'_>,
    ) -> Result<Option<DateTime<Utc>>> {
        match self {
            SubmissionDateRule::SubmittedAt => Ok(submission.submitted_at),
            SubmissionDateRule::GradedOffline => {
                if !assignment.is_submittable_type() && submission.is_graded() {
                    due_dates.due_at_for(assignment, student_id)
                } else {
                    Ok(None)
                }
            }
            SubmissionDateRule::GradedAt => Ok(submission.graded_at),
        }
    }
}

/// 单个 (作业, 学生, 提交记录) 的提交时间推断器
#[derive(Debug, Clone, Copy)]
pub struct SubmissionDateResolver<'a> {
    assignment: &'a Assignment,
    student_id: i64,
    submission: Option<&'a Submission>,
}

impl<'a> SubmissionDateResolver<'a> {
    /// `submission` 为 None 表示该学生从未提交
    pub fn new(
        assignment: &'a Assignment,
        student_id: i64,
        submission: Option<&'a Submission>,
    ) -> Self {
        Self {
            assignment,
            student_id,
            submission,
        }
    }

    pub fn resolve(&self, due_dates: &mut VariedDueDates<'_>) -> Result<Option<DateTime<Utc>>> {
        let Some(submission) = self.submission else {
            return Ok(None);
        };

        for rule in SubmissionDateRule::ORDER {
            let resolved = rule.apply(self.assignment, self.student_id, submission, due_dates)?;
            if let Some(date) = resolved {
                trace!(
                    "Submission date for assignment {} / student {} resolved by {}",
                    self.assignment.id,
                    self.student_id,
                    rule.name()
                );
                return Ok(Some(date));
            }
        }

        Ok(None)
    }
}
