//! 按时情况统计
//!
//! 单个学生：按作业计数 on_time / late / missing，每个作业恰好落入一类（或未截止未提交）。
//! 全班：按作业计算占比，分母为花名册人数，三项之和为 1。

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::due_dates::{DueDateLookup, VariedDueDates};
use super::submission_date::SubmissionDateResolver;
use crate::errors::Result;
use crate::models::analytics::entities::{Assignment, Submission, is_overdue};
use crate::models::analytics::responses::{
    StudentAssignmentItem, Tardiness, TardinessBreakdown, TardinessRatios,
};

/// 根据适用的截止时间与推断出的提交时间归类
///
/// - 已截止：有提交时间则按是否晚于截止时间分为 late / on_time，否则 missing
/// - 未截止（含无截止时间）：有提交时间即 on_time，否则 pending
pub fn classify(
    due_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Tardiness {
    let overdue = is_overdue(due_at, now);
    match (submitted_at, due_at) {
        (Some(submitted), Some(due)) if overdue => {
            if submitted > due {
                Tardiness::Late
            } else {
                Tardiness::OnTime
            }
        }
        (Some(_), _) => Tardiness::OnTime,
        (None, _) if overdue => Tardiness::Missing,
        (None, _) => Tardiness::Pending,
    }
}

/// 一次请求范围内的统计上下文，持有截止时间查询的记忆化缓存
pub struct TardinessAggregator<'a> {
    due_dates: VariedDueDates<'a>,
    now: DateTime<Utc>,
}

impl<'a> TardinessAggregator<'a> {
    pub fn new(lookup: &'a dyn DueDateLookup, now: DateTime<Utc>) -> Self {
        Self {
            due_dates: VariedDueDates::new(lookup),
            now,
        }
    }

    /// 单个学生每个作业的明细
    ///
    /// 只使用属于该学生的提交记录；同一作业有多条记录时以后出现的为准。
    pub fn assignment_details_for(
        &mut self,
        student_id: i64,
        assignments: &[Assignment],
        submissions: &[Submission],
    ) -> Result<Vec<StudentAssignmentItem>> {
        let submissions_by_assignment = index_for_student(student_id, submissions);

        let mut items = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let submission = submissions_by_assignment.get(&assignment.id).copied();
            let (due_at, submitted_at, status) =
                self.classify_one(assignment, student_id, submission)?;
            items.push(StudentAssignmentItem {
                assignment_id: assignment.id,
                title: assignment.title.clone(),
                due_at,
                submitted_at,
                status,
            });
        }
        Ok(items)
    }

    /// 单个学生的按时情况计数
    ///
    /// `total` 计入全部作业；未截止且未提交的作业只计入 `total`。
    pub fn breakdown_for(
        &mut self,
        student_id: i64,
        assignments: &[Assignment],
        submissions: &[Submission],
    ) -> Result<TardinessBreakdown> {
        let submissions_by_assignment = index_for_student(student_id, submissions);

        let mut breakdown = TardinessBreakdown::default();
        for assignment in assignments {
            let submission = submissions_by_assignment.get(&assignment.id).copied();
            let (_, _, status) = self.classify_one(assignment, student_id, submission)?;
            breakdown.record(status);
        }

        debug!(
            "Tardiness breakdown for student {}: total={} on_time={} late={} missing={}",
            student_id, breakdown.total, breakdown.on_time, breakdown.late, breakdown.missing
        );
        Ok(breakdown)
    }

    /// 单个作业的全班按时占比
    ///
    /// 分母为花名册人数（从未提交的学生计入 missing）。花名册为空时返回全 0。
    /// 已截止时 missing 由 1 减去另外两项得出，保证三项之和为 1；
    /// 未截止或无截止时间时，凡有提交时间的都算 on_time，late 与 missing 为 0。
    pub fn course_breakdown(
        &mut self,
        assignment: &Assignment,
        submissions: &[Submission],
        roster_size: usize,
    ) -> Result<TardinessRatios> {
        if roster_size == 0 {
            return Ok(TardinessRatios::default());
        }

        let mut submitted_ats = Vec::new();
        for submission in submissions
            .iter()
            .filter(|s| s.assignment_id == assignment.id)
        {
            let resolver =
                SubmissionDateResolver::new(assignment, submission.user_id, Some(submission));
            if let Some(date) = resolver.resolve(&mut self.due_dates)? {
                submitted_ats.push(date);
            }
        }

        let total = roster_size as f64;
        let ratios = match assignment.due_at {
            Some(due) if due <= self.now => {
                let on_time = submitted_ats.iter().filter(|s| **s <= due).count() as f64 / total;
                let late = submitted_ats.iter().filter(|s| **s > due).count() as f64 / total;
                TardinessRatios {
                    on_time,
                    late,
                    missing: 1.0 - on_time - late,
                }
            }
            _ => TardinessRatios {
                on_time: submitted_ats.len() as f64 / total,
                late: 0.0,
                missing: 0.0,
            },
        };
        Ok(ratios)
    }

    fn classify_one(
        &mut self,
        assignment: &Assignment,
        student_id: i64,
        submission: Option<&Submission>,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>, Tardiness)> {
        let due_at = self.due_dates.due_at_for(assignment, student_id)?;
        let submitted_at = SubmissionDateResolver::new(assignment, student_id, submission)
            .resolve(&mut self.due_dates)?;
        Ok((due_at, submitted_at, classify(due_at, submitted_at, self.now)))
    }
}

fn index_for_student(student_id: i64, submissions: &[Submission]) -> HashMap<i64, &Submission> {
    submissions
        .iter()
        .filter(|s| s.user_id == student_id)
        .map(|s| (s.assignment_id, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::due_dates::{NominalDueDates, OverrideIndex};
    use crate::models::analytics::entities::{
        AssignmentOverride, SubmissionType, SubmissionWorkflowState,
    };
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        utc(2013, 1, 15, 12)
    }

    fn assignment(id: i64, due_at: Option<DateTime<Utc>>) -> Assignment {
        Assignment {
            id,
            course_id: 1,
            title: format!("Assignment {id}"),
            due_at,
            submission_types: vec![SubmissionType::OnlineUpload],
        }
    }

    fn submitted(assignment_id: i64, user_id: i64, at: DateTime<Utc>) -> Submission {
        Submission {
            id: assignment_id * 1000 + user_id,
            assignment_id,
            user_id,
            workflow_state: SubmissionWorkflowState::Submitted,
            score: None,
            submitted_at: Some(at),
            graded_at: None,
        }
    }

    fn unsubmitted(assignment_id: i64, user_id: i64) -> Submission {
        Submission {
            id: assignment_id * 1000 + user_id,
            assignment_id,
            user_id,
            workflow_state: SubmissionWorkflowState::Unsubmitted,
            score: None,
            submitted_at: None,
            graded_at: None,
        }
    }

    #[test]
    fn test_classify_late_submission() {
        let due = utc(2012, 12, 1, 0);
        assert_eq!(
            classify(Some(due), Some(utc(2012, 12, 4, 20)), now()),
            Tardiness::Late
        );
    }

    #[test]
    fn test_classify_on_time_submission() {
        let due = utc(2012, 12, 1, 0);
        assert_eq!(
            classify(Some(due), Some(utc(2012, 11, 30, 23)), now()),
            Tardiness::OnTime
        );
        assert_eq!(classify(Some(due), Some(due), now()), Tardiness::OnTime);
    }

    #[test]
    fn test_classify_missing_and_pending() {
        assert_eq!(
            classify(Some(utc(2012, 12, 1, 0)), None, now()),
            Tardiness::Missing
        );
        assert_eq!(
            classify(Some(utc(2099, 1, 1, 0)), None, now()),
            Tardiness::Pending
        );
        assert_eq!(classify(None, None, now()), Tardiness::Pending);
    }

    #[test]
    fn test_classify_due_exactly_now_is_not_overdue() {
        assert_eq!(classify(Some(now()), None, now()), Tardiness::Pending);
        assert_eq!(
            classify(Some(now()), Some(now() + chrono::Duration::hours(1)), now()),
            Tardiness::OnTime
        );
    }

    #[test]
    fn test_classify_without_due_date_is_on_time() {
        assert_eq!(
            classify(None, Some(utc(2012, 12, 4, 20)), now()),
            Tardiness::OnTime
        );
    }

    #[test]
    fn test_breakdown_scenarios() {
        let assignments = vec![
            assignment(1, Some(utc(2012, 12, 1, 0))),
            assignment(2, Some(utc(2012, 12, 1, 0))),
            assignment(3, Some(utc(2012, 12, 1, 0))),
            assignment(4, Some(utc(2099, 1, 1, 0))),
            assignment(5, None),
        ];
        let submissions = vec![
            submitted(1, 7, utc(2012, 12, 4, 20)),
            submitted(2, 7, utc(2012, 11, 30, 23)),
            unsubmitted(3, 7),
            // 其他学生的记录不影响
            submitted(3, 8, utc(2012, 11, 30, 23)),
        ];

        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let breakdown = aggregator
            .breakdown_for(7, &assignments, &submissions)
            .unwrap();

        assert_eq!(
            breakdown,
            TardinessBreakdown {
                total: 5,
                missing: 1,
                on_time: 1,
                late: 1,
            }
        );
    }

    #[test]
    fn test_breakdown_future_submission_counts_on_time() {
        let assignments = vec![assignment(1, Some(utc(2099, 1, 1, 0))), assignment(2, None)];
        let submissions = vec![
            submitted(1, 7, utc(2013, 1, 10, 0)),
            submitted(2, 7, utc(2013, 1, 10, 0)),
        ];

        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let breakdown = aggregator
            .breakdown_for(7, &assignments, &submissions)
            .unwrap();
        assert_eq!(breakdown.on_time, 2);
        assert_eq!(breakdown.missing, 0);
        assert_eq!(breakdown.late, 0);
        assert_eq!(breakdown.total, 2);
    }

    #[test]
    fn test_breakdown_empty_inputs() {
        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let breakdown = aggregator.breakdown_for(7, &[], &[]).unwrap();
        assert_eq!(breakdown, TardinessBreakdown::default());
    }

    #[test]
    fn test_breakdown_uses_student_override() {
        let a = assignment(1, Some(utc(2012, 12, 1, 0)));
        let overrides = vec![AssignmentOverride {
            id: 1,
            assignment_id: 1,
            student_id: Some(7),
            course_section_id: None,
            due_at: Some(utc(2012, 12, 10, 0)),
        }];
        let index = OverrideIndex::new(std::slice::from_ref(&a), overrides, &[]);
        let submissions = vec![
            submitted(1, 7, utc(2012, 12, 4, 20)),
            submitted(1, 8, utc(2012, 12, 4, 20)),
        ];

        let mut aggregator = TardinessAggregator::new(&index, now());
        let for_7 = aggregator
            .breakdown_for(7, std::slice::from_ref(&a), &submissions)
            .unwrap();
        let for_8 = aggregator
            .breakdown_for(8, std::slice::from_ref(&a), &submissions)
            .unwrap();
        assert_eq!(for_7.on_time, 1);
        assert_eq!(for_8.late, 1);
    }

    #[test]
    fn test_breakdown_propagates_lookup_failure() {
        let index = OverrideIndex::new(&[], vec![], &[]);
        let assignments = vec![assignment(1, Some(utc(2012, 12, 1, 0)))];
        let mut aggregator = TardinessAggregator::new(&index, now());
        let err = aggregator.breakdown_for(7, &assignments, &[]).unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_assignment_details_report_resolved_dates() {
        let assignments = vec![
            assignment(1, Some(utc(2012, 12, 1, 0))),
            assignment(2, Some(utc(2099, 1, 1, 0))),
        ];
        let submissions = vec![submitted(1, 7, utc(2012, 12, 4, 20))];

        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let items = aggregator
            .assignment_details_for(7, &assignments, &submissions)
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].submitted_at, Some(utc(2012, 12, 4, 20)));
        assert_eq!(items[0].status, Tardiness::Late);
        assert_eq!(items[1].submitted_at, None);
        assert_eq!(items[1].status, Tardiness::Pending);
    }

    #[test]
    fn test_course_breakdown_ratios_sum_to_one() {
        let a = assignment(1, Some(utc(2012, 12, 1, 0)));
        let mut submissions = Vec::new();
        for user_id in 1..=6 {
            submissions.push(submitted(1, user_id, utc(2012, 11, 30, 23)));
        }
        for user_id in 7..=8 {
            submissions.push(submitted(1, user_id, utc(2012, 12, 4, 20)));
        }

        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let ratios = aggregator.course_breakdown(&a, &submissions, 10).unwrap();

        assert!((ratios.on_time - 0.6).abs() < 1e-9);
        assert!((ratios.late - 0.2).abs() < 1e-9);
        assert!((ratios.missing - 0.2).abs() < 1e-9);
        assert!((ratios.on_time + ratios.late + ratios.missing - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_course_breakdown_not_yet_due() {
        let a = assignment(1, Some(utc(2099, 1, 1, 0)));
        let submissions = vec![
            submitted(1, 1, utc(2013, 1, 1, 0)),
            unsubmitted(1, 2),
        ];

        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let ratios = aggregator.course_breakdown(&a, &submissions, 4).unwrap();
        assert_eq!(
            ratios,
            TardinessRatios {
                on_time: 0.25,
                late: 0.0,
                missing: 0.0,
            }
        );
    }

    #[test]
    fn test_course_breakdown_due_exactly_now_has_passed() {
        let a = assignment(1, Some(now()));
        let submissions = vec![
            submitted(1, 1, now() - chrono::Duration::hours(1)),
            unsubmitted(1, 2),
        ];

        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let ratios = aggregator.course_breakdown(&a, &submissions, 2).unwrap();
        assert_eq!(
            ratios,
            TardinessRatios {
                on_time: 0.5,
                late: 0.0,
                missing: 0.5,
            }
        );

        // 同一时刻，单个学生视角仍未截止
        let breakdown = aggregator
            .breakdown_for(2, std::slice::from_ref(&a), &submissions)
            .unwrap();
        assert_eq!(breakdown.missing, 0);
        assert_eq!(breakdown.total, 1);
    }

    #[test]
    fn test_course_breakdown_without_due_date_counts_on_time() {
        let a = assignment(1, None);
        let submissions = vec![submitted(1, 1, utc(2013, 1, 1, 0))];

        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let ratios = aggregator.course_breakdown(&a, &submissions, 2).unwrap();
        assert_eq!(ratios.on_time, 0.5);
        assert_eq!(ratios.late, 0.0);
        assert_eq!(ratios.missing, 0.0);
    }

    #[test]
    fn test_course_breakdown_empty_roster() {
        let a = assignment(1, Some(utc(2012, 12, 1, 0)));
        let submissions = vec![submitted(1, 1, utc(2012, 11, 1, 0))];

        let mut aggregator = TardinessAggregator::new(&NominalDueDates, now());
        let ratios = aggregator.course_breakdown(&a, &submissions, 0).unwrap();
        assert_eq!(ratios, TardinessRatios::default());
    }
}
