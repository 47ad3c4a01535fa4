//! 服务层测试用的内存存储

use actix_web::HttpResponse;
use actix_web::test::TestRequest;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::AnalyticsService;
use crate::config::AnalyticsConfig;
use crate::errors::{AnalyticsError, Result};
use crate::models::analytics::entities::{
    Assignment, AssignmentOverride, Course, Enrollment, EnrollmentState, PageViewsRollup, Student,
    Submission, SubmissionType, SubmissionWorkflowState,
};
use crate::storage::Storage;

pub(crate) fn due(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[derive(Default)]
pub(crate) struct MemoryStorage {
    pub courses: Vec<Course>,
    pub students: Vec<Student>,
    pub enrollments: Vec<Enrollment>,
    pub assignments: Vec<Assignment>,
    pub overrides: Vec<AssignmentOverride>,
    pub submissions: Vec<Submission>,
    pub rollups: Vec<PageViewsRollup>,
    pub fail_overrides: bool,
    pub rollup_queries: AtomicUsize,
}

impl MemoryStorage {
    pub fn empty_course(course_id: i64) -> Self {
        Self {
            courses: vec![Course {
                id: course_id,
                name: "Empty".to_string(),
                start_at: None,
                conclude_at: None,
            }],
            ..Default::default()
        }
    }

    /// 课程 1，三名在册学生 + 一名仅被邀请的学生
    ///
    /// - 作业 10：在线提交，统一截止 2012-12-01，教学班 200 延期到 2012-12-10
    /// - 作业 11：线下作业，统一截止 2012-12-01
    /// - 作业 12：在线提交，截止 2099-01-01
    pub fn biology() -> Self {
        let student = |id: i64, name: &str, sortable: &str| Student {
            id,
            name: name.to_string(),
            sortable_name: sortable.to_string(),
        };
        let enrollment = |user_id: i64, section: Option<i64>, state: EnrollmentState| Enrollment {
            id: user_id,
            course_id: 1,
            user_id,
            course_section_id: section,
            workflow_state: state,
            start_at: None,
            end_at: None,
        };
        let assignment = |id: i64, title: &str, due_at, kind: SubmissionType| Assignment {
            id,
            course_id: 1,
            title: title.to_string(),
            due_at,
            submission_types: vec![kind],
        };
        let submission = |assignment_id: i64,
                          user_id: i64,
                          workflow_state: SubmissionWorkflowState,
                          score: Option<f64>,
                          submitted_at: Option<DateTime<Utc>>,
                          graded_at: Option<DateTime<Utc>>| Submission {
            id: assignment_id * 100 + user_id,
            assignment_id,
            user_id,
            workflow_state,
            score,
            submitted_at,
            graded_at,
        };
        let rollup = |user_id: i64, day: u32, views: i64, participations: i64| PageViewsRollup {
            course_id: 1,
            user_id,
            date: NaiveDate::from_ymd_opt(2013, 1, day).unwrap(),
            views,
            participations,
        };

        Self {
            courses: vec![Course {
                id: 1,
                name: "Biology 101".to_string(),
                start_at: Some(due(2012, 9, 1)),
                conclude_at: None,
            }],
            students: vec![
                student(3, "Carol Clark", "Clark, Carol"),
                student(1, "Alice Adams", "Adams, Alice"),
                student(4, "Dave Davis", "Davis, Dave"),
                student(2, "Bob Brown", "Brown, Bob"),
            ],
            enrollments: vec![
                enrollment(1, Some(100), EnrollmentState::Active),
                enrollment(2, Some(200), EnrollmentState::Active),
                enrollment(3, None, EnrollmentState::Completed),
                enrollment(4, Some(100), EnrollmentState::Invited),
            ],
            assignments: vec![
                assignment(10, "Essay", Some(due(2012, 12, 1)), SubmissionType::OnlineUpload),
                assignment(11, "Lab", Some(due(2012, 12, 1)), SubmissionType::OnPaper),
                assignment(12, "Final", Some(due(2099, 1, 1)), SubmissionType::OnlineUpload),
            ],
            overrides: vec![AssignmentOverride {
                id: 1,
                assignment_id: 10,
                student_id: None,
                course_section_id: Some(200),
                due_at: Some(due(2012, 12, 10)),
            }],
            submissions: vec![
                submission(
                    10,
                    1,
                    SubmissionWorkflowState::Submitted,
                    None,
                    Some(at(2012, 11, 30, 23)),
                    None,
                ),
                submission(
                    10,
                    2,
                    SubmissionWorkflowState::Submitted,
                    None,
                    Some(at(2012, 12, 4, 20)),
                    None,
                ),
                submission(
                    11,
                    1,
                    SubmissionWorkflowState::Graded,
                    Some(9.0),
                    None,
                    Some(at(2012, 12, 20, 9)),
                ),
                submission(11, 2, SubmissionWorkflowState::Unsubmitted, None, None, None),
                submission(
                    12,
                    3,
                    SubmissionWorkflowState::Submitted,
                    None,
                    Some(at(2013, 1, 1, 0)),
                    None,
                ),
            ],
            rollups: vec![
                rollup(1, 1, 10, 2),
                rollup(2, 1, 30, 1),
                rollup(1, 2, 5, 4),
                rollup(4, 2, 2, 0),
            ],
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        Ok(self.courses.iter().find(|c| c.id == course_id).cloned())
    }

    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id && e.is_roster_member())
            .cloned()
            .collect())
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<Student>> {
        let roster = crate::analytics::roster_student_ids(
            &self.list_course_enrollments(course_id).await?,
        );
        let mut students: Vec<Student> = self
            .students
            .iter()
            .filter(|s| roster.contains(&s.id))
            .cloned()
            .collect();
        students.sort_by(|a, b| {
            a.sortable_name
                .cmp(&b.sortable_name)
                .then(a.id.cmp(&b.id))
        });
        Ok(students)
    }

    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn list_assignment_overrides(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<AssignmentOverride>> {
        if self.fail_overrides {
            return Err(AnalyticsError::upstream_unavailable("override service down"));
        }
        Ok(self
            .overrides
            .iter()
            .filter(|o| assignment_ids.contains(&o.assignment_id))
            .cloned()
            .collect())
    }

    async fn list_submissions(
        &self,
        assignment_ids: &[i64],
        student_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        Ok(self
            .submissions
            .iter()
            .filter(|s| {
                assignment_ids.contains(&s.assignment_id) && student_ids.contains(&s.user_id)
            })
            .cloned()
            .collect())
    }

    async fn list_page_views_rollups(&self, course_id: i64) -> Result<Vec<PageViewsRollup>> {
        self.rollup_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rollups
            .iter()
            .filter(|r| r.course_id == course_id)
            .cloned()
            .collect())
    }
}

pub(crate) fn service_for(storage: MemoryStorage) -> AnalyticsService {
    AnalyticsService::with_backends(Arc::new(storage), None, AnalyticsConfig::default())
}

pub(crate) fn test_request() -> actix_web::HttpRequest {
    TestRequest::default().to_http_request()
}

/// 取出响应体中的 `data` 字段
pub(crate) async fn read_data<T: DeserializeOwned>(resp: HttpResponse) -> T {
    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    serde_json::from_value(body["data"].clone()).unwrap()
}
