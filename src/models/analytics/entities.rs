use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct Course {
    pub id: i64,
    pub name: String,
    // 课程开始时间
    pub start_at: Option<DateTime<Utc>>,
    // 课程结课时间
    pub conclude_at: Option<DateTime<Utc>>,
}

// 选课状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub enum EnrollmentState {
    Invited,   // 已邀请
    Active,    // 在读
    Completed, // 已结课
    Inactive,  // 停用
    Rejected,  // 已拒绝
    Deleted,   // 已删除
}

impl EnrollmentState {
    pub const INVITED: &'static str = "invited";
    pub const ACTIVE: &'static str = "active";
    pub const COMPLETED: &'static str = "completed";
    pub const INACTIVE: &'static str = "inactive";
    pub const REJECTED: &'static str = "rejected";
    pub const DELETED: &'static str = "deleted";

    /// 计入花名册的选课状态
    pub fn roster_states() -> &'static [EnrollmentState] {
        &[EnrollmentState::Active, EnrollmentState::Completed]
    }
}

impl std::fmt::Display for EnrollmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EnrollmentState::Invited => Self::INVITED,
            EnrollmentState::Active => Self::ACTIVE,
            EnrollmentState::Completed => Self::COMPLETED,
            EnrollmentState::Inactive => Self::INACTIVE,
            EnrollmentState::Rejected => Self::REJECTED,
            EnrollmentState::Deleted => Self::DELETED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for EnrollmentState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::INVITED => Ok(EnrollmentState::Invited),
            Self::ACTIVE => Ok(EnrollmentState::Active),
            Self::COMPLETED => Ok(EnrollmentState::Completed),
            Self::INACTIVE => Ok(EnrollmentState::Inactive),
            Self::REJECTED => Ok(EnrollmentState::Rejected),
            Self::DELETED => Ok(EnrollmentState::Deleted),
            _ => Err(format!("Invalid enrollment state: {s}")),
        }
    }
}

// 学生选课记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    // 所在教学班（用于按班级覆盖截止时间）
    pub course_section_id: Option<i64>,
    pub workflow_state: EnrollmentState,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    pub fn is_roster_member(&self) -> bool {
        EnrollmentState::roster_states().contains(&self.workflow_state)
    }

    /// 有效开始时间：选课自身的开始时间，否则取课程开始时间
    pub fn effective_start_at(&self, course: &Course) -> Option<DateTime<Utc>> {
        self.start_at.or(course.start_at)
    }

    /// 有效结束时间：选课自身的结束时间，否则取课程结课时间
    pub fn effective_end_at(&self, course: &Course) -> Option<DateTime<Utc>> {
        self.end_at.or(course.conclude_at)
    }
}

// 学生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub sortable_name: String,
}

// 作业提交方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    OnlineTextEntry,
    OnlineUrl,
    OnlineUpload,
    MediaRecording,
    OnlineQuiz,
    DiscussionTopic,
    ExternalTool,
    OnPaper,
    None,
    NotGraded,
}

impl SubmissionType {
    /// 学生能否在线提交作品
    pub fn is_online(self) -> bool {
        matches!(
            self,
            SubmissionType::OnlineTextEntry
                | SubmissionType::OnlineUrl
                | SubmissionType::OnlineUpload
                | SubmissionType::MediaRecording
                | SubmissionType::OnlineQuiz
                | SubmissionType::DiscussionTopic
                | SubmissionType::ExternalTool
        )
    }
}

impl std::fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionType::OnlineTextEntry => "online_text_entry",
            SubmissionType::OnlineUrl => "online_url",
            SubmissionType::OnlineUpload => "online_upload",
            SubmissionType::MediaRecording => "media_recording",
            SubmissionType::OnlineQuiz => "online_quiz",
            SubmissionType::DiscussionTopic => "discussion_topic",
            SubmissionType::ExternalTool => "external_tool",
            SubmissionType::OnPaper => "on_paper",
            SubmissionType::None => "none",
            SubmissionType::NotGraded => "not_graded",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online_text_entry" => Ok(SubmissionType::OnlineTextEntry),
            "online_url" => Ok(SubmissionType::OnlineUrl),
            "online_upload" => Ok(SubmissionType::OnlineUpload),
            "media_recording" => Ok(SubmissionType::MediaRecording),
            "online_quiz" => Ok(SubmissionType::OnlineQuiz),
            "discussion_topic" => Ok(SubmissionType::DiscussionTopic),
            "external_tool" => Ok(SubmissionType::ExternalTool),
            "on_paper" => Ok(SubmissionType::OnPaper),
            "none" => Ok(SubmissionType::None),
            "not_graded" => Ok(SubmissionType::NotGraded),
            _ => Err(format!("Invalid submission type: {s}")),
        }
    }
}

// 作业
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    // 课程统一截止时间（学生个人截止时间见 AssignmentOverride）
    pub due_at: Option<DateTime<Utc>>,
    pub submission_types: Vec<SubmissionType>,
}

impl Assignment {
    /// 是否接受学生在线提交的作品
    pub fn is_submittable_type(&self) -> bool {
        self.submission_types.iter().any(|t| t.is_online())
    }
}

/// 截止时间严格早于当前时间即视为过期；没有截止时间的作业永不过期
pub fn is_overdue(due_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    due_at.is_some_and(|due| due < now)
}

// 截止时间覆盖（针对单个学生或整个教学班）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentOverride {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: Option<i64>,
    pub course_section_id: Option<i64>,
    // None 表示该覆盖取消截止时间
    pub due_at: Option<DateTime<Utc>>,
}

// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionWorkflowState {
    Unsubmitted,
    Submitted,
    PendingReview,
    Graded,
}

impl std::fmt::Display for SubmissionWorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionWorkflowState::Unsubmitted => "unsubmitted",
            SubmissionWorkflowState::Submitted => "submitted",
            SubmissionWorkflowState::PendingReview => "pending_review",
            SubmissionWorkflowState::Graded => "graded",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubmissionWorkflowState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unsubmitted" => Ok(SubmissionWorkflowState::Unsubmitted),
            "submitted" => Ok(SubmissionWorkflowState::Submitted),
            "pending_review" => Ok(SubmissionWorkflowState::PendingReview),
            "graded" => Ok(SubmissionWorkflowState::Graded),
            _ => Err(format!("Invalid submission workflow state: {s}")),
        }
    }
}

// 学生提交记录，每个 (作业, 学生) 至多一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub workflow_state: SubmissionWorkflowState,
    pub score: Option<f64>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// 已评分：状态为 graded 且存在分数
    pub fn is_graded(&self) -> bool {
        self.workflow_state == SubmissionWorkflowState::Graded && self.score.is_some()
    }
}

// 页面访问按日汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageViewsRollup {
    pub course_id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub views: i64,
    pub participations: i64,
}
