use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::PaginatedResponse;

/// 课程统计概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct CourseSummaryResponse {
    pub course_id: i64,
    // 是否存在有效选课（没有则前端不展示统计）
    pub available: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub student_count: i64,
}

/// 按日参与度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ParticipationPoint {
    pub date: NaiveDate,
    pub views: i64,
    pub participations: i64,
}

/// 课程参与度趋势
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ParticipationResponse {
    pub course_id: i64,
    pub items: Vec<ParticipationPoint>,
}

/// 单个 (作业, 学生) 的按时情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub enum Tardiness {
    OnTime,  // 按时提交
    Late,    // 迟交
    Missing, // 已截止且未提交
    Pending, // 未截止且未提交
}

/// 单个学生的按时情况计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct TardinessBreakdown {
    pub total: i64,
    pub missing: i64,
    pub on_time: i64,
    pub late: i64,
}

impl TardinessBreakdown {
    pub fn record(&mut self, tardiness: Tardiness) {
        self.total += 1;
        match tardiness {
            Tardiness::OnTime => self.on_time += 1,
            Tardiness::Late => self.late += 1,
            Tardiness::Missing => self.missing += 1,
            Tardiness::Pending => {}
        }
    }
}

/// 全班按时情况占比（分母为花名册人数）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct TardinessRatios {
    pub on_time: f64,
    pub late: f64,
    pub missing: f64,
}

/// 作业维度的全班按时情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AssignmentTardinessItem {
    pub assignment_id: i64,
    pub title: String,
    pub due_at: Option<DateTime<Utc>>,
    pub tardiness_breakdown: TardinessRatios,
}

/// 课程全部作业的按时情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AssignmentTardinessResponse {
    pub course_id: i64,
    pub student_count: i64,
    pub items: Vec<AssignmentTardinessItem>,
}

/// 学生概览行，附带全课程范围内的最大值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StudentSummary {
    pub id: i64,
    pub name: String,
    pub page_views: i64,
    pub max_page_views: i64,
    pub participations: i64,
    pub max_participations: i64,
    pub tardiness_breakdown: TardinessBreakdown,
}

/// 学生概览分页响应
pub type StudentSummaryListResponse = PaginatedResponse<StudentSummary>;

/// 单个学生的按时情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StudentTardinessResponse {
    pub course_id: i64,
    pub student_id: i64,
    pub tardiness_breakdown: TardinessBreakdown,
}

/// 单个学生单个作业的提交明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StudentAssignmentItem {
    pub assignment_id: i64,
    pub title: String,
    // 该学生适用的截止时间
    pub due_at: Option<DateTime<Utc>>,
    // 推断出的提交时间
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: Tardiness,
}

/// 单个学生的作业明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StudentAssignmentsResponse {
    pub course_id: i64,
    pub student_id: i64,
    pub items: Vec<StudentAssignmentItem>,
}
