//! 花名册、选课时间窗口与页面访问统计

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::analytics::entities::{Course, Enrollment, PageViewsRollup};
use crate::models::analytics::responses::ParticipationPoint;

/// 单个学生在课程内的累计访问与参与次数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageViewCounts {
    pub page_views: i64,
    pub participations: i64,
}

/// 全课程范围内的最大值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseMaxima {
    pub max_page_views: i64,
    pub max_participations: i64,
}

/// 花名册：active / completed 选课的去重学生 ID，升序
pub fn roster_student_ids(enrollments: &[Enrollment]) -> Vec<i64> {
    enrollments
        .iter()
        .filter(|e| e.is_roster_member())
        .map(|e| e.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 课程统计的时间窗口
///
/// 开始取所有选课有效开始时间的最小值，结束取有效结束时间的最大值；
/// 都没有时使用 `now`，避免前端拿到空值。
pub fn enrollment_window(
    course: &Course,
    enrollments: &[Enrollment],
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let members = enrollments.iter().filter(|e| e.is_roster_member());
    let start = members
        .clone()
        .filter_map(|e| e.effective_start_at(course))
        .min()
        .unwrap_or(now);
    let end = members
        .filter_map(|e| e.effective_end_at(course))
        .max()
        .unwrap_or(now);
    (start, end)
}

/// 按日期汇总全体学生的访问与参与次数，按日期升序
pub fn participation_by_date(rollups: &[PageViewsRollup]) -> Vec<ParticipationPoint> {
    let mut by_date: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for rollup in rollups {
        let entry = by_date.entry(rollup.date).or_default();
        entry.0 += rollup.views;
        entry.1 += rollup.participations;
    }

    by_date
        .into_iter()
        .map(|(date, (views, participations))| ParticipationPoint {
            date,
            views,
            participations,
        })
        .collect()
}

/// 按学生汇总累计访问与参与次数
pub fn page_views_by_student(rollups: &[PageViewsRollup]) -> HashMap<i64, PageViewCounts> {
    let mut counts: HashMap<i64, PageViewCounts> = HashMap::new();
    for rollup in rollups {
        let entry = counts.entry(rollup.user_id).or_default();
        entry.page_views += rollup.views;
        entry.participations += rollup.participations;
    }
    counts
}

/// 计算给定学生集合上的最大值，没有记录的学生按 0 计
///
/// 必须传入完整花名册而不是当前页，否则最大值会变成页内最大值。
pub fn course_maxima(counts: &HashMap<i64, PageViewCounts>, roster: &[i64]) -> CourseMaxima {
    roster
        .iter()
        .filter_map(|id| counts.get(id))
        .fold(CourseMaxima::default(), |acc, c| CourseMaxima {
            max_page_views: acc.max_page_views.max(c.page_views),
            max_participations: acc.max_participations.max(c.participations),
        })
}
