//! 课程统计核心计算
//!
//! 纯计算，不做 IO：输入为已查询好的花名册、作业、提交记录与访问汇总。

pub mod due_dates;
pub mod participation;
pub mod submission_date;
pub mod tardiness;

pub use due_dates::{DueDateLookup, NominalDueDates, OverrideIndex, VariedDueDates};
pub use participation::{
    CourseMaxima, PageViewCounts, course_maxima, enrollment_window, page_views_by_student,
    participation_by_date, roster_student_ids,
};
pub use submission_date::{SubmissionDateResolver, SubmissionDateRule};
pub use tardiness::{TardinessAggregator, classify};
