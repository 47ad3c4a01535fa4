//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体查询数据，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod assignment_overrides;
pub mod assignments;
pub mod courses;
pub mod enrollments;
pub mod page_views_rollups;
pub mod submissions;
pub mod users;

use chrono::{DateTime, Utc};

use crate::errors::{AnalyticsError, Result};

/// 数据库中的秒级时间戳转换为 UTC 时间
///
/// 超出范围的时间戳视为数据错误，不能当作"没有时间"处理。
pub(crate) fn from_timestamp(ts: Option<i64>, column: &str) -> Result<Option<DateTime<Utc>>> {
    ts.map(|ts| {
        DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| {
            AnalyticsError::database_operation(format!("{column} 的时间戳超出范围: {ts}"))
        })
    })
    .transpose()
}
