use serde::Deserialize;
use ts_rs::TS;

/// 学生概览分页参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StudentSummaryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl StudentSummaryParams {
    /// 归一化分页参数：页码至少为 1，每页数量限制在 [1, max_size]
    pub fn normalize(&self, default_size: i64, max_size: i64) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let size = self.size.unwrap_or(default_size).clamp(1, max_size.max(1));
        (page, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults() {
        let params = StudentSummaryParams::default();
        assert_eq!(params.normalize(50, 200), (1, 50));
    }

    #[test]
    fn test_normalize_clamps() {
        let params = StudentSummaryParams {
            page: Some(0),
            size: Some(1000),
        };
        assert_eq!(params.normalize(50, 200), (1, 200));

        let params = StudentSummaryParams {
            page: Some(3),
            size: Some(-4),
        };
        assert_eq!(params.normalize(50, 200), (3, 1));
    }
}
