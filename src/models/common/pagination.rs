use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页响应信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if page_size > 0 {
            let total = total.max(0);
            total / page_size + i64::from(total % page_size != 0)
        } else {
            0
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }

    /// 当前页在完整列表中的切片范围
    ///
    /// 超出末尾的页码得到空范围，页码很大时也不会溢出。
    pub fn slice_range(&self) -> std::ops::Range<usize> {
        let total = self.total.max(0);
        let page_size = self.page_size.max(0);
        let start = (self.page.max(1) - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        start as usize..end as usize
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(PaginationInfo::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationInfo::new(1, 10, 10).total_pages, 1);
        assert_eq!(PaginationInfo::new(1, 10, 11).total_pages, 2);
    }

    #[test]
    fn test_slice_range_clamps_to_total() {
        assert_eq!(PaginationInfo::new(1, 3, 7).slice_range(), 0..3);
        assert_eq!(PaginationInfo::new(3, 3, 7).slice_range(), 6..7);
        assert_eq!(PaginationInfo::new(5, 3, 7).slice_range(), 7..7);
    }

    #[test]
    fn test_slice_range_huge_page() {
        assert_eq!(PaginationInfo::new(i64::MAX, 50, 3).slice_range(), 3..3);
        assert_eq!(PaginationInfo::new(i64::MAX, i64::MAX, 3).slice_range(), 3..3);
        assert_eq!(PaginationInfo::new(2, i64::MAX, 3).slice_range(), 3..3);
    }

    #[test]
    fn test_total_pages_huge_total() {
        assert_eq!(PaginationInfo::new(1, 50, i64::MAX).total_pages, i64::MAX / 50 + 1);
    }
}
