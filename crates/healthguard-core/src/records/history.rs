use serde::Serialize;

use super::DailyRecord;

/// One page of history, most recent records first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPage {
    pub records: Vec<DailyRecord>,
    /// Zero-based page index actually shown.
    pub page: usize,
    pub total_pages: usize,
}

impl HistoryPage {
    /// Slice `records` (already sorted) into page `page` of `page_size`.
    ///
    /// An out-of-range page is clamped to the last page. Empty history is a
    /// single empty page.
    pub fn paginate(records: &[DailyRecord], page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = records.len().div_ceil(page_size).max(1);
        let page = page.min(total_pages - 1);
        let start = page * page_size;
        let end = (start + page_size).min(records.len());

        Self {
            records: records.get(start..end).unwrap_or_default().to_vec(),
            page,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}
