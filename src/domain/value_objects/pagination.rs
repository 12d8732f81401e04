use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Number of page links shown on each side of the current page.
pub const PAGE_WINDOW_RADIUS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
    pub page_window: Vec<i64>,
}

impl PageMeta {
    /// Pages past the end are clamped to the last page, so `1 <= page <= max(total_pages, 1)`.
    pub fn new(total: i64, requested_page: i64, page_size: i64) -> Self {
        let total_pages = total_pages(total, page_size);
        let page = requested_page.clamp(1, total_pages.max(1));

        Self {
            page,
            page_size,
            total,
            total_pages,
            page_window: page_window(page, total_pages),
        }
    }

    pub fn offset(&self) -> i64 {
        offset_for(self.page, self.page_size)
    }
}

pub fn offset_for(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}

pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

pub fn page_window(current_page: i64, total_pages: i64) -> Vec<i64> {
    let start = (current_page - PAGE_WINDOW_RADIUS).max(1);
    let end = (current_page + PAGE_WINDOW_RADIUS).min(total_pages);
    (start..=end).collect()
}
