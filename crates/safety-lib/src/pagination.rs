//! One-indexed page arithmetic for list endpoints.

use serde::Serialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// A validated page request. `page` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u32,
    per_page: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Page {
    /// Build a page request. Both values are raised to at least 1; there is
    /// no upper bound on the page size.
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            per_page: per_page.clamp(1, u32::MAX as i64) as u32,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// `ceil(total / per_page)`.
    pub fn total_pages(&self, total_count: i64) -> i64 {
        let per_page = self.per_page as i64;
        (total_count.max(0) + per_page - 1) / per_page
    }

    /// The metadata block returned alongside a page of rows.
    pub fn summary(&self, total_count: i64) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
            total_count,
            total_pages: self.total_pages(total_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_count: i64,
    pub total_pages: i64,
}
