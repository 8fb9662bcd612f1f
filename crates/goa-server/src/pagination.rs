//! Pagination arithmetic shared across route helpers
//!
//! Translates a known result size into a page count, bounds-checks the
//! requested page, and produces either an in-memory slice range or a SQL
//! offset. Result sets larger than `page_size * MAX_NUM_PAGES` are rejected
//! outright rather than silently truncated.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::AppError;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// Hard ceiling on the number of pages a single query may span.
pub const MAX_NUM_PAGES: usize = 10;

/// Pagination state for one request
///
/// Constructed only after the total result size is known; construction
/// performs all bounds checks, so a `Pagination` value is always internally
/// consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total_num_records: usize,
    total_num_pages: usize,
}

impl Pagination {
    /// Create pagination state with the default page size
    pub fn new(page: usize, total_num_records: usize) -> Result<Self, AppError> {
        Self::with_page_size(page, total_num_records, DEFAULT_PAGE_SIZE)
    }

    /// Create pagination state with an explicit page size
    ///
    /// # Errors
    ///
    /// - `page` is 0 (pages are 1-based)
    /// - `total_num_records` exceeds `page_size * MAX_NUM_PAGES`
    /// - `page` is beyond the last page
    pub fn with_page_size(
        page: usize,
        total_num_records: usize,
        page_size: usize,
    ) -> Result<Self, AppError> {
        if page_size == 0 {
            return Err(AppError::Internal("page size must be non-zero".to_string()));
        }
        if page < 1 {
            return Err(AppError::Validation(
                "page numbers are 1-based; page 0 does not exist".to_string(),
            ));
        }

        let max_records = page_size * MAX_NUM_PAGES;
        if total_num_records > max_records {
            return Err(AppError::Validation(format!(
                "result size ({}) exceeds the maximum of {} records; \
                 please narrow your query",
                total_num_records, max_records
            )));
        }

        let total_num_pages = total_num_records.div_ceil(page_size).max(1);
        if page > total_num_pages {
            return Err(AppError::Validation(format!(
                "page {} does not exist; this response has a maximum of {} pages",
                page, total_num_pages
            )));
        }

        Ok(Self {
            page,
            page_size,
            total_num_records,
            total_num_pages,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_num_pages(&self) -> usize {
        self.total_num_pages
    }

    pub fn total_num_records(&self) -> usize {
        self.total_num_records
    }

    /// SQL offset for database-side pagination; `None` on the first page
    pub fn offset(&self) -> Option<usize> {
        if self.page == 1 {
            None
        } else {
            Some((self.page - 1) * self.page_size)
        }
    }

    /// `[start, end)` range over an in-memory result list, end clamped
    pub fn slice(&self) -> Range<usize> {
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.total_num_records);
        start..end
    }

    /// Response metadata once the page has been materialized
    pub fn meta(&self, paged_num_records: usize) -> PaginationMeta {
        PaginationMeta {
            page: self.page,
            total_num_pages: self.total_num_pages,
            paged_num_records,
            total_num_records: self.total_num_records,
        }
    }
}

/// Pagination metadata echoed in paginated responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: usize,
    pub total_num_pages: usize,
    pub paged_num_records: usize,
    pub total_num_records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_boundary() {
        // page_size * MAX_NUM_PAGES = 50,000
        let ok = Pagination::new(1, 50_000).unwrap();
        assert_eq!(ok.total_num_pages(), 10);

        let err = Pagination::new(1, 50_001).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("narrow"));
    }

    #[test]
    fn test_total_pages_is_deterministic() {
        let a = Pagination::new(2, 12_000).unwrap();
        let b = Pagination::new(2, 12_000).unwrap();
        assert_eq!(a.total_num_pages(), b.total_num_pages());
        assert_eq!(a, b);
    }

    #[test]
    fn test_small_result_is_one_page() {
        let p = Pagination::new(1, 3).unwrap();
        assert_eq!(p.total_num_pages(), 1);
        assert_eq!(p.slice(), 0..3);
    }

    #[test]
    fn test_empty_result_is_one_page() {
        let p = Pagination::new(1, 0).unwrap();
        assert_eq!(p.total_num_pages(), 1);
        assert_eq!(p.slice(), 0..0);
    }

    #[test]
    fn test_slice_ranges() {
        assert_eq!(Pagination::new(1, 12_000).unwrap().slice(), 0..5000);
        assert_eq!(Pagination::new(2, 12_000).unwrap().slice(), 5000..10_000);
        assert_eq!(Pagination::new(3, 12_000).unwrap().slice(), 10_000..12_000);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(1, 12_000).unwrap().offset(), None);
        assert_eq!(Pagination::new(2, 12_000).unwrap().offset(), Some(5000));
        assert_eq!(Pagination::new(3, 12_000).unwrap().offset(), Some(10_000));
    }

    #[test]
    fn test_page_out_of_range() {
        let err = Pagination::new(2, 3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("page 2"));
        assert!(msg.contains("maximum of 1 pages"));
    }

    #[test]
    fn test_page_zero_rejected() {
        let err = Pagination::new(0, 100).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_custom_page_size() {
        let p = Pagination::with_page_size(3, 25, 10).unwrap();
        assert_eq!(p.total_num_pages(), 3);
        assert_eq!(p.slice(), 20..25);
        assert_eq!(p.meta(5).paged_num_records, 5);
    }
}
