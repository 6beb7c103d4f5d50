//! Pagination State
//!
//! Page index and size owned by the DataTable, plus the footer summary.
//! Pinned rows never enter this math.

use std::ops::Range;

use serde::Serialize;

/// Footer summary: `start–end of total` and navigation availability
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageFooter {
    /// 1-based index of the first row on the page (0 when there are no rows)
    pub start: usize,
    /// 1-based index of the last row on the page
    pub end: usize,
    pub total: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

impl PageFooter {
    pub fn summary(&self) -> String {
        format!("{}–{} of {}", self.start, self.end, self.total)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
    total_rows: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            total_rows: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Number of pages; never less than one
    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.page_size).max(1)
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// Returns false when already on the last page
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Returns false when already on the first page
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Jump to a page, clamped to the last valid page
    pub fn go_to(&mut self, index: usize) -> bool {
        let before = self.page_index;
        self.page_index = index;
        self.clamp();
        before != self.page_index
    }

    pub fn reset(&mut self) {
        self.page_index = 0;
    }

    /// Keeps the page index, clamped to the new page count
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.clamp();
    }

    /// Record the current row count and clamp the page index
    pub fn sync_total(&mut self, total_rows: usize) {
        if self.total_rows != total_rows {
            self.total_rows = total_rows;
            self.clamp();
        }
    }

    fn clamp(&mut self) {
        self.page_index = self.page_index.min(self.page_count().saturating_sub(1));
    }

    /// Row range of the current page within the full data set
    pub fn range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.total_rows);
        let end = (start + self.page_size).min(self.total_rows);
        start..end
    }

    pub fn footer(&self) -> PageFooter {
        let range = self.range();
        PageFooter {
            start: if range.is_empty() { 0 } else { range.start + 1 },
            end: range.end,
            total: self.total_rows,
            page_index: self.page_index,
            page_count: self.page_count(),
            page_size: self.page_size,
            can_previous: self.can_previous(),
            can_next: self.can_next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_bounds() {
        let mut pagination = Pagination::new(10);
        pagination.sync_total(25);
        assert_eq!(pagination.page_count(), 3);
        assert!(!pagination.previous());
        assert!(pagination.next());
        assert!(pagination.next());
        assert!(!pagination.next());
        assert_eq!(pagination.range(), 20..25);
        assert_eq!(pagination.footer().summary(), "21–25 of 25");
    }

    #[test]
    fn test_page_size_change_clamps() {
        let mut pagination = Pagination::new(10);
        pagination.sync_total(95);
        pagination.go_to(9);
        assert_eq!(pagination.page_index(), 9);

        pagination.set_page_size(50);
        assert_eq!(pagination.page_index(), 1);
        assert_eq!(pagination.range(), 50..95);
    }

    #[test]
    fn test_data_shrink_clamps() {
        let mut pagination = Pagination::new(10);
        pagination.sync_total(40);
        pagination.go_to(3);
        pagination.sync_total(12);
        assert_eq!(pagination.page_index(), 1);

        pagination.sync_total(0);
        assert_eq!(pagination.page_index(), 0);
        assert_eq!(pagination.footer().start, 0);
        assert_eq!(pagination.footer().end, 0);
    }
}
