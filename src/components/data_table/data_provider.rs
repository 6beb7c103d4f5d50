//! DataProvider Trait
//!
//! Abstraction over the rows handed to the DataTable: either the full data
//! set paginated locally, or a single page already cut by the server.

use std::ops::Range;

/// Trait for providing rows to the DataTable
pub trait DataProvider {
    type Row;

    /// Total number of rows across all pages
    fn total_rows(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }

    /// Rows for the page covering `range` of the full data set
    fn page(&self, range: Range<usize>) -> &[Self::Row];
}

/// In-memory provider; the table paginates it
pub struct VecDataProvider<R> {
    rows: Vec<R>,
}

impl<R> VecDataProvider<R> {
    /// Create a new VecDataProvider
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }
}

impl<R> DataProvider for VecDataProvider<R> {
    type Row = R;

    fn total_rows(&self) -> usize {
        self.rows.len()
    }

    fn page(&self, range: Range<usize>) -> &[R] {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        &self.rows[start..end]
    }
}

/// Server-paginated provider: holds only the current page
pub struct PagedDataProvider<R> {
    rows: Vec<R>,
    total_rows: usize,
}

impl<R> PagedDataProvider<R> {
    pub fn new(rows: Vec<R>, total_rows: usize) -> Self {
        Self { rows, total_rows }
    }
}

impl<R> DataProvider for PagedDataProvider<R> {
    type Row = R;

    fn total_rows(&self) -> usize {
        self.total_rows.max(self.rows.len())
    }

    fn page(&self, range: Range<usize>) -> &[R] {
        let len = range.len().min(self.rows.len());
        &self.rows[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_provider_page_is_bounded() {
        let provider = VecDataProvider::new((0..7).collect::<Vec<_>>());
        assert_eq!(provider.page(5..10), &[5, 6]);
        assert!(provider.page(9..12).is_empty());
    }

    #[test]
    fn test_paged_provider_reports_server_total() {
        let provider = PagedDataProvider::new(vec!["a", "b"], 42);
        assert_eq!(provider.total_rows(), 42);
        assert_eq!(provider.page(10..20), &["a", "b"]);
    }
}
