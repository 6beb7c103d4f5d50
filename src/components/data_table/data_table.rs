//! DataTable Engine
//!
//! Derives a read-only view of caller data: header cells with sort and
//! filter affordances, pinned rows, the current page of body rows and the
//! footer. Sort and filter state belong to the caller and are passed in;
//! change requests come back as [`TableEvent`]s. Only the page index, page
//! size and the selection bar are owned here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::column::{CellValue, Column, ColumnSet, RowId};
use super::data_provider::DataProvider;
use super::filter::{ColumnFilterValue, FilterOption, FilterOptions, FilterState};
use super::pagination::{PageFooter, Pagination};
use super::selection::Selection;
use super::sort::{SortDirection, SortState};
use crate::settings::Settings;

/// Data-fetch status reported by the caller
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TableStatus {
    #[default]
    Ready,
    Loading,
    Error {
        message: String,
        can_retry: bool,
    },
}

/// Empty-state content (icon + message + optional call to action)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub icon: Option<String>,
    pub message: String,
    pub action_label: Option<String>,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            icon: None,
            message: "No data".to_string(),
            action_label: None,
        }
    }
}

/// Change requests emitted toward the caller
#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent {
    SortChanged(SortState),
    FilterChanged(FilterState),
    PageChanged { page_index: usize },
    PageSizeChanged { page_size: usize },
    SelectionChanged { selected: usize },
    Retry,
}

/// One header cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub id: String,
    pub label: String,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
    pub filterable: bool,
    /// Active-filter dot
    pub filter_active: bool,
    pub class_name: Option<String>,
}

/// A row ready for the renderer
#[derive(Debug)]
pub struct RenderedRow<'a, R> {
    pub id: RowId,
    pub row: &'a R,
    pub cells: Vec<CellValue>,
    pub pinned: bool,
    pub selected: bool,
}

/// Selection bar summary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionSummary {
    pub selected: usize,
    pub total: usize,
    pub all_selected: bool,
}

/// Exactly one body state is produced per view
#[derive(Debug)]
pub enum TableBody<'a, R> {
    Skeleton {
        rows: usize,
    },
    Error {
        message: String,
        can_retry: bool,
    },
    Empty(EmptyState),
    Rows {
        pinned: Vec<RenderedRow<'a, R>>,
        rows: Vec<RenderedRow<'a, R>>,
        footer: PageFooter,
        selection: Option<SelectionSummary>,
    },
}

#[derive(Debug)]
pub struct TableView<'a, R> {
    pub headers: Vec<HeaderCell>,
    pub body: TableBody<'a, R>,
}

impl<R> TableView<'_, R> {
    /// Pinned plus body rows; zero for non-row states
    pub fn rendered_row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows { pinned, rows, .. } => pinned.len() + rows.len(),
            _ => 0,
        }
    }
}

type RowIdFn<R> = Box<dyn Fn(&R) -> RowId + Send + Sync>;

/// DataTable engine
pub struct DataTable<R> {
    columns: ColumnSet<R>,
    row_id: RowIdFn<R>,
    pagination: Pagination,
    page_size_options: Vec<usize>,
    selection: Option<Selection>,
    empty_state: EmptyState,
}

impl<R> DataTable<R> {
    /// Create a new data table
    pub fn new(
        columns: ColumnSet<R>,
        row_id: impl Fn(&R) -> RowId + Send + Sync + 'static,
        settings: &Settings,
    ) -> Self {
        Self {
            columns,
            row_id: Box::new(row_id),
            pagination: Pagination::new(settings.page_size),
            page_size_options: settings.page_size_options.clone(),
            selection: None,
            empty_state: EmptyState::default(),
        }
    }

    /// Enable the selection bar
    pub fn with_selection(mut self) -> Self {
        self.selection = Some(Selection::new());
        self
    }

    pub fn with_empty_state(mut self, empty_state: EmptyState) -> Self {
        self.empty_state = empty_state;
        self
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn row_id(&self, row: &R) -> RowId {
        (self.row_id)(row)
    }

    // ==================== View ====================

    /// Header cells for the current sort and filter state
    pub fn headers(&self, sort: &SortState, filters: &FilterState) -> Vec<HeaderCell> {
        self.columns
            .iter()
            .map(|column| HeaderCell {
                id: column.id.clone(),
                label: column.label.clone(),
                sortable: column.sortable,
                sort: if column.sortable {
                    sort.direction_for(&column.id)
                } else {
                    None
                },
                filterable: column.is_filterable(),
                filter_active: column.is_filterable() && filters.is_active(&column.id),
                class_name: column.meta.header_class.clone(),
            })
            .collect()
    }

    /// Derive the view for the current page
    ///
    /// Syncs the row total first, which clamps the page index if the data
    /// shrank.
    pub fn view<'a, P>(
        &mut self,
        provider: &'a P,
        pinned: &'a [R],
        sort: &SortState,
        filters: &FilterState,
        status: &TableStatus,
    ) -> TableView<'a, R>
    where
        P: DataProvider<Row = R>,
    {
        let headers = self.headers(sort, filters);
        let total = provider.total_rows();
        self.pagination.sync_total(total);

        let body = match status {
            TableStatus::Error { message, can_retry } => TableBody::Error {
                message: message.clone(),
                can_retry: *can_retry,
            },
            TableStatus::Loading => TableBody::Skeleton {
                rows: self.pagination.page_size(),
            },
            TableStatus::Ready if total == 0 && pinned.is_empty() => {
                TableBody::Empty(self.empty_state.clone())
            }
            TableStatus::Ready => {
                let pinned = pinned.iter().map(|row| self.render_row(row, true)).collect();
                let rows = provider
                    .page(self.pagination.range())
                    .iter()
                    .take(self.pagination.page_size())
                    .map(|row| self.render_row(row, false))
                    .collect();
                let selection = self.selection.as_ref().map(|selection| SelectionSummary {
                    selected: selection.len(),
                    total,
                    all_selected: selection.is_all_selected(total),
                });
                TableBody::Rows {
                    pinned,
                    rows,
                    footer: self.pagination.footer(),
                    selection,
                }
            }
        };

        TableView { headers, body }
    }

    fn render_row<'a>(&self, row: &'a R, pinned: bool) -> RenderedRow<'a, R> {
        let id = self.row_id(row);
        let selected = self
            .selection
            .as_ref()
            .is_some_and(|selection| selection.contains(&id));
        RenderedRow {
            id,
            row,
            cells: self.columns.iter().map(|column| column.value(row)).collect(),
            pinned,
            selected,
        }
    }

    // ==================== Sorting & Filtering ====================

    /// Header click; ignored for unknown or non-sortable columns
    pub fn toggle_sort(&mut self, sort: &SortState, column: &str) -> Option<TableEvent> {
        let col = self.columns.get(column)?;
        if !col.sortable {
            return None;
        }
        self.pagination.reset();
        Some(TableEvent::SortChanged(sort.toggled(column)))
    }

    /// Popover edit; the value must match the column's filter kind
    pub fn set_filter(
        &mut self,
        filters: &FilterState,
        column: &str,
        value: ColumnFilterValue,
    ) -> Option<TableEvent> {
        let config = self.columns.get(column)?.filter.as_ref()?;
        if config.kind != value.kind() {
            tracing::warn!(
                column,
                expected = ?config.kind,
                got = ?value.kind(),
                "Filter value kind mismatch"
            );
            return None;
        }
        let mut next = filters.clone();
        next.set(column, value);
        self.pagination.reset();
        Some(TableEvent::FilterChanged(next))
    }

    /// Popover "Clear": resets this column only
    pub fn clear_filter(&mut self, filters: &FilterState, column: &str) -> Option<TableEvent> {
        let config = self.columns.get(column)?.filter.as_ref()?;
        let mut next = filters.clone();
        next.clear(column, config.kind);
        self.pagination.reset();
        Some(TableEvent::FilterChanged(next))
    }

    /// Checkbox options for a column, static or derived from `rows`
    pub fn filter_options(&self, column: &str, rows: &[R]) -> Vec<FilterOption> {
        let Some(col) = self.columns.get(column) else {
            return Vec::new();
        };
        match col.filter.as_ref().map(|config| &config.options) {
            Some(FilterOptions::Static(options)) => options.clone(),
            Some(FilterOptions::Derived { unknown }) => derive_options(col, rows, unknown.as_deref()),
            _ => Vec::new(),
        }
    }

    // ==================== Pagination ====================

    pub fn next_page(&mut self) -> Option<TableEvent> {
        self.pagination.next().then(|| TableEvent::PageChanged {
            page_index: self.pagination.page_index(),
        })
    }

    pub fn previous_page(&mut self) -> Option<TableEvent> {
        self.pagination.previous().then(|| TableEvent::PageChanged {
            page_index: self.pagination.page_index(),
        })
    }

    pub fn go_to_page(&mut self, index: usize) -> Option<TableEvent> {
        self.pagination.go_to(index).then(|| TableEvent::PageChanged {
            page_index: self.pagination.page_index(),
        })
    }

    /// Change the page size; sizes outside the configured options are ignored
    pub fn set_page_size(&mut self, size: usize) -> Option<TableEvent> {
        if size == 0
            || (!self.page_size_options.is_empty() && !self.page_size_options.contains(&size))
        {
            tracing::warn!(size, "Ignoring unsupported page size");
            return None;
        }
        if size == self.pagination.page_size() {
            return None;
        }
        self.pagination.set_page_size(size);
        Some(TableEvent::PageSizeChanged { page_size: size })
    }

    // ==================== Selection ====================

    pub fn toggle_row(&mut self, id: RowId) -> Option<TableEvent> {
        let selection = self.selection.as_mut()?;
        selection.toggle(id);
        Some(TableEvent::SelectionChanged {
            selected: selection.len(),
        })
    }

    /// Select every row of the full data set
    pub fn select_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a R>) -> Option<TableEvent>
    where
        R: 'a,
    {
        let ids: Vec<RowId> = rows.into_iter().map(|row| self.row_id(row)).collect();
        let selection = self.selection.as_mut()?;
        selection.select_all(ids);
        Some(TableEvent::SelectionChanged {
            selected: selection.len(),
        })
    }

    pub fn clear_selection(&mut self) -> Option<TableEvent> {
        let selection = self.selection.as_mut()?;
        selection.clear();
        Some(TableEvent::SelectionChanged { selected: 0 })
    }

    /// Run the bulk action with the current selection; `None` when nothing
    /// is selected or the selection bar is disabled
    pub fn bulk_action<T>(&self, action: impl FnOnce(&[RowId]) -> T) -> Option<T> {
        let selection = self.selection.as_ref().filter(|s| !s.is_empty())?;
        Some(action(&selection.ids()))
    }

    /// Retry button; only offered in a retryable error state
    pub fn retry(&self, status: &TableStatus) -> Option<TableEvent> {
        match status {
            TableStatus::Error {
                can_retry: true, ..
            } => Some(TableEvent::Retry),
            _ => None,
        }
    }
}

fn derive_options<R>(column: &Column<R>, rows: &[R], unknown: Option<&str>) -> Vec<FilterOption> {
    let mut values: Vec<String> = rows
        .iter()
        .filter_map(|row| column.value(row).as_text())
        .filter(|value| !value.is_empty() && Some(value.as_str()) != unknown)
        .collect();
    values.sort();
    values.dedup();
    values
        .into_iter()
        .map(|value| FilterOption::new(value.clone(), value))
        .collect()
}

/// Keep rows passing every active column filter
pub fn filter_rows<R>(
    rows: &mut Vec<R>,
    columns: &ColumnSet<R>,
    filters: &FilterState,
    now: DateTime<Utc>,
) {
    let active: Vec<_> = filters
        .active()
        .filter_map(|(id, value)| columns.get(id).map(|column| (column, value)))
        .collect();
    if active.is_empty() {
        return;
    }
    rows.retain(|row| active.iter().all(|(column, value)| column.matches(row, value, now)));
}
