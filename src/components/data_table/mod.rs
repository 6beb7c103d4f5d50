//! DataTable - Sortable, Filterable, Paginated Table Engine

mod column;
mod data_provider;
mod data_table;
mod filter;
mod pagination;
mod selection;
mod sort;

pub use column::{CellValue, Column, ColumnMeta, ColumnSet, RowId};
pub use data_provider::{DataProvider, PagedDataProvider, VecDataProvider};
pub use data_table::{
    DataTable, EmptyState, HeaderCell, RenderedRow, SelectionSummary, TableBody, TableEvent,
    TableStatus, TableView, filter_rows,
};
pub use filter::{
    ColumnFilterValue, DateFilterValue, DateRange, FilterConfig, FilterKind, FilterOption,
    FilterOptions, FilterState,
};
pub use pagination::{PageFooter, Pagination};
pub use selection::Selection;
pub use sort::{SortDirection, SortState, sort_rows};
