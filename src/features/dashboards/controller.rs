//! Dashboards Controller
//!
//! Wires the dashboard list onto the table engine: column definitions,
//! landing-page pinning and local sort/filter.

use chrono::{DateTime, Utc};

use crate::components::data_table::{
    CellValue, Column, ColumnSet, DataTable, FilterConfig, FilterState, RowId, SortState,
    filter_rows, sort_rows,
};
use crate::constants::UNKNOWN_SENTINEL;
use crate::domain::dashboard::Dashboard;
use crate::error::Result;
use crate::settings::Settings;

/// Flag of the title filter restricting to favorites
pub const FAVORITES_FLAG: &str = "favorites";

/// Column definitions of the dashboard list
pub fn dashboard_columns() -> Result<ColumnSet<Dashboard>> {
    ColumnSet::new(vec![
        Column::new("title", "Title", |d: &Dashboard| CellValue::from(d.title.as_str()))
            .sortable()
            .filter(FilterConfig::text("Search dashboards").with_flag(FAVORITES_FLAG))
            .text_flag(FAVORITES_FLAG, |d: &Dashboard| d.is_favorite),
        Column::new("owner", "Owner", |d: &Dashboard| CellValue::from(d.owner_name()))
            .filter(FilterConfig::checkbox_derived(Some(UNKNOWN_SENTINEL))),
        Column::new("last_modified", "Last Modified", |d: &Dashboard| {
            CellValue::Date(d.last_modified)
        })
        .sortable()
        .filter(FilterConfig::date()),
        Column::new("chart_count", "Charts", |d: &Dashboard| {
            CellValue::Number(f64::from(d.chart_count))
        })
        .sortable()
        .cell_class("numeric"),
    ])
}

/// Table engine configured for the dashboard list
pub fn dashboard_table(settings: &Settings) -> Result<DataTable<Dashboard>> {
    let table = DataTable::new(dashboard_columns()?, |d: &Dashboard| RowId::Int(d.id), settings);
    Ok(table.with_selection())
}

/// Dashboard list split for the table engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardList {
    /// Landing-page dashboards, shown on every page
    pub pinned: Vec<Dashboard>,
    /// Filtered and sorted body rows
    pub rows: Vec<Dashboard>,
}

impl DashboardList {
    /// Pin landing pages, then filter and sort the rest
    pub fn prepare(
        dashboards: Vec<Dashboard>,
        columns: &ColumnSet<Dashboard>,
        sort: &SortState,
        filters: &FilterState,
        now: DateTime<Utc>,
    ) -> Self {
        let total = dashboards.len();
        let (pinned, mut rows): (Vec<_>, Vec<_>) =
            dashboards.into_iter().partition(|d| d.is_landing_page);

        filter_rows(&mut rows, columns, filters, now);
        sort_rows(&mut rows, columns, sort);

        tracing::debug!(
            total,
            pinned = pinned.len(),
            rows = rows.len(),
            "Prepared dashboard list"
        );
        Self { pinned, rows }
    }
}
