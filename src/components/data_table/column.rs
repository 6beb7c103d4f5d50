//! Column Definition
//!
//! Defines table columns: identity, header label, value accessor, and the
//! optional filter attached to the column's header popover.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filter::{ColumnFilterValue, FilterConfig};
use crate::error::{Error, Result};

/// Stable identity of a row within the current data set
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Str(String),
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        RowId::Int(id)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        RowId::Str(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        RowId::Str(id)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(id) => write!(f, "{id}"),
            RowId::Str(id) => f.write_str(id),
        }
    }
}

/// Value of a single cell as seen by sorting and filtering
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text form used by substring and membership filters
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Date(dt) => Some(dt.to_rfc3339()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Number(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Null => 4,
        }
    }

    /// Ascending comparison. Text compares case-insensitively first.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::Text(text)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(dt: DateTime<Utc>) -> Self {
        CellValue::Date(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// Styling hooks forwarded untouched to the renderer
#[derive(Clone, Debug, Default)]
pub struct ColumnMeta {
    pub header_class: Option<String>,
    pub cell_class: Option<String>,
}

type Accessor<R> = Box<dyn Fn(&R) -> CellValue + Send + Sync>;
type FlagPredicate<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;
type CustomPredicate<R> = Box<dyn Fn(&R, &serde_json::Value) -> bool + Send + Sync>;

/// Column definition for the DataTable
pub struct Column<R> {
    /// Column identifier, unique within a [`ColumnSet`]
    pub id: String,
    /// Column header label
    pub label: String,
    /// Whether the header offers a sort toggle
    pub sortable: bool,
    /// Filter shown in the header popover
    pub filter: Option<FilterConfig>,
    pub meta: ColumnMeta,
    accessor: Accessor<R>,
    flags: Vec<(String, FlagPredicate<R>)>,
    custom: Option<CustomPredicate<R>>,
}

impl<R> Column<R> {
    /// Create a new column
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        accessor: impl Fn(&R) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            sortable: false,
            filter: None,
            meta: ColumnMeta::default(),
            accessor: Box::new(accessor),
            flags: Vec::new(),
            custom: None,
        }
    }

    /// Make the column sortable
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Attach a filter to the header popover
    pub fn filter(mut self, config: FilterConfig) -> Self {
        self.filter = Some(config);
        self
    }

    /// Register a boolean refinement for a text filter (e.g. "favorites")
    pub fn text_flag(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.flags.push((name.into(), Box::new(predicate)));
        self
    }

    /// Matching rule for a custom filter editor
    pub fn custom_filter(
        mut self,
        predicate: impl Fn(&R, &serde_json::Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.custom = Some(Box::new(predicate));
        self
    }

    pub fn header_class(mut self, class: impl Into<String>) -> Self {
        self.meta.header_class = Some(class.into());
        self
    }

    pub fn cell_class(mut self, class: impl Into<String>) -> Self {
        self.meta.cell_class = Some(class.into());
        self
    }

    /// Resolve the cell value for a row
    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    pub fn is_filterable(&self) -> bool {
        self.filter.is_some()
    }

    /// Whether `row` passes this column's filter value
    ///
    /// Empty filter values always pass.
    pub fn matches(&self, row: &R, value: &ColumnFilterValue, now: DateTime<Utc>) -> bool {
        if !value.is_active() {
            return true;
        }
        match value {
            ColumnFilterValue::Text { text, flags } => {
                let needle = text.trim().to_lowercase();
                if !needle.is_empty() {
                    let haystack = self.value(row).as_text().unwrap_or_default().to_lowercase();
                    if !haystack.contains(&needle) {
                        return false;
                    }
                }
                flags.iter().filter(|(_, on)| **on).all(|(name, _)| {
                    match self.flags.iter().find(|(flag, _)| flag == name) {
                        Some((_, predicate)) => predicate(row),
                        None => {
                            tracing::warn!(column = %self.id, flag = %name, "Unknown text filter flag");
                            true
                        }
                    }
                })
            }
            ColumnFilterValue::Checkbox { selected } => self
                .value(row)
                .as_text()
                .is_some_and(|text| selected.iter().any(|s| *s == text)),
            ColumnFilterValue::Date(date) => match self.value(row) {
                CellValue::Date(dt) => date.matches(dt, now),
                _ => false,
            },
            ColumnFilterValue::Custom { value } => match &self.custom {
                Some(predicate) => predicate(row, value),
                None => true,
            },
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("filter", &self.filter)
            .finish()
    }
}

/// Ordered list of columns with unique ids
pub struct ColumnSet<R> {
    columns: Vec<Column<R>>,
}

impl<R> ColumnSet<R> {
    /// Build a column set, rejecting duplicate ids
    pub fn new(columns: Vec<Column<R>>) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.id == column.id) {
                return Err(Error::Invalid {
                    message: format!("duplicate column id '{}'", column.id),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn get(&self, id: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column<R>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<R> fmt::Debug for ColumnSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}
