//! Sort State
//!
//! Single-column sort owned by the caller. The table only surfaces the
//! header toggle; callers that sort locally can use [`sort_rows`].

use serde::{Deserialize, Serialize};

use super::column::{CellValue, ColumnSet};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current sort; `column` is `None` when no sort is active
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    /// Direction if `column` is the sorted column
    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        (self.column.as_deref() == Some(column)).then_some(self.direction)
    }

    /// Next state after clicking `column`'s header
    ///
    /// A newly selected column starts descending; clicking the sorted column
    /// again flips its direction.
    pub fn toggled(&self, column: &str) -> SortState {
        match self.direction_for(column) {
            Some(direction) => SortState::by(column, direction.flipped()),
            None => SortState::by(column, SortDirection::Desc),
        }
    }
}

/// Stable in-place sort by the active column; nulls always sort last
pub fn sort_rows<R>(rows: &mut [R], columns: &ColumnSet<R>, sort: &SortState) {
    let Some(column) = sort.column.as_deref().and_then(|id| columns.get(id)) else {
        return;
    };

    rows.sort_by(|a, b| {
        let (va, vb) = (column.value(a), column.value(b));
        match (va.is_null(), vb.is_null()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => {
                let ord = CellValue::compare(&va, &vb);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        }
    });
}
