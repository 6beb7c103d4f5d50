//! Column Filters
//!
//! Filter kinds, their value shapes, and the per-column filter state owned
//! by the caller. Each kind defines its own empty form; a column's
//! active-filter indicator is derived from it.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Editor shown in a column's filter popover
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Text,
    Checkbox,
    Date,
    Custom,
}

/// A selectable checkbox entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Where checkbox options come from
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum FilterOptions {
    #[default]
    None,
    Static(Vec<FilterOption>),
    /// Distinct values of the column over the current data set, excluding
    /// the `unknown` sentinel
    Derived { unknown: Option<String> },
}

/// Per-column filter declaration
#[derive(Clone, Debug, PartialEq)]
pub struct FilterConfig {
    pub kind: FilterKind,
    pub placeholder: Option<String>,
    pub options: FilterOptions,
    /// Boolean refinements offered by a text filter
    pub flags: Vec<String>,
}

impl FilterConfig {
    pub fn text(placeholder: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::Text,
            placeholder: Some(placeholder.into()),
            options: FilterOptions::None,
            flags: Vec::new(),
        }
    }

    pub fn checkbox(options: Vec<FilterOption>) -> Self {
        Self {
            kind: FilterKind::Checkbox,
            placeholder: None,
            options: FilterOptions::Static(options),
            flags: Vec::new(),
        }
    }

    pub fn checkbox_derived(unknown: Option<&str>) -> Self {
        Self {
            kind: FilterKind::Checkbox,
            placeholder: None,
            options: FilterOptions::Derived {
                unknown: unknown.map(str::to_string),
            },
            flags: Vec::new(),
        }
    }

    pub fn date() -> Self {
        Self {
            kind: FilterKind::Date,
            placeholder: None,
            options: FilterOptions::None,
            flags: Vec::new(),
        }
    }

    pub fn custom() -> Self {
        Self {
            kind: FilterKind::Custom,
            placeholder: None,
            options: FilterOptions::None,
            flags: Vec::new(),
        }
    }

    /// Offer a named boolean refinement next to the text box
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.flags.push(name.into());
        self
    }
}

/// Relative date windows offered by the date filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    Custom,
}

/// Date filter value; custom bounds only mean something for `Custom`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DateFilterWire")]
pub struct DateFilterValue {
    range: DateRange,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
}

/// Incoming shape, normalized so stray bounds never survive a non-custom range
#[derive(Deserialize)]
struct DateFilterWire {
    #[serde(default)]
    range: DateRange,
    #[serde(default)]
    custom_start: Option<NaiveDate>,
    #[serde(default)]
    custom_end: Option<NaiveDate>,
}

impl From<DateFilterWire> for DateFilterValue {
    fn from(wire: DateFilterWire) -> Self {
        let mut value = DateFilterValue::default();
        match wire.range {
            DateRange::Custom => value.set_custom_bounds(wire.custom_start, wire.custom_end),
            range => value.select_range(range),
        }
        value
    }
}

impl DateFilterValue {
    pub fn all() -> Self {
        Self::default()
    }

    /// Select a range; any non-custom range drops the custom bounds
    pub fn with_range(range: DateRange) -> Self {
        let mut value = Self::default();
        value.select_range(range);
        value
    }

    /// Custom window; either bound may be open
    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            range: DateRange::Custom,
            custom_start: start,
            custom_end: end,
        }
    }

    pub fn select_range(&mut self, range: DateRange) {
        self.range = range;
        if range != DateRange::Custom {
            self.custom_start = None;
            self.custom_end = None;
        }
    }

    pub fn set_custom_bounds(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.range = DateRange::Custom;
        self.custom_start = start;
        self.custom_end = end;
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn custom_start(&self) -> Option<NaiveDate> {
        self.custom_start
    }

    pub fn custom_end(&self) -> Option<NaiveDate> {
        self.custom_end
    }

    /// Whether `at` falls in the window, relative to `now`
    ///
    /// Week and month are trailing 7 and 30 day windows. Custom bounds are
    /// inclusive calendar days.
    pub fn matches(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.range {
            DateRange::All => true,
            DateRange::Today => at.date_naive() == now.date_naive(),
            DateRange::Week => at >= now - Duration::days(7),
            DateRange::Month => at >= now - Duration::days(30),
            DateRange::Custom => {
                let day = at.date_naive();
                self.custom_start.is_none_or(|start| day >= start)
                    && self.custom_end.is_none_or(|end| day <= end)
            }
        }
    }
}

/// Value held for one column's filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnFilterValue {
    Text {
        text: String,
        #[serde(default)]
        flags: BTreeMap<String, bool>,
    },
    Checkbox {
        selected: Vec<String>,
    },
    Date(DateFilterValue),
    Custom {
        value: serde_json::Value,
    },
}

impl ColumnFilterValue {
    /// Empty form for a filter kind
    pub fn empty(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Text => ColumnFilterValue::Text {
                text: String::new(),
                flags: BTreeMap::new(),
            },
            FilterKind::Checkbox => ColumnFilterValue::Checkbox {
                selected: Vec::new(),
            },
            FilterKind::Date => ColumnFilterValue::Date(DateFilterValue::all()),
            FilterKind::Custom => ColumnFilterValue::Custom {
                value: serde_json::Value::Null,
            },
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ColumnFilterValue::Text {
            text: text.into(),
            flags: BTreeMap::new(),
        }
    }

    pub fn checkbox<S: Into<String>>(selected: impl IntoIterator<Item = S>) -> Self {
        ColumnFilterValue::Checkbox {
            selected: selected.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            ColumnFilterValue::Text { .. } => FilterKind::Text,
            ColumnFilterValue::Checkbox { .. } => FilterKind::Checkbox,
            ColumnFilterValue::Date(_) => FilterKind::Date,
            ColumnFilterValue::Custom { .. } => FilterKind::Custom,
        }
    }

    /// Drives the active-filter dot in the column header
    pub fn is_active(&self) -> bool {
        match self {
            ColumnFilterValue::Text { text, flags } => {
                !text.trim().is_empty() || flags.values().any(|on| *on)
            }
            ColumnFilterValue::Checkbox { selected } => !selected.is_empty(),
            ColumnFilterValue::Date(date) => date.range() != DateRange::All,
            ColumnFilterValue::Custom { value } => !value.is_null(),
        }
    }
}

/// Filter values keyed by column id
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    values: BTreeMap<String, ColumnFilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnFilterValue> {
        self.values.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: ColumnFilterValue) {
        self.values.insert(column.into(), value);
    }

    /// Reset one column to its kind's empty form, leaving the others alone
    pub fn clear(&mut self, column: &str, kind: FilterKind) {
        self.values
            .insert(column.to_string(), ColumnFilterValue::empty(kind));
    }

    pub fn is_active(&self, column: &str) -> bool {
        self.values.get(column).is_some_and(ColumnFilterValue::is_active)
    }

    /// Columns whose filter currently restricts rows
    pub fn active(&self) -> impl Iterator<Item = (&str, &ColumnFilterValue)> {
        self.values
            .iter()
            .filter(|(_, value)| value.is_active())
            .map(|(column, value)| (column.as_str(), value))
    }
}
