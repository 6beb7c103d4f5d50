//! FilterValue - Dashboard Filter Values
//!
//! Values use the API's JSON shapes: a scalar, a list, `{min, max}` or
//! `{start_date, end_date}`.

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single selectable value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Display form used for option labels
    pub fn label(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::Text(text.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateRangeValue {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Pending or applied value of one dashboard filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    // Variant order matters for untagged decoding: a numeric list must not
    // be read as a positional `{min, max}`.
    List(Vec<Scalar>),
    Range(NumericRange),
    Dates(DateRangeValue),
    Scalar(Scalar),
}

impl FilterValue {
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        FilterValue::Range(NumericRange { min, max })
    }

    pub fn dates(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        FilterValue::Dates(DateRangeValue {
            start_date,
            end_date,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        FilterValue::Scalar(Scalar::Text(text.into()))
    }

    /// A value that restricts nothing
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Range(range) => range.min.is_none() && range.max.is_none(),
            FilterValue::Dates(dates) => dates.start_date.is_none() && dates.end_date.is_none(),
            FilterValue::List(values) => values.is_empty(),
            FilterValue::Scalar(Scalar::Text(text)) => text.is_empty(),
            FilterValue::Scalar(_) => false,
        }
    }
}

/// Complete snapshot handed to the caller on Apply
///
/// Holds one entry per configured filter, in display order; filters
/// without a value map to `None` and serialize as `null`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppliedFilters {
    entries: Vec<(String, Option<FilterValue>)>,
}

impl AppliedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, id: impl Into<String>, value: Option<FilterValue>) {
        self.entries.push((id.into(), value));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == id)
    }

    /// `None` if `id` is not in the snapshot, `Some(None)` for an explicit null
    pub fn get(&self, id: &str) -> Option<Option<&FilterValue>> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FilterValue>)> {
        self.entries
            .iter()
            .map(|(id, value)| (id.as_str(), value.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AppliedFilters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}
