//! DashboardFilter - Dashboard Filter Configuration
//!
//! Read-only filter definitions produced by the filter-authoring API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::filter_value::{FilterValue, NumericRange};
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    Value,
    Numerical,
    Datetime,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Value => "value",
            FilterType::Numerical => "numerical",
            FilterType::Datetime => "datetime",
        }
    }
}

/// Type-specific settings; only the fields of the filter's type are read
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Preselected option(s) of a value filter
    pub default_value: Option<FilterValue>,
    /// Whether a value filter accepts several options
    pub multi_select: bool,
    /// Option limit override for the preview endpoint
    pub options_limit: Option<usize>,
    pub default_min: Option<f64>,
    pub default_max: Option<f64>,
    pub default_start_date: Option<NaiveDate>,
    pub default_end_date: Option<NaiveDate>,
}

/// A dashboard filter definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardFilterConfig {
    pub id: String,
    pub filter_type: FilterType,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub schema_name: String,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub settings: FilterSettings,
}

impl DashboardFilterConfig {
    pub fn new(
        id: impl Into<String>,
        filter_type: FilterType,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            filter_type,
            label: None,
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
            settings: FilterSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: FilterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Label shown above the editor, falling back to the column name
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.column_name)
    }

    /// Check the fields an editor needs before it can be shown
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Error::InvalidFilter {
            id: self.id.clone(),
            message: message.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("missing id"));
        }
        if self.schema_name.trim().is_empty()
            || self.table_name.trim().is_empty()
            || self.column_name.trim().is_empty()
        {
            return Err(invalid("missing schema, table or column"));
        }
        if let (Some(min), Some(max)) = (self.settings.default_min, self.settings.default_max) {
            if self.filter_type == FilterType::Numerical && min > max {
                return Err(invalid("default_min is greater than default_max"));
            }
        }
        if let (Some(start), Some(end)) = (
            self.settings.default_start_date,
            self.settings.default_end_date,
        ) {
            if self.filter_type == FilterType::Datetime && start > end {
                return Err(invalid("default_start_date is after default_end_date"));
            }
        }
        Ok(())
    }

    /// Default value declared in the settings, if any
    pub fn default_value(&self) -> Option<FilterValue> {
        let settings = &self.settings;
        match self.filter_type {
            FilterType::Value => settings
                .default_value
                .clone()
                .filter(|value| !value.is_blank()),
            FilterType::Numerical => {
                if settings.default_min.is_none() && settings.default_max.is_none() {
                    return None;
                }
                Some(FilterValue::Range(NumericRange {
                    min: settings.default_min,
                    max: settings.default_max,
                }))
            }
            FilterType::Datetime => {
                if settings.default_start_date.is_none() && settings.default_end_date.is_none() {
                    return None;
                }
                Some(FilterValue::dates(
                    settings.default_start_date,
                    settings.default_end_date,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_from_api_json() {
        let filter: DashboardFilterConfig = serde_json::from_value(json!({
            "id": "age",
            "filter_type": "numerical",
            "schema_name": "public",
            "table_name": "customers",
            "column_name": "age",
            "settings": {"default_min": 18, "default_max": 65}
        }))
        .expect("parse");
        assert!(filter.validate().is_ok());
        assert_eq!(filter.default_value(), Some(FilterValue::range(Some(18.0), Some(65.0))));
    }

    #[test]
    fn test_missing_column_is_invalid() {
        let filter = DashboardFilterConfig::new("f1", FilterType::Value, "public", "orders", "");
        let err = filter.validate().expect_err("invalid");
        assert!(err.to_string().contains("f1"));
    }

    #[test]
    fn test_datetime_without_default() {
        let filter = DashboardFilterConfig::new("d", FilterType::Datetime, "s", "t", "created_at");
        assert_eq!(filter.default_value(), None);
    }

    #[test]
    fn test_blank_value_default_ignored() {
        let filter = DashboardFilterConfig::new("r", FilterType::Value, "s", "t", "region")
            .with_settings(FilterSettings {
                default_value: Some(FilterValue::List(Vec::new())),
                ..FilterSettings::default()
            });
        assert_eq!(filter.default_value(), None);
    }
}
