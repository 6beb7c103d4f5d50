//! Filter API
//!
//! The dashboard endpoints the filter panel calls directly: option preview
//! (GET, side-effect free) and filter deletion.

use std::future::Future;

use serde::Deserialize;

use crate::domain::dashboard_filter::{DashboardFilterConfig, FilterType};
use crate::domain::filter_value::Scalar;
use crate::error::{Error, Result};
use crate::settings::Settings;

/// Cache key of a preview request
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct PreviewKey {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub filter_type: FilterType,
    pub limit: usize,
}

impl PreviewKey {
    /// Key for a filter's editor; the filter's own limit wins over `default_limit`
    pub fn for_filter(filter: &DashboardFilterConfig, default_limit: usize) -> Self {
        Self {
            schema: filter.schema_name.clone(),
            table: filter.table_name.clone(),
            column: filter.column_name.clone(),
            filter_type: filter.filter_type,
            limit: filter.settings.options_limit.unwrap_or(default_limit),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PreviewOption {
    pub value: Scalar,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl PreviewOption {
    pub fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.value.label())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ColumnStats {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

/// Body of a preview response
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PreviewResponse {
    Options { options: Vec<PreviewOption> },
    Stats { stats: ColumnStats },
}

/// Dashboard filter endpoints
pub trait FilterApi {
    /// Selectable options (value filters) or min/max stats (numeric filters)
    fn preview(&self, key: &PreviewKey) -> impl Future<Output = Result<PreviewResponse>> + Send;

    /// Delete a filter from the dashboard
    fn delete_filter(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// reqwest-backed implementation
#[derive(Clone, Debug)]
pub struct HttpFilterApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFilterApi {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl FilterApi for HttpFilterApi {
    async fn preview(&self, key: &PreviewKey) -> Result<PreviewResponse> {
        tracing::debug!(
            schema = %key.schema,
            table = %key.table,
            column = %key.column,
            filter_type = key.filter_type.as_str(),
            "Fetching filter preview"
        );
        let limit = key.limit.to_string();
        let response = self
            .client
            .get(self.url("filters/preview"))
            .query(&[
                ("schema", key.schema.as_str()),
                ("table", key.table.as_str()),
                ("column", key.column.as_str()),
                ("filter_type", key.filter_type.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<PreviewResponse>().await?)
    }

    async fn delete_filter(&self, id: &str) -> Result<()> {
        tracing::info!(filter_id = id, "Deleting dashboard filter");
        let response = self
            .client
            .delete(self.url(&format!("filters/{id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
