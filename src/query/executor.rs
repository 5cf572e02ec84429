//! Query Executor
//!
//! Executes an accumulated trends query against the PostHog API:
//! 1. Parameter assembly and validation
//! 2. Query-string encoding
//! 3. A single authenticated GET
//! 4. Normalization into the requested chart shape
//!
//! # Execution Pipeline
//!
//! ```text
//! Series + Filters + Options → TrendParams → GET insights/trend → TrendResponse → ChartData
//! ```
//!
//! Failures at any step are returned to the caller. Nothing is retried.

use crate::chart::{normalize, ChartData, TrendResponse};
use crate::posthog::Transport;
use crate::query::ast::{FilterGroup, SeriesDefinition};
use crate::query::error::{QueryError, QueryResult};
use crate::query::options::ExecuteOptions;
use crate::query::params::TrendParams;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Query executor
pub struct QueryExecutor {
    transport: Arc<dyn Transport>,
    api_key: String,
    /// Project API root, without trailing slash
    base_url: String,
}

impl QueryExecutor {
    /// Create a new query executor
    pub fn new(
        transport: Arc<dyn Transport>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for an encoded query string
    pub fn trend_url(&self, query: &str) -> String {
        format!("{}/insights/trend/?{}", self.base_url, query)
    }

    /// Assemble, send and normalize one trends request
    pub async fn execute(
        &self,
        series: &[SeriesDefinition],
        filter_groups: &[FilterGroup],
        options: &ExecuteOptions,
    ) -> QueryResult<ChartData> {
        let start = Instant::now();
        let request_id = Uuid::new_v4();

        // 1. Validate and assemble before anything goes on the wire
        let params = TrendParams::build(series, filter_groups, options)?;

        // 2. Encode
        let query = params.to_query_string(options.explode_arrays)?;
        let url = self.trend_url(&query);
        tracing::debug!(%request_id, %url, "Sending trends request");

        // 3. Dispatch
        let response = self.transport.get(&url, &self.api_key).await?;

        if !response.is_success() {
            tracing::warn!(
                %request_id,
                status = response.status,
                "Trends request failed: {}",
                response.status_text
            );
            return Err(QueryError::Api {
                status: response.status,
                status_text: response.status_text.clone(),
                body: response.error_body(),
            });
        }

        // 4. Normalize
        let trend: TrendResponse =
            serde_json::from_str(&response.body).map_err(QueryError::Decode)?;
        let chart = normalize(&trend, series, options);

        tracing::info!(
            %request_id,
            chart = %options.chart_type,
            series = series.len(),
            results = trend.result.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Trends query executed"
        );

        Ok(chart)
    }
}
