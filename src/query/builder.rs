//! Trends query builder
//!
//! [`TrendQuery`] is an immutable value. `add_series` and `add_filter_group`
//! return a new query with the item appended and leave the receiver as it
//! was, so partially built queries can be shared and extended independently.
//!
//! ```rust,ignore
//! let pageview = client.catalog().event("$pageview").unwrap();
//! let browser = client.catalog().property("$browser").unwrap();
//!
//! let base = client
//!     .query()
//!     .add_series(&pageview, SeriesSpec::new(Sampling::Total).label("Views"));
//! let chrome_only = base.add_filter_group(
//!     FilterGroup::all().filter(PropertyFilter::exact(browser, "Chrome")),
//! );
//!
//! let chart = chrome_only
//!     .execute(ExecuteOptions::new(ChartType::Line).date_from("Last 7 days"))
//!     .await?;
//! ```

use crate::catalog::{EventCatalog, EventRef};
use crate::chart::ChartData;
use crate::query::ast::{FilterGroup, SeriesDefinition, SeriesSpec};
use crate::query::error::QueryResult;
use crate::query::executor::QueryExecutor;
use crate::query::options::ExecuteOptions;
use std::sync::Arc;

/// Accumulated series and filter groups of a trends query
#[derive(Clone)]
pub struct TrendQuery {
    executor: Arc<QueryExecutor>,
    catalog: Arc<EventCatalog>,
    series: Vec<SeriesDefinition>,
    filter_groups: Vec<FilterGroup>,
}

impl TrendQuery {
    /// Create an empty query
    pub fn new(executor: Arc<QueryExecutor>, catalog: Arc<EventCatalog>) -> Self {
        Self {
            executor,
            catalog,
            series: Vec::new(),
            filter_groups: Vec::new(),
        }
    }

    /// Return a new query with a series for `event` appended
    pub fn add_series(&self, event: &EventRef, spec: SeriesSpec) -> Self {
        let mut series = self.series.clone();
        series.push(SeriesDefinition::new(event.name(), spec));
        Self {
            series,
            ..self.clone()
        }
    }

    /// Return a new query with a top-level filter group appended
    pub fn add_filter_group(&self, group: FilterGroup) -> Self {
        let mut filter_groups = self.filter_groups.clone();
        filter_groups.push(group);
        Self {
            filter_groups,
            ..self.clone()
        }
    }

    /// Series in request order
    pub fn series(&self) -> &[SeriesDefinition] {
        &self.series
    }

    pub fn filter_groups(&self) -> &[FilterGroup] {
        &self.filter_groups
    }

    /// Catalog the query's events and properties come from
    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Run the query and normalize the response into `options.chart_type`
    pub async fn execute(&self, options: ExecuteOptions) -> QueryResult<ChartData> {
        self.executor
            .execute(&self.series, &self.filter_groups, &options)
            .await
    }
}

impl std::fmt::Debug for TrendQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendQuery")
            .field("series", &self.series)
            .field("filter_groups", &self.filter_groups)
            .finish()
    }
}
