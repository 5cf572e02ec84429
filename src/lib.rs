//! # Typelytics
//!
//! Typed PostHog trends queries with chart-ready output.
//!
//! ## Features
//!
//! - **Catalog-checked queries**: series and filters can only name events and
//!   properties declared in the event catalog
//! - **Immutable builder**: every `add_*` call returns a new query
//! - **Named date ranges**: "Last 7 days", "This month", ... resolve to PostHog
//!   relative dates and a default interval
//! - **Chart shapes**: responses normalize into time series, pie, bar-total,
//!   single number or table data, tagged with the chart type
//!
//! ## Modules
//!
//! - [`catalog`]: Event and property catalog
//! - [`query`]: Query builder, parameter assembly and executor
//! - [`chart`]: Response types and chart normalizers
//! - [`posthog`]: Client and HTTP transport
//! - [`config`]: TOML/environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use typelytics::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = EventCatalog::new([
//!         EventDescriptor::new("$pageview").property("$browser", Some(PropertyType::String)),
//!     ]);
//!
//!     // API key and project id fall back to POSTHOG_API_KEY / POSTHOG_PROJECT_ID
//!     let client = PostHogClient::new(&PostHogConfig::default(), catalog)?;
//!
//!     let pageview = client.catalog().event("$pageview").unwrap();
//!     let browser = client.catalog().property("$browser").unwrap();
//!
//!     let chart = client
//!         .query()
//!         .add_series(&pageview, SeriesSpec::new(Sampling::Total).label("Views"))
//!         .add_filter_group(FilterGroup::all().filter(PropertyFilter::exact(browser, "Chrome")))
//!         .execute(ExecuteOptions::new(ChartType::Line).date_from("Last 7 days"))
//!         .await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&chart)?);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod chart;
pub mod config;
pub mod posthog;
pub mod query;

// Re-export top-level types for convenience
pub use catalog::{EventCatalog, EventDescriptor, EventRef, PropertyDescriptor, PropertyRef, PropertyType};

pub use chart::{
    BarTotalChart, BarTotalRow, ChartData, NumberChart, PieChart, PieSlice, TableChart, TableRow,
    TimeSeriesChart, TimeSeriesRow, TrendResponse, TrendResult,
};

pub use query::{
    ChartType, DateSpec, ExecuteOptions, FilterGroup, FilterValue, Interval, LogicalOperator,
    Match, NamedDateRange, PropertyFilter, PropertyOperator, QueryError, QueryResult, Sampling,
    SeriesDefinition, SeriesSpec, TrendQuery,
};

pub use posthog::{HttpTransport, PostHogClient, Transport, TransportResponse};

pub use config::{Config, ConfigError, Credentials, LoggingConfig, PostHogConfig};
