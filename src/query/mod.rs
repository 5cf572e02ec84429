//! Typelytics Query Engine
//!
//! Builds PostHog trends requests from typed series and filters:
//!
//! - **AST**: series, sampling kinds and property filters
//! - **Builder**: immutable accumulation of series and filter groups
//! - **Dates**: named date ranges and literal date bounds
//! - **Params**: request parameter assembly and query-string encoding
//! - **Executor**: runs the request and normalizes the response
//!
//! # Examples
//!
//! ```rust,ignore
//! use typelytics::query::{ChartType, ExecuteOptions, Sampling, SeriesSpec};
//!
//! let purchase = client.catalog().event("purchase").unwrap();
//! let amount = purchase.property("amount").unwrap();
//!
//! let chart = client
//!     .query()
//!     .add_series(&purchase, SeriesSpec::new(Sampling::Sum).math_property(amount))
//!     .execute(
//!         ExecuteOptions::new(ChartType::Number)
//!             .date_from("Last 30 days")
//!             .compare(true),
//!     )
//!     .await?;
//! ```

mod ast;
mod builder;
mod dates;
mod error;
mod executor;
mod options;
mod params;

pub use ast::{
    FilterGroup, FilterValue, LogicalOperator, Match, PropertyFilter, PropertyOperator,
    Sampling, ScalarValue, SeriesDefinition, SeriesSpec,
};
pub use builder::TrendQuery;
pub use dates::{DateSpec, Interval, NamedDateRange};
pub use error::{QueryError, QueryResult};
pub use executor::QueryExecutor;
pub use options::{ChartType, DisplayType, ExecuteOptions};
pub use params::{to_params, EventEntry, EventPropertyFilter, FilterNode, PropertyGroup, TrendParams};
