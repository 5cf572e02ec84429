//! Request parameter assembly
//!
//! Turns accumulated series and filter groups plus [`ExecuteOptions`] into the
//! `insights/trend` parameter set, and encodes it as a query string.
//!
//! # Encoding
//!
//! ```text
//! null / absent       -> key omitted
//! object or array     -> key=<percent-encoded JSON text>
//! string/number/bool  -> key=<percent-encoded text>
//! exploded array      -> key=a&key=b  (one pair per element, in order)
//! ```

use crate::query::ast::{
    FilterGroup, FilterValue, LogicalOperator, PropertyFilter, PropertyOperator, Sampling,
    SeriesDefinition,
};
use crate::query::dates::{DateSpec, Interval};
use crate::query::error::{QueryError, QueryResult};
use crate::query::options::{DisplayType, ExecuteOptions};
use serde::Serialize;
use serde_json::{Map, Value};

/// Leaf condition of the filter tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPropertyFilter {
    pub key: String,
    pub operator: PropertyOperator,
    pub value: FilterValue,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl From<&PropertyFilter> for EventPropertyFilter {
    fn from(filter: &PropertyFilter) -> Self {
        Self {
            key: filter.property.key().to_string(),
            operator: filter.operator,
            value: filter.value.clone(),
            kind: "event",
        }
    }
}

/// Node of the filter tree: a leaf or a nested group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterNode {
    Property(EventPropertyFilter),
    Group(PropertyGroup),
}

/// `{type: AND|OR, values: [...]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyGroup {
    #[serde(rename = "type")]
    pub operator: LogicalOperator,
    pub values: Vec<FilterNode>,
}

impl PropertyGroup {
    /// Combine builder filter groups under `operator`, one nested group each
    pub fn from_groups(operator: LogicalOperator, groups: &[FilterGroup]) -> Self {
        Self {
            operator,
            values: groups
                .iter()
                .map(|group| {
                    FilterNode::Group(PropertyGroup {
                        operator: group.match_mode.operator(),
                        values: group
                            .filters
                            .iter()
                            .map(|f| FilterNode::Property(f.into()))
                            .collect(),
                    })
                })
                .collect(),
        }
    }
}

/// One requested series on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEntry {
    pub id: String,
    pub name: String,
    /// Position of the series; results come back in this order
    pub order: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub math: Sampling,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub math_property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyGroup>,
}

impl EventEntry {
    /// Map a series to its wire entry, rejecting statistical sampling
    /// without a companion property
    pub fn from_series(order: usize, series: &SeriesDefinition) -> QueryResult<Self> {
        let math_property = if series.sampling.is_statistical() {
            match &series.math_property {
                Some(property) => Some(property.clone()),
                None => {
                    return Err(QueryError::MissingMathProperty {
                        sampling: series.sampling,
                    })
                }
            }
        } else {
            None
        };

        let properties = if series.filters.is_empty() {
            None
        } else {
            Some(PropertyGroup::from_groups(LogicalOperator::And, &series.filters))
        };

        Ok(Self {
            id: series.event.clone(),
            name: series.event.clone(),
            order,
            kind: "events",
            math: series.sampling,
            math_property,
            properties,
        })
    }
}

/// Full parameter set of an `insights/trend` request
///
/// Optional fields serialize as `null` and are dropped by [`to_params`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendParams {
    pub insight: &'static str,
    pub refresh: bool,
    pub filter_test_accounts: bool,
    pub entity_type: &'static str,
    pub events: Vec<EventEntry>,
    pub properties: PropertyGroup,
    pub breakdown_type: &'static str,
    pub breakdown: Option<String>,
    pub display: DisplayType,
    pub breakdown_hide_other_aggregation: Option<bool>,
    pub breakdown_normalize_url: Option<bool>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub explicit_date: Option<bool>,
    pub interval: Option<Interval>,
    pub sampling_factor: Option<f64>,
    pub compare: Option<bool>,
    pub formula: Option<String>,
    pub smoothing_intervals: Option<u32>,
}

impl TrendParams {
    /// Assemble parameters; the first invalid series halts assembly
    pub fn build(
        series: &[SeriesDefinition],
        filter_groups: &[FilterGroup],
        options: &ExecuteOptions,
    ) -> QueryResult<Self> {
        let events = series
            .iter()
            .enumerate()
            .map(|(order, s)| EventEntry::from_series(order, s))
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(Self {
            insight: "TRENDS",
            refresh: false,
            filter_test_accounts: options.filter_test_accounts,
            entity_type: "events",
            events,
            properties: PropertyGroup::from_groups(options.filter_compare, filter_groups),
            breakdown_type: "event",
            breakdown: options.breakdown.as_ref().map(|p| p.key().to_string()),
            display: options.chart_type.display(),
            breakdown_hide_other_aggregation: options.breakdown_hide_other_aggregation,
            breakdown_normalize_url: options.breakdown_normalize_url,
            date_from: options.date_from.as_ref().map(DateSpec::resolve_start),
            date_to: options.date_to.as_ref().map(DateSpec::resolve_end),
            explicit_date: options.explicit_date,
            interval: options.effective_interval(),
            sampling_factor: options.sampling_factor,
            compare: options.compare,
            formula: options.formula.clone(),
            smoothing_intervals: options.smoothing_intervals,
        })
    }

    /// Encode as a query string
    pub fn to_query_string(&self, explode_arrays: bool) -> QueryResult<String> {
        match serde_json::to_value(self).map_err(QueryError::Encode)? {
            Value::Object(map) => Ok(to_params(&map, explode_arrays)),
            _ => Ok(String::new()),
        }
    }
}

/// Encode a parameter map as `key=value&...`
pub fn to_params(params: &Map<String, Value>, explode_arrays: bool) -> String {
    let mut pairs: Vec<(&str, &Value)> = Vec::with_capacity(params.len());

    for (key, value) in params.iter().filter(|(_, v)| !v.is_null()) {
        match value {
            Value::Array(items) if explode_arrays => {
                pairs.extend(items.iter().map(|item| (key.as_str(), item)));
            }
            _ => pairs.push((key.as_str(), value)),
        }
    }

    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, encode_value(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_value(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    urlencoding::encode(&text).into_owned()
}
