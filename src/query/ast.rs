//! Query vocabulary
//!
//! Types describing what a trends query asks for: series, their sampling
//! (aggregation) kind, and the property filters restricting which event
//! occurrences count.

use crate::catalog::PropertyRef;
use serde::{Deserialize, Serialize};

/// Reduction applied to an event's occurrences
///
/// Count-style kinds aggregate occurrences or actors. Statistical kinds
/// aggregate a numeric property and need a `math_property`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    Total,
    Dau,
    WeeklyActive,
    MonthlyActive,
    UniqueGroup,
    UniqueSession,
    MinCountPerActor,
    MaxCountPerActor,
    AvgCountPerActor,
    MedianCountPerActor,
    P90CountPerActor,
    P95CountPerActor,
    P99CountPerActor,
    Avg,
    Sum,
    Min,
    Max,
    Median,
    P90,
    P95,
    P99,
}

impl Sampling {
    pub const ALL: [Sampling; 21] = [
        Self::Total,
        Self::Dau,
        Self::WeeklyActive,
        Self::MonthlyActive,
        Self::UniqueGroup,
        Self::UniqueSession,
        Self::MinCountPerActor,
        Self::MaxCountPerActor,
        Self::AvgCountPerActor,
        Self::MedianCountPerActor,
        Self::P90CountPerActor,
        Self::P95CountPerActor,
        Self::P99CountPerActor,
        Self::Avg,
        Self::Sum,
        Self::Min,
        Self::Max,
        Self::Median,
        Self::P90,
        Self::P95,
        Self::P99,
    ];

    /// Whether this kind aggregates a numeric property
    pub fn is_statistical(&self) -> bool {
        matches!(
            self,
            Self::Avg
                | Self::Sum
                | Self::Min
                | Self::Max
                | Self::Median
                | Self::P90
                | Self::P95
                | Self::P99
        )
    }

    /// API token for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Dau => "dau",
            Self::WeeklyActive => "weekly_active",
            Self::MonthlyActive => "monthly_active",
            Self::UniqueGroup => "unique_group",
            Self::UniqueSession => "unique_session",
            Self::MinCountPerActor => "min_count_per_actor",
            Self::MaxCountPerActor => "max_count_per_actor",
            Self::AvgCountPerActor => "avg_count_per_actor",
            Self::MedianCountPerActor => "median_count_per_actor",
            Self::P90CountPerActor => "p90_count_per_actor",
            Self::P95CountPerActor => "p95_count_per_actor",
            Self::P99CountPerActor => "p99_count_per_actor",
            Self::Avg => "avg",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Median => "median",
            Self::P90 => "p90",
            Self::P95 => "p95",
            Self::P99 => "p99",
        }
    }

    /// Parse from an API token
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl std::fmt::Display for Sampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the filters inside one group combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Match {
    #[default]
    All,
    Any,
}

impl Match {
    pub fn operator(&self) -> LogicalOperator {
        match self {
            Self::All => LogicalOperator::And,
            Self::Any => LogicalOperator::Or,
        }
    }
}

/// Logical combinator in the wire filter tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

/// Comparison operators for property filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOperator {
    Exact,
    IsNot,
    Icontains,
    NotIcontains,
    Regex,
    NotRegex,
    Gt,
    Gte,
    Lt,
    Lte,
    IsSet,
    IsNotSet,
    IsDateExact,
    IsDateBefore,
    IsDateAfter,
    Between,
    NotBetween,
    Min,
    Max,
}

impl PropertyOperator {
    /// Parse from an API token
    pub fn parse(s: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(s.to_lowercase())).ok()
    }
}

/// A single element of a list-valued filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    String(String),
    Int(i64),
    Number(f64),
}

/// Value a property is compared against
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    /// Sent as a JSON integer; PostHog compares `exact` values as text
    Int(i64),
    Number(f64),
    List(Vec<ScalarValue>),
    #[default]
    Null,
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// A condition on one catalog property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFilter {
    pub property: PropertyRef,
    pub operator: PropertyOperator,
    pub value: FilterValue,
}

impl PropertyFilter {
    pub fn new(property: PropertyRef, operator: PropertyOperator, value: impl Into<FilterValue>) -> Self {
        Self {
            property,
            operator,
            value: value.into(),
        }
    }

    /// Shorthand for an `exact` match
    pub fn exact(property: PropertyRef, value: impl Into<FilterValue>) -> Self {
        Self::new(property, PropertyOperator::Exact, value)
    }
}

/// A set of property filters combined with ALL or ANY
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterGroup {
    pub match_mode: Match,
    pub filters: Vec<PropertyFilter>,
}

impl FilterGroup {
    /// Group whose filters must all hold
    pub fn all() -> Self {
        Self {
            match_mode: Match::All,
            filters: Vec::new(),
        }
    }

    /// Group where any filter holding is enough
    pub fn any() -> Self {
        Self {
            match_mode: Match::Any,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the group
    pub fn filter(mut self, filter: PropertyFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Everything about a series except the event it counts
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    sampling: Sampling,
    label: Option<String>,
    filters: Vec<FilterGroup>,
    math_property: Option<PropertyRef>,
}

impl SeriesSpec {
    pub fn new(sampling: Sampling) -> Self {
        Self {
            sampling,
            label: None,
            filters: Vec::new(),
            math_property: None,
        }
    }

    /// Display label used as the column / slice name in chart output
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Restrict the occurrences counted by this series only
    pub fn filter(mut self, group: FilterGroup) -> Self {
        self.filters.push(group);
        self
    }

    /// Numeric property aggregated by statistical sampling kinds
    pub fn math_property(mut self, property: PropertyRef) -> Self {
        self.math_property = Some(property);
        self
    }
}

/// A series as accumulated by the builder
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDefinition {
    /// Event name, always present in the catalog
    pub event: String,
    pub label: Option<String>,
    pub filters: Vec<FilterGroup>,
    pub sampling: Sampling,
    pub math_property: Option<String>,
}

impl SeriesDefinition {
    pub(crate) fn new(event: &str, spec: SeriesSpec) -> Self {
        Self {
            event: event.to_string(),
            label: spec.label,
            filters: spec.filters,
            sampling: spec.sampling,
            math_property: spec.math_property.map(|p| p.key().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistical_kinds() {
        let statistical: Vec<_> = Sampling::ALL
            .into_iter()
            .filter(Sampling::is_statistical)
            .map(|s| s.as_str())
            .collect();
        assert_eq!(
            statistical,
            vec!["avg", "sum", "min", "max", "median", "p90", "p95", "p99"]
        );
        assert!(!Sampling::AvgCountPerActor.is_statistical());
    }

    #[test]
    fn test_sampling_parse_matches_serde() {
        for kind in Sampling::ALL {
            assert_eq!(Sampling::parse(kind.as_str()), Some(kind));
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().to_string())
            );
        }
        assert_eq!(Sampling::parse("DAU"), Some(Sampling::Dau));
        assert_eq!(Sampling::parse("hogql"), None);
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(PropertyOperator::parse("not_icontains"), Some(PropertyOperator::NotIcontains));
        assert_eq!(PropertyOperator::parse("is_date_after"), Some(PropertyOperator::IsDateAfter));
        assert_eq!(PropertyOperator::parse("="), None);
    }

    #[test]
    fn test_match_maps_to_logical_operator() {
        assert_eq!(Match::All.operator(), LogicalOperator::And);
        assert_eq!(Match::Any.operator(), LogicalOperator::Or);
        assert_eq!(serde_json::to_string(&LogicalOperator::Or).unwrap(), r#""OR""#);
    }

    #[test]
    fn test_filter_value_serialization() {
        let list = FilterValue::List(vec![
            ScalarValue::String("chrome".into()),
            ScalarValue::Int(3),
            ScalarValue::Number(2.5),
        ]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["chrome",3,2.5]"#);
        assert_eq!(serde_json::to_string(&FilterValue::from(3i64)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&FilterValue::from(3.5)).unwrap(), "3.5");
        assert_eq!(serde_json::to_string(&FilterValue::Null).unwrap(), "null");
    }

    #[test]
    fn test_filter_value_keeps_integers_on_deserialize() {
        let value: FilterValue = serde_json::from_str("7").unwrap();
        assert_eq!(value, FilterValue::Int(7));
        let value: FilterValue = serde_json::from_str("7.25").unwrap();
        assert_eq!(value, FilterValue::Number(7.25));
    }
}
