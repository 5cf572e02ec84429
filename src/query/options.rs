//! Execution options
//!
//! Per-call parameters that are only known when a query runs: the chart
//! shape, date window, breakdown and comparison settings.

use crate::catalog::PropertyRef;
use crate::query::ast::LogicalOperator;
use crate::query::dates::{DateSpec, Interval};
use serde::{Deserialize, Serialize};

/// Requested chart shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    Line,
    Bar,
    Area,
    CumulativeLine,
    BarTotal,
    Pie,
    Number,
    Table,
}

impl ChartType {
    pub const ALL: [ChartType; 8] = [
        Self::Line,
        Self::Bar,
        Self::Area,
        Self::CumulativeLine,
        Self::BarTotal,
        Self::Pie,
        Self::Number,
        Self::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Area => "area",
            Self::CumulativeLine => "cumulative-line",
            Self::BarTotal => "bar-total",
            Self::Pie => "pie",
            Self::Number => "number",
            Self::Table => "table",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|chart| chart.as_str() == s)
    }

    /// PostHog `display` value for this chart
    pub fn display(&self) -> DisplayType {
        match self {
            Self::BarTotal => DisplayType::ActionsBarValue,
            Self::CumulativeLine => DisplayType::ActionsLineGraphCumulative,
            Self::Line => DisplayType::ActionsLineGraph,
            Self::Bar => DisplayType::ActionsBar,
            Self::Area => DisplayType::ActionsAreaGraph,
            Self::Number => DisplayType::BoldNumber,
            Self::Pie => DisplayType::ActionsPie,
            Self::Table => DisplayType::ActionsTable,
        }
    }

    /// Data key used when the caller does not override it
    pub fn default_data_key(&self) -> Option<&'static str> {
        match self {
            Self::Line | Self::Bar | Self::Area | Self::CumulativeLine => Some("date"),
            Self::Pie | Self::Number | Self::Table => Some("value"),
            Self::BarTotal => None,
        }
    }

    /// Whether the chart is drawn from per-date rows
    pub fn is_time_series(&self) -> bool {
        matches!(
            self,
            Self::Line | Self::Bar | Self::Area | Self::CumulativeLine
        )
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PostHog insight display modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayType {
    BoldNumber,
    ActionsLineGraph,
    ActionsTable,
    ActionsPie,
    ActionsBar,
    ActionsBarValue,
    ActionsLineGraphCumulative,
    ActionsAreaGraph,
}

/// Options consumed by a single execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteOptions {
    pub chart_type: ChartType,
    /// Overrides the output data key of pie and table charts
    pub data_key: Option<String>,
    /// How top-level filter groups combine
    pub filter_compare: LogicalOperator,
    pub date_from: Option<DateSpec>,
    pub date_to: Option<DateSpec>,
    pub explicit_date: Option<bool>,
    pub interval: Option<Interval>,
    pub breakdown: Option<PropertyRef>,
    pub breakdown_normalize_url: Option<bool>,
    pub breakdown_hide_other_aggregation: Option<bool>,
    pub compare: Option<bool>,
    pub formula: Option<String>,
    pub smoothing_intervals: Option<u32>,
    pub filter_test_accounts: bool,
    pub sampling_factor: Option<f64>,
    /// Send array parameters as repeated `key=value` pairs
    pub explode_arrays: bool,
}

impl ExecuteOptions {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            data_key: None,
            filter_compare: LogicalOperator::And,
            date_from: None,
            date_to: None,
            explicit_date: None,
            interval: None,
            breakdown: None,
            breakdown_normalize_url: None,
            breakdown_hide_other_aggregation: None,
            compare: None,
            formula: None,
            smoothing_intervals: None,
            filter_test_accounts: false,
            sampling_factor: None,
            explode_arrays: false,
        }
    }

    pub fn data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = Some(key.into());
        self
    }

    pub fn filter_compare(mut self, op: LogicalOperator) -> Self {
        self.filter_compare = op;
        self
    }

    pub fn date_from(mut self, date: impl Into<DateSpec>) -> Self {
        self.date_from = Some(date.into());
        self
    }

    pub fn date_to(mut self, date: impl Into<DateSpec>) -> Self {
        self.date_to = Some(date.into());
        self
    }

    pub fn explicit_date(mut self, explicit: bool) -> Self {
        self.explicit_date = Some(explicit);
        self
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn breakdown(mut self, property: PropertyRef) -> Self {
        self.breakdown = Some(property);
        self
    }

    pub fn breakdown_normalize_url(mut self, normalize: bool) -> Self {
        self.breakdown_normalize_url = Some(normalize);
        self
    }

    pub fn breakdown_hide_other_aggregation(mut self, hide: bool) -> Self {
        self.breakdown_hide_other_aggregation = Some(hide);
        self
    }

    /// Compare against the previous period
    pub fn compare(mut self, compare: bool) -> Self {
        self.compare = Some(compare);
        self
    }

    pub fn formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn smoothing_intervals(mut self, intervals: u32) -> Self {
        self.smoothing_intervals = Some(intervals);
        self
    }

    pub fn filter_test_accounts(mut self, filter: bool) -> Self {
        self.filter_test_accounts = filter;
        self
    }

    pub fn sampling_factor(mut self, factor: f64) -> Self {
        self.sampling_factor = Some(factor);
        self
    }

    pub fn explode_arrays(mut self, explode: bool) -> Self {
        self.explode_arrays = explode;
        self
    }

    /// Interval sent to the API: explicit, else the named range's default
    pub fn effective_interval(&self) -> Option<Interval> {
        self.interval.or_else(|| {
            self.date_from
                .as_ref()
                .and_then(DateSpec::named)
                .map(|range| range.default_interval())
        })
    }

    pub fn is_compare(&self) -> bool {
        self.compare.unwrap_or(false)
    }
}
