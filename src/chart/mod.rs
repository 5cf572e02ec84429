//! Chart Data
//!
//! Chart-ready shapes produced from a trends response. [`ChartData`] is the
//! only type handed to rendering code; it serializes with a `"type"` tag equal
//! to the requested chart type.
//!
//! ```text
//! line | bar | area | cumulative-line  -> TimeSeriesChart  (one row per date)
//! bar-total                            -> BarTotalChart    ({name, value} per series)
//! pie                                  -> PieChart         ({label, value} per series)
//! number                               -> NumberChart      ({label: value})
//! table                                -> TableChart       ({label, [breakdown], value})
//! ```

mod normalize;
mod response;

pub use normalize::{apply_compare_label, normalize};
pub use response::{PersonsUrl, TrendAction, TrendResponse, TrendResult};

use crate::query::ChartType;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Normalized chart output, tagged by chart type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChartData {
    Line(TimeSeriesChart),
    Bar(TimeSeriesChart),
    Area(TimeSeriesChart),
    CumulativeLine(TimeSeriesChart),
    BarTotal(BarTotalChart),
    Pie(PieChart),
    Number(NumberChart),
    Table(TableChart),
}

impl ChartData {
    /// The chart type this data was produced for
    pub fn chart_type(&self) -> ChartType {
        match self {
            Self::Line(_) => ChartType::Line,
            Self::Bar(_) => ChartType::Bar,
            Self::Area(_) => ChartType::Area,
            Self::CumulativeLine(_) => ChartType::CumulativeLine,
            Self::BarTotal(_) => ChartType::BarTotal,
            Self::Pie(_) => ChartType::Pie,
            Self::Number(_) => ChartType::Number,
            Self::Table(_) => ChartType::Table,
        }
    }

    /// Time-series payload, for any of the four per-date chart types
    pub fn as_time_series(&self) -> Option<&TimeSeriesChart> {
        match self {
            Self::Line(c) | Self::Bar(c) | Self::Area(c) | Self::CumulativeLine(c) => Some(c),
            _ => None,
        }
    }
}

/// Data key of every time-series chart
pub const DATE_KEY: &str = "date";

/// Rows keyed by date, one column per series label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesChart {
    pub data: Vec<TimeSeriesRow>,
    pub datakey: String,
}

/// One date position of a time series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub date: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl TimeSeriesRow {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a series column. A column named `date` would collide with the
    /// row's date key and is stored as `date (series)` instead.
    pub fn insert(&mut self, column: impl Into<String>, value: f64) {
        let mut column = column.into();
        if column == DATE_KEY {
            column.push_str(" (series)");
        }
        self.values.insert(column, value);
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTotalChart {
    pub data: Vec<BarTotalRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTotalRow {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub data: Vec<PieSlice>,
    pub datakey: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

/// A single aggregate, or a previous/current pair in comparison mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberChart {
    pub data: BTreeMap<String, f64>,
    /// The label the values were computed for
    pub datakey: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableChart {
    pub data: Vec<TableRow>,
    pub datakey: String,
}

/// Table row; the breakdown column is keyed by the breakdown property
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: String,
    /// `(property, value)` when a breakdown was requested
    pub breakdown: Option<(String, String)>,
    pub value: f64,
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.breakdown.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("label", &self.label)?;
        if let Some((column, value)) = &self.breakdown {
            map.serialize_entry(column, value)?;
        }
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_matches_chart_type() {
        let chart = ChartData::CumulativeLine(TimeSeriesChart {
            data: vec![],
            datakey: "date".into(),
        });
        assert_eq!(chart.chart_type(), ChartType::CumulativeLine);
        assert_eq!(
            serde_json::to_value(&chart).unwrap(),
            json!({"type": "cumulative-line", "data": [], "datakey": "date"})
        );
    }

    #[test]
    fn test_time_series_row_flattens_columns() {
        let mut row = TimeSeriesRow::new("2024-01-01");
        row.values.insert("Pageviews".into(), 5.0);
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"date": "2024-01-01", "Pageviews": 5.0})
        );
    }

    #[test]
    fn test_time_series_column_named_date_is_renamed() {
        let mut row = TimeSeriesRow::new("2024-01-01");
        row.insert("date", 5.0);
        row.insert("Visits", 2.0);

        assert_eq!(row.get("date (series)"), Some(5.0));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"date":"2024-01-01","Visits":2.0,"date (series)":5.0}"#
        );
    }

    #[test]
    fn test_table_row_breakdown_column() {
        let row = TableRow {
            label: "$pageview".into(),
            breakdown: Some(("$browser".into(), "Chrome".into())),
            value: 3.0,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"label": "$pageview", "$browser": "Chrome", "value": 3.0})
        );

        let plain = TableRow {
            breakdown: None,
            ..row
        };
        assert_eq!(
            serde_json::to_value(&plain).unwrap(),
            json!({"label": "$pageview", "value": 3.0})
        );
    }
}
