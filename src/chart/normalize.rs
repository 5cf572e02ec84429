//! Response normalizers
//!
//! Pure functions from a [`TrendResponse`] and the requested series to a
//! [`ChartData`] variant. Result rows correlate with series by position, since
//! the API returns them in request order.

use super::{
    BarTotalChart, BarTotalRow, ChartData, NumberChart, PieChart, PieSlice, TableChart, TableRow,
    TimeSeriesChart, TimeSeriesRow, TrendResponse, TrendResult, DATE_KEY,
};
use crate::query::{ChartType, ExecuteOptions, SeriesDefinition};
use std::collections::BTreeMap;

/// Prefix `label` with a capitalized comparison label ("Current - Visits")
pub fn apply_compare_label(label: &str, compare_label: Option<&str>) -> String {
    let mut chars = match compare_label {
        Some(compare) if !compare.is_empty() => compare.chars(),
        _ => return label.to_string(),
    };
    let mut out = String::with_capacity(label.len() + 16);
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.push_str(chars.as_str());
    out.push_str(" - ");
    out.push_str(label);
    out
}

/// Build the chart for `options.chart_type`
pub fn normalize(
    response: &TrendResponse,
    series: &[SeriesDefinition],
    options: &ExecuteOptions,
) -> ChartData {
    match options.chart_type {
        ChartType::Line => ChartData::Line(time_series(response, series)),
        ChartType::Bar => ChartData::Bar(time_series(response, series)),
        ChartType::Area => ChartData::Area(time_series(response, series)),
        ChartType::CumulativeLine => ChartData::CumulativeLine(time_series(response, series)),
        ChartType::BarTotal => ChartData::BarTotal(bar_total(response, series)),
        ChartType::Pie => ChartData::Pie(pie(response, series, data_key(options))),
        ChartType::Number => ChartData::Number(number(response, series, options.is_compare())),
        ChartType::Table => ChartData::Table(table(
            response,
            options.breakdown.as_ref().map(|p| p.key()),
            data_key(options),
        )),
    }
}

fn data_key(options: &ExecuteOptions) -> String {
    options
        .data_key
        .clone()
        .or_else(|| options.chart_type.default_data_key().map(str::to_string))
        .unwrap_or_default()
}

/// Series label, else the API's label for the row
fn base_label<'a>(series: &'a [SeriesDefinition], index: usize, result: &'a TrendResult) -> &'a str {
    series
        .get(index)
        .and_then(|s| s.label.as_deref())
        .unwrap_or(result.label.as_str())
}

fn display_label(series: &[SeriesDefinition], index: usize, result: &TrendResult) -> String {
    apply_compare_label(
        base_label(series, index, result),
        result.compare_label.as_deref(),
    )
}

fn time_series(response: &TrendResponse, series: &[SeriesDefinition]) -> TimeSeriesChart {
    let positions = response.result.first().map_or(0, |r| r.days.len());
    let mut rows: Vec<Option<TimeSeriesRow>> = vec![None; positions];

    for (index, result) in response.result.iter().enumerate() {
        let label = display_label(series, index, result);

        for (position, value) in result.data.iter().enumerate() {
            let date = match result.days.get(position) {
                Some(date) if !date.is_empty() => date,
                _ => continue,
            };
            if position >= rows.len() {
                rows.resize(position + 1, None);
            }
            rows[position]
                .get_or_insert_with(|| TimeSeriesRow::new(date.as_str()))
                .insert(label.as_str(), *value);
        }
    }

    TimeSeriesChart {
        data: rows.into_iter().flatten().collect(),
        datakey: DATE_KEY.to_string(),
    }
}

fn bar_total(response: &TrendResponse, series: &[SeriesDefinition]) -> BarTotalChart {
    BarTotalChart {
        data: response
            .result
            .iter()
            .enumerate()
            .map(|(index, result)| BarTotalRow {
                name: display_label(series, index, result),
                value: result.aggregated_or_zero(),
            })
            .collect(),
    }
}

fn pie(response: &TrendResponse, series: &[SeriesDefinition], datakey: String) -> PieChart {
    PieChart {
        data: response
            .result
            .iter()
            .enumerate()
            .map(|(index, result)| PieSlice {
                label: display_label(series, index, result),
                value: result.aggregated_or_zero(),
            })
            .collect(),
        datakey,
    }
}

fn number(response: &TrendResponse, series: &[SeriesDefinition], compare: bool) -> NumberChart {
    let first = response.result.first();
    let label = series
        .first()
        .and_then(|s| s.label.clone())
        .or_else(|| {
            first
                .map(|r| r.label.clone())
                .filter(|label| !label.is_empty())
        })
        .unwrap_or_else(|| {
            ChartType::Number
                .default_data_key()
                .unwrap_or("value")
                .to_string()
        });

    let current = first.map_or(0.0, TrendResult::aggregated_or_zero);
    let mut data = BTreeMap::new();
    if compare {
        let previous = response
            .result
            .get(1)
            .map_or(0.0, TrendResult::aggregated_or_zero);
        data.insert(format!("Previous - {}", label), previous);
        data.insert(format!("Current - {}", label), current);
    } else {
        data.insert(label.clone(), current);
    }

    NumberChart {
        data,
        datakey: label,
    }
}

fn table(response: &TrendResponse, breakdown: Option<&str>, datakey: String) -> TableChart {
    TableChart {
        data: response
            .result
            .iter()
            .map(|result| {
                let action_id = result.action_id();
                TableRow {
                    label: apply_compare_label(action_id, result.compare_label.as_deref()),
                    breakdown: breakdown.map(|column| {
                        (
                            column.to_string(),
                            result
                                .label
                                .replacen(&format!("{} - ", action_id), "", 1),
                        )
                    }),
                    value: result.aggregated_or_zero(),
                }
            })
            .collect(),
        datakey,
    }
}
