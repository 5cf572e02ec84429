//! Trends API response shape
//!
//! Deserialization targets for `GET insights/trend/`. Only the fields the
//! normalizers read are required; everything else defaults.

use serde::{Deserialize, Serialize};

/// Top-level response body
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrendResponse {
    /// Always "Trends"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_cached: bool,
    #[serde(default)]
    pub last_refresh: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub result: Vec<TrendResult>,
}

/// The action a result row was computed for
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TrendAction {
    #[serde(default)]
    pub id: String,
}

/// Link to the persons behind a data point
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PersonsUrl {
    pub url: String,
}

/// One result row: a series (or one breakdown value of a series)
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TrendResult {
    #[serde(default)]
    pub count: f64,
    /// Values aligned with `days`
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub action: Option<TrendAction>,
    #[serde(default)]
    pub dates: Option<Vec<String>>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub breakdown_value: Option<serde_json::Value>,
    #[serde(default)]
    pub aggregated_value: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub compare: Option<bool>,
    #[serde(default)]
    pub compare_label: Option<String>,
    #[serde(default)]
    pub persons_urls: Option<Vec<PersonsUrl>>,
}

impl TrendResult {
    /// Action identifier, falling back to the label for formula rows
    pub fn action_id(&self) -> &str {
        match &self.action {
            Some(action) if !action.id.is_empty() => &action.id,
            _ => &self.label,
        }
    }

    pub fn aggregated_or_zero(&self) -> f64 {
        self.aggregated_value.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_trend_response() {
        let body = r#"{
            "type": "Trends",
            "is_cached": true,
            "last_refresh": "2024-01-08T10:00:00Z",
            "timezone": "UTC",
            "next": null,
            "result": [{
                "count": 12,
                "data": [5, 7],
                "days": ["2024-01-01", "2024-01-02"],
                "labels": ["1-Jan-2024", "2-Jan-2024"],
                "action": {"id": "$pageview", "name": "$pageview", "order": 0},
                "label": "$pageview",
                "aggregated_value": 12,
                "breakdown_value": 3,
                "compare": true,
                "compare_label": "current",
                "persons_urls": [{"url": "/api/person/1"}]
            }]
        }"#;

        let response: TrendResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.kind.as_deref(), Some("Trends"));
        assert!(response.is_cached);
        assert_eq!(response.result.len(), 1);

        let row = &response.result[0];
        assert_eq!(row.data, vec![5.0, 7.0]);
        assert_eq!(row.action_id(), "$pageview");
        assert_eq!(row.aggregated_value, Some(12.0));
        assert_eq!(row.breakdown_value, Some(serde_json::json!(3)));
        assert_eq!(row.compare_label.as_deref(), Some("current"));
        assert_eq!(row.persons_urls.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_minimal_result_row() {
        let row: TrendResult = serde_json::from_str(r#"{"label": "Formula (A+B)"}"#).unwrap();
        assert_eq!(row.action_id(), "Formula (A+B)");
        assert_eq!(row.aggregated_or_zero(), 0.0);
        assert!(row.days.is_empty());
    }
}
