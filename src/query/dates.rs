//! Date windows
//!
//! PostHog accepts literal dates (`2024-01-31`) and its own relative syntax
//! (`-7d`, `-24h`, `mStart`). Callers can also use human-named ranges such as
//! "Last 7 days", which resolve through a closed table to relative tokens and
//! a default interval.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Time bucket granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Hour,
    Day,
    Week,
    Month,
}

impl Interval {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hour" | "h" => Some(Self::Hour),
            "day" | "d" => Some(Self::Day),
            "week" | "w" => Some(Self::Week),
            "month" | "m" => Some(Self::Month),
            _ => None,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
        }
    }
}

/// Human-named date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedDateRange {
    Today,
    Yesterday,
    Last24Hours,
    Last48Hours,
    Last7Days,
    Last14Days,
    Last30Days,
    Last90Days,
    Last180Days,
    ThisMonth,
    PreviousMonth,
    YearToDate,
    AllTime,
}

impl NamedDateRange {
    pub const ALL: [NamedDateRange; 13] = [
        Self::Today,
        Self::Yesterday,
        Self::Last24Hours,
        Self::Last48Hours,
        Self::Last7Days,
        Self::Last14Days,
        Self::Last30Days,
        Self::Last90Days,
        Self::Last180Days,
        Self::ThisMonth,
        Self::PreviousMonth,
        Self::YearToDate,
        Self::AllTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Last24Hours => "Last 24 hours",
            Self::Last48Hours => "Last 48 hours",
            Self::Last7Days => "Last 7 days",
            Self::Last14Days => "Last 14 days",
            Self::Last30Days => "Last 30 days",
            Self::Last90Days => "Last 90 days",
            Self::Last180Days => "Last 180 days",
            Self::ThisMonth => "This month",
            Self::PreviousMonth => "Previous month",
            Self::YearToDate => "Year to date",
            Self::AllTime => "All time",
        }
    }

    /// Relative-date tokens for this range. Ranges with a fixed end carry a
    /// second (end) token.
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Today => &["dStart"],
            Self::Yesterday => &["-1dStart", "-1dEnd"],
            Self::Last24Hours => &["-24h"],
            Self::Last48Hours => &["-48h"],
            Self::Last7Days => &["-7d"],
            Self::Last14Days => &["-14d"],
            Self::Last30Days => &["-30d"],
            Self::Last90Days => &["-90d"],
            Self::Last180Days => &["-180d"],
            Self::ThisMonth => &["mStart"],
            Self::PreviousMonth => &["-1mStart", "-1mEnd"],
            Self::YearToDate => &["yStart"],
            Self::AllTime => &["all"],
        }
    }

    /// Token used when the range bounds the start of the window
    pub fn start_token(&self) -> &'static str {
        self.tokens()[0]
    }

    /// Token used when the range bounds the end of the window
    pub fn end_token(&self) -> &'static str {
        let tokens = self.tokens();
        tokens[tokens.len() - 1]
    }

    pub fn default_interval(&self) -> Interval {
        match self {
            Self::Today | Self::Yesterday | Self::Last24Hours | Self::Last48Hours => Interval::Hour,
            Self::Last7Days
            | Self::Last14Days
            | Self::Last30Days
            | Self::Last90Days
            | Self::ThisMonth
            | Self::PreviousMonth => Interval::Day,
            Self::Last180Days | Self::YearToDate | Self::AllTime => Interval::Month,
        }
    }

    /// Look up a range by its label (exact match)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.label() == label)
    }
}

impl std::fmt::Display for NamedDateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One bound of the query's date window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSpec {
    /// A human-named range from the table above
    Named(NamedDateRange),
    /// A calendar date, sent as `YYYY-MM-DD`
    Date(NaiveDate),
    /// Any other value, passed to the API unchanged (e.g. `-3d`)
    Relative(String),
}

impl DateSpec {
    /// Classify a user-supplied date string
    pub fn parse(s: &str) -> Self {
        if let Some(range) = NamedDateRange::from_label(s) {
            return Self::Named(range);
        }
        // only canonical YYYY-MM-DD is a Date, so the text goes out as given
        match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) if date.format("%Y-%m-%d").to_string() == s => Self::Date(date),
            _ => Self::Relative(s.to_string()),
        }
    }

    /// Value sent as `date_from`
    pub fn resolve_start(&self) -> String {
        match self {
            Self::Named(range) => range.start_token().to_string(),
            other => other.literal(),
        }
    }

    /// Value sent as `date_to`
    pub fn resolve_end(&self) -> String {
        match self {
            Self::Named(range) => range.end_token().to_string(),
            other => other.literal(),
        }
    }

    pub fn named(&self) -> Option<NamedDateRange> {
        match self {
            Self::Named(range) => Some(*range),
            _ => None,
        }
    }

    fn literal(&self) -> String {
        match self {
            Self::Named(range) => range.label().to_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::Relative(value) => value.clone(),
        }
    }
}

impl From<&str> for DateSpec {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<NamedDateRange> for DateSpec {
    fn from(value: NamedDateRange) -> Self {
        Self::Named(value)
    }
}

impl From<NaiveDate> for DateSpec {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_7_days() {
        let spec = DateSpec::parse("Last 7 days");
        assert_eq!(spec, DateSpec::Named(NamedDateRange::Last7Days));
        assert_eq!(spec.resolve_start(), "-7d");
        assert_eq!(NamedDateRange::Last7Days.default_interval(), Interval::Day);
    }

    #[test]
    fn test_two_token_ranges() {
        let yesterday = DateSpec::parse("Yesterday");
        assert_eq!(yesterday.resolve_start(), "-1dStart");
        assert_eq!(yesterday.resolve_end(), "-1dEnd");

        let previous = DateSpec::from(NamedDateRange::PreviousMonth);
        assert_eq!(previous.resolve_start(), "-1mStart");
        assert_eq!(previous.resolve_end(), "-1mEnd");
    }

    #[test]
    fn test_single_token_range_uses_same_token_for_both_bounds() {
        let spec = DateSpec::parse("This month");
        assert_eq!(spec.resolve_start(), "mStart");
        assert_eq!(spec.resolve_end(), "mStart");
    }

    #[test]
    fn test_literals_pass_through() {
        let date = DateSpec::parse("2024-01-31");
        assert_eq!(date, DateSpec::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert_eq!(date.resolve_start(), "2024-01-31");

        let relative = DateSpec::parse("-3d");
        assert_eq!(relative, DateSpec::Relative("-3d".to_string()));
        assert_eq!(relative.resolve_end(), "-3d");
        assert!(relative.named().is_none());

        // non-canonical dates are sent exactly as written
        let loose = DateSpec::parse("2024-1-5");
        assert_eq!(loose, DateSpec::Relative("2024-1-5".to_string()));
        assert_eq!(loose.resolve_start(), "2024-1-5");
        assert_eq!(loose.resolve_end(), "2024-1-5");

        // labels are matched exactly
        assert_eq!(DateSpec::parse("last 7 days").resolve_start(), "last 7 days");
    }

    #[test]
    fn test_every_range_has_round_trippable_label() {
        for range in NamedDateRange::ALL {
            assert_eq!(NamedDateRange::from_label(range.label()), Some(range));
            assert!(!range.tokens().is_empty());
        }
    }

    #[test]
    fn test_interval_parse() {
        assert_eq!(Interval::parse("Week"), Some(Interval::Week));
        assert_eq!(Interval::parse("m"), Some(Interval::Month));
        assert_eq!(Interval::parse("year"), None);
        assert_eq!(Interval::Hour.to_string(), "hour");
    }
}
