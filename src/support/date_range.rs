//! Reporting windows: a named relative range or an explicit custom pair.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::PARAM_CUSTOM_DATE_RANGE;
use crate::error::{Error, Result};

/// Named reporting window as accepted in `dateRange`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum DateRange {
    #[serde(rename = "TODAY")]
    Today,
    #[serde(rename = "YESTERDAY")]
    Yesterday,
    #[serde(rename = "LAST_7_DAYS")]
    Last7Days,
    #[serde(rename = "LAST_14_DAYS")]
    Last14Days,
    #[default]
    #[serde(rename = "LAST_30_DAYS")]
    Last30Days,
    #[serde(rename = "LAST_BUSINESS_WEEK")]
    LastBusinessWeek,
    #[serde(rename = "THIS_MONTH")]
    ThisMonth,
    #[serde(rename = "LAST_MONTH")]
    LastMonth,
    #[serde(rename = "ALL_TIME")]
    AllTime,
    #[serde(rename = "CUSTOM")]
    Custom,
}

impl DateRange {
    pub const TOKENS: &'static [&'static str] = &[
        "TODAY",
        "YESTERDAY",
        "LAST_7_DAYS",
        "LAST_14_DAYS",
        "LAST_30_DAYS",
        "LAST_BUSINESS_WEEK",
        "THIS_MONTH",
        "LAST_MONTH",
        "ALL_TIME",
        "CUSTOM",
    ];
    pub const DEFAULT_TOKEN: &'static str = "LAST_30_DAYS";

    /// Token as written in the query language and in tool arguments
    pub const fn token(self) -> &'static str {
        match self {
            Self::Today => "TODAY",
            Self::Yesterday => "YESTERDAY",
            Self::Last7Days => "LAST_7_DAYS",
            Self::Last14Days => "LAST_14_DAYS",
            Self::Last30Days => "LAST_30_DAYS",
            Self::LastBusinessWeek => "LAST_BUSINESS_WEEK",
            Self::ThisMonth => "THIS_MONTH",
            Self::LastMonth => "LAST_MONTH",
            Self::AllTime => "ALL_TIME",
            Self::Custom => "CUSTOM",
        }
    }
}

/// Explicit `{startDate, endDate}` pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDateRange {
    pub start_date: String,
    pub end_date:   String,
}

/// Resolved date condition for a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateWindow {
    /// `segments.date DURING <token>`
    Named(DateRange),
    /// `segments.date BETWEEN 'start' AND 'end'`
    Between { start: NaiveDate, end: NaiveDate },
    /// No date condition
    AllTime,
}

impl DateWindow {
    /// Combine the named choice with the optional explicit pair
    ///
    /// The pair is only consulted for `CUSTOM` and is then mandatory.
    pub fn resolve(range: DateRange, custom: Option<&CustomDateRange>) -> Result<Self> {
        match range {
            DateRange::AllTime => Ok(Self::AllTime),
            DateRange::Custom => {
                let custom = custom.ok_or_else(|| {
                    Error::validation(
                        PARAM_CUSTOM_DATE_RANGE,
                        "is required when dateRange is CUSTOM",
                    )
                })?;
                let start = parse_date(&custom.start_date, "customDateRange.startDate")?;
                let end = parse_date(&custom.end_date, "customDateRange.endDate")?;
                if start > end {
                    return Err(Error::validation(
                        PARAM_CUSTOM_DATE_RANGE,
                        format!("startDate {start} is after endDate {end}"),
                    ));
                }
                Ok(Self::Between { start, end })
            }
            named => Ok(Self::Named(named)),
        }
    }

    /// Condition to conjoin into the `WHERE` clause, if any
    pub fn condition(&self) -> Option<String> {
        match self {
            Self::Named(range) => Some(format!("segments.date DURING {}", range.token())),
            Self::Between { start, end } => Some(format!(
                "segments.date BETWEEN '{}' AND '{}'",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            )),
            Self::AllTime => None,
        }
    }

    /// Caller-facing description echoed in report results
    pub fn label(&self) -> String {
        match self {
            Self::Named(range) => range.token().to_string(),
            Self::Between { start, end } => {
                format!("{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            Self::AllTime => DateRange::AllTime.token().to_string(),
        }
    }
}

fn parse_date(text: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| Error::validation(field, format!("'{text}' is not a date in YYYY-MM-DD form")))
}
