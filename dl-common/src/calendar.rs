//! Day-of-year calendar helpers
//!
//! Daily lessons are addressed by day of year (1-366). These helpers convert
//! between that index and calendar dates for URLs, labels and curriculum
//! lookups.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

/// One calendar day with its display forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day_of_year: u32,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    /// URL form, `YYYYMMDD`
    pub formatted_date: String,
    pub month: String,
    pub day_of_month: u32,
    pub weekday: String,
}

/// Day of year (1-based) for a date
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Today's day of year (UTC)
pub fn current_day_of_year() -> u32 {
    day_of_year(Utc::now().date_naive())
}

/// Date for a day of year; `None` when the day does not exist in that year
pub fn date_from_day_of_year(year: i32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_yo_opt(year, day)
}

/// `YYYYMMDD`
pub fn format_date_for_url(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Number of days in a year (365 or 366)
pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// Human label such as `"January 1"`
pub fn date_label(date: NaiveDate) -> String {
    format!("{} {}", date.format("%B"), date.day())
}

/// Describe a single day
pub fn calendar_day(date: NaiveDate) -> CalendarDay {
    CalendarDay {
        day_of_year: date.ordinal(),
        date: date.format("%Y-%m-%d").to_string(),
        formatted_date: format_date_for_url(date),
        month: date.format("%B").to_string(),
        day_of_month: date.day(),
        weekday: date.format("%A").to_string(),
    }
}

/// Every day of the year, in order
pub fn all_days(year: i32) -> Vec<CalendarDay> {
    (1..=days_in_year(year))
        .filter_map(|day| date_from_day_of_year(year, day))
        .map(calendar_day)
        .collect()
}
