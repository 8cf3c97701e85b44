//! Date filters for selecting the records shown on the dashboard.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, PrimitiveDateTime};

use crate::{Error, owner::OwnerId, record::TransactionRecord};

/// The date filter options offered in the filter bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilterKind {
    /// See [DateFilter::Today].
    #[serde(rename = "today")]
    Today,
    /// See [DateFilter::Last7Days].
    #[serde(rename = "last-7-days")]
    Last7Days,
    /// See [DateFilter::Last30Days].
    #[default]
    #[serde(rename = "last-30-days")]
    Last30Days,
    /// See [DateFilter::ThisMonth].
    #[serde(rename = "this-month")]
    ThisMonth,
    /// See [DateFilter::Custom].
    #[serde(rename = "custom")]
    Custom,
}

impl DateFilterKind {
    /// Every option, in the order shown in the filter bar.
    pub const ALL: [DateFilterKind; 5] = [
        DateFilterKind::Today,
        DateFilterKind::Last7Days,
        DateFilterKind::Last30Days,
        DateFilterKind::ThisMonth,
        DateFilterKind::Custom,
    ];

    /// The value sent in the `range` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Last7Days => "last-7-days",
            Self::Last30Days => "last-30-days",
            Self::ThisMonth => "this-month",
            Self::Custom => "custom",
        }
    }

    /// The name shown in the filter bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::ThisMonth => "This month",
            Self::Custom => "Custom",
        }
    }
}

/// Selects records by their posted date.
///
/// The relative filters are evaluated against the current local date and time
/// passed to [DateFilter::matches].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DateFilter {
    /// Records posted on the current day.
    #[serde(rename = "today")]
    Today,
    /// Records posted within the last seven days, up to now.
    #[serde(rename = "last-7-days")]
    Last7Days,
    /// Records posted within the last thirty days, up to now.
    #[serde(rename = "last-30-days")]
    Last30Days,
    /// Records posted in the current calendar month.
    #[serde(rename = "this-month")]
    ThisMonth,
    /// Records posted between `start` and `end` inclusive.
    ///
    /// If either bound is missing the filter matches every record.
    #[serde(rename = "custom")]
    Custom {
        /// The first day included.
        start: Option<Date>,
        /// The last day included.
        end: Option<Date>,
    },
}

impl Default for DateFilter {
    fn default() -> Self {
        Self::Last30Days
    }
}

impl DateFilter {
    /// Create a custom filter.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if both dates are given and `start` is after `end`.
    pub fn custom(start: Option<Date>, end: Option<Date>) -> Result<Self, Error> {
        match (start, end) {
            (Some(start), Some(end)) if start > end => Err(Error::InvalidDateRange { start, end }),
            _ => Ok(Self::Custom { start, end }),
        }
    }

    /// Create a filter from the options submitted by the filter bar.
    ///
    /// The dates are ignored for every kind except [DateFilterKind::Custom].
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] for a custom filter with reversed dates.
    pub fn from_parts(
        kind: DateFilterKind,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<Self, Error> {
        match kind {
            DateFilterKind::Today => Ok(Self::Today),
            DateFilterKind::Last7Days => Ok(Self::Last7Days),
            DateFilterKind::Last30Days => Ok(Self::Last30Days),
            DateFilterKind::ThisMonth => Ok(Self::ThisMonth),
            DateFilterKind::Custom => Self::custom(start, end),
        }
    }

    /// The filter bar option for this filter.
    pub fn kind(&self) -> DateFilterKind {
        match self {
            Self::Today => DateFilterKind::Today,
            Self::Last7Days => DateFilterKind::Last7Days,
            Self::Last30Days => DateFilterKind::Last30Days,
            Self::ThisMonth => DateFilterKind::ThisMonth,
            Self::Custom { .. } => DateFilterKind::Custom,
        }
    }

    /// The text shown on the filter button, e.g. "Last 7 days" or "05/01 - 20/01".
    pub fn label(&self) -> String {
        match self {
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => format!("{} - {}", day_month(*start), day_month(*end)),
            filter => filter.kind().label().to_owned(),
        }
    }

    /// Whether a record posted on `posted_date` passes the filter at the local time `now`.
    ///
    /// Posted dates are compared as midnight on that day, so the rolling
    /// windows include the day `now - N days` only when `now` is exactly midnight.
    pub fn matches(&self, posted_date: Date, now: PrimitiveDateTime) -> bool {
        match self {
            Self::Today => posted_date == now.date(),
            Self::Last7Days => within_last_days(posted_date, now, 7),
            Self::Last30Days => within_last_days(posted_date, now, 30),
            Self::ThisMonth => month_range(now.year(), now.month()).contains(posted_date),
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => (*start..=*end).contains(&posted_date),
            Self::Custom { .. } => true,
        }
    }
}

/// Keep the records that belong to `owner_id` (if given) and pass `filter` at the local time `now`.
///
/// The input order is preserved, but callers should not rely on it being chronological.
pub fn filter_records(
    records: &[TransactionRecord],
    owner_id: Option<OwnerId>,
    filter: &DateFilter,
    now: PrimitiveDateTime,
) -> Vec<TransactionRecord> {
    records
        .iter()
        .filter(|record| record.is_owned_by(owner_id))
        .filter(|record| filter.matches(record.posted_date(), now))
        .cloned()
        .collect()
}

fn within_last_days(posted_date: Date, now: PrimitiveDateTime, days: i64) -> bool {
    let posted_at = posted_date.midnight();
    let window_start = now - Duration::days(days);

    window_start <= posted_at && posted_at <= now
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls within the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The first and last day of a calendar month.
pub fn month_range(year: i32, month: Month) -> DateRange {
    // Day 1 and the last day always exist, so these only fail for years outside `time`'s range.
    let start = Date::from_calendar_date(year, month, 1).unwrap_or(Date::MIN);
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .unwrap_or(Date::MAX);

    DateRange { start, end }
}

/// The calendar month before the one containing `date`.
pub fn previous_month_range(date: Date) -> DateRange {
    let month = date.month().previous();
    let year = if month == Month::December {
        date.year() - 1
    } else {
        date.year()
    };

    month_range(year, month)
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn day_month(date: Date) -> String {
    format!("{:02}/{:02}", date.day(), u8::from(date.month()))
}
