use super::NormalizeError;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one time slot within a reporting period.
///
/// Serializes as a bare number, or as `YYYY-MM-DD` for calendar dates, so a
/// dense series can be handed to the JSON layer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum BucketId {
    /// Hour of day, 0..=23
    Hour(u32),
    /// Day of month, 1..=days_in_month
    Day(u32),
    /// Calendar date (day-of-week and trailing 7-day periods)
    Date(NaiveDate),
    /// Month of year, 1..=12
    Month(u32),
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketId::Hour(h) => write!(f, "hour {}", h),
            BucketId::Day(d) => write!(f, "day {}", d),
            BucketId::Date(date) => write!(f, "date {}", date),
            BucketId::Month(m) => write!(f, "month {}", m),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    HourOfDay,
    DayOfWeek,
    DayOfMonth,
    SevenDayWindow,
    MonthOfYear,
}

impl PeriodKind {
    /// Column name the bucket is reported under when a query returned no rows.
    pub fn default_bucket_key(self) -> &'static str {
        match self {
            PeriodKind::HourOfDay => "hour",
            PeriodKind::DayOfWeek | PeriodKind::SevenDayWindow => "date",
            PeriodKind::DayOfMonth => "day",
            PeriodKind::MonthOfYear => "month",
        }
    }
}

/// A period kind pinned to an anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodDescriptor {
    pub kind: PeriodKind,
    pub anchor: NaiveDate,
}

impl PeriodDescriptor {
    pub fn new(kind: PeriodKind, anchor: NaiveDate) -> Self {
        Self { kind, anchor }
    }

    /// The complete, ascending bucket sequence for this period.
    pub fn buckets(&self) -> Result<Vec<BucketId>, NormalizeError> {
        match self.kind {
            PeriodKind::HourOfDay => Ok(hours_of_day()),
            PeriodKind::DayOfWeek => days_of_week(self.anchor),
            PeriodKind::DayOfMonth => days_of_month(self.anchor.year(), self.anchor.month()),
            PeriodKind::SevenDayWindow => seven_day_window(self.anchor),
            PeriodKind::MonthOfYear => Ok(months_of_year()),
        }
    }

    /// Inclusive date range an aggregation query has to cover to fill every bucket.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), NormalizeError> {
        let anchor = self.anchor;
        match self.kind {
            PeriodKind::HourOfDay => Ok((anchor, anchor)),
            PeriodKind::DayOfWeek => {
                let monday = week_start(anchor)?;
                Ok((monday, shift_days(monday, 6, anchor)?))
            }
            PeriodKind::SevenDayWindow => Ok((window_start(anchor)?, anchor)),
            PeriodKind::DayOfMonth => {
                let (year, month) = (anchor.year(), anchor.month());
                let first = first_of_month(year, month)?;
                let last = days_in_month(year, month)?;
                Ok((first, first.with_day(last).ok_or(invalid(year, month))?))
            }
            PeriodKind::MonthOfYear => {
                let year = anchor.year();
                let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(invalid(year, 1))?;
                let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(invalid(year, 12))?;
                Ok((first, last))
            }
        }
    }
}

pub fn hours_of_day() -> Vec<BucketId> {
    (0..24).map(BucketId::Hour).collect()
}

pub fn months_of_year() -> Vec<BucketId> {
    (1..=12).map(BucketId::Month).collect()
}

pub fn days_of_month(year: i32, month: u32) -> Result<Vec<BucketId>, NormalizeError> {
    let days = days_in_month(year, month)?;
    Ok((1..=days).map(BucketId::Day).collect())
}

/// The seven dates of the ISO week (Monday first) that contains `anchor`.
pub fn days_of_week(anchor: NaiveDate) -> Result<Vec<BucketId>, NormalizeError> {
    consecutive_dates(week_start(anchor)?, anchor)
}

/// The seven dates ending at and including `anchor`.
pub fn seven_day_window(anchor: NaiveDate) -> Result<Vec<BucketId>, NormalizeError> {
    consecutive_dates(window_start(anchor)?, anchor)
}

/// Number of days in `month` of `year` in the proleptic Gregorian calendar.
///
/// Measured as the distance between the first of this month and the first of
/// the next, so February follows the full 4/100/400 leap-year rule.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, NormalizeError> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok(next.signed_duration_since(first).num_days() as u32)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, NormalizeError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid(year, month))
}

fn week_start(anchor: NaiveDate) -> Result<NaiveDate, NormalizeError> {
    let offset = anchor.weekday().num_days_from_monday() as u64;
    anchor
        .checked_sub_days(Days::new(offset))
        .ok_or(invalid(anchor.year(), anchor.month()))
}

fn window_start(anchor: NaiveDate) -> Result<NaiveDate, NormalizeError> {
    anchor
        .checked_sub_days(Days::new(6))
        .ok_or(invalid(anchor.year(), anchor.month()))
}

fn shift_days(start: NaiveDate, days: u64, anchor: NaiveDate) -> Result<NaiveDate, NormalizeError> {
    start
        .checked_add_days(Days::new(days))
        .ok_or(invalid(anchor.year(), anchor.month()))
}

fn consecutive_dates(start: NaiveDate, anchor: NaiveDate) -> Result<Vec<BucketId>, NormalizeError> {
    (0..7)
        .map(|i| shift_days(start, i, anchor).map(BucketId::Date))
        .collect()
}

fn invalid(year: i32, month: u32) -> NormalizeError {
    NormalizeError::InvalidDate { year, month }
}
