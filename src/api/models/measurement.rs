use crate::gapfill::PeriodKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Envelope every measurement endpoint answers with.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Date span a single-value summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummarySpan {
    Day,
    Week,
    SevenDayPeriod,
    Month,
    Year,
}

impl SummarySpan {
    /// The bucketed period with the same date range; its bucket count is the
    /// divisor for per-bucket averages.
    pub fn period_kind(self) -> PeriodKind {
        match self {
            SummarySpan::Day => PeriodKind::HourOfDay,
            SummarySpan::Week => PeriodKind::DayOfWeek,
            SummarySpan::SevenDayPeriod => PeriodKind::SevenDayWindow,
            SummarySpan::Month => PeriodKind::DayOfMonth,
            SummarySpan::Year => PeriodKind::MonthOfYear,
        }
    }
}

/// Single-aggregate queries return NULL instead of no row when the span has
/// no data; report that as `{key: 0}`.
pub fn null_to_zero(key: &str, value: Option<f64>) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert(key.to_owned(), value.map_or_else(|| json!(0), |v| json!(v)));
    record
}
