use super::{parse_anchor_date, AppState};
use crate::api::models::measurement::DataResponse;
use crate::catalog::Metric;
use crate::error::Result;
use crate::gapfill::{
    self, DenseSeries, FieldNames, NormalizeError, PeriodDescriptor, PeriodKind, Record,
};
use crate::repositories::MeasurementRepository;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Number;

type SeriesResponse = Json<DataResponse<DenseSeries<Number>>>;

pub async fn get_hourly(
    State((pool, config)): State<AppState>,
    Path((metric, date)): Path<(Metric, String)>,
) -> Result<SeriesResponse> {
    series(&pool, &config, metric, PeriodKind::HourOfDay, &date).await
}

pub async fn get_daily_for_week(
    State((pool, config)): State<AppState>,
    Path((metric, date)): Path<(Metric, String)>,
) -> Result<SeriesResponse> {
    series(&pool, &config, metric, PeriodKind::DayOfWeek, &date).await
}

pub async fn get_daily_for_month(
    State((pool, config)): State<AppState>,
    Path((metric, date)): Path<(Metric, String)>,
) -> Result<SeriesResponse> {
    series(&pool, &config, metric, PeriodKind::DayOfMonth, &date).await
}

pub async fn get_seven_day_period(
    State((pool, config)): State<AppState>,
    Path((metric, date)): Path<(Metric, String)>,
) -> Result<SeriesResponse> {
    series(&pool, &config, metric, PeriodKind::SevenDayWindow, &date).await
}

pub async fn get_monthly(
    State((pool, config)): State<AppState>,
    Path((metric, date)): Path<(Metric, String)>,
) -> Result<SeriesResponse> {
    series(&pool, &config, metric, PeriodKind::MonthOfYear, &date).await
}

async fn series(
    pool: &crate::db::DbPool,
    config: &crate::config::Config,
    metric: Metric,
    kind: PeriodKind,
    date: &str,
) -> Result<SeriesResponse> {
    let period = PeriodDescriptor::new(kind, parse_anchor_date(date)?);
    let source = metric.source(&config.warehouse);

    let (fields, fetched) = MeasurementRepository::fetch_series(pool, &source, &period).await?;
    let data = zero_filled(&period, fields, fetched)?;

    Ok(Json(DataResponse { data }))
}

/// Empty buckets are reported as an integral `0`.
fn zero_filled(
    period: &PeriodDescriptor,
    fields: FieldNames,
    fetched: Vec<Record<Number>>,
) -> std::result::Result<DenseSeries<Number>, NormalizeError> {
    gapfill::normalize_with_zero(period, fields, fetched, Number::from(0))
}
