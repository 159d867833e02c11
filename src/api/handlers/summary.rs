use super::{parse_anchor_date, AppState};
use crate::api::models::measurement::{null_to_zero, DataResponse, SummarySpan};
use crate::catalog::{Aggregate, Metric};
use crate::error::{AppError, Result};
use crate::gapfill::{NormalizeError, PeriodDescriptor};
use crate::repositories::MeasurementRepository;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{Map, Value};

type SummaryResponse = Json<DataResponse<Vec<Map<String, Value>>>>;

pub async fn get_sum(
    State((pool, config)): State<AppState>,
    Path((metric, span, date)): Path<(Metric, SummarySpan, String)>,
) -> Result<SummaryResponse> {
    let source = metric.source(&config.warehouse);
    if source.aggregate != Aggregate::Sum {
        return Err(AppError::InvalidInput(format!(
            "{} is an averaged metric and has no sum",
            metric
        )));
    }

    let period = PeriodDescriptor::new(span.period_kind(), parse_anchor_date(&date)?);
    let (from, to) = period.date_range()?;
    let total =
        MeasurementRepository::fetch_total(&pool, &source, Aggregate::Sum, from, to).await?;

    Ok(Json(DataResponse {
        data: vec![null_to_zero(metric.summary_key(Aggregate::Sum), total)],
    }))
}

/// Energy metrics report the span total spread over the span's buckets
/// (per hour of a day, per day of a week or month, per month of a year);
/// averaged metrics such as temperature use the plain average.
pub async fn get_avg(
    State((pool, config)): State<AppState>,
    Path((metric, span, date)): Path<(Metric, SummarySpan, String)>,
) -> Result<SummaryResponse> {
    let source = metric.source(&config.warehouse);
    let period = PeriodDescriptor::new(span.period_kind(), parse_anchor_date(&date)?);
    let (from, to) = period.date_range()?;

    let avg = match source.aggregate {
        Aggregate::Sum => {
            let total =
                MeasurementRepository::fetch_total(&pool, &source, Aggregate::Sum, from, to)
                    .await?;
            per_bucket_average(total, &period)?
        }
        Aggregate::Avg => {
            MeasurementRepository::fetch_total(&pool, &source, Aggregate::Avg, from, to).await?
        }
    };

    Ok(Json(DataResponse {
        data: vec![null_to_zero(metric.summary_key(Aggregate::Avg), avg)],
    }))
}

/// Span total divided by the number of buckets the period holds.
pub fn per_bucket_average(
    total: Option<f64>,
    period: &PeriodDescriptor,
) -> std::result::Result<Option<f64>, NormalizeError> {
    let buckets = period.buckets()?.len() as f64;
    Ok(total.map(|total| total / buckets))
}
