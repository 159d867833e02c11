use crate::catalog::{Aggregate, MetricSource};
use crate::db::DbPool;
use crate::error::AppError;
use crate::gapfill::{BucketId, FieldNames, PeriodDescriptor, PeriodKind, Record};
use chrono::NaiveDate;
use serde_json::Number;
use sqlx::{postgres::PgRow, Column, Row};

pub struct MeasurementRepository;

/// Calendar date of a `dates_dim` row.
const DIM_DATE: &str = "make_date(d.year, d.month, d.day)";

fn bucket_expr(kind: PeriodKind) -> &'static str {
    match kind {
        PeriodKind::HourOfDay => "CAST(d.hour AS INTEGER)",
        PeriodKind::DayOfMonth => "CAST(d.day AS INTEGER)",
        PeriodKind::MonthOfYear => "CAST(d.month AS INTEGER)",
        PeriodKind::DayOfWeek | PeriodKind::SevenDayWindow => DIM_DATE,
    }
}

/// Bucketed aggregation for one metric over an inclusive date range,
/// ascending by bucket. Bind `$1` from, `$2` to, `$3` optional sensor key.
pub fn series_sql(source: &MetricSource, kind: PeriodKind) -> String {
    format!(
        r#"
        SELECT
            {bucket} AS {bucket_key},
            CAST({agg}(f.value) AS DOUBLE PRECISION) AS {value_key}
        FROM {table} f
        JOIN dates_dim d ON d.date_key = f.date_key
        WHERE {date} BETWEEN $1 AND $2
            AND ($3::INTEGER IS NULL OR f.sensor_key = $3)
        GROUP BY 1
        ORDER BY 1
        "#,
        bucket = bucket_expr(kind),
        bucket_key = kind.default_bucket_key(),
        agg = source.aggregate.sql(),
        value_key = source.value_key,
        table = source.fact_table,
        date = DIM_DATE,
    )
}

/// Single aggregate over an inclusive date range. Yields one row whose value
/// is NULL when the range holds no data.
pub fn total_sql(source: &MetricSource, op: Aggregate) -> String {
    format!(
        r#"
        SELECT CAST({agg}(f.value) AS DOUBLE PRECISION) AS value
        FROM {table} f
        JOIN dates_dim d ON d.date_key = f.date_key
        WHERE {date} BETWEEN $1 AND $2
            AND ($3::INTEGER IS NULL OR f.sensor_key = $3)
        "#,
        agg = op.sql(),
        table = source.fact_table,
        date = DIM_DATE,
    )
}

fn decode_bucket(row: &PgRow, kind: PeriodKind) -> Result<BucketId, sqlx::Error> {
    let slot = |value: i32| {
        u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
            index: "0".into(),
            source: Box::new(e),
        })
    };

    match kind {
        PeriodKind::HourOfDay => Ok(BucketId::Hour(slot(row.try_get(0)?)?)),
        PeriodKind::DayOfMonth => Ok(BucketId::Day(slot(row.try_get(0)?)?)),
        PeriodKind::MonthOfYear => Ok(BucketId::Month(slot(row.try_get(0)?)?)),
        PeriodKind::DayOfWeek | PeriodKind::SevenDayWindow => {
            Ok(BucketId::Date(row.try_get::<NaiveDate, _>(0)?))
        }
    }
}

/// Aggregated values keep their measured float; a NULL aggregate becomes an
/// integral `0` like the buckets the merge fills in.
fn decode_value(value: Option<f64>) -> Result<Number, sqlx::Error> {
    match value {
        None => Ok(Number::from(0)),
        Some(v) => Number::from_f64(v).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "1".into(),
            source: format!("non-finite aggregate {}", v).into(),
        }),
    }
}

fn decode_record(row: &PgRow, kind: PeriodKind) -> Result<Record<Number>, sqlx::Error> {
    let bucket = decode_bucket(row, kind)?;
    let value = decode_value(row.try_get(1)?)?;
    Ok(Record::new(bucket, value))
}

/// Star-schema views are optional in some deployments; a missing relation
/// (SQLSTATE 42P01) reads as "no data". Any other database error, including
/// an undefined column or function, is a real failure.
fn is_missing_relation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("42P01"),
        _ => false,
    }
}

impl MeasurementRepository {
    /// Fetch the sparse bucketed series for `period`, along with the field
    /// names the query reported them under.
    pub async fn fetch_series(
        pool: &DbPool,
        source: &MetricSource,
        period: &PeriodDescriptor,
    ) -> Result<(FieldNames, Vec<Record<Number>>), AppError> {
        let (from, to) = period.date_range()?;
        let sql = series_sql(source, period.kind);

        let rows = match sqlx::query(&sql)
            .bind(from)
            .bind(to)
            .bind(source.sensor_key)
            .fetch_all(pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) if is_missing_relation(&e) => Vec::new(),
            Err(e) => return Err(AppError::Db(e)),
        };

        let defaults = FieldNames::new(period.kind.default_bucket_key(), source.value_key);
        let fields = FieldNames::resolve(
            rows.first()
                .map(|row| row.columns().iter().map(|c| c.name())),
            defaults,
        );

        let records = rows
            .iter()
            .map(|row| decode_record(row, period.kind))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            table = source.fact_table,
            kind = ?period.kind,
            anchor = %period.anchor,
            rows = records.len(),
            "Fetched bucketed series"
        );

        Ok((fields, records))
    }

    pub async fn fetch_total(
        pool: &DbPool,
        source: &MetricSource,
        op: Aggregate,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<f64>, AppError> {
        let sql = total_sql(source, op);

        match sqlx::query_scalar::<_, Option<f64>>(&sql)
            .bind(from)
            .bind(to)
            .bind(source.sensor_key)
            .fetch_optional(pool)
            .await
        {
            Ok(value) => Ok(value.flatten()),
            Err(e) if is_missing_relation(&e) => Ok(None),
            Err(e) => Err(AppError::Db(e)),
        }
    }
}
