use crate::db::DbPool;
use crate::error::AppError;
use chrono::NaiveDateTime;
use sqlx::{postgres::PgRow, FromRow, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct WindReading {
    pub sensor: String,
    pub sensor_id: String,
    pub kwh: Option<f64>,
    pub measured_at: NaiveDateTime,
}

impl<'r> FromRow<'r, PgRow> for WindReading {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            sensor: row.try_get("sensor")?,
            sensor_id: row.try_get("sensor_id")?,
            kwh: row.try_get("kwh")?,
            measured_at: row.try_get("measured_at")?,
        })
    }
}

pub struct WindRepository;

impl WindRepository {
    /// Newest production value of the wind generator sensor, with the time it
    /// was measured at.
    pub async fn get_current(
        pool: &DbPool,
        sensor_key: i32,
    ) -> Result<Vec<WindReading>, AppError> {
        let results = sqlx::query_as::<_, WindReading>(
            r#"
            SELECT
                s.device_name || ': ' || s.sensor_name AS sensor,
                CAST(s.sensor_id AS TEXT) AS sensor_id,
                CAST(p.value AS DOUBLE PRECISION) AS kwh,
                make_timestamp(
                    d.year, d.month, d.day, d.hour, d.min,
                    CAST(d.sec AS DOUBLE PRECISION)
                ) AS measured_at
            FROM productions_fact p
            JOIN sensors_dim s ON s.sensor_key = p.sensor_key
            JOIN dates_dim d ON d.date_key = p.date_key
            WHERE p.sensor_key = $1
                AND p.date_key = (
                    SELECT MAX(date_key)
                    FROM productions_fact
                    WHERE sensor_key = p.sensor_key
                )
            ORDER BY s.sensor_id
            "#,
        )
        .bind(sensor_key)
        .fetch_all(pool)
        .await?;

        Ok(results)
    }
}
