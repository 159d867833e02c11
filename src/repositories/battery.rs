use crate::db::DbPool;
use crate::error::AppError;
use sqlx::{postgres::PgRow, FromRow, Row};

#[derive(Debug, Clone)]
pub struct BatteryReading {
    pub sensor: String,
    pub value: Option<f64>,
}

impl<'r> FromRow<'r, PgRow> for BatteryReading {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            sensor: row.try_get("sensor")?,
            value: row.try_get("value")?,
        })
    }
}

pub struct BatteryRepository;

impl BatteryRepository {
    /// Most recent value of every sensor that belongs to the battery device.
    pub async fn get_current(
        pool: &DbPool,
        device_id: &str,
    ) -> Result<Vec<BatteryReading>, AppError> {
        let results = sqlx::query_as::<_, BatteryReading>(
            r#"
            SELECT
                s.sensor_name AS sensor,
                CAST(m.value AS DOUBLE PRECISION) AS value
            FROM measurements_fact m
            JOIN sensors_dim s ON s.sensor_key = m.sensor_key
            WHERE s.device_id = $1
                AND m.date_key = (
                    SELECT MAX(date_key)
                    FROM measurements_fact
                    WHERE sensor_key = s.sensor_key
                )
            ORDER BY s.sensor_id
            "#,
        )
        .bind(device_id)
        .fetch_all(pool)
        .await?;

        Ok(results)
    }
}
