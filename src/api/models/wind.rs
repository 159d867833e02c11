use crate::repositories::wind::WindReading;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct WindStat {
    pub sensor: String,
    pub sensor_id: String,
    #[serde(rename = "kWh")]
    pub kwh: Option<f64>,
}

/// Latest wind generator values. `oldest_time` is the earliest of their
/// measurement times, so a client can tell how stale the snapshot is.
#[derive(Debug, Serialize, Deserialize)]
pub struct WindStatsResponse {
    pub oldest_time: Option<NaiveDateTime>,
    pub current_wind_stats: Vec<WindStat>,
}

impl From<WindReading> for WindStat {
    fn from(reading: WindReading) -> Self {
        Self {
            sensor: reading.sensor,
            sensor_id: reading.sensor_id,
            kwh: reading.kwh,
        }
    }
}

impl From<Vec<WindReading>> for WindStatsResponse {
    fn from(readings: Vec<WindReading>) -> Self {
        Self {
            oldest_time: readings.iter().map(|r| r.measured_at).min(),
            current_wind_stats: readings.into_iter().map(Into::into).collect(),
        }
    }
}
