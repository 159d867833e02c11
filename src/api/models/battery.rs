use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct BatteryStat {
    pub sensor: String,
    pub value: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatteryStatsResponse {
    pub current_battery_stats: Vec<BatteryStat>,
}

impl From<crate::repositories::battery::BatteryReading> for BatteryStat {
    fn from(reading: crate::repositories::battery::BatteryReading) -> Self {
        Self {
            sensor: reading.sensor,
            value: reading.value,
        }
    }
}
