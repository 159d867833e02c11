use super::AppState;
use crate::api::models::battery::BatteryStatsResponse;
use crate::error::Result;
use crate::repositories::BatteryRepository;
use axum::{extract::State, response::Json};

pub async fn get_current(
    State((pool, config)): State<AppState>,
) -> Result<Json<BatteryStatsResponse>> {
    let readings =
        BatteryRepository::get_current(&pool, &config.warehouse.battery_device_id).await?;

    Ok(Json(BatteryStatsResponse {
        current_battery_stats: readings.into_iter().map(Into::into).collect(),
    }))
}
