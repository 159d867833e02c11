use super::AppState;
use crate::api::models::wind::WindStatsResponse;
use crate::error::Result;
use crate::repositories::WindRepository;
use axum::{extract::State, response::Json};

pub async fn get_current(
    State((pool, config)): State<AppState>,
) -> Result<Json<WindStatsResponse>> {
    let readings = WindRepository::get_current(&pool, config.warehouse.wind_sensor_key).await?;

    Ok(Json(readings.into()))
}
