use crate::data::wire::HealthStatus;
use axum::Json;

pub async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
