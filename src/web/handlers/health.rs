//! Liveness probe backed by a `SELECT 1` round trip.

use axum::extract::State;
use axum::Json;
use serde_json::json;
use sqlx::Row;

use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let row = sqlx::query("SELECT 1 as health")
        .fetch_one(state.service.pool())
        .await
        .map_err(|_| ApiError::DatabaseError)?;

    let health: i32 = row.get("health");
    Ok(Json(json!({ "status": if health == 1 { "ok" } else { "degraded" } })))
}
