//! 健康检查

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// 存活探针
///
/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ts: Utc::now().timestamp_millis(),
    })
}

/// 就绪探针：数据库不可用时返回 503
///
/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.health_check().await {
        Ok(latency) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "checks": { "database": { "status": "ok", "latencyMs": latency.as_millis() as u64 } }
            })),
        ),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "ok": false,
                    "checks": { "database": { "status": "fail" } }
                })),
            )
        }
    }
}
