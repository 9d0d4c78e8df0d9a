use crate::api::models::HealthResponse;
use axum::Json;
use chrono::Utc;

/// Handler for GET /api/health - Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
