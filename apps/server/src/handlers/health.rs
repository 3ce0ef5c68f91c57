//! # Health Check

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub pharmacy: String,
}

/// `GET /health`: 200 when every collection file is readable, 503
/// otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.store.health_check().await;
    if !healthy {
        warn!(data_dir = ?state.store.data_dir(), "Health check failed");
    }

    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };
    (
        status,
        Json(HealthResponse {
            success: healthy,
            status: label,
            pharmacy: state.config.pharmacy.name.clone(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn test_health_ok() {
        let (_dir, state) = test_state().await;
        let (status, Json(body)) = health(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        assert_eq!(body.pharmacy, "PharmaEase");
    }
}
