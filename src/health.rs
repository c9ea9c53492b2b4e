use axum::{Json, extract::State};
use serde::Serialize;
use tracing::info;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    provider: String,
}

/// The daemon is healthy even when the provider is down; the provider field
/// reports reachability so the shim can explain a grey badge.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let available = state.connector().check_availability().await;
    info!(provider_available = available, "health check");
    Json(HealthResponse {
        status: "OK".to_string(),
        provider: if available {
            "available".to_string()
        } else {
            "unavailable".to_string()
        },
    })
}
