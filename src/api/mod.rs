//! HTTP surface of the daemon. Each route is the typed counterpart of one
//! message action from the browser shim.

pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::health;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/api/tabs/{tab_id}/ready", post(handlers::tab_ready))
        .route("/api/tabs/{tab_id}/navigated", post(handlers::tab_navigated))
        .route("/api/tabs/{tab_id}/analyze", post(handlers::analyze_page))
        .route("/api/tabs/{tab_id}/result", get(handlers::get_result))
        .route("/api/tabs/{tab_id}/badge", get(handlers::get_badge))
        .route(
            "/api/provider/availability",
            get(handlers::provider_availability),
        )
        .route("/api/provider/models", get(handlers::provider_models))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/api/setup", get(handlers::setup_status))
        .route("/api/setup/complete", post(handlers::complete_setup))
        .route("/api/extract", post(handlers::extract_content))
        .route("/api/links/analyze", post(handlers::analyze_link))
        .route("/api/links/result", get(handlers::link_result))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
