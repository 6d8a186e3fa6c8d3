use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::state::SharedState;

pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "api_configured": state.api_configured(),
    }))
}

// Ready once the state is built; the offline tier means generation never depends on a provider
pub async fn ready_handler(State(state): State<SharedState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "providers": state.coordinator.providers().len(),
        "rate_limit_per_window": state.rate_limiter.max_requests(),
        "rate_window_seconds": state.rate_limiter.window().as_secs(),
    }))
}
