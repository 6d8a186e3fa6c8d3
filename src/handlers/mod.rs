use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::response::Html;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

mod generate;
mod health;
mod metrics;
mod providers;

pub use generate::generate_handler;
pub use health::{health_handler, ready_handler};
pub use metrics::metrics_handler;
pub use providers::{api_status_handler, models_handler};

pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../templates/index.html"))
}

pub fn router(state: SharedState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/", get(index_handler))
        .route("/generate", post(generate_handler))
        .route("/models", get(models_handler))
        .route("/check-api-status", get(api_status_handler))
        .route("/health", get(health_handler))
        .route("/health/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .layer(security_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(security_header(header::X_FRAME_OPTIONS, "DENY"))
        .layer(security_header(header::REFERRER_POLICY, "strict-origin-when-cross-origin"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn security_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}

// "*" (or nothing usable) allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if allowed.is_empty() || origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}
