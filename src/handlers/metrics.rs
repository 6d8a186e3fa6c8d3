use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

pub async fn metrics_handler() -> Response {
    match crate::metrics::gather() {
        Ok(body) => ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
