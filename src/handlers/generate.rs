use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::HeaderMap;
use axum::Form;
use std::time::Instant;

use crate::error::AppError;
use crate::metrics::{RATE_LIMITED, REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{GenerateForm, GenerationResult};
use crate::rate_limit::ClientId;
use crate::state::SharedState;

pub async fn generate_handler(
    State(state): State<SharedState>,
    ClientId(client): ClientId,
    headers: HeaderMap,
    form: Result<Form<GenerateForm>, FormRejection>,
) -> Result<GenerationResult, AppError> {
    REQUEST_TOTAL.inc();

    if !state.rate_limiter.admit(&client) {
        RATE_LIMITED.inc();
        tracing::warn!(client = %client, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    state.check_access(&headers)?;

    let Form(form) = form.map_err(|rejection| AppError::MissingField(rejection.body_text()))?;
    let request = form.validate(&state.limits).inspect_err(|e| {
        tracing::info!(client = %client, field = e.field, "rejected generate form");
    })?;

    let start_time = Instant::now();
    tracing::info!(
        client = %client,
        field = %request.field_of_study,
        num_ideas = request.num_ideas,
        thesis_type = %request.thesis_type,
        tone = %request.tone,
        "generating thesis ideas"
    );

    let result = state.coordinator.generate(&request).await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    Ok(result)
}
