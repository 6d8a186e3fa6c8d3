use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::coordinator::MOCK_LABEL;
use crate::error::AppError;
use crate::providers::ProviderError;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub source: String,
}

// First provider that lists anything wins, otherwise the static list
pub async fn models_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<ModelsResponse>, AppError> {
    state.check_access(&headers)?;

    for provider in state.coordinator.providers() {
        match provider.list_models().await {
            Ok(models) if !models.is_empty() => {
                return Ok(Json(ModelsResponse {
                    models,
                    source: provider.name().to_string(),
                }));
            }
            Ok(_) => tracing::debug!(provider = provider.name(), "provider listed no models"),
            Err(e) => tracing::warn!(provider = provider.name(), error = %e, "failed to list models"),
        }
    }

    Ok(Json(ModelsResponse {
        models: state.fallback_models(),
        source: "default".to_string(),
    }))
}

#[derive(Serialize)]
pub struct ProviderStatus {
    pub name: String,
    // always true, unconfigured tiers are not listed
    pub configured: bool,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Serialize)]
pub struct ApiStatus {
    pub api_configured: bool,
    pub providers: Vec<ProviderStatus>,
    pub fallback: &'static str,
}

// Coarse failure kind only, provider error text stays in the logs
fn error_kind(e: &ProviderError) -> &'static str {
    match e {
        ProviderError::Timeout => "timeout",
        ProviderError::Transport(_) => "unreachable",
        ProviderError::Status(401 | 403) => "unauthorized",
        ProviderError::Status(429) => "rate_limited",
        ProviderError::Status(_) => "bad_status",
        ProviderError::Malformed(_) | ProviderError::EmptyResponse => "bad_response",
    }
}

pub async fn api_status_handler(State(state): State<SharedState>) -> Json<ApiStatus> {
    let mut providers = Vec::new();
    for provider in state.coordinator.providers() {
        let status = match provider.list_models().await {
            Ok(models) => ProviderStatus {
                name: provider.name().to_string(),
                configured: true,
                reachable: true,
                models: Some(models.len()),
                error: None,
            },
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "provider status check failed");
                ProviderStatus {
                    name: provider.name().to_string(),
                    configured: true,
                    reachable: false,
                    models: None,
                    error: Some(error_kind(&e)),
                }
            }
        };
        providers.push(status);
    }

    Json(ApiStatus {
        api_configured: state.api_configured(),
        providers,
        fallback: MOCK_LABEL,
    })
}
