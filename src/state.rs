use axum::extract::FromRef;
use axum::http::HeaderMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Args, Limits};
use crate::coordinator::Coordinator;
use crate::error::AppError;
use crate::logging::mask_secret;
use crate::providers::{ChatCompletionsProvider, OllamaProvider, Provider};
use crate::rate_limit::{ProxyTrust, RateLimiter};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

// app's shared state
pub struct AppState {
    pub coordinator: Coordinator,
    pub rate_limiter: Arc<RateLimiter>,
    pub limits: Limits,
    pub access_key: Option<String>, // expected x-api-key, None disables the check
    pub default_model: String,
    pub allowed_origins: Vec<String>,
    pub trust_proxy_headers: bool,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(coordinator: Coordinator, rate_limiter: RateLimiter) -> Self {
        Self {
            coordinator,
            rate_limiter: Arc::new(rate_limiter),
            limits: Limits::default(),
            access_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            allowed_origins: vec!["*".to_string()],
            trust_proxy_headers: false,
        }
    }

    pub fn from_args(args: &Args) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("thesis-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let timeout = args.request_timeout();

        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();
        match args.primary_key() {
            Some(key) => {
                tracing::info!(provider = %args.api_label, key = %mask_secret(key), "API key loaded");
                providers.push(Arc::new(ChatCompletionsProvider::new(
                    args.api_label.clone(),
                    &args.api_base_url,
                    key,
                    args.default_model.clone(),
                    client.clone(),
                    timeout,
                )))
            }
            None => tracing::warn!("no API key configured, primary provider disabled"),
        }
        if let Some(url) = args.ollama_url.as_deref().filter(|u| !u.trim().is_empty()) {
            providers.push(Arc::new(OllamaProvider::new(
                url,
                args.ollama_model.clone(),
                client.clone(),
                timeout,
            )));
        }

        for (i, p) in providers.iter().enumerate() {
            tracing::info!(tier = i + 1, provider = p.name(), "provider configured");
        }
        tracing::info!(tier = providers.len() + 1, provider = "mock", "offline fallback configured");

        let rate_limiter = RateLimiter::new(args.rate_limit, Duration::from_secs(args.rate_window));

        let mut state = Self::new(Coordinator::new(providers, args.mock_seed), rate_limiter);
        state.access_key = args.access_key().map(str::to_string);
        if let Some(key) = state.access_key.as_deref() {
            tracing::info!(access_key = %mask_secret(key), "x-api-key required");
        }
        state.default_model = args.default_model.clone();
        state.allowed_origins = args.origins();
        state.trust_proxy_headers = args.trust_proxy_headers;
        if args.trust_proxy_headers {
            tracing::info!("rate limiting by x-forwarded-for / x-real-ip");
        }
        Ok(state)
    }

    /// Rejects the request when an access key is configured and the header doesn't match.
    pub fn check_access(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let Some(expected) = self.access_key.as_deref() else {
            return Ok(());
        };
        let given = headers.get("x-api-key").and_then(|v| v.to_str().ok());
        if given == Some(expected) {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    pub fn api_configured(&self) -> bool {
        !self.coordinator.providers().is_empty()
    }

    // Served by /models when no provider can list its own
    pub fn fallback_models(&self) -> Vec<String> {
        let mut models = vec![self.default_model.clone()];
        for m in ["llama-3.1-8b-instant", "gemma2-9b-it", "gemma2:2b", "qwen2.5:0.5b"] {
            if !models.iter().any(|x| x == m) {
                models.push(m.to_string());
            }
        }
        models
    }
}

impl FromRef<SharedState> for ProxyTrust {
    fn from_ref(state: &SharedState) -> Self {
        ProxyTrust(state.trust_proxy_headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use clap::Parser;

    fn state() -> AppState {
        AppState::new(Coordinator::new(vec![], Some(0)), RateLimiter::new(10, Duration::from_secs(60)))
    }

    #[test]
    fn access_check_is_off_without_key() {
        assert!(state().check_access(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn access_check_compares_header() {
        let mut s = state();
        s.access_key = Some("secret".to_string());

        let mut headers = HeaderMap::new();
        assert!(matches!(s.check_access(&headers), Err(AppError::Unauthorized)));
        headers.insert("x-api-key", HeaderValue::from_static("wrong"));
        assert!(s.check_access(&headers).is_err());
        headers.insert("x-api-key", HeaderValue::from_static("secret"));
        assert!(s.check_access(&headers).is_ok());
    }

    #[test]
    fn fallback_models_lead_with_default() {
        let mut s = state();
        s.default_model = "gemma2:2b".to_string();
        let models = s.fallback_models();
        assert_eq!(models[0], "gemma2:2b");
        assert_eq!(models.iter().filter(|m| *m == "gemma2:2b").count(), 1);
    }

    #[test]
    fn from_args_without_keys_has_no_providers() {
        let args = Args::try_parse_from([
            "thesis-gateway",
            "--api-key",
            "",
            "--ollama-url",
            "",
            "--rate-limit",
            "3",
        ])
        .unwrap();
        let s = AppState::from_args(&args).unwrap();
        assert!(!s.api_configured());
        assert_eq!(s.rate_limiter.max_requests(), 3);
        assert!(!s.trust_proxy_headers);
    }

    #[test]
    fn proxy_trust_follows_flag() {
        let args = Args::try_parse_from(["thesis-gateway", "--trust-proxy-headers"]).unwrap();
        let s: SharedState = Arc::new(AppState::from_args(&args).unwrap());
        assert_eq!(ProxyTrust::from_ref(&s), ProxyTrust(true));
        assert_eq!(ProxyTrust::from_ref(&Arc::new(state())), ProxyTrust(false));
    }
}
