use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{Provider, ProviderError, extract_text};
use crate::config::normalize_base_url;

// Ollama API request format
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

// GET /api/tags
#[derive(Deserialize)]
struct Tags {
    #[serde(default)]
    models: Vec<Tag>,
}

#[derive(Deserialize)]
struct Tag {
    name: Option<String>,
}

/// Local Ollama daemon.
pub struct OllamaProvider {
    base_url: String,
    default_model: String,
    client: Client,
    timeout: Duration,
}

impl OllamaProvider {
    // "localhost:11434" -> "http://localhost:11434"
    pub fn new(base_url: &str, default_model: impl Into<String>, client: Client, timeout: Duration) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            default_model: default_model.into(),
            client,
            timeout,
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn attempt(&self, prompt: &str, model: Option<&str>) -> Result<String, ProviderError> {
        let model = model.unwrap_or(&self.default_model);
        tracing::debug!(url = %self.base_url, model, "calling ollama");

        let res = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&GenerateRequest {
                model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: Value = res.json().await?;
        extract_text(&body)
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let res = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let tags: Tags = res.json().await?;
        Ok(tags.models.into_iter().filter_map(|t| t.name).collect())
    }
}
