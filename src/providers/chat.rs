use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{Provider, ProviderError, extract_text};
use crate::config::normalize_base_url;

/// OpenAI-compatible chat completions endpoint (Groq, Open-WebUI and friends).
pub struct ChatCompletionsProvider {
    name: String,
    base_url: String,
    api_key: String,
    default_model: String,
    client: Client,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: Option<String>,
}

impl ChatCompletionsProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        api_key: impl Into<String>,
        default_model: impl Into<String>,
        client: Client,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: normalize_base_url(base_url),
            api_key: api_key.into(),
            default_model: default_model.into(),
            client,
            timeout,
        }
    }
}

#[async_trait]
impl Provider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn attempt(&self, prompt: &str, model: Option<&str>) -> Result<String, ProviderError> {
        let model = model.unwrap_or(&self.default_model);
        let body = ChatRequest {
            model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: 2000,
        };
        tracing::debug!(provider = %self.name, model, "calling chat completions");

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
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
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let list: ModelList = res.json().await?;
        Ok(list.data.into_iter().filter_map(|m| m.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "llama-3.3-70b-versatile",
            messages: [Message {
                role: "user",
                content: "hello",
            }],
            temperature: 0.7,
            max_tokens: 2000,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], "llama-3.3-70b-versatile");
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["messages"][0]["content"], "hello");
        assert_eq!(v["max_tokens"], 2000);
    }

    #[test]
    fn model_list_skips_entries_without_id() {
        let list: ModelList =
            serde_json::from_str(r#"{"object":"list","data":[{"id":"a"},{"owned_by":"x"},{"id":"b"}]}"#)
                .unwrap();
        let ids: Vec<String> = list.data.into_iter().filter_map(|m| m.id).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn base_url_is_normalized() {
        let p = ChatCompletionsProvider::new(
            "groq",
            "https://api.groq.com/openai/v1/",
            "key",
            "m",
            Client::new(),
            Duration::from_secs(1),
        );
        assert_eq!(p.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(p.name(), "groq");
    }
}
