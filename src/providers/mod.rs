use async_trait::async_trait;
use serde_json::Value;

pub mod chat;
pub mod ollama;

pub use chat::ChatCompletionsProvider;
pub use ollama::OllamaProvider;

/// Why a provider tier produced no text. Logged, never shown to callers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contained no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_decode() {
            ProviderError::Malformed(e.to_string())
        } else {
            // without_url keeps query strings and hosts out of the logs
            ProviderError::Transport(e.without_url().to_string())
        }
    }
}

/// One network tier of the generation pipeline.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Label reported as `api_used`.
    fn name(&self) -> &str;

    /// Single attempt, no retries. `model` overrides the provider default.
    async fn attempt(&self, prompt: &str, model: Option<&str>) -> Result<String, ProviderError>;

    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;
}

// Pulls generated text out of either a chat-completions body
// (`choices[0].message.content` or `choices[0].text`) or a `response` field.
pub fn extract_text(body: &Value) -> Result<String, ProviderError> {
    let text = if let Some(choices) = body.get("choices") {
        let first = choices
            .get(0)
            .ok_or_else(|| ProviderError::Malformed("empty choices array".to_string()))?;
        first
            .pointer("/message/content")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| first.get("text").and_then(Value::as_str))
    } else if let Some(response) = body.get("response") {
        response.as_str()
    } else {
        return Err(ProviderError::Malformed(
            "neither `choices` nor `response` present".to_string(),
        ));
    };

    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
        _ => Err(ProviderError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_chat_message_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "Thesis Idea 1: X"}}]});
        assert_eq!(extract_text(&body).unwrap(), "Thesis Idea 1: X");
    }

    #[test]
    fn falls_back_to_choice_text() {
        let body = json!({"choices": [{"message": {"content": ""}, "text": "legacy"}]});
        assert_eq!(extract_text(&body).unwrap(), "legacy");
    }

    #[test]
    fn reads_response_field() {
        let body = json!({"model": "gemma2:2b", "response": "ideas", "done": true});
        assert_eq!(extract_text(&body).unwrap(), "ideas");
    }

    #[test]
    fn empty_text_is_a_failure() {
        assert!(matches!(
            extract_text(&json!({"response": "   "})),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            extract_text(&json!({"choices": [{"message": {"content": null}}]})),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn unknown_shapes_are_malformed() {
        assert!(matches!(extract_text(&json!({"choices": []})), Err(ProviderError::Malformed(_))));
        assert!(matches!(extract_text(&json!({"error": "nope"})), Err(ProviderError::Malformed(_))));
        assert!(matches!(extract_text(&json!("text")), Err(ProviderError::Malformed(_))));
    }
}
