use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::metrics::{GENERATIONS, PROVIDER_FAILURES};
use crate::mock::generate_mock;
use crate::models::{GenerationRequest, GenerationResult};
use crate::prompt::build_prompt;
use crate::providers::Provider;

pub const MOCK_LABEL: &str = "mock";
pub const TOTAL_FAILURE_MESSAGE: &str = "Failed to generate thesis statements. Please try again.";

/// Runs the tiers in order: each configured provider once, then the offline
/// generator. First text wins.
pub struct Coordinator {
    providers: Vec<Arc<dyn Provider>>,
    rng: Mutex<StdRng>,
}

impl Coordinator {
    pub fn new(providers: Vec<Arc<dyn Provider>>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            providers,
            rng: Mutex::new(rng),
        }
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    pub async fn generate(&self, req: &GenerationRequest) -> GenerationResult {
        let prompt = build_prompt(&req.field_of_study, req.num_ideas, req.thesis_type, req.tone);

        for provider in &self.providers {
            let started = Instant::now();
            match provider.attempt(&prompt, req.model.as_deref()).await {
                Ok(ideas) => {
                    tracing::info!(
                        provider = provider.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "provider produced ideas"
                    );
                    GENERATIONS.with_label_values(&[provider.name()]).inc();
                    return GenerationResult::success(ideas, provider.name());
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "provider failed, trying next tier"
                    );
                    PROVIDER_FAILURES.with_label_values(&[provider.name()]).inc();
                }
            }
        }

        let ideas = {
            // a poisoned lock still holds a usable rng
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            generate_mock(&mut *rng, &req.field_of_study, req.num_ideas, req.thesis_type, req.tone)
        };

        if ideas.trim().is_empty() {
            tracing::error!(field = %req.field_of_study, "offline generator produced no text");
            return GenerationResult::error(TOTAL_FAILURE_MESSAGE);
        }

        tracing::info!(field = %req.field_of_study, "served offline ideas");
        GENERATIONS.with_label_values(&[MOCK_LABEL]).inc();
        GenerationResult::success(ideas, MOCK_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Status, ThesisType, Tone};
    use crate::providers::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Scripted provider: returns a fixed outcome and counts calls
    struct Scripted {
        name: &'static str,
        outcome: fn() -> Result<String, ProviderError>,
        calls: AtomicUsize,
        seen_model: Mutex<Option<String>>,
    }

    impl Scripted {
        fn new(name: &'static str, outcome: fn() -> Result<String, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome,
                calls: AtomicUsize::new(0),
                seen_model: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Provider for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn attempt(&self, prompt: &str, model: Option<&str>) -> Result<String, ProviderError> {
            assert!(prompt.contains("thesis ideas"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_model.lock().unwrap() = model.map(str::to_string);
            (self.outcome)()
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(vec![])
        }
    }

    fn tiers(list: &[Arc<Scripted>]) -> Vec<Arc<dyn Provider>> {
        list.iter().map(|p| p.clone() as Arc<dyn Provider>).collect()
    }

    fn request(field: &str, num_ideas: u32) -> GenerationRequest {
        GenerationRequest {
            field_of_study: field.to_string(),
            num_ideas,
            thesis_type: ThesisType::Analytical,
            tone: Tone::Academic,
            model: None,
        }
    }

    #[tokio::test]
    async fn primary_success_is_returned_verbatim() {
        let primary = Scripted::new("groq", || Ok("  Thesis Idea 1: from groq\n".to_string()));
        let secondary = Scripted::new("ollama", || Ok("unused".to_string()));
        let c = Coordinator::new(tiers(&[primary.clone(), secondary.clone()]), Some(1));

        let mut req = request("Biology", 2);
        req.model = Some("llama-3.1-8b-instant".to_string());
        let result = c.generate(&req).await;

        assert_eq!(result.status, Status::Success);
        assert_eq!(result.api_used.as_deref(), Some("groq"));
        assert_eq!(result.ideas.as_deref(), Some("  Thesis Idea 1: from groq\n"));
        assert_eq!(result.message, None);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
        assert_eq!(primary.seen_model.lock().unwrap().as_deref(), Some("llama-3.1-8b-instant"));
    }

    #[tokio::test]
    async fn secondary_used_when_primary_fails() {
        let primary = Scripted::new("groq", || Err(ProviderError::Status(500)));
        let secondary = Scripted::new("ollama", || Ok("local ideas".to_string()));
        let c = Coordinator::new(tiers(&[primary.clone(), secondary.clone()]), Some(1));

        let result = c.generate(&request("Biology", 2)).await;
        assert_eq!(result.api_used.as_deref(), Some("ollama"));
        assert_eq!(result.ideas.as_deref(), Some("local ideas"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn every_primary_failure_falls_back_to_mock() {
        let failures: [fn() -> Result<String, ProviderError>; 5] = [
            || Err(ProviderError::Timeout),
            || Err(ProviderError::Status(401)),
            || Err(ProviderError::Status(429)),
            || Err(ProviderError::Status(500)),
            || Err(ProviderError::EmptyResponse),
        ];
        for outcome in failures {
            let primary = Scripted::new("groq", outcome);
            let c = Coordinator::new(tiers(&[primary.clone()]), Some(5));
            let result = c.generate(&request("Cybersecurity", 2)).await;
            assert_eq!(result.status, Status::Success);
            assert_eq!(result.api_used.as_deref(), Some(MOCK_LABEL));
            assert!(result.ideas.unwrap().starts_with("Thesis Idea 1: "));
            assert_eq!(primary.calls(), 1);
        }
    }

    #[tokio::test]
    async fn no_providers_means_mock() {
        let c = Coordinator::new(vec![], Some(9));
        let result = c.generate(&request("Cybersecurity", 2)).await;
        assert!(result.is_success());
        assert_eq!(result.api_used.as_deref(), Some(MOCK_LABEL));
        let ideas = result.ideas.unwrap();
        assert_eq!(ideas.matches("\n---\n").count(), 1);
    }

    #[tokio::test]
    async fn seeded_mock_output_is_reproducible() {
        let a = Coordinator::new(vec![], Some(2024)).generate(&request("Economics", 3)).await;
        let b = Coordinator::new(vec![], Some(2024)).generate(&request("Economics", 3)).await;
        assert_eq!(a, b);
    }
}
