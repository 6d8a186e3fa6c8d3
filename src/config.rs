use clap::Parser;
use std::time::Duration;

// CLI argument structure, every option can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "thesis-gateway")]
#[command(about = "Thesis statement generator with tiered LLM fallback")]
pub struct Args {
    // Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8001)]
    pub port: u16,

    // Primary provider credentials (OpenAI-compatible chat completions)
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GROQ_BASE_URL", default_value = "https://api.groq.com/openai/v1")]
    pub api_base_url: String,

    // Label reported as `api_used` when the primary provider answers
    #[arg(long, default_value = "groq")]
    pub api_label: String,

    // Secondary provider: local Ollama daemon, e.g. "localhost:11434"
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    #[arg(long, env = "OLLAMA_MODEL", default_value = "gemma2:2b")]
    pub ollama_model: String,

    #[arg(long, env = "DEFAULT_MODEL", default_value = "llama-3.3-70b-versatile")]
    pub default_model: String,

    // Rate limit max requests per window
    #[arg(long, env = "MAX_REQUESTS_PER_MINUTE", default_value_t = 10)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // Per provider call timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    // Comma-separated CORS origins, "*" allows any
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
    pub allowed_origins: String,

    // Shared secret expected in the x-api-key header
    #[arg(long, env = "THESIS_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    // Key rate limits on x-forwarded-for / x-real-ip instead of the peer address.
    // Only enable behind a proxy that overwrites those headers.
    #[arg(long, env = "TRUST_PROXY_HEADERS")]
    pub trust_proxy_headers: bool,

    // Seed for the offline generator
    #[arg(long)]
    pub mock_seed: Option<u64>,

    // How often idle rate windows are evicted, in seconds
    #[arg(long, default_value_t = 300)]
    pub sweep_interval: u64,
}

impl Args {
    pub fn primary_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    pub fn access_key(&self) -> Option<&str> {
        non_blank(self.access_key.as_deref())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn origins(&self) -> Vec<String> {
        split_list(&self.allowed_origins)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// "a, b,,c" -> ["a", "b", "c"]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// Add http:// when the scheme is missing, drop trailing slashes
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Bounds applied to incoming generation forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_field_len: usize,
    pub max_field_len: usize,
    pub min_ideas: u32,
    pub max_ideas: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_field_len: 2,
            max_field_len: 200,
            min_ideas: 1,
            max_ideas: 10,
        }
    }
}
