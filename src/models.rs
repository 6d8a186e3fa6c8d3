use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::Limits;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThesisType {
    Argumentative,
    Analytical,
    Expository,
    Comparative,
}

impl ThesisType {
    pub const ALL: [ThesisType; 4] = [
        ThesisType::Argumentative,
        ThesisType::Analytical,
        ThesisType::Expository,
        ThesisType::Comparative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThesisType::Argumentative => "argumentative",
            ThesisType::Analytical => "analytical",
            ThesisType::Expository => "expository",
            ThesisType::Comparative => "comparative",
        }
    }
}

impl FromStr for ThesisType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThesisType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ValidationError::new(
                    "thesis_type",
                    format!(
                        "Invalid thesis type. Must be one of: {}",
                        join(ThesisType::ALL.iter().map(|t| t.as_str()))
                    ),
                )
            })
    }
}

impl fmt::Display for ThesisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Academic,
    Persuasive,
    Neutral,
    Critical,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Academic, Tone::Persuasive, Tone::Neutral, Tone::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Academic => "academic",
            Tone::Persuasive => "persuasive",
            Tone::Neutral => "neutral",
            Tone::Critical => "critical",
        }
    }
}

impl FromStr for Tone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ValidationError::new(
                    "tone",
                    format!(
                        "Invalid tone. Must be one of: {}",
                        join(Tone::ALL.iter().map(|t| t.as_str()))
                    ),
                )
            })
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn default_num_ideas() -> i64 {
    3
}

fn default_thesis_type() -> String {
    ThesisType::Argumentative.as_str().to_string()
}

fn default_tone() -> String {
    Tone::Academic.as_str().to_string()
}

// Raw form body of POST /generate, enums stay strings so bad values map to 400
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateForm {
    pub field_of_study: String,
    #[serde(default = "default_num_ideas")]
    pub num_ideas: i64,
    #[serde(default = "default_thesis_type")]
    pub thesis_type: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl GenerateForm {
    /// Checks every bound before anything touches the network.
    pub fn validate(self, limits: &Limits) -> Result<GenerationRequest, ValidationError> {
        let field_of_study = self.field_of_study.trim().to_string();
        let len = field_of_study.chars().count();
        if len < limits.min_field_len || len > limits.max_field_len {
            return Err(ValidationError::new(
                "field_of_study",
                format!(
                    "Field of study must be between {} and {} characters",
                    limits.min_field_len, limits.max_field_len
                ),
            ));
        }

        if self.num_ideas < i64::from(limits.min_ideas) || self.num_ideas > i64::from(limits.max_ideas)
        {
            return Err(ValidationError::new(
                "num_ideas",
                format!(
                    "Number of ideas must be between {} and {}",
                    limits.min_ideas, limits.max_ideas
                ),
            ));
        }

        let thesis_type = self.thesis_type.parse::<ThesisType>()?;
        let tone = self.tone.parse::<Tone>()?;
        let model = self
            .model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(GenerationRequest {
            field_of_study,
            num_ideas: self.num_ideas as u32,
            thesis_type,
            tone,
            model,
        })
    }
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub field_of_study: String,
    pub num_ideas: u32,
    pub thesis_type: ThesisType,
    pub tone: Tone,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

// Envelope returned by the coordinator. Exactly one of `ideas`/`message` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GenerationResult {
    pub fn success(ideas: String, api_used: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            ideas: Some(ideas),
            api_used: Some(api_used.into()),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            ideas: None,
            api_used: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl IntoResponse for GenerationResult {
    fn into_response(self) -> Response {
        let code = match self.status {
            Status::Success => StatusCode::OK,
            Status::Error => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (code, Json(self)).into_response()
    }
}
