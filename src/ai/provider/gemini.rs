//! Gemini Provider
//!
//! Primary backend, Google's Generative Language API (`generateContent`).
//! The key travels in the `x-goog-api-key` header, never in the URL.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use super::{
    CredentialSlot, GenerationRequest, QuizProvider, http_client, missing_credential, read_body,
    send_error, validate_endpoint,
};
use crate::ai::timeout::TimeoutConfig;
use crate::config::ProviderConfig;
use crate::constants::provider as provider_constants;
use crate::types::{QuizError, Result, preview};

pub struct GeminiProvider {
    name: String,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("name", &self.name)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let name = config.display_name().to_string();
        let api_base = validate_endpoint(
            &name,
            config
                .api_base
                .as_deref()
                .unwrap_or(provider_constants::GEMINI_API_BASE),
        )?;

        Ok(Self {
            client: http_client(&name, timeouts)?,
            model: config.model_or_default().to_string(),
            api_base,
            name,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request(request: &GenerationRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }

    /// Pull `candidates[0].content.parts[0].text` out of a response body
    fn extract_text(&self, body: &str) -> Result<String> {
        let envelope: GeminiResponse = serde_json::from_str(body).map_err(|e| {
            QuizError::response_shape(
                &self.name,
                format!("invalid response JSON ({}): {}", e, preview(body, 200)),
            )
        })?;

        let candidate = envelope.candidates.into_iter().next().ok_or_else(|| {
            let reason = envelope
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "none".to_string());
            QuizError::response_shape(
                &self.name,
                format!("no candidates in response (block reason: {})", reason),
            )
        })?;

        let finish_reason = candidate.finish_reason.clone();
        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                QuizError::response_shape(
                    &self.name,
                    format!(
                        "candidate carries no text part (finish reason: {})",
                        finish_reason.as_deref().unwrap_or("unknown")
                    ),
                )
            })
    }
}

#[async_trait]
impl QuizProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn credential(&self) -> Option<CredentialSlot> {
        Some(CredentialSlot::Google)
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        credential: Option<&SecretString>,
    ) -> Result<String> {
        let api_key = credential.ok_or_else(|| missing_credential(&self.name, CredentialSlot::Google))?;

        info!(
            provider = %self.name,
            model = %self.model,
            questions = request.count,
            "Generating with Gemini"
        );

        let start_time = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&Self::build_request(request))
            .send()
            .await
            .map_err(|e| send_error(&self.name, e))?;

        let body = read_body(&self.name, response).await?;
        debug!(
            provider = %self.name,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Received Gemini response"
        );

        self.extract_text(&body)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
