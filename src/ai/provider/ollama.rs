//! Ollama Local Provider
//!
//! Secondary backend for locally-running Ollama models. Needs no credential.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use super::{
    CredentialSlot, GenerationRequest, QuizProvider, http_client, read_body, validate_endpoint,
};
use crate::ai::timeout::TimeoutConfig;
use crate::config::ProviderConfig;
use crate::constants::provider as provider_constants;
use crate::types::{QuizError, Result, preview};

#[derive(Debug)]
pub struct OllamaProvider {
    name: String,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let name = config.display_name().to_string();
        let api_base = validate_endpoint(
            &name,
            config
                .api_base
                .as_deref()
                .unwrap_or(provider_constants::OLLAMA_API_BASE),
        )?;

        Ok(Self {
            client: http_client(&name, timeouts)?,
            model: config.model_or_default().to_string(),
            api_base,
            name,
        })
    }

    fn build_request(&self, request: &GenerationRequest) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: request.prompt(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_output_tokens,
            },
            format: Some("json".to_string()),
        }
    }

    fn extract_text(&self, body: &str) -> Result<String> {
        let envelope: OllamaResponse = serde_json::from_str(body).map_err(|e| {
            QuizError::response_shape(
                &self.name,
                format!("invalid response JSON ({}): {}", e, preview(body, 200)),
            )
        })?;

        envelope
            .response
            .ok_or_else(|| QuizError::response_shape(&self.name, "missing 'response' field"))
    }
}

#[async_trait]
impl QuizProvider for OllamaProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn credential(&self) -> Option<CredentialSlot> {
        None
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        _credential: Option<&SecretString>,
    ) -> Result<String> {
        info!(
            provider = %self.name,
            model = %self.model,
            questions = request.count,
            "Generating with Ollama"
        );

        let start_time = Instant::now();
        let url = format!("{}/api/generate", self.api_base);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    QuizError::request_failed(
                        &self.name,
                        format!(
                            "Failed to connect to Ollama at {}. Is Ollama running? Start with: ollama serve",
                            self.api_base
                        ),
                    )
                } else {
                    super::send_error(&self.name, e)
                }
            })?;

        let body = read_body(&self.name, response).await?;
        debug!(
            provider = %self.name,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Received Ollama response"
        );

        self.extract_text(&body)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: Option<String>,
}
