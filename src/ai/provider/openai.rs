//! OpenAI API Provider
//!
//! Secondary backend using OpenAI's Chat Completions API.

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

const SYSTEM_PROMPT: &str =
    "You are an educational quiz generator. Always respond with a single valid JSON object.";

pub struct OpenAiProvider {
    name: String,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("name", &self.name)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let name = config.display_name().to_string();
        let api_base = validate_endpoint(
            &name,
            config
                .api_base
                .as_deref()
                .unwrap_or(provider_constants::OPENAI_API_BASE),
        )?;

        Ok(Self {
            client: http_client(&name, timeouts)?,
            model: config.model_or_default().to_string(),
            api_base,
            name,
        })
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt(),
                },
            ],
            temperature: request.temperature,
            max_tokens: Some(request.max_output_tokens),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }

    /// Pull `choices[0].message.content` out of a response body
    fn extract_text(&self, body: &str) -> Result<String> {
        let envelope: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
            QuizError::response_shape(
                &self.name,
                format!("invalid response JSON ({}): {}", e, preview(body, 200)),
            )
        })?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| QuizError::response_shape(&self.name, "no content in first choice"))
    }
}

#[async_trait]
impl QuizProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn credential(&self) -> Option<CredentialSlot> {
        Some(CredentialSlot::OpenAi)
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        credential: Option<&SecretString>,
    ) -> Result<String> {
        let api_key = credential.ok_or_else(|| missing_credential(&self.name, CredentialSlot::OpenAi))?;

        info!(
            provider = %self.name,
            model = %self.model,
            questions = request.count,
            "Generating with OpenAI"
        );

        let start_time = Instant::now();
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| send_error(&self.name, e))?;

        let body = read_body(&self.name, response).await?;
        debug!(
            provider = %self.name,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Received OpenAI response"
        );

        self.extract_text(&body)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
