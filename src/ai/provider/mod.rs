//! Quiz Provider Abstraction
//!
//! Defines the `QuizProvider` trait implemented by every generation backend.
//! An adapter turns a [`GenerationRequest`] into one HTTP call and returns
//! the raw generated text; parsing and validation happen downstream.
//!
//! ## Modules
//!
//! - `chain`: ordered fallback over adapters with per-attempt records
//! - `gemini`: primary backend (Generative Language API)
//! - `openai`, `ollama`: secondary backends
//! - `unconfigured`: named placeholder that always fails

mod chain;
mod gemini;
#[cfg(test)]
pub(crate) mod mock;
mod ollama;
mod openai;
mod unconfigured;

pub use chain::{
    AttemptRecord, ChainConfig, ChainStats, ChainSuccess, ProviderChain, ProviderChainBuilder,
};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use unconfigured::UnconfiguredProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::warn;

use crate::ai::prompt;
use crate::ai::timeout::TimeoutConfig;
use crate::config::{GenerationConfig, ProviderConfig, ProviderKind};
use crate::types::{QuizError, Result};

// =============================================================================
// Request
// =============================================================================

/// Everything an adapter needs to build its provider-specific request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub topic: String,
    pub count: usize,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, count: usize, settings: &GenerationConfig) -> Self {
        Self {
            topic: topic.into(),
            count,
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        }
    }

    /// Natural-language prompt shared by all backends
    pub fn prompt(&self) -> String {
        prompt::quiz_prompt(&self.topic, self.count)
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Which key an adapter needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialSlot {
    Google,
    OpenAi,
}

impl CredentialSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSlot::Google => "google",
            CredentialSlot::OpenAi => "openai",
        }
    }

    /// Environment variables consulted by [`Credentials::from_env`], in order
    pub fn env_vars(&self) -> &'static [&'static str] {
        match self {
            CredentialSlot::Google => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
            CredentialSlot::OpenAi => &["OPENAI_API_KEY"],
        }
    }
}

impl std::fmt::Display for CredentialSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request key material
///
/// Keys are held as `SecretString` and only exposed when an adapter sets
/// its auth header.
#[derive(Default)]
pub struct Credentials {
    google: Option<SecretString>,
    openai: Option<SecretString>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("google", &self.google.as_ref().map(|_| "[REDACTED]"))
            .field("openai", &self.openai.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credentials {
    pub fn none() -> Self {
        Self::default()
    }

    /// Read keys from the process environment; blank values are ignored
    pub fn from_env() -> Self {
        Self {
            google: Self::read_env(CredentialSlot::Google),
            openai: Self::read_env(CredentialSlot::OpenAi),
        }
    }

    fn read_env(slot: CredentialSlot) -> Option<SecretString> {
        slot.env_vars()
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .map(SecretString::from)
    }

    pub fn with_google(mut self, key: impl Into<String>) -> Self {
        self.google = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_openai(mut self, key: impl Into<String>) -> Self {
        self.openai = Some(SecretString::from(key.into()));
        self
    }

    pub fn get(&self, slot: CredentialSlot) -> Option<&SecretString> {
        match slot {
            CredentialSlot::Google => self.google.as_ref(),
            CredentialSlot::OpenAi => self.openai.as_ref(),
        }
    }

    pub fn has(&self, slot: CredentialSlot) -> bool {
        self.get(slot).is_some()
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Quiz generation backend
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Provider name for logging and provenance
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Credential slot this adapter reads, if any
    fn credential(&self) -> Option<CredentialSlot>;

    /// Issue one generation call and return the raw generated text
    ///
    /// `credential` is the key for [`Self::credential`]'s slot and nothing else.
    async fn generate(
        &self,
        request: &GenerationRequest,
        credential: Option<&SecretString>,
    ) -> Result<String>;
}

/// Shared provider handle stored in the chain
pub type SharedProvider = Arc<dyn QuizProvider>;

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig, timeouts: &TimeoutConfig) -> Result<SharedProvider> {
    Ok(match config.kind {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(config, timeouts)?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config, timeouts)?),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(config, timeouts)?),
        ProviderKind::Unconfigured => Arc::new(UnconfiguredProvider::new(config.display_name())),
    })
}

/// Create every provider of a configured chain, preserving order
pub fn create_providers(
    configs: &[ProviderConfig],
    timeouts: &TimeoutConfig,
) -> Result<Vec<SharedProvider>> {
    configs
        .iter()
        .map(|config| create_provider(config, timeouts))
        .collect()
}

// =============================================================================
// Shared HTTP Helpers
// =============================================================================

fn http_client(provider: &str, timeouts: &TimeoutConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeouts.request)
        .connect_timeout(timeouts.connection)
        .build()
        .map_err(|e| QuizError::Config(format!("Failed to create HTTP client for {}: {}", provider, e)))
}

/// Validate a configured endpoint URL
///
/// Only http/https are accepted. Plain http to a remote host is allowed but
/// logged, since keys would travel unencrypted.
fn validate_endpoint(provider: &str, endpoint: &str) -> Result<String> {
    let url = url::Url::parse(endpoint).map_err(|e| {
        QuizError::Config(format!("Invalid {} endpoint URL '{}': {}", provider, endpoint, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(QuizError::Config(format!(
            "{} endpoint must use http or https scheme, got: {}",
            provider,
            url.scheme()
        )));
    }

    if url.scheme() == "http"
        && let Some(host) = url.host_str()
        && !matches!(host, "localhost" | "127.0.0.1" | "[::1]")
    {
        warn!(provider, host, "Endpoint uses plain http to a non-local host");
    }

    let mut result = url.to_string();
    if result.ends_with('/') {
        result.pop();
    }
    Ok(result)
}

fn missing_credential(provider: &str, slot: CredentialSlot) -> QuizError {
    QuizError::MissingCredential {
        provider: provider.to_string(),
        credential: slot.as_str().to_string(),
    }
}

fn send_error(provider: &str, err: reqwest::Error) -> QuizError {
    if err.is_timeout() {
        QuizError::request_failed(provider, format!("request timed out: {}", err))
    } else if err.is_connect() {
        QuizError::request_failed(provider, format!("connection failed: {}", err))
    } else {
        QuizError::request_failed(provider, err.to_string())
    }
}

/// Read the body of a response, mapping non-success statuses to errors
async fn read_body(provider: &str, response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| QuizError::request_failed(provider, format!("failed to read body: {}", e)))?;

    if !status.is_success() {
        return Err(QuizError::http_status(provider, status.as_u16(), &body));
    }

    Ok(body)
}
