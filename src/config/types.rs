//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Credentials are deliberately absent: key material never lives in `Config`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{generation as gen_constants, network as net_constants, provider as provider_constants};
use crate::types::{QuizError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Request limits and pipeline switches
    pub generation: GenerationConfig,

    /// Provider chain, tried in this order
    pub providers: Vec<ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            generation: GenerationConfig::default(),
            providers: default_chain(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `QuizError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;

        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(QuizError::Config(format!(
                "generation.temperature must be between 0.0 and 2.0, got {}",
                generation.temperature
            )));
        }

        if generation.request_timeout_secs == 0 {
            return Err(QuizError::Config(
                "generation.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if generation.max_output_tokens == 0 {
            return Err(QuizError::Config(
                "generation.max_output_tokens must be greater than 0".to_string(),
            ));
        }

        if generation.max_questions == 0 {
            return Err(QuizError::Config(
                "generation.max_questions must be greater than 0".to_string(),
            ));
        }

        if generation.default_questions == 0
            || generation.default_questions > generation.max_questions
        {
            return Err(QuizError::Config(format!(
                "generation.default_questions must be between 1 and {}, got {}",
                generation.max_questions, generation.default_questions
            )));
        }

        for (idx, provider) in self.providers.iter().enumerate() {
            if provider.kind == ProviderKind::Unconfigured && provider.name.is_none() {
                return Err(QuizError::Config(format!(
                    "providers[{}]: an unconfigured placeholder needs a name",
                    idx
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Generation Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Question count used when the caller does not pass one
    pub default_questions: usize,

    /// Upper bound on a single request
    pub max_questions: usize,

    /// Sampling temperature sent to providers
    pub temperature: f32,

    /// Output token budget sent to providers
    pub max_output_tokens: u32,

    /// Per-provider call timeout in seconds
    pub request_timeout_secs: u64,

    /// Reject the request when the first provider's credential is missing
    pub require_primary_credential: bool,

    /// Fill under-delivered provider quizzes with fallback questions
    pub pad_short_quizzes: bool,

    /// Switch to the fallback generator when a secondary provider returns
    /// text without any JSON
    pub template_on_unstructured: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_questions: gen_constants::DEFAULT_QUESTIONS,
            max_questions: gen_constants::MAX_QUESTIONS,
            temperature: gen_constants::TEMPERATURE,
            max_output_tokens: gen_constants::MAX_OUTPUT_TOKENS,
            request_timeout_secs: net_constants::DEFAULT_TIMEOUT_SECS,
            require_primary_credential: true,
            pad_short_quizzes: false,
            template_on_unstructured: false,
        }
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Backend an adapter talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Ollama,
    /// Declared but not wired; always fails
    Unconfigured,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Unconfigured => "unconfigured",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => provider_constants::GEMINI_PRIMARY_MODEL,
            ProviderKind::OpenAi => provider_constants::OPENAI_MODEL,
            ProviderKind::Ollama => provider_constants::OLLAMA_MODEL,
            ProviderKind::Unconfigured => "none",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            "ollama" => Ok(ProviderKind::Ollama),
            "unconfigured" => Ok(ProviderKind::Unconfigured),
            _ => Err(format!(
                "Unknown provider: {}. Valid values: gemini, openai, ollama, unconfigured",
                s
            )),
        }
    }
}

/// One entry of the provider chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    /// Display name used in logs and provenance (defaults to the kind)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Model name (defaults per kind)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Custom endpoint base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            name: None,
            model: None,
            api_base: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.as_str())
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(self.kind.default_model())
    }
}

/// Gemini model cascade followed by OpenAI
fn default_chain() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(ProviderKind::Gemini)
            .with_name(provider_constants::GEMINI_PRIMARY_MODEL)
            .with_model(provider_constants::GEMINI_PRIMARY_MODEL),
        ProviderConfig::new(ProviderKind::Gemini)
            .with_name(provider_constants::GEMINI_SECONDARY_MODEL)
            .with_model(provider_constants::GEMINI_SECONDARY_MODEL),
        ProviderConfig::new(ProviderKind::OpenAi).with_model(provider_constants::OPENAI_MODEL),
    ]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.generation.default_questions, 10);
        assert_eq!(config.generation.max_questions, 50);
        assert!(config.generation.require_primary_credential);
        assert!(!config.generation.pad_short_quizzes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_chain_order() {
        let config = Config::default();
        let models: Vec<_> = config
            .providers
            .iter()
            .map(|p| (p.kind, p.model_or_default()))
            .collect();
        assert_eq!(
            models,
            vec![
                (ProviderKind::Gemini, "gemini-2.5-flash"),
                (ProviderKind::Gemini, "gemini-2.0-flash"),
                (ProviderKind::OpenAi, "gpt-4o-mini"),
            ]
        );
    }

    #[test]
    fn test_default_chain_names_are_distinct() {
        let config = Config::default();
        let names: Vec<_> = config.providers.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["gemini-2.5-flash", "gemini-2.0-flash", "openai"]);
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
        assert!("claude".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.generation.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generation.default_questions = 80;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generation.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unconfigured_requires_name() {
        let mut config = Config::default();
        config
            .providers
            .push(ProviderConfig::new(ProviderKind::Unconfigured));
        assert!(config.validate().is_err());

        config.providers.pop();
        config
            .providers
            .push(ProviderConfig::new(ProviderKind::Unconfigured).with_name("anthropic"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_toml_shape() {
        let parsed: Config = toml::from_str(
            r#"
            [generation]
            max_questions = 20

            [[providers]]
            kind = "ollama"
            model = "mistral"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.generation.max_questions, 20);
        assert_eq!(parsed.generation.default_questions, 10);
        assert_eq!(parsed.providers.len(), 1);
        assert_eq!(parsed.providers[0].kind, ProviderKind::Ollama);
        assert_eq!(parsed.providers[0].display_name(), "ollama");
    }
}
