//! Quiz Orchestrator
//!
//! Entry point of the generation pipeline. Validates the request, runs the
//! provider chain and falls back to the deterministic generator, so a
//! well-formed quiz is always returned for a valid request.
//!
//! Only `InvalidRequest` and `MissingCredential` ever reach the caller.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::ai::provider::{
    AttemptRecord, ChainConfig, ChainStats, ChainSuccess, Credentials, GenerationRequest,
    ProviderChain, ProviderChainBuilder, SharedProvider, create_providers,
};
use crate::ai::timeout::TimeoutConfig;
use crate::config::{Config, GenerationConfig};
use crate::quiz::{self, Quiz, QuizDraft};
use crate::types::{QuizError, Result};

// =============================================================================
// Report
// =============================================================================

/// Where the returned quiz came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Provider { name: String, model: String },
    Fallback(FallbackReason),
}

impl Provenance {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Provenance::Fallback(_))
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Provider { name, model } => write!(f, "{} ({})", name, model),
            Provenance::Fallback(reason) => write!(f, "fallback generator ({})", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No providers configured (offline mode)
    NoProviders,
    /// Every provider failed
    ChainExhausted,
    /// A secondary provider returned unstructured text
    UnstructuredHandoff,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FallbackReason::NoProviders => "no providers",
            FallbackReason::ChainExhausted => "all providers failed",
            FallbackReason::UnstructuredHandoff => "unstructured provider output",
        };
        f.write_str(label)
    }
}

/// Quiz plus the path that produced it
#[derive(Debug)]
pub struct GenerationReport {
    pub quiz: Quiz,
    pub provenance: Provenance,
    /// Failed or skipped providers, in chain order
    pub attempts: Vec<AttemptRecord>,
    /// Wall time spent in the provider chain (zero when it was not run)
    pub chain_duration_ms: u64,
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Resilient quiz generator
///
/// Holds only immutable settings and shared provider handles; one instance
/// can serve concurrent requests.
#[derive(Clone)]
pub struct QuizOrchestrator {
    settings: GenerationConfig,
    chain: ProviderChain,
}

impl QuizOrchestrator {
    /// Build with an explicit provider list (tried in the given order)
    pub fn new(settings: GenerationConfig, providers: Vec<SharedProvider>) -> Self {
        let chain = ProviderChainBuilder::new()
            .add_all(providers)
            .with_config(ChainConfig {
                request_timeout: Duration::from_secs(settings.request_timeout_secs.max(1)),
                stop_on_unstructured: settings.template_on_unstructured,
            })
            .build();

        Self { settings, chain }
    }

    /// Build the configured provider chain
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeouts = TimeoutConfig::with_request_secs(config.generation.request_timeout_secs);
        let providers = create_providers(&config.providers, &timeouts)?;
        Ok(Self::new(config.generation.clone(), providers))
    }

    /// No providers: every request uses the deterministic generator
    pub fn offline(settings: GenerationConfig) -> Self {
        Self::new(settings, Vec::new())
    }

    pub fn settings(&self) -> &GenerationConfig {
        &self.settings
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.chain.provider_names()
    }

    /// Generate a quiz for `topic` with `count` questions
    pub async fn generate_quiz(
        &self,
        topic: &str,
        count: usize,
        credentials: &Credentials,
    ) -> Result<Quiz> {
        self.generate_with_report(topic, count, credentials)
            .await
            .map(|report| report.quiz)
    }

    /// Same as [`Self::generate_quiz`], also reporting provenance and failed attempts
    #[instrument(skip(self, credentials), fields(providers = self.chain.len()))]
    pub async fn generate_with_report(
        &self,
        topic: &str,
        count: usize,
        credentials: &Credentials,
    ) -> Result<GenerationReport> {
        let topic = self.validate_request(topic, count)?;
        self.check_primary_credential(credentials)?;

        if self.chain.is_empty() {
            info!("No providers configured, using fallback generator");
            return Ok(self.fallback_report(
                topic,
                count,
                FallbackReason::NoProviders,
                ChainStats::default(),
            ));
        }

        let request = GenerationRequest::new(topic, count, &self.settings);
        let (success, stats) = self.chain.execute(&request, credentials).await;

        match success {
            Some(success) => {
                let provenance = Provenance::Provider {
                    name: success.provider.clone(),
                    model: success.model.clone(),
                };
                let quiz = self.reconcile(topic, count, success);
                Ok(GenerationReport {
                    quiz,
                    provenance,
                    attempts: stats.attempts,
                    chain_duration_ms: stats.total_duration_ms,
                })
            }
            None => {
                let reason = if stats.handed_off {
                    FallbackReason::UnstructuredHandoff
                } else {
                    FallbackReason::ChainExhausted
                };
                warn!(
                    attempts = stats.attempts.len(),
                    skipped = stats.skipped_missing_credential,
                    elapsed_ms = stats.total_duration_ms,
                    reason = %reason,
                    "Falling back to deterministic generator"
                );
                Ok(self.fallback_report(topic, count, reason, stats))
            }
        }
    }

    /// Check topic and count, returning the trimmed topic
    fn validate_request<'a>(&self, topic: &'a str, count: usize) -> Result<&'a str> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(QuizError::InvalidRequest(
                "topic must not be empty".to_string(),
            ));
        }

        if count == 0 {
            return Err(QuizError::InvalidRequest(
                "question count must be at least 1".to_string(),
            ));
        }

        if count > self.settings.max_questions {
            return Err(QuizError::InvalidRequest(format!(
                "question count {} exceeds the maximum of {}",
                count, self.settings.max_questions
            )));
        }

        Ok(topic)
    }

    /// The first provider's credential is mandatory unless configured otherwise
    fn check_primary_credential(&self, credentials: &Credentials) -> Result<()> {
        if !self.settings.require_primary_credential {
            return Ok(());
        }

        if let Some(primary) = self.chain.primary()
            && let Some(slot) = primary.credential()
            && !credentials.has(slot)
        {
            return Err(QuizError::MissingCredential {
                provider: primary.name().to_string(),
                credential: slot.as_str().to_string(),
            });
        }

        Ok(())
    }

    /// Bring a provider draft in line with the request and stamp it
    fn reconcile(&self, topic: &str, count: usize, success: ChainSuccess) -> Quiz {
        let ChainSuccess {
            provider, mut draft, ..
        } = success;

        if draft.has_count_mismatch() {
            warn!(
                provider = %provider,
                declared = ?draft.declared_total,
                delivered = draft.questions.len(),
                "Provider count mismatch"
            );
        }

        if draft.questions.len() > count {
            debug!(
                delivered = draft.questions.len(),
                requested = count,
                "Truncating over-delivered quiz"
            );
            draft.truncate(count);
        }

        if self.settings.pad_short_quizzes && draft.questions.len() < count {
            pad_draft(&mut draft, topic, count);
        }

        Quiz::finalize(draft, quiz::provider_source(topic, &provider))
    }

    fn fallback_report(
        &self,
        topic: &str,
        count: usize,
        reason: FallbackReason,
        stats: ChainStats,
    ) -> GenerationReport {
        GenerationReport {
            quiz: quiz::synthesize(topic, count),
            provenance: Provenance::Fallback(reason),
            attempts: stats.attempts,
            chain_duration_ms: stats.total_duration_ms,
        }
    }
}

/// Fill missing positions with fallback questions for the same indices
fn pad_draft(draft: &mut QuizDraft, topic: &str, count: usize) {
    let delivered = draft.questions.len();
    debug!(delivered, requested = count, "Padding short quiz");
    draft
        .questions
        .extend((delivered..count).map(|idx| quiz::fallback_question(topic, idx, count)));
}
