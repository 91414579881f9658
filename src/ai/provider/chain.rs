//! Fallback Provider Chain
//!
//! Tries adapters in configured order until one produces a quiz that
//! survives normalization and schema validation.
//!
//! ## Strategy
//!
//! 1. Skip an adapter whose credential is missing (recorded, never fatal here)
//! 2. One call per adapter, bounded by the request timeout
//! 3. Normalize and validate the raw text
//! 4. On any failure record an [`AttemptRecord`] and move to the next adapter
//!
//! No retries, no reordering, no shared state between requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use super::{Credentials, GenerationRequest, QuizProvider, SharedProvider};
use crate::ai::timeout::with_timeout;
use crate::ai::validation;
use crate::constants::network as net_constants;
use crate::quiz::QuizDraft;
use crate::types::{ErrorKind, Result};

/// Configuration for the provider chain
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Bound on each adapter call
    pub request_timeout: Duration,
    /// Stop the chain when a non-primary adapter returns text with no JSON
    pub stop_on_unstructured: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(net_constants::DEFAULT_TIMEOUT_SECS),
            stop_on_unstructured: false,
        }
    }
}

/// One failed or skipped adapter
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub provider: String,
    pub model: String,
    pub kind: ErrorKind,
    pub message: String,
    pub duration_ms: u64,
}

/// Execution statistics for the chain
#[derive(Debug, Default)]
pub struct ChainStats {
    /// Adapter calls actually made
    pub total_attempts: usize,
    pub attempts: Vec<AttemptRecord>,
    pub total_duration_ms: u64,
    pub skipped_missing_credential: usize,
    /// Chain stopped early on unstructured output
    pub handed_off: bool,
}

/// Validated draft plus the adapter that produced it
#[derive(Debug)]
pub struct ChainSuccess {
    pub provider: String,
    pub model: String,
    pub draft: QuizDraft,
}

/// Ordered fallback over quiz providers
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<SharedProvider>,
    config: ChainConfig,
}

impl ProviderChain {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            providers: Vec::new(),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// First adapter in priority order
    pub fn primary(&self) -> Option<&SharedProvider> {
        self.providers.first()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run the chain once
    ///
    /// Never fails: `None` means every adapter failed (or the chain handed
    /// off early), and the caller falls back to the deterministic generator.
    #[instrument(skip(self, request, credentials), fields(providers = self.providers.len(), questions = request.count))]
    pub async fn execute(
        &self,
        request: &GenerationRequest,
        credentials: &Credentials,
    ) -> (Option<ChainSuccess>, ChainStats) {
        let mut stats = ChainStats::default();
        let start_time = Instant::now();

        for (idx, provider) in self.providers.iter().enumerate() {
            let name = provider.name().to_string();
            let model = provider.model().to_string();

            let credential = match provider.credential() {
                Some(slot) => match credentials.get(slot) {
                    Some(key) => Some(key),
                    None => {
                        debug!(provider = %name, credential = %slot, "Skipping provider (credential missing)");
                        stats.skipped_missing_credential += 1;
                        stats.attempts.push(AttemptRecord {
                            provider: name.clone(),
                            model,
                            kind: ErrorKind::MissingCredential,
                            message: format!("credential '{}' not supplied", slot),
                            duration_ms: 0,
                        });
                        continue;
                    }
                },
                None => None,
            };

            stats.total_attempts += 1;
            let attempt_start = Instant::now();
            debug!(provider = %name, model = %model, attempt = stats.total_attempts, "Chain attempt");

            match self.attempt(provider.as_ref(), request, credential).await {
                Ok(draft) => {
                    stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

                    info!(
                        provider = %name,
                        model = %model,
                        attempts = stats.total_attempts,
                        questions = draft.questions.len(),
                        "Chain succeeded"
                    );

                    return (
                        Some(ChainSuccess {
                            provider: name,
                            model,
                            draft,
                        }),
                        stats,
                    );
                }
                Err(err) => {
                    let kind = err.kind();
                    warn!(
                        provider = %name,
                        model = %model,
                        attempt = stats.total_attempts,
                        kind = %kind,
                        error = %err,
                        "Provider failed"
                    );

                    stats.attempts.push(AttemptRecord {
                        provider: name,
                        model,
                        kind,
                        message: err.to_string(),
                        duration_ms: attempt_start.elapsed().as_millis() as u64,
                    });

                    if self.config.stop_on_unstructured
                        && idx > 0
                        && kind == ErrorKind::UnparseableResponse
                    {
                        info!("Unstructured output from secondary provider, handing off to fallback generator");
                        stats.handed_off = true;
                        break;
                    }
                }
            }
        }

        stats.total_duration_ms = start_time.elapsed().as_millis() as u64;
        (None, stats)
    }

    async fn attempt(
        &self,
        provider: &dyn QuizProvider,
        request: &GenerationRequest,
        credential: Option<&secrecy::SecretString>,
    ) -> Result<QuizDraft> {
        let operation = format!("{} generation", provider.name());
        let raw = with_timeout(
            self.config.request_timeout,
            provider.generate(request, credential),
            &operation,
        )
        .await?;

        validation::parse_quiz(&raw)
    }
}

/// Builder for creating provider chains
pub struct ProviderChainBuilder {
    providers: Vec<SharedProvider>,
    config: ChainConfig,
}

impl ProviderChainBuilder {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            config: ChainConfig::default(),
        }
    }

    pub fn add_provider(mut self, provider: impl QuizProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn add_shared(mut self, provider: SharedProvider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn add_all(mut self, providers: impl IntoIterator<Item = SharedProvider>) -> Self {
        self.providers.extend(providers);
        self
    }

    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> ProviderChain {
        ProviderChain {
            providers: self.providers,
            config: self.config,
        }
    }
}

impl Default for ProviderChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::CredentialSlot;
    use crate::ai::provider::mock::{MockProvider, Reply, quiz_json};
    use crate::config::GenerationConfig;

    fn request(count: usize) -> GenerationRequest {
        GenerationRequest::new("Photosynthesis", count, &GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_first_valid_provider_wins() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::valid("primary", 3))
            .add_provider(MockProvider::valid("secondary", 3))
            .build();

        let (success, stats) = chain.execute(&request(3), &Credentials::none()).await;
        let success = success.unwrap();

        assert_eq!(success.provider, "primary");
        assert_eq!(stats.total_attempts, 1);
        assert!(stats.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_chain_order() {
        let c = Arc::new(MockProvider::valid("c", 2));
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::failing("a"))
            .add_provider(MockProvider::new("b", Reply::Text("no quiz here".into())))
            .add_shared(c.clone())
            .build();

        let (success, stats) = chain.execute(&request(2), &Credentials::none()).await;

        assert_eq!(success.unwrap().provider, "c");
        assert_eq!(c.calls(), 1);
        assert_eq!(stats.total_attempts, 3);
        let kinds: Vec<_> = stats.attempts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::ProviderRequestFailed, ErrorKind::UnparseableResponse]
        );
    }

    #[tokio::test]
    async fn test_all_fail() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::failing("a"))
            .add_provider(MockProvider::new("b", Reply::ShapeInvalid))
            .add_provider(MockProvider::new(
                "c",
                Reply::Text(r#"{"title":"T","questions":[{"type":"essay"}]}"#.into()),
            ))
            .build();

        let (success, stats) = chain.execute(&request(2), &Credentials::none()).await;

        assert!(success.is_none());
        assert_eq!(stats.attempts.len(), 3);
        assert_eq!(stats.attempts[1].kind, ErrorKind::ProviderResponseShapeInvalid);
        assert_eq!(stats.attempts[2].kind, ErrorKind::InvalidQuestionType);
    }

    #[tokio::test]
    async fn test_missing_credential_is_skipped() {
        let keyed = Arc::new(MockProvider::valid("keyed", 2).needing(CredentialSlot::OpenAi));
        let chain = ProviderChainBuilder::new()
            .add_shared(keyed.clone())
            .add_provider(MockProvider::valid("local", 2))
            .build();

        let (success, stats) = chain.execute(&request(2), &Credentials::none()).await;

        assert_eq!(success.unwrap().provider, "local");
        assert_eq!(keyed.calls(), 0);
        assert_eq!(stats.skipped_missing_credential, 1);
        assert_eq!(stats.total_attempts, 1);
        assert_eq!(stats.attempts[0].kind, ErrorKind::MissingCredential);
    }

    #[tokio::test]
    async fn test_credential_supplied() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::valid("keyed", 2).needing(CredentialSlot::Google))
            .build();

        let creds = Credentials::none().with_google("key");
        let (success, _) = chain.execute(&request(2), &creds).await;
        assert_eq!(success.unwrap().provider, "keyed");
    }

    #[tokio::test]
    async fn test_timeout_advances_chain() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::new("slow", Reply::Hang))
            .add_provider(MockProvider::valid("fast", 2))
            .with_config(ChainConfig {
                request_timeout: Duration::from_millis(20),
                ..Default::default()
            })
            .build();

        let (success, stats) = chain.execute(&request(2), &Credentials::none()).await;

        assert_eq!(success.unwrap().provider, "fast");
        assert_eq!(stats.attempts[0].kind, ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_stop_on_unstructured_secondary() {
        let last = Arc::new(MockProvider::valid("last", 2));
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::failing("primary"))
            .add_provider(MockProvider::new("chatty", Reply::Text("Sure! Here is a quiz.".into())))
            .add_shared(last.clone())
            .with_config(ChainConfig {
                stop_on_unstructured: true,
                ..Default::default()
            })
            .build();

        let (success, stats) = chain.execute(&request(2), &Credentials::none()).await;

        assert!(success.is_none());
        assert!(stats.handed_off);
        assert_eq!(last.calls(), 0);
    }

    #[tokio::test]
    async fn test_stop_on_unstructured_ignores_primary() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::new("primary", Reply::Text("prose".into())))
            .add_provider(MockProvider::valid("secondary", 2))
            .with_config(ChainConfig {
                stop_on_unstructured: true,
                ..Default::default()
            })
            .build();

        let (success, stats) = chain.execute(&request(2), &Credentials::none()).await;

        assert_eq!(success.unwrap().provider, "secondary");
        assert!(!stats.handed_off);
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let chain = ProviderChainBuilder::new().build();
        assert!(chain.is_empty());
        assert!(chain.primary().is_none());

        let (success, stats) = chain.execute(&request(2), &Credentials::none()).await;
        assert!(success.is_none());
        assert_eq!(stats.total_attempts, 0);
    }

    #[tokio::test]
    async fn test_draft_keeps_declared_total() {
        let chain = ProviderChainBuilder::new()
            .add_provider(MockProvider::new("p", Reply::Text(quiz_json("T", 7, 5))))
            .build();

        let (success, _) = chain.execute(&request(7), &Credentials::none()).await;
        let draft = success.unwrap().draft;
        assert_eq!(draft.declared_total, Some(7));
        assert_eq!(draft.questions.len(), 5);
    }
}
