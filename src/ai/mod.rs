//! AI Integration Layer
//!
//! Prompt construction, provider adapters and the chain that tries them,
//! per-call timeouts, and normalization of raw model output.

pub mod prompt;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use prompt::{PromptBuilder, PromptSection, quiz_prompt};
pub use provider::{
    AttemptRecord, ChainConfig, ChainStats, ChainSuccess, CredentialSlot, Credentials,
    GenerationRequest, ProviderChain, ProviderChainBuilder, QuizProvider, SharedProvider,
    create_provider, create_providers,
};
pub use timeout::{TimeoutConfig, with_timeout};
pub use validation::{normalize, parse_quiz};
