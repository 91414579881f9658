//! quizforge - Resilient Multi-Provider Quiz Generator
//!
//! Turns a topic into a structured quiz of multiple-choice and true/false
//! questions. Providers are tried in configured order; the first response
//! that survives normalization and schema validation wins. When every
//! provider fails, a deterministic template generator answers instead, so a
//! valid request always yields a well-formed quiz.
//!
//! ## Quick Start
//!
//! ```ignore
//! use quizforge::{ConfigLoader, Credentials, QuizOrchestrator};
//!
//! let config = ConfigLoader::load()?;
//! let orchestrator = QuizOrchestrator::from_config(&config)?;
//! let quiz = orchestrator
//!     .generate_quiz("Photosynthesis", 10, &Credentials::from_env())
//!     .await?;
//! println!("{}", quiz.to_json_pretty()?);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider adapters, chain, prompt, output normalization
//! - [`quiz`]: data model, schema validation, fallback generator
//! - [`orchestrator`]: request validation, chain execution, reconciliation
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod orchestrator;
pub mod quiz;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader, GenerationConfig, ProviderConfig, ProviderKind};
pub use types::{ErrorKind, QuizError, Result};

pub use orchestrator::{FallbackReason, GenerationReport, Provenance, QuizOrchestrator};
pub use quiz::{Difficulty, Question, QuestionType, Quiz, QuizDraft};

pub use ai::{
    CredentialSlot, Credentials, GenerationRequest, ProviderChain, ProviderChainBuilder,
    QuizProvider, TimeoutConfig,
};
