//! Unified Error Type System
//!
//! Centralized error type for the quiz generation pipeline.
//!
//! ## Error Kinds
//!
//! - **Fatal**: `InvalidRequest`, `MissingCredential` (surfaced to the caller
//!   before any provider attempt)
//! - **Recoverable**: every provider, parse and validation failure (absorbed
//!   by the orchestrator, which advances the fallback chain)
//!
//! Configuration and I/O errors only occur outside the generation path
//! (config loading, CLI output) and are fatal there.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Kinds
// =============================================================================

/// Copyable classification of a [`QuizError`] for logging and attempt records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    MissingCredential,
    ProviderNotConfigured,
    ProviderRequestFailed,
    ProviderResponseShapeInvalid,
    UnparseableResponse,
    MalformedQuiz,
    InvalidQuestionType,
    AnswerNotInOptions,
    Timeout,
    Config,
    Io,
    Json,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::ProviderNotConfigured => "PROVIDER_NOT_CONFIGURED",
            Self::ProviderRequestFailed => "PROVIDER_REQUEST_FAILED",
            Self::ProviderResponseShapeInvalid => "PROVIDER_RESPONSE_SHAPE_INVALID",
            Self::UnparseableResponse => "UNPARSEABLE_RESPONSE",
            Self::MalformedQuiz => "MALFORMED_QUIZ",
            Self::InvalidQuestionType => "INVALID_QUESTION_TYPE",
            Self::AnswerNotInOptions => "ANSWER_NOT_IN_OPTIONS",
            Self::Timeout => "TIMEOUT",
            Self::Config => "CONFIG",
            Self::Io => "IO",
            Self::Json => "JSON",
        };
        f.write_str(label)
    }
}

impl ErrorKind {
    /// Fatal kinds stop a generation request instead of advancing the chain
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest | Self::MissingCredential | Self::Config | Self::Io
        )
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum QuizError {
    // -------------------------------------------------------------------------
    // Boundary Errors (fatal)
    // -------------------------------------------------------------------------
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing credential '{credential}' required by provider {provider}")]
    MissingCredential {
        provider: String,
        credential: String,
    },

    // -------------------------------------------------------------------------
    // Provider Errors
    // -------------------------------------------------------------------------
    #[error("Provider {provider} is not configured")]
    ProviderNotConfigured { provider: String },

    #[error("Provider {provider} request failed: {message}")]
    ProviderRequestFailed {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Provider {provider} returned an unexpected response envelope: {message}")]
    ProviderResponseShapeInvalid { provider: String, message: String },

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Normalization & Validation Errors
    // -------------------------------------------------------------------------
    #[error("Unparseable response: {0}")]
    UnparseableResponse(String),

    #[error("Malformed quiz at {location}: {message}")]
    MalformedQuiz { location: String, message: String },

    #[error("Invalid question type at questions[{index}]: {value}")]
    InvalidQuestionType { index: usize, value: String },

    #[error("Answer at questions[{index}] is not one of its options: {answer}")]
    AnswerNotInOptions { index: usize, answer: String },

    // -------------------------------------------------------------------------
    // System Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl QuizError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a malformed-quiz error at a JSON location
    pub fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedQuiz {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a transport-level provider failure
    pub fn request_failed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderRequestFailed {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a provider failure from a non-success HTTP status
    pub fn http_status(provider: impl Into<String>, status: u16, body: &str) -> Self {
        Self::ProviderRequestFailed {
            provider: provider.into(),
            status: Some(status),
            message: format!("HTTP {}: {}", status, preview(body, 300)),
        }
    }

    /// Create an envelope-shape failure
    pub fn response_shape(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderResponseShapeInvalid {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::MissingCredential { .. } => ErrorKind::MissingCredential,
            Self::ProviderNotConfigured { .. } => ErrorKind::ProviderNotConfigured,
            Self::ProviderRequestFailed { .. } => ErrorKind::ProviderRequestFailed,
            Self::ProviderResponseShapeInvalid { .. } => ErrorKind::ProviderResponseShapeInvalid,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::UnparseableResponse(_) => ErrorKind::UnparseableResponse,
            Self::MalformedQuiz { .. } => ErrorKind::MalformedQuiz,
            Self::InvalidQuestionType { .. } => ErrorKind::InvalidQuestionType,
            Self::AnswerNotInOptions { .. } => ErrorKind::AnswerNotInOptions,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Json,
        }
    }

    /// Check if this error must be surfaced to the caller
    pub fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }
}

/// Truncate provider text for error messages and logs
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
