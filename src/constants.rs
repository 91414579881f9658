//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Quiz generation constants
pub mod generation {
    /// Questions per quiz when the caller does not ask for a count
    pub const DEFAULT_QUESTIONS: usize = 10;

    /// Largest quiz a single request may ask for
    pub const MAX_QUESTIONS: usize = 50;

    /// Sampling temperature sent to every provider
    pub const TEMPERATURE: f32 = 0.4;

    /// Output budget sent to every provider, generous enough to avoid truncation
    pub const MAX_OUTPUT_TOKENS: u32 = 6000;

    /// Share of multiple-choice questions requested from providers (percent)
    pub const MULTIPLE_CHOICE_SHARE_PCT: u8 = 60;
}

/// Quiz schema constants
pub mod schema {
    /// Options carried by every multiple-choice question
    pub const MULTIPLE_CHOICE_OPTIONS: usize = 4;

    /// Accepted true/false answers
    pub const TRUE_ANSWER: &str = "True";
    pub const FALSE_ANSWER: &str = "False";
}

/// HTTP/Network constants
pub mod network {
    /// Default per-provider request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
}

/// Provider defaults
pub mod provider {
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const GEMINI_PRIMARY_MODEL: &str = "gemini-2.5-flash";
    pub const GEMINI_SECONDARY_MODEL: &str = "gemini-2.0-flash";

    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";

    pub const OLLAMA_API_BASE: &str = "http://localhost:11434";
    pub const OLLAMA_MODEL: &str = "llama3:latest";
}
