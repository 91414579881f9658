//! Provider Output Validation
//!
//! First stage of the trust boundary for model output: raw text is
//! normalized into JSON here, then handed to [`crate::quiz::validate`].

mod normalizer;

pub use normalizer::{normalize, normalize_with_status};

use crate::quiz::{self, QuizDraft};
use crate::types::Result;

/// Normalize raw provider text and validate it as a quiz draft
pub fn parse_quiz(raw: &str) -> Result<QuizDraft> {
    let value = normalize(raw)?;
    quiz::validate(&value)
}
