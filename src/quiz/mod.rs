//! Quiz Data Model
//!
//! The data contract for a well-formed quiz:
//!
//! - [`Question`]: one multiple-choice or true/false item
//! - [`QuizDraft`]: validated questions that have not been stamped yet
//! - [`Quiz`]: the immutable value returned to callers
//!
//! Provider output only ever reaches a [`Quiz`] through [`schema::validate`].
//! Provenance and timestamps are assigned when a draft is finalized.

pub mod fallback;
pub mod schema;

pub use fallback::{difficulty_for, fallback_question, synthesize, synthesize_draft};
pub use schema::validate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Enums
// =============================================================================

/// Question format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::TrueFalse => "true-false",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple-choice" => Ok(QuestionType::MultipleChoice),
            "true-false" => Ok(QuestionType::TrueFalse),
            _ => Err(format!(
                "Unknown question type: {}. Valid values: multiple-choice, true-false",
                s
            )),
        }
    }
}

/// Difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!(
                "Unknown difficulty: {}. Valid values: easy, medium, hard",
                s
            )),
        }
    }
}

// =============================================================================
// Question
// =============================================================================

/// A single quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Exactly four entries for multiple-choice, empty for true/false
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn is_multiple_choice(&self) -> bool {
        self.question_type == QuestionType::MultipleChoice
    }

    /// Index of the answer among the options (multiple-choice only)
    pub fn answer_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o == &self.answer)
    }
}

// =============================================================================
// Draft & Quiz
// =============================================================================

/// Validated questions awaiting provenance and a timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDraft {
    pub title: String,
    /// `total_questions` as declared by the provider, if it sent one
    pub declared_total: Option<u64>,
    pub questions: Vec<Question>,
}

impl QuizDraft {
    /// Drop questions beyond `count`
    pub fn truncate(&mut self, count: usize) {
        self.questions.truncate(count);
    }

    /// Whether the provider-declared count disagrees with the delivered questions
    pub fn has_count_mismatch(&self) -> bool {
        self.declared_total
            .is_some_and(|declared| declared != self.questions.len() as u64)
    }
}

/// Completed quiz
///
/// Fields are private so a returned quiz cannot be altered; `total_questions`
/// is derived from the question list when the draft is finalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quiz {
    title: String,
    total_questions: usize,
    questions: Vec<Question>,
    source: String,
    generated_at: DateTime<Utc>,
}

impl Quiz {
    /// Stamp a draft with its provenance and the completion time
    pub fn finalize(draft: QuizDraft, source: impl Into<String>) -> Self {
        Self {
            title: draft.title,
            total_questions: draft.questions.len(),
            questions: draft.questions,
            source: source.into(),
            generated_at: Utc::now(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Per-band question counts
    pub fn difficulty_distribution(&self) -> DifficultyDistribution {
        let mut dist = DifficultyDistribution::default();
        for q in &self.questions {
            match q.difficulty {
                Difficulty::Easy => dist.easy += 1,
                Difficulty::Medium => dist.medium += 1,
                Difficulty::Hard => dist.hard += 1,
            }
        }
        dist
    }

    pub fn to_json_pretty(&self) -> crate::types::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Count of questions per difficulty band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyDistribution {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

// =============================================================================
// Provenance
// =============================================================================

/// `source` value for a quiz produced by a named provider
pub fn provider_source(topic: &str, provider: &str) -> String {
    format!("AI analysis of {} via {}", topic, provider)
}

/// `source` value for a quiz produced by the deterministic generator
pub fn fallback_source(topic: &str) -> String {
    format!("Fallback quiz for {}", topic)
}
