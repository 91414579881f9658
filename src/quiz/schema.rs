//! Quiz Schema Validation
//!
//! Turns an untrusted candidate (parsed provider JSON) into a [`QuizDraft`].
//! Pure function; the first violation found is returned.
//!
//! Checks per question, in order:
//! - `type` is `multiple-choice` or `true-false` (`InvalidQuestionType`)
//! - `question`, `answer`, `explanation`, `difficulty` present and non-empty
//! - multiple-choice: text ends with `?`, exactly four non-empty options,
//!   answer literally among them (`AnswerNotInOptions`)
//! - true/false: no options, answer is `True` or `False`
//!
//! `type` and `difficulty` must equal their wire literal exactly; no case
//! folding or trimming.

use serde_json::{Map, Value};

use super::{Difficulty, Question, QuestionType, QuizDraft};
use crate::constants::schema as schema_constants;
use crate::types::{QuizError, Result};

/// Validate a candidate quiz object
pub fn validate(candidate: &Value) -> Result<QuizDraft> {
    let obj = candidate
        .as_object()
        .ok_or_else(|| QuizError::malformed("$", "candidate must be a JSON object"))?;

    let title = match obj.get("title") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) => return Err(QuizError::malformed("title", "must not be empty")),
        Some(_) => return Err(QuizError::malformed("title", "must be a string")),
        None => return Err(QuizError::malformed("title", "missing required field")),
    };

    let raw_questions = match obj.get("questions") {
        Some(Value::Array(arr)) => arr,
        Some(_) => return Err(QuizError::malformed("questions", "must be an array")),
        None => return Err(QuizError::malformed("questions", "missing required field")),
    };

    if raw_questions.is_empty() {
        return Err(QuizError::malformed("questions", "must not be empty"));
    }

    let questions = raw_questions
        .iter()
        .enumerate()
        .map(|(idx, q)| validate_question(idx, q))
        .collect::<Result<Vec<_>>>()?;

    Ok(QuizDraft {
        title,
        declared_total: obj.get("total_questions").and_then(Value::as_u64),
        questions,
    })
}

fn validate_question(index: usize, value: &Value) -> Result<Question> {
    let location = format!("questions[{}]", index);

    let obj = value
        .as_object()
        .ok_or_else(|| QuizError::malformed(&location, "question must be a JSON object"))?;

    let question_type = match obj.get("type") {
        Some(Value::String(s)) => s
            .parse::<QuestionType>()
            .map_err(|_| QuizError::InvalidQuestionType {
                index,
                value: s.clone(),
            })?,
        Some(other) => {
            return Err(QuizError::InvalidQuestionType {
                index,
                value: other.to_string(),
            });
        }
        None => {
            return Err(QuizError::malformed(
                format!("{}.type", location),
                "missing required field",
            ));
        }
    };

    let text = required_string(obj, &location, "question")?.trim().to_string();
    let answer = required_string(obj, &location, "answer")?.to_string();
    let explanation = required_string(obj, &location, "explanation")?
        .trim()
        .to_string();
    let difficulty = required_string(obj, &location, "difficulty")?
        .parse::<Difficulty>()
        .map_err(|e| QuizError::malformed(format!("{}.difficulty", location), e))?;

    let options = match question_type {
        QuestionType::MultipleChoice => {
            if !text.ends_with('?') {
                return Err(QuizError::malformed(
                    format!("{}.question", location),
                    "multiple-choice question must end with '?'",
                ));
            }

            let options = multiple_choice_options(obj, &location)?;
            if !options.iter().any(|o| o == &answer) {
                return Err(QuizError::AnswerNotInOptions { index, answer });
            }
            options
        }
        QuestionType::TrueFalse => {
            let has_options = match obj.get("options") {
                None | Some(Value::Null) => false,
                Some(Value::Array(arr)) => !arr.is_empty(),
                Some(_) => true,
            };
            if has_options {
                return Err(QuizError::malformed(
                    format!("{}.options", location),
                    "true-false question must not carry options",
                ));
            }

            if answer != schema_constants::TRUE_ANSWER && answer != schema_constants::FALSE_ANSWER
            {
                return Err(QuizError::malformed(
                    format!("{}.answer", location),
                    format!("true-false answer must be True or False, got '{}'", answer),
                ));
            }
            Vec::new()
        }
    };

    Ok(Question {
        question: text,
        question_type,
        options,
        answer,
        explanation,
        difficulty,
    })
}

fn required_string<'a>(obj: &'a Map<String, Value>, location: &str, field: &str) -> Result<&'a str> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
        Some(Value::String(_)) => Err(QuizError::malformed(
            format!("{}.{}", location, field),
            "must not be empty",
        )),
        Some(_) => Err(QuizError::malformed(
            format!("{}.{}", location, field),
            "must be a string",
        )),
        None => Err(QuizError::malformed(
            format!("{}.{}", location, field),
            "missing required field",
        )),
    }
}

fn multiple_choice_options(obj: &Map<String, Value>, location: &str) -> Result<Vec<String>> {
    let field = format!("{}.options", location);

    let arr = match obj.get("options") {
        Some(Value::Array(arr)) => arr,
        Some(_) => return Err(QuizError::malformed(field, "must be an array")),
        None => return Err(QuizError::malformed(field, "missing required field")),
    };

    if arr.len() != schema_constants::MULTIPLE_CHOICE_OPTIONS {
        return Err(QuizError::malformed(
            field,
            format!(
                "expected {} options, got {}",
                schema_constants::MULTIPLE_CHOICE_OPTIONS,
                arr.len()
            ),
        ));
    }

    arr.iter()
        .enumerate()
        .map(|(i, opt)| match opt {
            Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
            _ => Err(QuizError::malformed(
                format!("{}[{}]", field, i),
                "option must be a non-empty string",
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use serde_json::json;

    fn valid_candidate() -> Value {
        json!({
            "title": "Photosynthesis Quiz",
            "total_questions": 2,
            "questions": [
                {
                    "question": "What pigment captures light energy?",
                    "type": "multiple-choice",
                    "options": ["A) Chlorophyll", "B) Carotene", "C) Xanthophyll", "D) Melanin"],
                    "answer": "A) Chlorophyll",
                    "explanation": "Chlorophyll absorbs red and blue light.",
                    "difficulty": "easy"
                },
                {
                    "question": "True or False: Photosynthesis releases oxygen.",
                    "type": "true-false",
                    "answer": "True",
                    "explanation": "Oxygen is a by-product of splitting water.",
                    "difficulty": "medium"
                }
            ]
        })
    }

    fn kind_of(candidate: &Value) -> ErrorKind {
        validate(candidate).unwrap_err().kind()
    }

    #[test]
    fn test_valid_candidate() {
        let draft = validate(&valid_candidate()).unwrap();
        assert_eq!(draft.title, "Photosynthesis Quiz");
        assert_eq!(draft.declared_total, Some(2));
        assert_eq!(draft.questions.len(), 2);
        assert_eq!(draft.questions[0].answer, "A) Chlorophyll");
        assert!(draft.questions[1].options.is_empty());
    }

    #[test]
    fn test_rejects_unknown_type() {
        let mut candidate = valid_candidate();
        candidate["questions"][0]["type"] = json!("essay");
        let err = validate(&candidate).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidQuestionType { index: 0, ref value } if value == "essay"
        ));
    }

    #[test]
    fn test_rejects_short_answer_type() {
        let mut candidate = valid_candidate();
        candidate["questions"][1]["type"] = json!("short");
        assert_eq!(kind_of(&candidate), ErrorKind::InvalidQuestionType);
    }

    #[test]
    fn test_rejects_answer_not_in_options() {
        let mut candidate = valid_candidate();
        // missing the letter prefix is not a literal match
        candidate["questions"][0]["answer"] = json!("Chlorophyll");
        assert_eq!(kind_of(&candidate), ErrorKind::AnswerNotInOptions);
    }

    #[test]
    fn test_rejects_missing_title() {
        let mut candidate = valid_candidate();
        candidate.as_object_mut().unwrap().remove("title");
        assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_rejects_empty_questions() {
        let mut candidate = valid_candidate();
        candidate["questions"] = json!([]);
        assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_rejects_non_object() {
        assert_eq!(kind_of(&json!([1, 2, 3])), ErrorKind::MalformedQuiz);
        assert_eq!(kind_of(&json!("quiz")), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_rejects_wrong_option_count() {
        let mut candidate = valid_candidate();
        candidate["questions"][0]["options"] = json!(["A) Chlorophyll", "B) Carotene"]);
        assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_rejects_true_false_with_options() {
        let mut candidate = valid_candidate();
        candidate["questions"][1]["options"] = json!(["True", "False"]);
        assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_accepts_true_false_with_null_options() {
        let mut candidate = valid_candidate();
        candidate["questions"][1]["options"] = Value::Null;
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn test_rejects_true_false_lowercase_answer() {
        let mut candidate = valid_candidate();
        candidate["questions"][1]["answer"] = json!("true");
        assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_rejects_missing_explanation() {
        let mut candidate = valid_candidate();
        candidate["questions"][0]["explanation"] = json!("   ");
        assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_rejects_bad_difficulty() {
        let mut candidate = valid_candidate();
        candidate["questions"][0]["difficulty"] = json!("impossible");
        assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_rejects_non_literal_type_spelling() {
        for spelling in ["Multiple-Choice", "  MULTIPLE-CHOICE ", "multiple-choice "] {
            let mut candidate = valid_candidate();
            candidate["questions"][0]["type"] = json!(spelling);
            assert_eq!(kind_of(&candidate), ErrorKind::InvalidQuestionType, "{:?}", spelling);
        }
    }

    #[test]
    fn test_rejects_non_literal_difficulty_spelling() {
        for spelling in ["HARD", "Easy", " medium"] {
            let mut candidate = valid_candidate();
            candidate["questions"][0]["difficulty"] = json!(spelling);
            assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz, "{:?}", spelling);
        }
    }

    #[test]
    fn test_rejects_multiple_choice_without_question_mark() {
        let mut candidate = valid_candidate();
        candidate["questions"][0]["question"] = json!("Name the pigment that captures light.");
        assert_eq!(kind_of(&candidate), ErrorKind::MalformedQuiz);
    }

    #[test]
    fn test_type_checked_before_other_fields() {
        let candidate = json!({
            "title": "Quiz",
            "questions": [{ "type": "essay" }]
        });
        assert_eq!(kind_of(&candidate), ErrorKind::InvalidQuestionType);
    }

    #[test]
    fn test_missing_declared_total_is_allowed() {
        let mut candidate = valid_candidate();
        candidate.as_object_mut().unwrap().remove("total_questions");
        let draft = validate(&candidate).unwrap();
        assert_eq!(draft.declared_total, None);
    }
}
