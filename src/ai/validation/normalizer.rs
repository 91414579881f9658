//! Response Normalizer
//!
//! Turns raw provider text into a JSON value.
//!
//! Handles the usual model output habits:
//! - Markdown code fence wrapping (```json ... ``` or bare ```)
//! - A leading byte-order mark
//! - JSON embedded in explanatory prose
//!
//! No lenient repair is attempted. Text that is neither valid JSON nor
//! contains a balanced object is rejected; the schema gate decides
//! whether a parsed value is actually a quiz.

use serde_json::Value;
use tracing::debug;

use crate::types::{QuizError, Result, preview};

/// Parse provider text into JSON
pub fn normalize(raw: &str) -> Result<Value> {
    normalize_with_status(raw).map(|(value, _)| value)
}

/// Parse provider text, also reporting whether the object had to be
/// extracted from surrounding text
pub fn normalize_with_status(raw: &str) -> Result<(Value, bool)> {
    let cleaned = preprocess(raw);

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Ok((value, false));
    }

    if let Some(span) = first_balanced_object(cleaned)
        && let Ok(value) = serde_json::from_str::<Value>(span)
    {
        debug!(span_len = span.len(), "JSON object extracted from mixed content");
        return Ok((value, true));
    }

    Err(QuizError::UnparseableResponse(format!(
        "no JSON object found in provider output: {}",
        preview(cleaned, 200)
    )))
}

fn preprocess(raw: &str) -> &str {
    let s = raw.trim().trim_start_matches('\u{feff}').trim_start();
    strip_code_fences(s).trim()
}

/// Remove a leading ```json / ``` marker and a trailing ``` marker
fn strip_code_fences(s: &str) -> &str {
    let mut result = s;

    if let Some(rest) = result.strip_prefix("```") {
        result = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }

    if let Some(rest) = result.trim_end().strip_suffix("```") {
        result = rest;
    }

    result
}

/// First top-level `{...}` span, skipping braces inside string literals
fn first_balanced_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in s[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn test_plain_json() {
        let (value, extracted) = normalize_with_status(r#"{"title": "T"}"#).unwrap();
        assert_eq!(value["title"], "T");
        assert!(!extracted);
    }

    #[test]
    fn test_fenced_json() {
        let input = "```json\n{\"title\":\"T\",\"questions\":[]}\n```";
        let value = normalize(input).unwrap();
        assert_eq!(value["title"], "T");
        assert!(value["questions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_fence_without_newlines() {
        let value = normalize("```JSON{\"title\":\"T\"}```").unwrap();
        assert_eq!(value["title"], "T");

        let value = normalize("```\n{\"title\":\"T\"}\n```").unwrap();
        assert_eq!(value["title"], "T");
    }

    #[test]
    fn test_embedded_json() {
        let input = r#"Here you go: {"title":"T","questions":[]} hope it helps"#;
        let (value, extracted) = normalize_with_status(input).unwrap();
        assert_eq!(value["title"], "T");
        assert!(extracted);
    }

    #[test]
    fn test_braces_inside_strings() {
        let input = r#"Sure! {"title":"Sets {A} and \"B}\"","questions":[]} Done."#;
        let value = normalize(input).unwrap();
        assert_eq!(value["title"], "Sets {A} and \"B}\"");
    }

    #[test]
    fn test_garbage_is_unparseable() {
        let err = normalize("I cannot help with that.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnparseableResponse);
    }

    #[test]
    fn test_unbalanced_is_unparseable() {
        let err = normalize(r#"{"title": "T", "questions": ["#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnparseableResponse);
    }

    #[test]
    fn test_no_lenient_repair() {
        // trailing comma is not repaired
        let err = normalize(r#"{"title": "T",}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnparseableResponse);
    }

    #[test]
    fn test_bom_is_stripped() {
        let value = normalize("\u{feff}{\"title\":\"T\"}").unwrap();
        assert_eq!(value["title"], "T");
    }

    #[test]
    fn test_non_object_json_passes_through() {
        // shape is the schema gate's concern
        let value = normalize("[1, 2, 3]").unwrap();
        assert!(value.is_array());
    }
}
