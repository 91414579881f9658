//! Prompt Builder
//!
//! Sectioned prompt construction shared by every provider adapter, so all
//! backends receive the same instructions for a given request.
//!
//! ## Sections
//!
//! 1. **Role**: who the model is acting as
//! 2. **Objectives**: numbered formatting rules
//! 3. **Focus**: the topic and what must not drift
//! 4. **Anti-Patterns**: concrete wrong/right pairs
//! 5. **Output Schema**: the exact JSON shape

use std::fmt::Write as _;

use crate::constants::generation as gen_constants;

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Who the model writes as, and for whom
    Role { persona: String, audience: String },
    /// Numbered, mandatory rules
    Objectives(Vec<String>),
    Text {
        header: Option<String>,
        content: String,
    },
    Code { language: String, content: String },
    Focus {
        target: String,
        restrictions: Vec<String>,
    },
    AntiPatterns { bad: Vec<String>, good: Vec<String> },
}

impl PromptSection {
    fn render(&self) -> String {
        let mut out = String::new();
        match self {
            PromptSection::Role { persona, audience } => {
                let _ = write!(out, "<role>\nYou are {}. You write for {}.\n</role>", persona, audience);
            }
            PromptSection::Objectives(objectives) => {
                out.push_str("<rules>\n");
                for (n, rule) in objectives.iter().enumerate() {
                    let _ = writeln!(out, "{}. {}", n + 1, rule);
                }
                out.push_str("</rules>");
            }
            PromptSection::Text { header, content } => {
                if let Some(header) = header {
                    let _ = write!(out, "## {}\n\n", header);
                }
                out.push_str(content);
            }
            PromptSection::Code { language, content } => {
                let _ = write!(out, "```{}\n{}\n```", language, content);
            }
            PromptSection::Focus {
                target,
                restrictions,
            } => {
                let _ = writeln!(out, "<focus topic=\"{}\">", target);
                for restriction in restrictions {
                    let _ = writeln!(out, "- {}", restriction);
                }
                out.push_str("</focus>");
            }
            PromptSection::AntiPatterns { bad, good } => {
                out.push_str("## Common mistakes\n");
                for example in bad {
                    let _ = write!(out, "\nWRONG: {}", example);
                }
                for example in good {
                    let _ = write!(out, "\nCORRECT: {}", example);
                }
            }
        }
        out
    }
}

/// Sectioned prompt, rendered in insertion order
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, persona: &str, audience: &str) -> Self {
        self.sections.push(PromptSection::Role {
            persona: persona.to_string(),
            audience: audience.to_string(),
        });
        self
    }

    pub fn objectives<S: Into<String>>(mut self, objectives: Vec<S>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Text section under a markdown header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn focus(mut self, target: &str, restrictions: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Focus {
            target: target.to_string(),
            restrictions: restrictions.into_iter().map(String::from).collect(),
        });
        self
    }

    pub fn anti_patterns(mut self, bad: Vec<&str>, good: Vec<&str>) -> Self {
        self.sections.push(PromptSection::AntiPatterns {
            bad: bad.into_iter().map(String::from).collect(),
            good: good.into_iter().map(String::from).collect(),
        });
        self
    }

    /// Sections separated by a blank line
    pub fn build(self) -> String {
        self.sections
            .iter()
            .map(PromptSection::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Full generation prompt for a topic and question count
pub fn quiz_prompt(topic: &str, count: usize) -> String {
    let mc_pct = gen_constants::MULTIPLE_CHOICE_SHARE_PCT;
    let tf_pct = 100 - mc_pct;

    PromptBuilder::new()
        .role(
            "an experienced teacher who writes fair, well-explained quizzes",
            &format!("learners studying {}", topic),
        )
        .text(&format!("Create a high-quality quiz about \"{}\".", topic))
        .section(
            "STRICT QUALITY REQUIREMENTS",
            "Every rule below is mandatory.",
        )
        .objectives(vec![
            format!("Generate exactly {} questions", count),
            "Use ONLY multiple-choice (4 options) and true/false questions".to_string(),
            "NO short answer questions that require typing".to_string(),
            format!(
                "Mix question types: {}% multiple-choice, {}% true/false",
                mc_pct, tf_pct
            ),
            "Include easy, medium, and hard questions in roughly equal thirds".to_string(),
            "Each question must have a clear, educational explanation".to_string(),
            "Questions MUST test understanding, not just memorization".to_string(),
            "Focus on IMPORTANT concepts and key information".to_string(),
            "Make questions challenging but fair".to_string(),
            "Avoid trivial details or overly specific information".to_string(),
            "Each question should teach something valuable".to_string(),
        ])
        .focus(
            topic,
            vec![
                "Every question must be relevant to this topic",
                "Multiple-choice questions end with a question mark",
                "The answer of a multiple-choice question is copied verbatim from its options",
                "The answer of a true/false question is exactly True or False",
            ],
        )
        .anti_patterns(
            vec![
                "options [\"A) Chlorophyll\", ...] with answer \"Chlorophyll\"",
                "a true/false question carrying an options list",
            ],
            vec![
                "options [\"A) Chlorophyll\", ...] with answer \"A) Chlorophyll\"",
                "a true/false question with only an answer of True or False",
            ],
        )
        .section("Output Format", "Respond with a single JSON object and nothing else:")
        .code("json", &output_schema(count))
        .build()
}

fn output_schema(count: usize) -> String {
    format!(
        r#"{{
    "title": "Quiz Title",
    "total_questions": {count},
    "questions": [
        {{
            "question": "Question text?",
            "type": "multiple-choice",
            "options": ["Option A", "Option B", "Option C", "Option D"],
            "answer": "Option A",
            "explanation": "Why this answer is correct",
            "difficulty": "easy|medium|hard"
        }},
        {{
            "question": "Statement to judge.",
            "type": "true-false",
            "answer": "True|False",
            "explanation": "Why this answer is correct",
            "difficulty": "easy|medium|hard"
        }}
    ]
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("a biology teacher", "first-year students")
            .objectives(vec!["Ask questions", "Explain answers"])
            .build();

        assert!(prompt.starts_with(
            "<role>\nYou are a biology teacher. You write for first-year students.\n</role>"
        ));
        assert!(prompt.contains("<rules>\n1. Ask questions\n2. Explain answers\n</rules>"));
    }

    #[test]
    fn test_quiz_prompt_embeds_topic_and_count() {
        let prompt = quiz_prompt("Photosynthesis", 7);

        assert!(prompt.contains("\"Photosynthesis\""));
        assert!(prompt.contains("Generate exactly 7 questions"));
        assert!(prompt.contains("\"total_questions\": 7"));
        assert!(prompt.contains("60% multiple-choice, 40% true/false"));
        assert!(prompt.contains("```json"));
        assert!(prompt.contains("You write for learners studying Photosynthesis."));
        assert!(prompt.contains("<focus topic=\"Photosynthesis\">"));
    }

    #[test]
    fn test_quiz_prompt_schema_is_json() {
        let schema = output_schema(3);
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();
        assert_eq!(value["total_questions"], 3);
        assert_eq!(value["questions"][1]["type"], "true-false");
    }

    #[test]
    fn test_anti_patterns() {
        let prompt = PromptBuilder::new()
            .anti_patterns(vec!["vague"], vec!["specific"])
            .build();

        assert!(prompt.contains("WRONG: vague"));
        assert!(prompt.contains("CORRECT: specific"));
    }
}
