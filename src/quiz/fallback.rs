//! Deterministic Fallback Generator
//!
//! Synthesizes a valid quiz from only a topic and a count. No I/O, no
//! randomness: the same input always yields the same questions.
//!
//! Layout by position:
//! - even index → multiple-choice (first option correct), odd → true/false (`True`)
//! - `third = count / 3`; indices below `third` are easy, below `2 * third`
//!   medium, the rest hard (remainders land in the hard band)

use super::{Difficulty, Question, QuestionType, Quiz, QuizDraft, fallback_source};
use crate::constants::schema as schema_constants;

struct ChoiceTemplate {
    question: &'static str,
    options: [&'static str; 4],
    explanation: &'static str,
}

struct StatementTemplate {
    statement: &'static str,
    explanation: &'static str,
}

const CHOICE_TEMPLATES: [ChoiceTemplate; 6] = [
    ChoiceTemplate {
        question: "What is {topic}?",
        options: [
            "A subject area with its own concepts related to {topic}",
            "A brand name that only sounds like {topic}",
            "A single historical event called {topic}",
            "A fictional idea unrelated to real {topic}",
        ],
        explanation: "{topic} is best understood as a subject area with its own concepts and vocabulary.",
    },
    ChoiceTemplate {
        question: "Which approach best helps someone learn {topic}?",
        options: [
            "Studying the core concepts of {topic} and applying them",
            "Memorizing one isolated fact about {topic}",
            "Avoiding any practical examples of {topic}",
            "Reading only the title of a book on {topic}",
        ],
        explanation: "Understanding {topic} comes from learning its core concepts and practising them.",
    },
    ChoiceTemplate {
        question: "Why is {topic} worth studying?",
        options: [
            "It builds understanding that can be applied beyond {topic}",
            "It has no connection to anything outside {topic}",
            "It can be mastered without any effort, unlike other parts of {topic}",
            "It is only relevant to people who already master {topic}",
        ],
        explanation: "Ideas from {topic} usually connect to and support other areas of knowledge.",
    },
    ChoiceTemplate {
        question: "What is usually the first step when exploring {topic}?",
        options: [
            "Learning the basic terminology of {topic}",
            "Jumping straight to the most advanced problems in {topic}",
            "Ignoring existing knowledge about {topic}",
            "Assuming everything about {topic} is already known",
        ],
        explanation: "The basic terminology of {topic} is the foundation for every later concept.",
    },
    ChoiceTemplate {
        question: "How do experts typically deepen their knowledge of {topic}?",
        options: [
            "By combining study of {topic} with hands-on practice",
            "By never revisiting what they know about {topic}",
            "By relying on a single source about {topic}",
            "By avoiding open questions about {topic}",
        ],
        explanation: "Expertise in {topic} grows through a mix of study and deliberate practice.",
    },
    ChoiceTemplate {
        question: "Which statement about the concepts in {topic} is most accurate?",
        options: [
            "The concepts in {topic} build on one another",
            "The concepts in {topic} are completely unrelated",
            "{topic} consists of exactly one concept",
            "Nothing in {topic} can be explained",
        ],
        explanation: "Like most subjects, {topic} is organised as concepts that build on earlier ones.",
    },
];

const STATEMENT_TEMPLATES: [StatementTemplate; 6] = [
    StatementTemplate {
        statement: "True or False: {topic} is a subject worth studying.",
        explanation: "{topic} is indeed a subject worth studying.",
    },
    StatementTemplate {
        statement: "True or False: Understanding {topic} requires learning its key concepts.",
        explanation: "The key concepts of {topic} are what make deeper understanding possible.",
    },
    StatementTemplate {
        statement: "True or False: {topic} can be explored through examples and practice.",
        explanation: "Worked examples and practice are effective ways to explore {topic}.",
    },
    StatementTemplate {
        statement: "True or False: Knowledge of {topic} can connect to other areas of study.",
        explanation: "Ideas from {topic} frequently relate to neighbouring fields.",
    },
    StatementTemplate {
        statement: "True or False: Experts in {topic} keep refining their understanding over time.",
        explanation: "Even experts revisit and refine what they know about {topic}.",
    },
    StatementTemplate {
        statement: "True or False: Learning the vocabulary of {topic} helps in understanding it.",
        explanation: "Shared vocabulary makes explanations of {topic} easier to follow.",
    },
];

fn fill(template: &str, topic: &str) -> String {
    template.replace("{topic}", topic)
}

/// Difficulty band for a position within a quiz of `count` questions
pub fn difficulty_for(index: usize, count: usize) -> Difficulty {
    let third = count / 3;
    if index < third {
        Difficulty::Easy
    } else if index < 2 * third {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

/// The templated question for one position
pub fn fallback_question(topic: &str, index: usize, count: usize) -> Question {
    let difficulty = difficulty_for(index, count);
    let slot = index / 2;

    if index % 2 == 0 {
        let template = &CHOICE_TEMPLATES[slot % CHOICE_TEMPLATES.len()];
        let options: Vec<String> = template.options.iter().map(|o| fill(o, topic)).collect();
        Question {
            question: fill(template.question, topic),
            question_type: QuestionType::MultipleChoice,
            answer: options[0].clone(),
            options,
            explanation: fill(template.explanation, topic),
            difficulty,
        }
    } else {
        let template = &STATEMENT_TEMPLATES[slot % STATEMENT_TEMPLATES.len()];
        Question {
            question: fill(template.statement, topic),
            question_type: QuestionType::TrueFalse,
            options: Vec::new(),
            answer: schema_constants::TRUE_ANSWER.to_string(),
            explanation: fill(template.explanation, topic),
            difficulty,
        }
    }
}

/// Unstamped fallback quiz; a count of zero is treated as one
pub fn synthesize_draft(topic: &str, count: usize) -> QuizDraft {
    let count = count.max(1);
    QuizDraft {
        title: format!("{} Quiz", topic),
        declared_total: Some(count as u64),
        questions: (0..count)
            .map(|idx| fallback_question(topic, idx, count))
            .collect(),
    }
}

/// Complete fallback quiz with fallback provenance
pub fn synthesize(topic: &str, count: usize) -> Quiz {
    Quiz::finalize(synthesize_draft(topic, count), fallback_source(topic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::validate;
    use proptest::prelude::*;

    #[test]
    fn test_layout_for_nine_questions() {
        let quiz = synthesize("Photosynthesis", 9);
        assert_eq!(quiz.total_questions(), 9);

        for (idx, q) in quiz.questions().iter().enumerate() {
            let expected_type = if idx % 2 == 0 {
                QuestionType::MultipleChoice
            } else {
                QuestionType::TrueFalse
            };
            assert_eq!(q.question_type, expected_type, "type at {}", idx);

            let expected_difficulty = match idx {
                0..=2 => Difficulty::Easy,
                3..=5 => Difficulty::Medium,
                _ => Difficulty::Hard,
            };
            assert_eq!(q.difficulty, expected_difficulty, "difficulty at {}", idx);
        }
    }

    #[test]
    fn test_reproducible_except_timestamp() {
        let a = synthesize("Photosynthesis", 9);
        let b = synthesize("Photosynthesis", 9);

        let mut a = serde_json::to_value(&a).unwrap();
        let mut b = serde_json::to_value(&b).unwrap();
        a.as_object_mut().unwrap().remove("generated_at");
        b.as_object_mut().unwrap().remove("generated_at");

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_title_and_source() {
        let quiz = synthesize("Machine Learning", 3);
        assert_eq!(quiz.title(), "Machine Learning Quiz");
        assert_eq!(quiz.source(), "Fallback quiz for Machine Learning");
    }

    #[test]
    fn test_remainder_falls_into_hard_band() {
        // 10 / 3 = 3: 0-2 easy, 3-5 medium, 6-9 hard
        assert_eq!(difficulty_for(2, 10), Difficulty::Easy);
        assert_eq!(difficulty_for(3, 10), Difficulty::Medium);
        assert_eq!(difficulty_for(5, 10), Difficulty::Medium);
        assert_eq!(difficulty_for(6, 10), Difficulty::Hard);
        assert_eq!(difficulty_for(9, 10), Difficulty::Hard);

        // fewer than three questions are all hard
        assert_eq!(difficulty_for(0, 1), Difficulty::Hard);
        assert_eq!(difficulty_for(1, 2), Difficulty::Hard);
    }

    #[test]
    fn test_zero_count_is_clamped() {
        let quiz = synthesize("Rust", 0);
        assert_eq!(quiz.total_questions(), 1);
    }

    #[test]
    fn test_first_option_is_answer() {
        let q = fallback_question("Rust", 0, 4);
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.answer_index(), Some(0));
        assert!(q.options.iter().all(|o| o.contains("Rust")));
    }

    #[test]
    fn test_consecutive_choice_questions_differ() {
        let first = fallback_question("Rust", 0, 6);
        let second = fallback_question("Rust", 2, 6);
        assert_ne!(first.question, second.question);
    }

    fn as_candidate(quiz: &Quiz) -> serde_json::Value {
        serde_json::to_value(quiz).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn prop_answer_is_literal_option(topic in "[A-Za-z0-9 ,.()'-]{1,40}", count in 1usize..60) {
            let quiz = synthesize(&topic, count);
            prop_assert_eq!(quiz.questions().len(), count);
            for q in quiz.questions().iter().filter(|q| q.is_multiple_choice()) {
                prop_assert!(q.options.contains(&q.answer));
            }
        }

        #[test]
        fn prop_fallback_passes_schema(topic in "[A-Za-z][A-Za-z0-9 ]{0,30}", count in 1usize..60) {
            let quiz = synthesize(&topic, count);
            let draft = validate(&as_candidate(&quiz));
            prop_assert!(draft.is_ok(), "fallback quiz rejected: {:?}", draft.err());
        }
    }
}
