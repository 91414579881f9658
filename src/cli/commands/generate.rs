//! Generate Command
//!
//! Usage:
//!   quizforge generate <TOPIC> [-n N] [--format json|text] [--output FILE]
//!                      [--offline] [--api-key KEY] [--openai-key KEY]

use console::style;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use crate::ai::provider::Credentials;
use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::orchestrator::{GenerationReport, QuizOrchestrator};
use crate::quiz::Quiz;
use crate::types::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub topic: String,
    /// Falls back to `generation.default_questions`
    pub count: Option<usize>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub offline: bool,
    pub api_key: Option<String>,
    pub openai_key: Option<String>,
    pub verbose: bool,
    pub quiet: bool,
}

pub async fn run(options: GenerateOptions) -> Result<()> {
    let out = Output::quiet(options.quiet);
    let config = ConfigLoader::load()?;

    let orchestrator = if options.offline {
        QuizOrchestrator::offline(config.generation.clone())
    } else {
        QuizOrchestrator::from_config(&config)?
    };

    let credentials = resolve_credentials(&options);
    let count = options
        .count
        .unwrap_or(orchestrator.settings().default_questions);

    if !options.offline {
        out.info(&format!(
            "Generating {} questions on '{}' via {}",
            count,
            options.topic.trim(),
            orchestrator.provider_names().join(" → ")
        ));
    }

    let report = orchestrator
        .generate_with_report(&options.topic, count, &credentials)
        .await?;

    if options.verbose {
        print_attempts(&out, &report);
    }

    let rendered = match options.format {
        OutputFormat::Json => report.quiz.to_json_pretty()?,
        OutputFormat::Text => render_text(&report.quiz),
    };

    match &options.output {
        Some(path) => {
            fs::write(path, format!("{}\n", rendered))?;
            out.success(&format!(
                "Wrote {} questions to {} ({})",
                report.quiz.total_questions(),
                path.display(),
                report.provenance
            ));
        }
        None => {
            println!("{}", rendered);
            if report.provenance.is_fallback() {
                out.warning(&format!("Served by {}", report.provenance));
            }
        }
    }

    Ok(())
}

/// Environment keys, overridden by explicit flags
fn resolve_credentials(options: &GenerateOptions) -> Credentials {
    let mut credentials = Credentials::from_env();
    if let Some(key) = options.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        credentials = credentials.with_google(key);
    }
    if let Some(key) = options.openai_key.as_deref().filter(|k| !k.trim().is_empty()) {
        credentials = credentials.with_openai(key);
    }
    credentials
}

fn print_attempts(out: &Output, report: &GenerationReport) {
    out.section("Provider attempts");
    if report.attempts.is_empty() {
        out.info("No failed attempts");
    }
    for attempt in &report.attempts {
        out.warning(&format!(
            "{} ({}) {} after {}ms: {}",
            attempt.provider, attempt.model, attempt.kind, attempt.duration_ms, attempt.message
        ));
    }
    out.success(&format!(
        "Served by {} ({}ms in provider chain)",
        report.provenance, report.chain_duration_ms
    ));
}

/// Human-readable rendering of a quiz
pub fn render_text(quiz: &Quiz) -> String {
    let mut text = String::new();
    let dist = quiz.difficulty_distribution();

    let _ = writeln!(text, "{}", style(quiz.title()).bold().underlined());
    let _ = writeln!(text, "Source:     {}", quiz.source());
    let _ = writeln!(
        text,
        "Generated:  {}",
        quiz.generated_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(
        text,
        "Questions:  {} (easy {}, medium {}, hard {})",
        quiz.total_questions(),
        dist.easy,
        dist.medium,
        dist.hard
    );

    for (idx, question) in quiz.questions().iter().enumerate() {
        let _ = writeln!(text);
        let _ = writeln!(
            text,
            "{}. {} {}",
            idx + 1,
            question.question,
            style(format!(
                "[{}, {}]",
                question.question_type.as_str(),
                question.difficulty.as_str()
            ))
            .dim()
        );
        for option in &question.options {
            let _ = writeln!(text, "   • {}", option);
        }
        let _ = writeln!(text, "   {} {}", style("Answer:").green(), question.answer);
        let _ = writeln!(text, "   {}", style(&question.explanation).dim());
    }

    text
}
