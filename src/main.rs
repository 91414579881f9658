use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizforge::cli::Output;
use quizforge::cli::commands::generate::{GenerateOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "quizforge")]
#[command(
    version,
    about = "Generate structured quizzes from a topic using a chain of AI providers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Show debug logs and provider attempts")]
    verbose: bool,

    #[arg(long, short, global = true, help = "Only print errors")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz for a topic
    Generate {
        /// Subject of the quiz
        topic: String,

        #[arg(long, short = 'n', help = "Number of questions [default: from config]")]
        count: Option<usize>,

        #[arg(long, short, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[arg(long, short, help = "Write the quiz to a file instead of stdout")]
        output: Option<PathBuf>,

        #[arg(long, help = "Skip every provider and use the built-in generator")]
        offline: bool,

        #[arg(long, help = "Google API key (overrides GOOGLE_API_KEY / GEMINI_API_KEY)")]
        api_key: Option<String>,

        #[arg(long, help = "OpenAI API key (overrides OPENAI_API_KEY)")]
        openai_key: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective configuration
    Show {
        #[arg(long, short, default_value = "toml", help = "Output format: toml, json")]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Create the global configuration file
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mquizforge encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "quizforge=debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    // stdout carries quiz output, logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            topic,
            count,
            format,
            output,
            offline,
            api_key,
            openai_key,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(quizforge::cli::commands::generate::run(GenerateOptions {
                topic,
                count,
                format,
                output,
                offline,
                api_key,
                openai_key,
                verbose: cli.verbose,
                quiet: cli.quiet,
            }))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                quizforge::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                quizforge::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                quizforge::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
