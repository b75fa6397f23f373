//! kissan-dost: Kissan Dost Main Binary
//!
//! Interactive agricultural advisory assistant.
//!
//! Usage:
//!   kissan-dost              - Start the interactive assistant
//!   kissan-dost --ask "..."  - Ask one question and exit
//!   kissan-dost --help       - Show help

mod cli;

use kd_core::{Config, GeminiClient};
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Interactive REPL
    Repl,
    /// One-shot question
    Ask(String),
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("kissan-dost {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging; RUST_LOG overrides, default keeps the chat quiet
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting kissan-dost...");
    tracing::info!("Model: {}", config.llm.model);

    let client = GeminiClient::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create Gemini client: {}", e))?;

    match mode {
        RunMode::Ask(prompt) => cli::run_ask(client, config, &prompt).await,
        RunMode::Repl => cli::run_cli(client, config).await,
        _ => Ok(()),
    }
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ask" | "-a" => {
                let prompt = iter.next().cloned().unwrap_or_default();
                return RunMode::Ask(prompt);
            }
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Repl
}

/// Print help message
fn print_help() {
    println!("kissan-dost - AI agriculture advisor for farmers");
    println!();
    println!("Usage:");
    println!("  kissan-dost                Start the interactive assistant");
    println!("  kissan-dost --ask \"...\"    Ask one question and exit");
    println!("  kissan-dost --help         Show this help message");
    println!("  kissan-dost --version      Show version");
    println!();
    println!("Environment Variables:");
    println!("  GEMINI_API_KEY       API key (required unless offline)");
    println!("  LLM_MODEL            Model name (default: gemini-2.5-flash)");
    println!("  LLM_BASE_URL         Custom API endpoint");
    println!("  DB_PATH              Database path (default: data/kissan-dost.db)");
    println!("  KD_LANGUAGE          Interface language: en, ur, pa (default: en)");
    println!("  KD_OFFLINE           Start offline: guides and symptom checker only");
}
