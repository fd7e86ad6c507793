//! docket - duplicate ticket detection for support desk exports.
//!
//! # Configuration
//!
//! Settings are read from `--config` (TOML, JSON or YAML), then from these
//! environment variables (a `.env` file is honoured), then from flags:
//!
//! - `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` - provider credentials
//! - `DOCKET_LLM_PROVIDER`, `DOCKET_LLM_MODEL`, `DOCKET_LLM_BASE_URL`
//! - `DOCKET_TIME_WINDOW_MINUTES`, `DOCKET_SIMILARITY_THRESHOLD`
//! - `DOCKET_MAX_CONCURRENT_PARTITIONS`, `DOCKET_ON_ORACLE_ERROR`
//! - `DOCKET_ORACLE_TIMEOUT_SECS`

use std::process::ExitCode;

use clap::Parser;
use docket_core::DocketError;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the result.
    let level = match cli.global.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &anyhow::Error) {
    match err.chain().find_map(|e| e.downcast_ref::<DocketError>()) {
        Some(docket) => {
            eprintln!("error[{}]: {}", docket.code().as_str(), err);
            let cause = docket.to_string();
            if cause != err.to_string() {
                eprintln!("  caused by: {}", cause);
            }
            if let Some(suggestion) = docket.suggestion() {
                eprintln!("  hint: {}", suggestion);
            }
        }
        None => eprintln!("error: {:#}", err),
    }
}
