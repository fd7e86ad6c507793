use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use docket_core::LlmProvider;

#[derive(Parser)]
#[command(name = "docket")]
#[command(about = "Find duplicate tickets in a support desk export and pick one parent per incident")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by every subcommand
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Config file (.toml, .json or .yaml)
    #[arg(long, global = true, env = "DOCKET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Completion provider backing the similarity oracle
    #[arg(long, global = true)]
    pub provider: Option<LlmProvider>,

    /// Model name passed to the provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Group recent tickets into parents and duplicates
    Dedup(DedupArgs),

    /// Ask the oracle whether two tickets describe the same issue
    Compare(CompareArgs),

    /// Preview the tickets and rejected rows of an export
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct DedupArgs {
    /// Ticket export (.csv, .jsonl or .ndjson)
    pub file: PathBuf,

    /// Only tickets entered this many minutes before the newest one are grouped
    #[arg(long)]
    pub window_minutes: Option<i64>,

    /// Minimum oracle score for a YES to count as a duplicate (0.0 - 1.0)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of groups compared at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Keep going when the oracle fails for a group, dropping that group
    #[arg(long)]
    pub skip_failed_partitions: bool,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Ticket export (.csv, .jsonl or .ndjson)
    pub file: PathBuf,

    /// Earlier ticket (the candidate parent)
    pub id_a: String,

    /// Later ticket
    pub id_b: String,

    /// Threshold used for the verdict (defaults to the configured one)
    #[arg(long)]
    pub threshold: Option<f32>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket export (.csv, .jsonl or .ndjson)
    pub file: PathBuf,

    /// Number of tickets to list
    #[arg(long, default_value = "20")]
    pub limit: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary
    Text,
    /// Full result as pretty JSON
    Json,
    /// Parent rows in the export's column layout
    Csv,
}
