//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use docket_core::import::load_path;
use docket_core::{
    DocketConfig, DocketError, DuplicateDetector, LlmOracle, OracleErrorPolicy, TicketBatch,
};
use docket_llm::LlmFactory;

use crate::cli::{Cli, Commands, CompareArgs, DedupArgs, GlobalArgs, ShowArgs};
use crate::output;

/// Dispatch the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Dedup(args) => dedup(&cli.global, args).await,
        Commands::Compare(args) => compare(&cli.global, args).await,
        Commands::Show(args) => show(args),
    }
}

/// Config file, then `DOCKET_*` variables, then command-line flags.
fn load_config(global: &GlobalArgs) -> Result<DocketConfig> {
    let mut config = match &global.config {
        Some(path) => DocketConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DocketConfig::default(),
    };
    config.apply_env()?;

    if let Some(provider) = global.provider {
        config.llm.switch_provider(provider);
    }
    if let Some(model) = &global.model {
        config.llm.config.model = model.clone();
    }
    Ok(config)
}

fn load_batch(path: &Path) -> Result<TicketBatch> {
    let batch = load_path(path)?;
    for row in &batch.report.rejected {
        tracing::warn!(
            row = row.row,
            ticket_id = row.ticket_id.as_deref().unwrap_or("-"),
            reason = %row.reason,
            "Rejected row"
        );
    }
    tracing::info!(
        file = %path.display(),
        loaded = batch.report.loaded,
        rejected = batch.report.rejected.len(),
        "Loaded tickets"
    );
    Ok(batch)
}

fn build_oracle(config: &DocketConfig) -> Result<LlmOracle> {
    let llm = LlmFactory::from_config(&config.llm)?;
    tracing::info!(provider = %config.llm.provider, model = llm.model_name(), "Using oracle");
    Ok(LlmOracle::new(llm, &config.oracle))
}

async fn dedup(global: &GlobalArgs, args: DedupArgs) -> Result<()> {
    let mut config = load_config(global)?;
    if let Some(minutes) = args.window_minutes {
        config.dedup.time_window_minutes = minutes;
    }
    if let Some(threshold) = args.threshold {
        config.dedup.similarity_threshold = threshold;
    }
    if let Some(concurrency) = args.concurrency {
        config.dedup.max_concurrent_partitions = concurrency;
    }
    if args.skip_failed_partitions {
        config.dedup.on_oracle_error = OracleErrorPolicy::SkipPartition;
    }
    config.validate()?;

    let batch = load_batch(&args.file)?;
    let oracle = build_oracle(&config)?;
    let detector = DuplicateDetector::new(Arc::new(oracle), config.dedup.clone())?;
    let outcome = detector.detect(&batch.tickets).await?;

    let rendered = output::render_outcome(&outcome, &batch.columns, args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote result");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

async fn compare(global: &GlobalArgs, args: CompareArgs) -> Result<()> {
    let config = load_config(global)?;
    let threshold = args.threshold.unwrap_or(config.dedup.similarity_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DocketError::validation_with_suggestion(
            format!("threshold {} is outside [0, 1]", threshold),
            "Pass a value such as --threshold 0.75",
        )
        .into());
    }

    let batch = load_batch(&args.file)?;
    let find = |id: &str| {
        batch.get(id).ok_or_else(|| {
            DocketError::validation_with_suggestion(
                format!("ticket {} not found in {}", id, args.file.display()),
                "Run `docket show` to list the loaded ticket ids",
            )
        })
    };
    let a = find(&args.id_a)?;
    let b = find(&args.id_b)?;

    let oracle = build_oracle(&config)?;
    let answer = oracle.assess(&a.summary, &b.summary).await?;
    print!("{}", output::render_comparison(a, b, &answer, threshold));
    Ok(())
}

fn show(args: ShowArgs) -> Result<()> {
    let batch = load_batch(&args.file)?;
    print!("{}", output::render_batch(&batch, args.limit));
    Ok(())
}
