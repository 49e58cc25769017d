mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::input::InputError;
use crate::input::ground_truth::load_ground_truth;
use crate::model::config::{ConfigError, ScoringConfig};
use crate::model::distribution::LabelPolicy;
use crate::pipeline::stage1_load::run_stage1;
use crate::pipeline::stage2_resolve::GroundTruthResolver;
use crate::pipeline::stage6_composite::{Stage6Inputs, run_stage6};
use crate::pipeline::stage7_report::{Stage7Input, write_reports};
use crate::pipeline::{build_summaries, score_model};

#[derive(Debug, Parser)]
#[command(
    name = "t2i-fairscore",
    version,
    about = "Score demographic fairness of text-to-image models"
)]
struct Cli {
    /// Default log filter when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every registered model and write the result tables.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Directory holding the per-model distribution CSVs.
    #[arg(long)]
    distributions: PathBuf,

    /// Ground-truth CSV with the expected highest/lowest groups.
    #[arg(long)]
    ground_truth: PathBuf,

    /// Output root.
    #[arg(long)]
    out: PathBuf,

    /// JSON file overriding the built-in scoring configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail on distribution labels outside the known classes.
    #[arg(long)]
    strict_labels: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to write reports: {0}")]
    Report(#[from] std::io::Error),
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);
    if let Err(err) = dispatch(&cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn dispatch(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Command::Run(args) => run(args),
    }
}

fn resolve_config(args: &RunArgs) -> Result<ScoringConfig, ConfigError> {
    let mut config = ScoringConfig::load(args.config.as_deref())?;
    if args.strict_labels {
        config.label_policy = LabelPolicy::Reject;
    }
    Ok(config)
}

fn run(args: &RunArgs) -> Result<(), AppError> {
    let config = resolve_config(args)?;

    let ground_truth = load_ground_truth(&args.ground_truth)?;
    tracing::info!(
        "loaded {} ground-truth categories from {}",
        ground_truth.entries.len(),
        args.ground_truth.display()
    );
    let resolver = GroundTruthResolver::new(&ground_truth, &config);

    let datasets = run_stage1(&args.distributions, &config)?;
    let models = datasets
        .iter()
        .map(|dataset| score_model(dataset, &resolver, &config))
        .collect::<Vec<_>>();
    drop(datasets);

    for m in &models {
        if m.accuracy.table.is_empty() {
            tracing::warn!(
                "{}: no category matched the ground truth; accuracy defaults to 0",
                m.key
            );
        }
        let acc = m.accuracy.summary();
        let ent = m.entropy.average.unwrap_or_default();
        let kl = m.divergence.summary();
        tracing::info!(
            "{}: accuracy gender={:?} race={:?}; entropy ratio gender={} race={}; kl gender={} race={}",
            m.key,
            acc.gender,
            acc.race,
            ent.gender,
            ent.race,
            kl.gender,
            kl.race
        );
    }

    let summaries = build_summaries(&models);
    let composite = run_stage6(&Stage6Inputs {
        config: &config,
        accuracy: &summaries.accuracy,
        entropy: &summaries.entropy,
        divergence: &summaries.divergence,
    });

    let input = Stage7Input {
        config: &config,
        models: &models,
        summaries: &summaries,
        composite: &composite,
        tool_name: "t2i-fairscore".to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        distributions_dir: args.distributions.display().to_string(),
        ground_truth: args.ground_truth.display().to_string(),
    };
    write_reports(&input, &args.out)?;

    tracing::info!(
        "scored {} models; results under {}",
        models.len(),
        args.out.display()
    );
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
