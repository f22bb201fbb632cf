//! `fmabench` - run the FMA microbenchmark suites from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fmabench_core::reduction::ReductionStrategy;
use fmabench_core::{run_embedding_suite, run_reduction_suite, BenchConfig, EmbeddingCase};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod check;
mod output;

/// Fused multiply-add microbenchmarks.
#[derive(Debug, Parser)]
#[command(name = "fmabench", version, about)]
struct Cli {
    /// TOML configuration file layered over the defaults.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Shrink every schedule for a smoke run.
    #[arg(long, global = true)]
    quick: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show FMA support and the resolved configuration.
    Info,
    /// Benchmark the vector reduction strategies.
    Reduction(ReductionArgs),
    /// Benchmark the embedding training-step operations.
    Embedding(EmbeddingArgs),
    /// Evaluate every reduction strategy once and compare the results.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ReductionArgs {
    /// Strategy to run (repeatable); all when omitted.
    #[arg(long = "strategy", value_name = "NAME")]
    strategies: Vec<ReductionStrategy>,

    /// Vector length N.
    #[arg(long)]
    length: Option<usize>,
}

#[derive(Debug, Args)]
struct EmbeddingArgs {
    /// Case to run (repeatable, snake_case or camelCase); all when omitted.
    #[arg(long = "case", value_name = "NAME")]
    cases: Vec<EmbeddingCase>,

    /// Row dimension D.
    #[arg(long)]
    dimension: Option<usize>,

    /// Rows per table.
    #[arg(long)]
    rows: Option<usize>,

    /// Generator seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Vector length N.
    #[arg(long)]
    length: Option<usize>,
}

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays parseable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = BenchConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if cli.quick {
        config = config.quick();
    }
    debug!(?config, quick = cli.quick, "configuration resolved");

    match cli.command {
        Command::Info => output::print_info(&config, cli.json),
        Command::Reduction(args) => {
            if let Some(length) = args.length {
                config.reduction.length = length;
            }
            config.validate().context("invalid reduction settings")?;
            let strategies = if args.strategies.is_empty() {
                ReductionStrategy::ALL.to_vec()
            } else {
                args.strategies
            };
            info!(
                length = config.reduction.length,
                strategies = strategies.len(),
                "starting reduction suite"
            );
            let report = run_reduction_suite(&config.reduction, &strategies)
                .context("running reduction suite")?;
            output::print_report(&report, cli.json)
        }
        Command::Embedding(args) => {
            if let Some(dimension) = args.dimension {
                config.embedding.dimension = dimension;
            }
            if let Some(rows) = args.rows {
                config.embedding.rows = rows;
            }
            if args.seed.is_some() {
                config.embedding.seed = args.seed;
            }
            config.validate().context("invalid embedding settings")?;
            let cases = if args.cases.is_empty() {
                EmbeddingCase::ALL.to_vec()
            } else {
                args.cases
            };
            info!(
                rows = config.embedding.rows,
                dimension = config.embedding.dimension,
                seed = ?config.embedding.seed,
                cases = cases.len(),
                "starting embedding suite"
            );
            let report = run_embedding_suite(&config.embedding, &cases)
                .context("running embedding suite")?;
            output::print_report(&report, cli.json)
        }
        Command::Check(args) => {
            if let Some(length) = args.length {
                config.reduction.length = length;
            }
            config.validate().context("invalid reduction settings")?;
            info!(length = config.reduction.length, "checking reduction strategies");
            let report = check::run(config.reduction.length);
            output::print_check(&report, cli.json)?;
            if !report.passed() {
                anyhow::bail!(
                    "max pairwise difference {:e} exceeds bound {:e}",
                    report.max_difference,
                    report.bound
                );
            }
            Ok(())
        }
    }
}
