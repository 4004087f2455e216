//! fot - Field of Truth command-line interface
//!
//! Runs readiness validation, modality gates, the case pipeline and the
//! confirmatory collapse check against JSON inputs. Results go to stdout as
//! pretty JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fot_claims::{ClaimRepository, InMemoryClaimRepository};
use fot_engine::{ClinicalEngine, EngineConfig, GateKind};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fot")]
#[command(about = "Field of Truth - clinical evidence-claim engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FOT_CONFIG", default_value = "fot.toml")]
    config: PathBuf,

    /// Fixed RNG seed, overriding the config
    #[arg(long, env = "FOT_SEED")]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the seven readiness tracks over a case record
    Validate {
        /// Case record (JSON)
        record: PathBuf,
    },

    /// Check an image study or audio recording
    Gate {
        #[command(subcommand)]
        kind: GateCommand,
    },

    /// Validate, encode, score and emit claims for a case record
    Assess {
        /// Case record (JSON)
        record: PathBuf,

        /// Evolution steps before scoring
        #[arg(long)]
        steps: Option<u32>,
    },

    /// Emit a confirmatory claim and collapse it if the toolchains agree
    Collapse {
        /// Estimate from toolchain A
        #[arg(long, allow_hyphen_values = true)]
        a: f64,

        /// Estimate from toolchain B
        #[arg(long, allow_hyphen_values = true)]
        b: f64,

        /// Maximum agreement delta; omit for no agreement constraint
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand)]
enum GateCommand {
    /// Image study metadata (JSON)
    Image { fields: PathBuf },
    /// Audio recording metadata (JSON)
    Audio { fields: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = EngineConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let engine = ClinicalEngine::new(config)?;
    let repository = InMemoryClaimRepository::new();

    match cli.command {
        Commands::Validate { record } => {
            let (verdicts, summary) = engine.validate(&read_json(&record)?);
            print_json(&json!({ "verdicts": verdicts, "summary": summary }))
        }
        Commands::Gate { kind } => {
            let (kind, path) = match kind {
                GateCommand::Image { fields } => (GateKind::Image, fields),
                GateCommand::Audio { fields } => (GateKind::Audio, fields),
            };
            let (report, claim) = engine.gate_and_emit(kind, &read_json(&path)?, &repository)?;
            print_json(&json!({ "gate": kind, "report": report, "claim": claim }))
        }
        Commands::Assess { record, steps } => {
            let record = read_json(&record)?;
            let report = match steps {
                Some(steps) => engine.assess_with_steps(&record, steps, &repository)?,
                None => engine.assess(&record, &repository)?,
            };
            print_json(&report)
        }
        Commands::Collapse { a, b, tolerance } => {
            let outcome = engine.confirm(a, b, tolerance, &repository)?;
            tracing::info!(
                claim_id = %outcome.claim.id,
                collapsed = outcome.claim.is_collapsed(),
                stored = repository.list()?.len(),
                "confirmatory claim recorded"
            );
            print_json(&outcome)
        }
        Commands::Config => Ok(()),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
