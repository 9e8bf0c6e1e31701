//! Synergy dosing calculator CLI.
//!
//! Loads reference data, runs calculations and prints JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use synergy_dosing_core::models::{CiBucket, StageId};
use synergy_dosing_core::{combination_index, Calculator, PatientProfile, ReferenceData};
use synergy_dosing_data::{load_reference, DataConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "synergy-dosing")]
#[command(version, about = "Educational dosing calculator for a multimodal therapy protocol", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory with components.json, interactions.json and stages.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate doses, synergies and effectiveness for a patient
    Calculate {
        /// Patient profile as a JSON file path or inline JSON object
        #[arg(short, long)]
        profile: String,

        /// Selected component ids, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        select: Vec<String>,
    },

    /// List available components
    Components,

    /// List stage protocols
    Stages,

    /// Show one stage protocol
    Stage {
        /// Stage id (acute, chronic, calcified, severe)
        id: String,
    },

    /// Compute a Chou-Talalay combination index
    Ci {
        /// Dose of agent 1 in combination
        #[arg(long)]
        d1: f64,
        /// Dose of agent 1 alone for the same effect
        #[arg(long)]
        dx1: f64,
        /// Dose of agent 2 in combination
        #[arg(long)]
        d2: f64,
        /// Dose of agent 2 alone for the same effect
        #[arg(long)]
        dx2: f64,
    },

    /// Load and validate reference data
    Validate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DataConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DataConfig::from_env().context("Invalid environment configuration")?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }

    // Initialize tracing
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Calculate { profile, select } => cmd_calculate(&config, &profile, &select),
        Commands::Components => cmd_components(&config),
        Commands::Stages => cmd_stages(&config),
        Commands::Stage { id } => cmd_stage(&config, &id),
        Commands::Ci { d1, dx1, d2, dx2 } => cmd_ci(&config, d1, dx1, d2, dx2),
        Commands::Validate => cmd_validate(&config),
    }
}

fn load(config: &DataConfig) -> anyhow::Result<ReferenceData> {
    load_reference(config).context("Failed to load reference data")
}

fn print_json<T: Serialize>(config: &DataConfig, value: &T) -> anyhow::Result<()> {
    let text = if config.pretty_output {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn read_profile(arg: &str) -> anyhow::Result<PatientProfile> {
    let text = if arg.trim_start().starts_with('{') {
        arg.to_string()
    } else {
        std::fs::read_to_string(arg).with_context(|| format!("Failed to read profile {arg}"))?
    };
    serde_json::from_str(&text).context("Invalid patient profile")
}

fn cmd_calculate(config: &DataConfig, profile: &str, select: &[String]) -> anyhow::Result<()> {
    let profile = read_profile(profile)?;
    let calculator = Calculator::with_reference(load(config)?);

    let result = calculator.calculate_dosing(&profile, select)?;
    for warning in &result.warnings {
        tracing::debug!(code = ?warning.code, severity = ?warning.severity, "{}", warning.message);
    }
    print_json(config, &result)
}

fn cmd_components(config: &DataConfig) -> anyhow::Result<()> {
    let reference = load(config)?;
    let listing: Vec<_> = reference
        .components()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "unit": c.unit,
                "frequency": c.frequency,
                "route": c.route,
                "dosePerKg": c.dose_per_kg,
            })
        })
        .collect();
    print_json(config, &listing)
}

fn cmd_stages(config: &DataConfig) -> anyhow::Result<()> {
    let reference = load(config)?;
    let listing: Vec<_> = reference
        .stages()
        .map(|(id, stage)| {
            json!({
                "id": id,
                "name": stage.name,
                "duration": stage.duration,
                "durationUnit": stage.duration_unit,
                "successBase": stage.success_base,
            })
        })
        .collect();
    print_json(config, &listing)
}

fn cmd_stage(config: &DataConfig, id: &str) -> anyhow::Result<()> {
    let stage_id: StageId = id.parse().map_err(anyhow::Error::msg)?;
    let reference = load(config)?;
    let stage = reference.stage(stage_id)?;
    print_json(config, stage)
}

fn cmd_ci(config: &DataConfig, d1: f64, dx1: f64, d2: f64, dx2: f64) -> anyhow::Result<()> {
    if dx1 <= 0.0 || dx2 <= 0.0 {
        anyhow::bail!("--dx1 and --dx2 must be greater than zero");
    }
    let reference = load(config)?;
    let ci = combination_index(d1, dx1, d2, dx2);
    let bucket = CiBucket::classify(ci.value);

    print_json(
        config,
        &json!({
            "value": ci.value,
            "verdict": ci.verdict,
            "bucket": bucket,
            "range": bucket.range(),
            "label": reference.ci_scale().label(bucket),
        }),
    )
}

fn cmd_validate(config: &DataConfig) -> anyhow::Result<()> {
    let reference = load(config)?;
    print_json(
        config,
        &json!({
            "valid": true,
            "components": reference.component_count(),
            "interactions": reference.interactions().count(),
            "stages": reference.stages().count(),
        }),
    )
}
