//! Outgate CLI - check action output against runner/action schemas

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};

use outgate::{
    assemble_schema, CheckRequest, FixSuggestion, GateConfig, OutputError, OutputGate,
    ValidatorKind,
};

/// Exit code when the gate marked the output as failed
const EXIT_GATE_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "outgate")]
#[command(about = "Validate action output against runner and action output schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the output gate on a check request (YAML or JSON)
    Check {
        /// Path to the check request file
        file: PathBuf,

        /// Gate configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the validator (custom, draft4, draft7, draft2020-12)
        #[arg(long)]
        validator: Option<ValidatorKind>,
    },

    /// Print the closed object schema built from a flat property map
    Schema {
        /// Path to the property map file (YAML or JSON)
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Logs go to stderr, stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            file,
            config,
            validator,
        } => check(&file, config.as_deref(), validator),
        Commands::Schema { file } => schema(&file).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            if let Some(suggestion) = e
                .downcast_ref::<OutputError>()
                .and_then(|err| err.fix_suggestion())
            {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn check(
    file: &Path,
    config_path: Option<&Path>,
    validator: Option<ValidatorKind>,
) -> anyhow::Result<ExitCode> {
    let mut config = match config_path {
        Some(path) => GateConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => GateConfig::default(),
    };
    if let Some(kind) = validator {
        config.validator = kind;
    }

    let request = CheckRequest::from_file(file)
        .with_context(|| format!("Failed to read check request {:?}", file))?;

    let report = request.run(&OutputGate::new(&config));
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.status.is_failed() {
        eprintln!("{} output rejected ({})", "✗".red(), report.status);
        Ok(ExitCode::from(EXIT_GATE_FAILED))
    } else {
        eprintln!("{} output accepted ({})", "✓".green(), report.status);
        Ok(ExitCode::SUCCESS)
    }
}

fn schema(file: &Path) -> anyhow::Result<()> {
    let yaml = std::fs::read_to_string(file)
        .map_err(OutputError::from)
        .with_context(|| format!("Failed to read property map {:?}", file))?;
    let properties: Map<String, Value> = serde_yaml::from_str(&yaml)
        .map_err(OutputError::from)
        .with_context(|| format!("Property map {:?} must be a mapping", file))?;

    println!("{}", serde_json::to_string_pretty(&assemble_schema(&properties))?);
    Ok(())
}
