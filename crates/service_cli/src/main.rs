//! Reliability CLI - Command Line Operations for Structural Reliability
//!
//! This is the operational entry point for the reliability workspace.
//!
//! # Commands
//!
//! - `reliability form --scenario <file>` - Design point, reliability index and importance factors
//! - `reliability sorm --scenario <file>` - Curvature-corrected probabilities
//! - `reliability simulate --scenario <file>` - Sampling estimate of the event probability
//! - `reliability sensitivity --scenario <file>` - Simulation and FORM importance factors
//! - `reliability check --scenario <file>` - Validate a scenario
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate loads TOML scenarios and
//! drives the model, analytical, simulation and sensitivity crates.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use config::MethodKind;
use output::OutputFormat;

/// Structural reliability analysis CLI
#[derive(Parser)]
#[command(name = "reliability")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run FORM on a scenario
    Form {
        /// Path to the scenario file (TOML)
        #[arg(short, long)]
        scenario: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Run SORM on a scenario
    Sorm {
        /// Path to the scenario file (TOML)
        #[arg(short, long)]
        scenario: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Estimate the event probability by sampling
    Simulate {
        /// Path to the scenario file (TOML)
        #[arg(short, long)]
        scenario: String,

        /// Sampling method, overriding the scenario
        #[arg(short, long, value_enum)]
        method: Option<MethodKind>,

        /// Confidence level of the reported interval
        #[arg(short = 'l', long, default_value_t = 0.95)]
        confidence_level: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Importance factors from a recorded simulation
    Sensitivity {
        /// Path to the scenario file (TOML)
        #[arg(short, long)]
        scenario: String,

        /// Also report the FORM importance factors
        #[arg(long)]
        with_form: bool,

        /// Sweep thresholds over the sample, keeping this many points at each end
        #[arg(short, long)]
        range: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate a scenario file
    Check {
        /// Path to the scenario file (TOML)
        #[arg(short, long)]
        scenario: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise info, or debug with --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Form { scenario, format } => commands::form::run(&scenario, format),
        Commands::Sorm { scenario, format } => commands::sorm::run(&scenario, format),
        Commands::Simulate {
            scenario,
            method,
            confidence_level,
            format,
        } => commands::simulate::run(&scenario, method, confidence_level, format),
        Commands::Sensitivity {
            scenario,
            with_form,
            range,
            format,
        } => commands::sensitivity::run(&scenario, with_form, range, format),
        Commands::Check { scenario } => commands::check::run(&scenario),
    }
}
