mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::validate::ValidateOptions;
use output::OutputFormat;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a tracing filter directive, e.g. `DCE_LOG=debug`.
const LOG_ENV: &str = "DCE_LOG";

#[derive(Parser)]
#[command(name = "dce")]
#[command(version, about = "Data Contracts Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON array of records against a contract
    Validate {
        /// Path to the contract file (YAML, TOML or JSON)
        contract: String,

        /// Path to the records file (JSON array of flat objects)
        records: String,

        /// Skip quality rules; check structure and semantic tags only
        #[arg(long)]
        schema_only: bool,

        /// Stop at the first failing record
        #[arg(long)]
        fail_fast: bool,

        /// Validate only the first N records
        #[arg(long)]
        sample_size: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that a contract loads and compiles
    Check {
        /// Path to the contract file (YAML, TOML or JSON)
        contract: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List breaking changes between two versions of a contract
    Diff {
        /// Path to the old contract
        old: String,

        /// Path to the new contract
        new: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .init();

    // Execute command
    let passed = match cli.command {
        Commands::Validate {
            contract,
            records,
            schema_only,
            fail_fast,
            sample_size,
            format,
        } => commands::validate::execute(
            &contract,
            &records,
            ValidateOptions {
                schema_only,
                fail_fast,
                sample_size,
            },
            format,
        )?,

        Commands::Check { contract, format } => commands::check::execute(&contract, format)?,

        Commands::Diff { old, new, format } => commands::diff::execute(&old, &new, format)?,
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
