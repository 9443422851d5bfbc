//! data-profiler - profile tabular files from the command line

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use data_profiling_sdk::InsightType;

mod commands;
mod output;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer the schema of files and analyse their contents
    Profile {
        /// Files to profile
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only report insights of this type
        #[arg(short = 't', long = "type")]
        insight_type: Option<InsightType>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the inferred schema and a preview of the rows
    Schema {
        file: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level)?;

    match cli.command {
        Command::Profile {
            files,
            format,
            config,
            insight_type,
            output,
        } => commands::profile(&files, format, config.as_deref(), insight_type, output.as_deref()),
        Command::Schema { file, config } => commands::schema(&file, config.as_deref()),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow::anyhow!("Invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
