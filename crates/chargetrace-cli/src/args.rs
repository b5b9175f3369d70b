use crate::types::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chargetrace")]
#[command(about = "Normalize and analyze EV charging session logs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = "chargetrace.toml", global = true)]
    pub config: PathBuf,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process session exports and print charger health metrics
    Analyze {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Peak/average power trend for the active selection
    Trend {
        #[command(flatten)]
        inputs: InputArgs,

        /// One point per session row instead of hourly/daily buckets
        #[arg(long)]
        per_row: bool,
    },

    /// Negative-stop rate by OEM across all files
    Network {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Lay out the paginated charger health report
    Report {
        #[command(flatten)]
        inputs: InputArgs,

        /// Write the rendered report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// One report per source file instead of one for the active selection
        #[arg(long)]
        per_file: bool,
    },
}

/// Input files plus the single active filter dimension.
#[derive(Args)]
pub struct InputArgs {
    /// CSV/JSON session exports, or directories of them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Focus one source file by name
    #[arg(long, group = "filter")]
    pub file: Option<String>,

    /// Aggregate every file sharing this charge point id
    #[arg(long, group = "filter")]
    pub charge_point: Option<String>,

    /// Aggregate every file sharing this station name
    #[arg(long, group = "filter")]
    pub station: Option<String>,
}
