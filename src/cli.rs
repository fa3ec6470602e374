//! CLI argument parsing for txpar

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "txpar")]
#[command(version)]
#[command(about = "Estimate achievable parallelism from transaction traces", long_about = None)]
pub struct Cli {
    /// Chart title (overrides the config file)
    #[arg(short = 't', long = "title", global = true)]
    pub title: Option<String>,

    /// Analysis configuration file (TOML)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Trace file (newline-delimited JSON); reads stdin when omitted
    #[arg(short = 'i', long = "infile", value_name = "FILE")]
    pub infile: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parallelism and threads alive per time slot
    Parallelism {
        #[command(flatten)]
        input: InputArgs,

        /// Worker threads for slot computation (overrides the config file)
        #[arg(short = 'j', long = "workers", value_name = "N")]
        workers: Option<usize>,

        /// Also report the active-minus-max-degree estimate
        #[arg(long = "approximate")]
        approximate: bool,
    },

    /// Distribution of parallelism values over slots
    Distribution {
        #[command(flatten)]
        input: InputArgs,

        /// Worker threads for slot computation (overrides the config file)
        #[arg(short = 'j', long = "workers", value_name = "N")]
        workers: Option<usize>,
    },

    /// Attempt intervals per process for a timeline chart
    Timeline {
        #[command(flatten)]
        input: InputArgs,

        /// Window start, in scaled units
        #[arg(short = 'm', long = "min-x", allow_negative_numbers = true)]
        min_x: Option<i64>,

        /// Window end, in scaled units
        #[arg(short = 'M', long = "max-x", allow_negative_numbers = true)]
        max_x: Option<i64>,

        /// Offset subtracted from timestamps, in scaled units
        #[arg(short = 's', long = "shift-x", allow_negative_numbers = true)]
        shift_x: Option<i64>,

        /// Select each process's attempts by ordinal, starting at this one (1-based)
        #[arg(short = 'c', long = "first-count")]
        first_count: Option<usize>,

        /// Ordinal one past the last attempt to select (default: first + 1)
        #[arg(short = 'C', long = "last-count", requires = "first_count")]
        last_count: Option<usize>,

        /// Lanes reserved on the vertical axis
        #[arg(short = 'Y', long = "max-y")]
        max_y: Option<i64>,
    },
}

impl Command {
    pub fn input(&self) -> &InputArgs {
        match self {
            Command::Parallelism { input, .. }
            | Command::Distribution { input, .. }
            | Command::Timeline { input, .. } => input,
        }
    }
}
