//! CLI argument definitions for flatbed.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "flatbed",
    version,
    about = "Reshape nested record exports into flat CSV reporting tables",
    long_about = "Reshape nested record exports into flat CSV reporting tables.\n\n\
                  Reads per-source JSON exports, projects and flattens them into\n\
                  staged CSV tables, applies declarative column schemas, and unions\n\
                  the per-source results into one reporting table per dataset."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process every source under the input root and build reporting tables.
    Run(RunArgs),

    /// List the configured datasets and their schemas.
    Datasets(DatasetsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding one subdirectory of JSON exports per source.
    #[arg(value_name = "INPUT_ROOT")]
    pub input_root: PathBuf,

    /// Pipeline configuration file (default: built-in course export schema).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root for staged and reporting output (default: <INPUT_ROOT>/data).
    #[arg(long = "data-root", value_name = "DIR")]
    pub data_root: Option<PathBuf>,

    /// Process only the named sources (repeatable; default: all discovered).
    #[arg(long = "source", value_name = "ID")]
    pub sources: Vec<String>,

    /// Validate configuration and discover sources without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct DatasetsArgs {
    /// Pipeline configuration file (default: built-in course export schema).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
