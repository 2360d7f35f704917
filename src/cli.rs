//! Command-line interface (CLI) argument parsing module.
//!
//! This module provides CLI argument parsing using `clap`.
//! It supports running a benchmark, listing and exporting the resolver
//! list, and generating shell completions.

use crate::config::BenchConfig;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI argument parser using clap derive macro.
///
/// # Example
///
/// ```ignore
/// let cli = Cli::parse();
/// match cli.command {
///     Some(Commands::Run(args)) => { /* ... */ }
///     Some(Commands::List { .. }) => { /* ... */ }
///     _ => { /* default run */ }
/// }
/// ```
#[derive(Parser, Debug)]
#[command(
    name = "dnsrank",
    version,
    about = "Benchmark and rank DNS resolvers",
    long_about = "Query a set of domains against each candidate DNS resolver and rank \
                  the resolvers by average response time",
    infer_subcommands = true
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (only errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for CLI commands.
///
/// This enum represents different output formats that can be used
/// when displaying benchmark results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format (default, human-readable)
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated)
    Tsv,
}

impl OutputFormat {
    /// Get all available output format names.
    #[must_use]
    pub fn names() -> &'static [&'static str] {
        &["table", "json", "csv", "tsv"]
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(format!(
                "Unknown format: {}. Valid options are: {:?}",
                s,
                Self::names()
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

/// Options of the `run` command.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Resolver list file (JSON format, repeatable; lists are merged)
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,

    /// Custom resolvers (format: ADDRESS#Label)
    #[arg(long = "dns")]
    pub dns_servers: Vec<String>,

    /// Benchmark settings file (JSON format)
    #[arg(long, env = "DNSRANK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Domain to query (repeatable; replaces the configured list)
    #[arg(short, long = "domain")]
    pub domains: Vec<String>,

    /// Record type to query
    #[arg(short, long = "record-type")]
    pub record_type: Option<String>,

    /// Per-query timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<f64>,

    /// Maximum number of resolvers probed at the same time
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Probe one resolver at a time
    #[arg(long, conflicts_with = "concurrency")]
    pub sequential: bool,

    /// Do not print progress while the benchmark runs
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of loaded settings.
    #[must_use]
    pub fn apply(&self, mut config: BenchConfig) -> BenchConfig {
        if !self.domains.is_empty() {
            config.domains.clone_from(&self.domains);
        }
        if let Some(record_type) = &self.record_type {
            config.record_type.clone_from(record_type);
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrent = concurrency;
        }
        if self.sequential {
            config.max_concurrent = 1;
        }
        config
    }
}

/// Available commands for the dnsrank CLI.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Benchmark resolvers and print the ranking (default)
    #[command(alias = "r")]
    Run(RunArgs),

    /// List the resolvers that would be benchmarked
    #[command(alias = "l")]
    List {
        /// Resolver list file (JSON format, repeatable)
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Custom resolvers (format: ADDRESS#Label)
        #[arg(long = "dns")]
        dns_servers: Vec<String>,
    },

    /// Write the resolver list and settings to JSON files
    ///
    /// Without arguments both files are written to the user config
    /// directory, where `run` picks them up.
    #[command(alias = "e")]
    Export {
        /// Resolver list output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Settings output path
        #[arg(long)]
        config_output: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Parse CLI arguments and return verbose flag.
///
/// # Returns
///
/// Returns a tuple of `(Cli, verbose)` where `verbose` indicates
/// whether verbose logging was enabled.
#[must_use]
pub fn parse_verbose() -> (Cli, bool) {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    (cli, verbose)
}
