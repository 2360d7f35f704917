//! dnsrank - DNS resolver benchmark
//!
//! Binary entry point for the dnsrank CLI application.

#![warn(clippy::all, warnings)]
#![warn(clippy::pedantic, clippy::nursery)]

use chrono::{DateTime, Local};
use clap::CommandFactory;
use dnsrank::cli::{Cli, Commands, OutputFormat, RunArgs};
use dnsrank::config::{BenchConfig, ConfigLoader};
use dnsrank::dns::{BenchEvent, BenchOptions, Benchmark, RankedResult, RunTotals};
use dnsrank::error::{Error, Result};
use dnsrank::ResolverList;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set up logging based on verbosity level.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging
/// * `quiet` - Enable error-level only logging
fn setup_logging(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .init();
}

/// JSON document written by `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Local>,
    settings: &'a BenchConfig,
    results: Vec<JsonRow<'a>>,
    totals: RunTotals,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    result: &'a RankedResult,
    text: String,
}

/// Run the benchmark and print the ranking.
///
/// # Arguments
///
/// * `args` - Options of the `run` command
/// * `format` - Output format
async fn run_benchmark(args: RunArgs, format: OutputFormat) -> Result<()> {
    let config = args.apply(ConfigLoader::load_config(args.config.as_deref())?);
    let resolvers = ConfigLoader::load_resolvers(&args.files, &args.dns_servers)?;
    let show_progress = format == OutputFormat::Table && !args.no_progress;

    if show_progress {
        println!(
            "Benchmarking {} resolvers against {} domains ({}, timeout {:.1}s)...\n",
            resolvers.len(),
            config.domains.len(),
            config.record_type,
            config.timeout().as_secs_f64()
        );
    }

    let bench = Benchmark::new();
    let mut handle = bench.start(resolvers.entries, BenchOptions::from(&config));

    let mut results = None;
    while let Some(event) = handle.next_event().await {
        match event {
            BenchEvent::Started { run, total } => {
                tracing::debug!("Run {run} started with {total} resolvers");
            }
            BenchEvent::Progress {
                result,
                done,
                total,
                ..
            } => {
                if show_progress {
                    println!(
                        "[{:>3}/{}] {} ({}) -> {}",
                        done,
                        total,
                        result.label,
                        result.address,
                        result.summary_text()
                    );
                    std::io::stdout().flush()?;
                }
            }
            BenchEvent::Completed { results: ranked, .. } => {
                results = Some(ranked);
                break;
            }
            BenchEvent::Failed { error, .. } => return Err(Error::RunFailed(error)),
        }
    }
    let results = results.ok_or(Error::Cancelled)?;

    match format {
        OutputFormat::Table => print_results_table(&results),
        OutputFormat::Json => print_results_json(&config, &results)?,
        OutputFormat::Csv => print_results_delimited(&results, ','),
        OutputFormat::Tsv => print_results_delimited(&results, '\t'),
    }

    if format == OutputFormat::Table {
        let totals = RunTotals::from_results(&results);
        println!("\n=== Totals ===");
        println!("Resolvers: {}", totals.total);
        println!("Answered: {}", totals.measured);
        println!("No successful responses: {}", totals.no_data);
        if totals.missing_address > 0 {
            println!("Missing address: {}", totals.missing_address);
        }
        if let Some(fastest) = totals.fastest {
            println!("Fastest: {fastest}");
        }
    }

    Ok(())
}

/// Print results in table format.
fn print_results_table(results: &[RankedResult]) {
    println!();
    println!("{:<4} {:<30} {:<24} {}", "#", "Name", "Address", "Result");
    println!("{}", "-".repeat(100));

    for r in results {
        println!(
            "{:<4} {:<30} {:<24} {}",
            r.rank,
            r.label,
            r.address,
            r.summary_text()
        );
    }
}

/// Print results in JSON format.
fn print_results_json(config: &BenchConfig, results: &[RankedResult]) -> Result<()> {
    let report = JsonReport {
        generated_at: Local::now(),
        settings: config,
        results: results
            .iter()
            .map(|result| JsonRow {
                result,
                text: result.summary_text(),
            })
            .collect(),
        totals: RunTotals::from_results(results),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print results as CSV or TSV.
fn print_results_delimited(results: &[RankedResult], sep: char) {
    println!("#Rank{sep}Name{sep}Address{sep}Avg(ms){sep}Best(ms){sep}Worst(ms){sep}Errors{sep}Result");
    for r in results {
        let (avg, best, worst, errors) = match r.summary {
            dnsrank::ResolverSummary::Measured(s) => (
                format!("{:.1}", s.avg_ms),
                format!("{:.1}", s.best_ms),
                format!("{:.1}", s.worst_ms),
                s.errors.to_string(),
            ),
            dnsrank::ResolverSummary::NoData { errors } => {
                (String::new(), String::new(), String::new(), errors.to_string())
            }
            dnsrank::ResolverSummary::MissingAddress => {
                (String::new(), String::new(), String::new(), String::new())
            }
        };
        println!(
            "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            r.rank,
            r.label,
            r.address,
            avg,
            best,
            worst,
            errors,
            r.summary_text()
        );
    }
}

/// List resolvers in the order they would be benchmarked.
fn run_list(files: &[PathBuf], dns_servers: &[String], format: OutputFormat) -> Result<()> {
    let list = ConfigLoader::load_resolvers(files, dns_servers)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.is_empty() {
        println!("No resolvers configured.");
        return Ok(());
    }

    println!("Resolvers ({} total):\n", list.len());
    println!("{:<4} {:<30} {:<24}", "#", "Name", "Address");
    println!("{}", "-".repeat(60));

    for (idx, entry) in list.entries.iter().enumerate() {
        let address = if entry.is_missing_address() {
            "(missing)"
        } else {
            entry.address.as_str()
        };
        println!("{:<4} {:<30} {:<24}", idx + 1, entry.label, address);
    }

    Ok(())
}

/// Export the effective resolver list and settings.
fn run_export(output: Option<PathBuf>, config_output: Option<PathBuf>, force: bool) -> Result<()> {
    let dir = ConfigLoader::config_dir();
    let output = output.unwrap_or_else(|| dir.join("resolvers.json"));
    let config_output = config_output.unwrap_or_else(|| dir.join("config.json"));

    for path in [&output, &config_output] {
        if path.exists() && !force {
            return Err(Error::config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    let list: ResolverList = ConfigLoader::load_resolvers(&[], &[])?;
    let config = ConfigLoader::load_config(None)?;
    ConfigLoader::save_resolvers(&output, &list)?;
    ConfigLoader::save_config(&config_output, &config)?;

    println!("Resolvers exported to: {}", output.display());
    println!("Settings exported to: {}", config_output.display());
    Ok(())
}

/// Main entry point for the dnsrank CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (cli, verbose) = dnsrank::cli::parse_verbose();
    setup_logging(verbose, cli.quiet);

    tracing::debug!("dnsrank starting...");

    match cli.command {
        Some(Commands::Run(args)) => {
            run_benchmark(args, cli.format).await?;
        }

        Some(Commands::List { files, dns_servers }) => {
            run_list(&files, &dns_servers, cli.format)?;
        }

        Some(Commands::Export {
            output,
            config_output,
            force,
        }) => {
            run_export(output, config_output, force)?;
        }

        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "dnsrank", &mut std::io::stdout());
        }

        None => {
            // Default to a run with configured settings
            run_benchmark(RunArgs::default(), cli.format).await?;
        }
    }

    Ok(())
}
