//! dnsrank - Benchmark and rank DNS resolvers by real query latency.
//!
//! This crate provides both a library API and a CLI tool for:
//! - Querying a list of domains against each candidate resolver
//! - Classifying per-query failures (NXDOMAIN, no answer, timeout, other)
//! - Summarizing latency per resolver and ranking resolvers by average
//! - Running benchmarks in the background with progress events
//!
//! # Library Usage
//!
//! ```ignore
//! use dnsrank::{Benchmark, BenchOptions, ResolverEntry};
//!
//! let bench = Benchmark::new();
//! let entries = vec![
//!     ResolverEntry::new("Google DNS", "8.8.8.8"),
//!     ResolverEntry::new("Cloudflare DNS", "1.1.1.1"),
//! ];
//!
//! // Single batch
//! let ranked = bench.run(entries.clone(), BenchOptions::default()).await?;
//!
//! // Incremental
//! let mut handle = bench.start(entries, BenchOptions::default());
//! while let Some(event) = handle.next_event().await {
//!     // BenchEvent::Progress / Completed / Failed
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Benchmark the configured (or default) resolvers
//! dnsrank
//! dnsrank run --dns 9.9.9.9#Quad9 --dns 1.1.1.1#Cloudflare
//! dnsrank run -d example.com -d example.org --record-type AAAA --timeout 1.5
//!
//! # List resolvers
//! dnsrank list
//!
//! # Export defaults to the config directory
//! dnsrank export
//! ```

pub mod cli;
pub mod config;
pub mod dns;
pub mod error;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::{BenchConfig, ConfigLoader};
pub use dns::types::{
    ProbeErrorKind, ProbeSample, RankedResult, ResolverEntry, ResolverList, ResolverStats,
    ResolverSummary, RunTotals,
};
pub use dns::{BenchEvent, BenchOptions, Benchmark, Probe, ResolverProbe, RunHandle, RunId};
pub use error::{Error, Result};
