//! DNS types and data structures.
//!
//! This module provides the core types used for resolver representation,
//! per-query probe samples, per-resolver summaries and ranked results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate resolver to benchmark.
///
/// The address is kept exactly as supplied; it is only interpreted when a
/// probe is built for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverEntry {
    /// Display label (e.g., "Cloudflare DNS")
    #[serde(alias = "name")]
    pub label: String,
    /// Resolver address, usually an IP literal
    #[serde(alias = "IP", alias = "ip")]
    pub address: String,
}

impl ResolverEntry {
    /// Create a new resolver entry.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let entry = ResolverEntry::new("Google DNS", "8.8.8.8");
    /// ```
    pub fn new(label: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            address: address.into(),
        }
    }

    /// Whether the entry has no usable address at all.
    #[must_use]
    pub fn is_missing_address(&self) -> bool {
        self.address.trim().is_empty()
    }
}

/// Resolver list container, as stored in `resolvers.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResolverList {
    /// Entries in caller-defined order
    #[serde(rename = "list")]
    pub entries: Vec<ResolverEntry>,
}

impl ResolverList {
    /// Create a resolver list from a vector of entries.
    #[must_use]
    pub fn from_entries(entries: Vec<ResolverEntry>) -> Self {
        Self { entries }
    }

    /// Get the number of entries in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Why a single query produced no latency sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorKind {
    /// The name exists but has no record of the requested type
    NoAnswer,
    /// The resolver answered NXDOMAIN
    NotFound,
    /// No answer within the query timeout
    Timeout,
    /// Transport, parse or library fault
    Other,
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAnswer => write!(f, "no_answer"),
            Self::NotFound => write!(f, "not_found"),
            Self::Timeout => write!(f, "timeout"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Outcome of one query for one domain against one resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeSample {
    /// Round-trip time of the query in milliseconds
    Latency(f64),
    /// Classified failure
    Error(ProbeErrorKind),
}

impl ProbeSample {
    /// Latency in milliseconds, if the query succeeded.
    #[must_use]
    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            Self::Latency(ms) => Some(*ms),
            Self::Error(_) => None,
        }
    }
}

/// Latency statistics for a resolver with at least one successful query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResolverStats {
    /// Number of successful queries
    pub successes: usize,
    /// Number of failed queries
    pub errors: usize,
    /// Fastest successful query in milliseconds
    pub best_ms: f64,
    /// Slowest successful query in milliseconds
    pub worst_ms: f64,
    /// Mean over successful queries in milliseconds
    pub avg_ms: f64,
}

impl ResolverStats {
    /// Total number of domains probed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.successes + self.errors
    }
}

/// Aggregated outcome of one resolver within one run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolverSummary {
    /// At least one query succeeded
    Measured(ResolverStats),
    /// Every query failed
    NoData {
        /// Number of failed queries
        errors: usize,
    },
    /// The entry had no address, so nothing was probed
    MissingAddress,
}

impl ResolverSummary {
    /// Mean latency, if any query succeeded.
    #[must_use]
    pub fn avg_ms(&self) -> Option<f64> {
        match self {
            Self::Measured(stats) => Some(stats.avg_ms),
            _ => None,
        }
    }

    /// Key used for ranking: mean latency, or +inf without data.
    #[must_use]
    pub fn rank_key(&self) -> f64 {
        self.avg_ms().unwrap_or(f64::INFINITY)
    }

    /// Check if the resolver produced latency data.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

impl fmt::Display for ResolverSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measured(stats) => {
                write!(
                    f,
                    "avg {:.1} ms | best {:.1} ms | worst {:.1} ms",
                    stats.avg_ms, stats.best_ms, stats.worst_ms
                )?;
                if stats.errors > 0 {
                    write!(f, " | errors {}", stats.errors)?;
                }
                Ok(())
            }
            Self::NoData { .. } => write!(f, "no successful responses"),
            Self::MissingAddress => write!(f, "missing address"),
        }
    }
}

/// One row of the final ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedResult {
    /// 1-based position in the ranking
    pub rank: usize,
    /// Resolver label
    pub label: String,
    /// Resolver address as supplied
    pub address: String,
    /// Aggregated outcome
    pub summary: ResolverSummary,
}

impl RankedResult {
    /// Human-readable summary line for this resolver.
    #[must_use]
    pub fn summary_text(&self) -> String {
        self.summary.to_string()
    }
}

/// Totals over a whole ranked run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunTotals {
    /// Number of resolvers in the run
    pub total: usize,
    /// Resolvers with at least one successful query
    pub measured: usize,
    /// Resolvers where every query failed
    pub no_data: usize,
    /// Entries skipped for lack of an address
    pub missing_address: usize,
    /// Label of the fastest resolver, if any was measured
    pub fastest: Option<String>,
}

impl RunTotals {
    /// Compute totals from a ranking.
    #[must_use]
    pub fn from_results(results: &[RankedResult]) -> Self {
        let mut totals = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.summary {
                ResolverSummary::Measured(_) => {
                    totals.measured += 1;
                    if totals.fastest.is_none() {
                        totals.fastest = Some(result.label.clone());
                    }
                }
                ResolverSummary::NoData { .. } => totals.no_data += 1,
                ResolverSummary::MissingAddress => totals.missing_address += 1,
            }
        }
        totals
    }
}
