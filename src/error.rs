//! Error types module.
//!
//! This module defines the error types used throughout dnsrank.
//! Per-query failures never show up here: they are folded into
//! [`ProbeSample`](crate::dns::ProbeSample) values by the probe engine.
//! What remains are configuration, I/O and run-level faults.

use thiserror::Error;

/// A specialized `Result` type for dnsrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for dnsrank.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (config files, terminal output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error (configuration files, JSON output)
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resolver construction error
    #[error("DNS resolver error: {0}")]
    Resolver(#[from] trust_dns_resolver::error::ResolveError),

    /// Configuration error (invalid config, missing files)
    #[error("Config error: {0}")]
    Config(String),

    /// Parse error (resolver address, record type)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A benchmark run could not start probing at all
    #[error("Benchmark run failed: {0}")]
    RunFailed(String),

    /// The run was invalidated before its results were delivered
    #[error("Benchmark run was cancelled")]
    Cancelled,
}

impl Error {
    /// Create a new configuration error with a message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new parse error with a message.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new run failure with a message.
    #[must_use]
    pub fn run_failed(msg: impl Into<String>) -> Self {
        Self::RunFailed(msg.into())
    }
}

impl From<color_eyre::Report> for Error {
    fn from(e: color_eyre::Report) -> Self {
        Self::Config(e.to_string())
    }
}
