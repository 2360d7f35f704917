//! Configuration loader.
//!
//! This module loads benchmark settings and resolver lists from JSON
//! files, command-line arguments, or the user config directory, falling
//! back to the built-in defaults.

use crate::config::defaults::{
    default_domains, default_resolvers, DEFAULT_RECORD_TYPE, DEFAULT_TIMEOUT_SECS,
};
use crate::dns::benchmark::DEFAULT_MAX_CONCURRENT;
use crate::dns::types::{ResolverEntry, ResolverList};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the directory under the user config dir.
const APP_DIR: &str = "dnsrank";

/// Benchmark settings file name.
const CONFIG_FILE: &str = "config.json";

/// Resolver list file name.
const RESOLVERS_FILE: &str = "resolvers.json";

/// Benchmark settings.
///
/// Every field is optional in the JSON form; missing fields take the
/// built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BenchConfig {
    /// Domains queried against every resolver
    pub domains: Vec<String>,
    /// Record type name (e.g., "A", "AAAA")
    pub record_type: String,
    /// Per-query timeout in seconds
    pub timeout_secs: f64,
    /// Resolvers probed at the same time
    pub max_concurrent: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            domains: default_domains(),
            record_type: DEFAULT_RECORD_TYPE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl BenchConfig {
    /// Per-query timeout as a `Duration`.
    ///
    /// Negative or non-finite values map to a zero duration, which the
    /// benchmark rejects before probing.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::ZERO)
    }
}

/// Configuration loader.
///
/// Provides various methods to load benchmark settings and resolver lists
/// from different sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Get the config directory path.
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Load benchmark settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<BenchConfig> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: BenchConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load benchmark settings.
    ///
    /// Uses `path` when given, otherwise `$CONFIG_DIR/dnsrank/config.json`
    /// if it exists, otherwise the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_config(path: Option<&Path>) -> Result<BenchConfig> {
        if let Some(path) = path {
            return Self::load_config_file(path);
        }

        let default_path = Self::config_dir().join(CONFIG_FILE);
        if default_path.is_file() {
            tracing::debug!("Loading settings from {}", default_path.display());
            return Self::load_config_file(default_path);
        }

        Ok(BenchConfig::default())
    }

    /// Load a resolver list from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let list = ConfigLoader::load_from_file("resolvers.json")?;
    /// for entry in &list.entries {
    ///     println!("{}: {}", entry.label, entry.address);
    /// }
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ResolverList> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let list: ResolverList = serde_json::from_str(&content)?;
        Ok(list)
    }

    /// Resolve the resolver list to benchmark.
    ///
    /// Precedence: `--dns` arguments, then `files` (merged in order), then
    /// `$CONFIG_DIR/dnsrank/resolvers.json`, then the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a given or existing file cannot be loaded, or if
    /// an argument is malformed.
    pub fn load_resolvers(files: &[PathBuf], dns_args: &[String]) -> Result<ResolverList> {
        if !dns_args.is_empty() {
            return Self::from_args(dns_args);
        }

        if !files.is_empty() {
            let lists = files
                .iter()
                .map(Self::load_from_file)
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::merge(lists));
        }

        let default_path = Self::config_dir().join(RESOLVERS_FILE);
        if default_path.is_file() {
            tracing::debug!("Loading resolvers from {}", default_path.display());
            return Self::load_from_file(default_path);
        }

        Ok(default_resolvers())
    }

    /// Merge multiple resolver lists into one.
    ///
    /// Entries keep their first-seen order; later entries repeating an
    /// address already present are dropped. Entries without an address
    /// are always kept.
    #[must_use]
    pub fn merge(lists: Vec<ResolverList>) -> ResolverList {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for entry in lists.into_iter().flat_map(|l| l.entries) {
            if entry.is_missing_address() || seen.insert(entry.address.trim().to_string()) {
                entries.push(entry);
            }
        }
        ResolverList { entries }
    }

    /// Create a resolver list from command-line arguments.
    ///
    /// Each argument is `ADDRESS#Label`; without a label the address is
    /// used as the label. Addresses are not validated here.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument has neither address nor label.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let args = vec!["8.8.8.8#Google".to_string(), "1.1.1.1".to_string()];
    /// let list = ConfigLoader::from_args(&args)?;
    /// ```
    pub fn from_args(dns_args: &[String]) -> Result<ResolverList> {
        let mut entries = Vec::with_capacity(dns_args.len());
        for arg in dns_args {
            let (address, label) = match arg.split_once('#') {
                Some((address, label)) => (address.trim(), label.trim()),
                None => (arg.trim(), ""),
            };

            if address.is_empty() && label.is_empty() {
                return Err(Error::parse(format!("Invalid resolver argument: '{arg}'")));
            }

            let label = if label.is_empty() { address } else { label };
            entries.push(ResolverEntry::new(label, address));
        }
        Ok(ResolverList { entries })
    }

    /// Write a resolver list as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_resolvers<P: AsRef<Path>>(path: P, list: &ResolverList) -> Result<()> {
        let json = serde_json::to_string_pretty(list)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Write benchmark settings as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_config<P: AsRef<Path>>(path: P, config: &BenchConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
