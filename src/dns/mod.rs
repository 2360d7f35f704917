//! DNS module.
//!
//! This module provides the resolver benchmark:
//! - Probe engine (one bounded query per domain)
//! - Aggregation and ranking of samples
//! - Benchmark orchestration with progress events
//! - Core data types

pub mod benchmark;
pub mod probe;
pub mod summary;
pub mod types;

pub use benchmark::{BenchEvent, BenchOptions, Benchmark, RunHandle, RunId};
pub use probe::{Probe, ResolverProbe};
pub use types::*;
