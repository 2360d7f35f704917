//! Configuration module.
//!
//! This module provides functionality for loading benchmark settings
//! and resolver lists from various sources.

pub mod defaults;
pub mod loader;

pub use loader::{BenchConfig, ConfigLoader};
