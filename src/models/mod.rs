//! Domain models and data structures for the exporter.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: Network families, balance observations and registry entries
//! - `config`: Configuration loading, validation and runtime settings
//! - `core`: Core domain models (Network, Wallet, MetricRecord)

mod blockchain;
mod config;
mod core;

// Re-export blockchain types
pub use blockchain::{
	BalanceObservation, ChainRegistryEntry, MissingMetadataPolicy, NetworkType, TokenType,
};

// Re-export core types
pub use core::{MetricKind, MetricRecord, Network, Wallet};

// Re-export config types
pub use config::{ConfigError, ConfigLoader, ExporterConfig, ExporterSettings};
