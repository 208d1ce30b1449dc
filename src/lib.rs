//! Wallets exporter library.
//!
//! Polls wallet balances on cosmos, evm, bera, substrate, solana and sui
//! networks and exposes them as Prometheus metrics.
//!
//! # Modules
//! - `bootstrap`: Builds the exporter from configuration
//! - `models`: Configuration, network and metric data structures
//! - `services`: Chain clients, registry resolver and the polling loop
//! - `utils`: Logging, metrics, parsing helpers and constants

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
