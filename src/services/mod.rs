//! Core services implementing the exporter functionality.
//!
//! This module contains the main service implementations:
//! - `blockchain`: Chain clients, transports and the adapter factory
//! - `exporter`: The polling loop publishing metric records
//! - `registry`: Chain metadata resolved at startup

pub mod blockchain;
pub mod exporter;
pub mod registry;
