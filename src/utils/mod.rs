//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - constants: Default values for the application
//! - logging: Logging utilities
//! - metrics: Prometheus registry and metrics server
//! - parsing: Exact decimal conversions of on-chain amounts

pub mod constants;
pub mod logging;
pub mod metrics;
pub mod parsing;

pub use constants::*;
