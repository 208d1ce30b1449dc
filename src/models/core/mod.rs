//! Core domain models for the exporter.
//!
//! This module contains the fundamental data structures that represent:
//! - Networks: chain endpoints and the wallets watched on them
//! - Metric records: the normalized shape published to the metrics registry

mod metric;
mod network;

pub use metric::{MetricKind, MetricRecord};
pub use network::{Network, Wallet};
