//! Exporter service.
//!
//! Contains the polling loop that turns adapter observations into metric
//! records, and the sink trait records are published through.

mod service;
mod sink;

pub use service::{CycleSummary, ExporterService, NetworkTarget};
pub use sink::MetricsSink;
