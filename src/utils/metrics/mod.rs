//! Metrics module for the application.
//!
//! - Owns the Prometheus registry the metrics server exposes.
//! - Defines `account_info`, the gauge every wallet position is published to.
//! - Defines `rpc_call_status`, the per-endpoint call outcome counter.

pub mod server;

use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::{
	models::MetricRecord,
	services::{
		blockchain::{CallStatus, CallTracker},
		exporter::MetricsSink,
	},
};

/// Label names of `account_info`, in the order `MetricRecord::labels` yields values
pub const ACCOUNT_INFO_LABELS: [&str; 6] =
	["address", "name", "network", "type", "token", "token_type"];

/// Label names of `rpc_call_status`
pub const RPC_CALL_STATUS_LABELS: [&str; 2] = ["url", "status"];

/// Prometheus registry holding the exporter's metrics
#[derive(Clone)]
pub struct PrometheusMetrics {
	registry: Registry,
	account_info: GaugeVec,
	rpc_call_status: IntCounterVec,
}

impl PrometheusMetrics {
	/// Creates a registry with both metrics registered
	pub fn new() -> Result<Self, prometheus::Error> {
		let registry = Registry::new();

		let account_info = GaugeVec::new(
			Opts::new("account_info", "Wallet balances and staking positions"),
			&ACCOUNT_INFO_LABELS,
		)?;
		registry.register(Box::new(account_info.clone()))?;

		let rpc_call_status = IntCounterVec::new(
			Opts::new("rpc_call_status", "Outbound chain calls by endpoint and outcome"),
			&RPC_CALL_STATUS_LABELS,
		)?;
		registry.register(Box::new(rpc_call_status.clone()))?;

		Ok(Self {
			registry,
			account_info,
			rpc_call_status,
		})
	}

	/// Gather all metrics and encode them in the text exposition format.
	pub fn gather_metrics(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
		let encoder = TextEncoder::new();
		let metric_families = self.registry.gather();
		let mut buffer = Vec::new();
		encoder.encode(&metric_families, &mut buffer)?;
		Ok(buffer)
	}

	/// Current value of an `account_info` series
	///
	/// Series are created on first access, unseen label sets read as 0.
	pub fn account_value(&self, labels: &[&str]) -> Result<f64, prometheus::Error> {
		self.account_info
			.get_metric_with_label_values(labels)
			.map(|gauge| gauge.get())
	}

	/// Current count of calls to `endpoint` with `status`
	pub fn call_count(&self, endpoint: &str, status: CallStatus) -> u64 {
		self.rpc_call_status
			.get_metric_with_label_values(&[endpoint, status.as_str()])
			.map(|counter| counter.get())
			.unwrap_or_default()
	}
}

impl MetricsSink for PrometheusMetrics {
	fn publish(&self, record: &MetricRecord) {
		self.account_info
			.with_label_values(&record.labels())
			.set(record.value);
	}
}

impl CallTracker for PrometheusMetrics {
	fn record(&self, endpoint: &str, status: CallStatus) {
		self.rpc_call_status
			.with_label_values(&[endpoint, status.as_str()])
			.inc();
	}
}
