use crate::models::MetricRecord;

/// Destination for normalized metric records
///
/// Publishing overwrites the previous value for the same label set. Sinks
/// must never fail.
pub trait MetricsSink: Send + Sync {
	/// Publishes one record
	fn publish(&self, record: &MetricRecord);
}
