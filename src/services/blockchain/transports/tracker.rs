//! Endpoint call tracking.
//!
//! Every outbound call made by a transport reports its outcome exactly once,
//! labeled by the upstream host, before any error is handed back to the
//! caller.

use std::fmt;
use url::Url;

/// Outcome of a single outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallStatus {
	Success,
	Failure,
}

impl CallStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Failure => "failure",
		}
	}

	pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() {
			Self::Success
		} else {
			Self::Failure
		}
	}
}

impl fmt::Display for CallStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Sink for per-endpoint call outcomes
///
/// Implementations must never fail; the outcome is only counted.
pub trait CallTracker: Send + Sync {
	/// Records the outcome of one call to `endpoint`
	///
	/// # Arguments
	/// * `endpoint` - Upstream host as `scheme://host[:port]`
	/// * `status` - Whether the call succeeded
	fn record(&self, endpoint: &str, status: CallStatus);
}

/// Reduces a URL to `scheme://host[:port]`
///
/// Paths, queries and credentials are dropped so the label set stays bounded.
/// Strings that do not parse as URLs are returned unchanged.
pub fn endpoint_host(url: &str) -> String {
	match Url::parse(url) {
		Ok(parsed) => match parsed.host_str() {
			Some(host) => match parsed.port() {
				Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
				None => format!("{}://{}", parsed.scheme(), host),
			},
			None => url.to_string(),
		},
		Err(_) => url.to_string(),
	}
}
