//! Network transport implementations for chain clients.
//!
//! A single HTTP transport serves every REST and JSON-RPC based family.
//! Each call it makes is reported to a [`CallTracker`].

mod http;
mod tracker;

pub use http::HttpTransportClient;
pub use tracker::{endpoint_host, CallStatus, CallTracker};

use crate::services::blockchain::BlockChainError;
use serde::Serialize;
use serde_json::{json, Value};

/// Base trait for all chain transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Send a JSON-RPC request to the endpoint
	///
	/// A response carrying a non-null `error` member is treated as a failed call.
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Send a REST `GET` relative to the endpoint and decode the JSON body
	///
	/// # Arguments
	/// * `path` - Path appended to the endpoint URL
	/// * `query` - Query string pairs
	async fn get_json(&self, path: &str, query: &[(&str, &str)])
		-> Result<Value, BlockChainError>;

	/// Customizes the request for specific chain requirements
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		// Default implementation for JSON-RPC
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into())
		})
	}
}
