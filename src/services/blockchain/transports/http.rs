//! HTTP transport implementation.
//!
//! Wraps a shared `reqwest` client bound to one endpoint. Requests are sent
//! once, without retries; the outcome of every attempt is reported to the
//! call tracker labeled by the endpoint host.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::{fmt, sync::Arc, time::Duration};

use crate::services::blockchain::{
	transports::{endpoint_host, BlockchainTransport, CallStatus, CallTracker},
	BlockChainError,
};

/// HTTP transport client bound to a single endpoint
#[derive(Clone)]
pub struct HttpTransportClient {
	/// Shared HTTP client, carries the request timeout
	client: Client,
	/// Endpoint URL as configured
	url: String,
	/// `scheme://host[:port]` of the endpoint, used as the tracker label
	host: String,
	/// Receives the outcome of every call
	tracker: Arc<dyn CallTracker>,
}

impl fmt::Debug for HttpTransportClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HttpTransportClient")
			.field("url", &self.url)
			.field("host", &self.host)
			.finish()
	}
}

impl HttpTransportClient {
	/// Creates a transport with its own HTTP client
	///
	/// # Arguments
	/// * `url` - Endpoint URL
	/// * `timeout` - Per-request timeout
	/// * `tracker` - Receives call outcomes
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - New transport or client build error
	pub fn new(
		url: &str,
		timeout: Duration,
		tracker: Arc<dyn CallTracker>,
	) -> Result<Self, BlockChainError> {
		let client = ClientBuilder::new()
			.timeout(timeout)
			.build()
			.map_err(|e| BlockChainError::internal_error(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self::with_client(client, url, tracker))
	}

	/// Creates a transport reusing an existing HTTP client
	pub fn with_client(client: Client, url: &str, tracker: Arc<dyn CallTracker>) -> Self {
		Self {
			client,
			url: url.to_string(),
			host: endpoint_host(url),
			tracker,
		}
	}

	/// Host label the tracker records calls under
	pub fn host(&self) -> &str {
		&self.host
	}

	fn resolve(&self, path: &str) -> String {
		if path.is_empty() {
			return self.url.clone();
		}
		format!(
			"{}/{}",
			self.url.trim_end_matches('/'),
			path.trim_start_matches('/')
		)
	}

	/// Sends the request and records its outcome exactly once
	async fn execute(
		&self,
		request: RequestBuilder,
		target: &str,
		json_rpc: bool,
	) -> Result<Value, BlockChainError> {
		let result = Self::send(request, target, json_rpc).await;
		self.tracker
			.record(&self.host, CallStatus::from_result(&result));
		result
	}

	async fn send(
		request: RequestBuilder,
		target: &str,
		json_rpc: bool,
	) -> Result<Value, BlockChainError> {
		let response = request
			.send()
			.await
			.map_err(|e| BlockChainError::connection_error(format!("{}: {}", target, e)))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(BlockChainError::request_error(format!(
				"HTTP {} from {}: {}",
				status, target, body
			)));
		}

		let body: Value = response.json().await.map_err(|e| {
			BlockChainError::decode_error(format!("Invalid JSON from {}: {}", target, e))
		})?;

		if json_rpc {
			if let Some(error) = body.get("error").filter(|error| !error.is_null()) {
				return Err(BlockChainError::request_error(format!(
					"JSON-RPC error from {}: {}",
					target, error
				)));
			}
		}

		Ok(body)
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	/// Sends a JSON-RPC request to the endpoint
	///
	/// # Arguments
	/// * `method` - The JSON-RPC method name to call
	/// * `params` - Optional parameters for the method call
	///
	/// # Returns
	/// * `Result<Value, BlockChainError>` - Full JSON-RPC response body
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let body = self.customize_request(method, params).await;
		let request = self.client.post(&self.url).json(&body);
		let target = format!("{} ({})", self.url, method);

		self.execute(request, &target, true).await
	}

	async fn get_json(
		&self,
		path: &str,
		query: &[(&str, &str)],
	) -> Result<Value, BlockChainError> {
		let url = self.resolve(path);
		let mut request = self.client.get(&url);
		if !query.is_empty() {
			request = request.query(query);
		}

		self.execute(request, &url, false).await
	}
}
