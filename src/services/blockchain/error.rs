//! Blockchain error types and handling.
//!
//! Errors raised while talking to chain endpoints: connectivity problems,
//! upstream rejections, undecodable payloads and missing chain metadata.

use log::error;

/// Represents possible errors that can occur during chain queries
#[derive(Debug)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	ConnectionError(String),

	/// Upstream rejected the request (non-2xx status or JSON-RPC error object)
	RequestError(String),

	/// Response body could not be decoded into the expected shape
	DecodeError(String),

	/// Chain metadata (symbol, decimals, denom) the query depends on is absent
	MetadataNotFound(String),

	/// Internal errors within the client
	InternalError(String),
}

impl BlockChainError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::ConnectionError(msg) => format!("Connection error: {}", msg),
			Self::RequestError(msg) => format!("Request error: {}", msg),
			Self::DecodeError(msg) => format!("Decode error: {}", msg),
			Self::MetadataNotFound(msg) => format!("Metadata not found: {}", msg),
			Self::InternalError(msg) => format!("Internal error: {}", msg),
		}
	}

	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new decode error with logging
	pub fn decode_error(msg: impl Into<String>) -> Self {
		let error = Self::DecodeError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new metadata not found error with logging
	pub fn metadata_not_found(msg: impl Into<String>) -> Self {
		let error = Self::MetadataNotFound(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

// Standard error trait implementations
impl std::fmt::Display for BlockChainError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for BlockChainError {}

impl From<subxt::Error> for BlockChainError {
	fn from(err: subxt::Error) -> Self {
		Self::request_error(err.to_string())
	}
}

impl From<alloy::sol_types::Error> for BlockChainError {
	fn from(err: alloy::sol_types::Error) -> Self {
		Self::decode_error(err.to_string())
	}
}
