//! Solana client implementation.
//!
//! SOL balances come from `getBalance`. SPL token balances are decoded from
//! the raw token account data returned by `getTokenAccountsByOwner`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, Wallet},
	services::blockchain::{
		client::BalanceClient,
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
	utils::parsing::scale_integer,
};

/// Symbol of the native asset
pub const SOL_SYMBOL: &str = "SOL";

/// Lamports per SOL, as a decimal exponent
pub const SOL_DECIMALS: u32 = 9;

/// Byte range of the `amount` field in an SPL token account
const TOKEN_AMOUNT_RANGE: std::ops::Range<usize> = 64..72;

/// Reads the little-endian `amount` of an SPL token account
///
/// # Arguments
/// * `data` - Raw account data
///
/// # Returns
/// * `Result<u64, BlockChainError>` - Token amount in the mint's smallest unit
pub fn decode_token_amount(data: &[u8]) -> Result<u64, BlockChainError> {
	let bytes: [u8; 8] = data
		.get(TOKEN_AMOUNT_RANGE)
		.and_then(|slice| slice.try_into().ok())
		.ok_or_else(|| {
			BlockChainError::decode_error(format!(
				"Token account data too short: {} bytes",
				data.len()
			))
		})?;

	Ok(u64::from_le_bytes(bytes))
}

/// Client implementation for Solana
#[derive(Clone)]
pub struct SolanaClient<T: Send + Sync + Clone> {
	/// The underlying transport for JSON-RPC communication
	http_client: T,
}

impl<T: Send + Sync + Clone> SolanaClient<T> {
	/// Creates a new Solana client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}
}

impl SolanaClient<HttpTransportClient> {
	/// Endpoint host calls are tracked under
	pub fn host(&self) -> &str {
		self.http_client.host()
	}
}

/// Extended functionality specific to Solana
#[async_trait]
pub trait SolanaClientTrait: BalanceClient {
	/// Reads the SPL token balance `owner` holds for `mint`
	///
	/// Only the first token account is read. Owners without a token account
	/// for the mint hold 0.
	///
	/// # Arguments
	/// * `owner` - Wallet address
	/// * `mint` - Token mint address
	///
	/// # Returns
	/// * `Result<u64, BlockChainError>` - Raw amount in the mint's smallest unit
	async fn fetch_token_balance(&self, owner: &str, mint: &str) -> Result<u64, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> SolanaClientTrait for SolanaClient<T> {
	#[instrument(skip(self))]
	async fn fetch_token_balance(&self, owner: &str, mint: &str) -> Result<u64, BlockChainError> {
		let params = json!([owner, { "mint": mint }, { "encoding": "base64" }]);
		let response = self
			.http_client
			.send_raw_request("getTokenAccountsByOwner", Some(params))
			.await?;

		let accounts = response
			.get("result")
			.and_then(|result| result.get("value"))
			.and_then(Value::as_array)
			.ok_or_else(|| {
				BlockChainError::decode_error("Missing 'result.value' in getTokenAccountsByOwner")
			})?;

		let Some(account) = accounts.first() else {
			return Ok(0);
		};

		let encoded = account
			.pointer("/account/data/0")
			.and_then(Value::as_str)
			.ok_or_else(|| BlockChainError::decode_error("Token account has no base64 data"))?;
		let data = STANDARD.decode(encoded).map_err(|e| {
			BlockChainError::decode_error(format!("Invalid base64 account data: {}", e))
		})?;

		decode_token_amount(&data)
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BalanceClient for SolanaClient<T> {
	#[instrument(skip_all, fields(address = %wallet.address))]
	async fn fetch_balance(
		&self,
		wallet: &Wallet,
		_entry: Option<&ChainRegistryEntry>,
	) -> Result<Vec<BalanceObservation>, BlockChainError> {
		let response = self
			.http_client
			.send_raw_request("getBalance", Some(json!([wallet.address])))
			.await?;

		let lamports = response
			.pointer("/result/value")
			.and_then(Value::as_u64)
			.ok_or_else(|| BlockChainError::decode_error("Missing 'result.value' in getBalance"))?;
		let value = scale_integer(u128::from(lamports), SOL_DECIMALS)
			.map_err(BlockChainError::decode_error)?;

		Ok(vec![BalanceObservation::native(value, SOL_SYMBOL)])
	}
}
