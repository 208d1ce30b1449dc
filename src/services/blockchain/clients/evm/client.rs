//! EVM-compatible chain client implementation.
//!
//! Native balances come from `eth_getBalance`, the native symbol from the
//! chain-id table, and ERC-20 balances from raw `eth_call`s whose calldata is
//! ABI-encoded locally.

use alloy::{
	primitives::{Address, U256},
	sol,
	sol_types::SolCall,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::{str::FromStr, sync::Arc};
use tracing::{debug, instrument};

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, MissingMetadataPolicy, Wallet},
	services::{
		blockchain::{
			client::BalanceClient,
			transports::{BlockchainTransport, HttpTransportClient},
			BlockChainError,
		},
		registry::ChainRegistry,
	},
	utils::{constants::UNKNOWN_SYMBOL, parsing::scale_integer},
};

/// Decimals of the native asset on EVM chains when the chain table is silent
pub const NATIVE_DECIMALS: u32 = 18;

sol! {
	interface IERC20 {
		function balanceOf(address account) external view returns (uint256);
		function decimals() external view returns (uint8);
		function symbol() external view returns (string);
	}
}

/// Converts a 256-bit integer amount into display units
pub(crate) fn u256_to_decimal(
	value: U256,
	decimals: u32,
) -> Result<rust_decimal::Decimal, BlockChainError> {
	let mut value = value;
	let mut decimals = decimals;
	let ceiling = U256::from(u128::MAX);
	while value > ceiling {
		if decimals == 0 {
			return Err(BlockChainError::decode_error(format!(
				"Amount {} does not fit in a decimal",
				value
			)));
		}
		value /= U256::from(10u8);
		decimals -= 1;
	}

	let raw = u128::try_from(value)
		.map_err(|e| BlockChainError::decode_error(format!("Invalid amount {}: {}", value, e)))?;
	scale_integer(raw, decimals).map_err(BlockChainError::decode_error)
}

/// Parses an address for use in contract calldata
pub(crate) fn parse_address(address: &str) -> Result<Address, BlockChainError> {
	Address::from_str(address.trim()).map_err(|e| {
		BlockChainError::request_error(format!("Invalid address '{}': {}", address, e))
	})
}

fn result_str<'a>(response: &'a Value, method: &str) -> Result<&'a str, BlockChainError> {
	response
		.get("result")
		.and_then(Value::as_str)
		.ok_or_else(|| {
			BlockChainError::decode_error(format!("Missing 'result' field in {} response", method))
		})
}

fn parse_quantity(quantity: &str) -> Result<U256, BlockChainError> {
	U256::from_str(quantity)
		.map_err(|e| BlockChainError::decode_error(format!("Invalid quantity '{}': {}", quantity, e)))
}

/// Client implementation for Ethereum Virtual Machine (EVM) compatible chains
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying transport for JSON-RPC communication
	http_client: T,
	/// Chain-id table used to name the native asset
	chains: Arc<ChainRegistry>,
	/// Handling of chains or tokens without a known symbol
	policy: MissingMetadataPolicy,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	///
	/// # Arguments
	/// * `http_client` - Transport bound to the network's JSON-RPC endpoint
	/// * `chains` - Registry holding the chain-id table
	/// * `policy` - What to do when a symbol cannot be determined
	pub fn new_with_transport(
		http_client: T,
		chains: Arc<ChainRegistry>,
		policy: MissingMetadataPolicy,
	) -> Self {
		Self {
			http_client,
			chains,
			policy,
		}
	}
}

impl EvmClient<HttpTransportClient> {
	/// Endpoint host calls are tracked under
	pub fn host(&self) -> &str {
		self.http_client.host()
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> EvmClient<T> {
	/// Executes a read-only contract call against the latest block
	///
	/// # Arguments
	/// * `to` - Contract address
	/// * `calldata` - ABI-encoded call
	///
	/// # Returns
	/// * `Result<Vec<u8>, BlockChainError>` - ABI-encoded return data
	pub async fn call_contract(
		&self,
		to: &str,
		calldata: Vec<u8>,
	) -> Result<Vec<u8>, BlockChainError> {
		let params = json!([
			{ "to": to, "data": format!("0x{}", hex::encode(calldata)) },
			"latest"
		]);
		let response = self
			.http_client
			.send_raw_request("eth_call", Some(params))
			.await?;
		let encoded = result_str(&response, "eth_call")?;

		hex::decode(encoded.trim_start_matches("0x")).map_err(|e| {
			BlockChainError::decode_error(format!("Invalid eth_call return data: {}", e))
		})
	}

	/// Retrieves the chain id reported by the endpoint
	pub async fn get_chain_id(&self) -> Result<u64, BlockChainError> {
		let response = self
			.http_client
			.send_raw_request::<Value>("eth_chainId", None)
			.await?;
		let chain_id = result_str(&response, "eth_chainId")?;

		u64::from_str_radix(chain_id.trim_start_matches("0x"), 16).map_err(|e| {
			BlockChainError::decode_error(format!("Invalid chain id '{}': {}", chain_id, e))
		})
	}

	/// Resolves the native symbol and decimals through the chain-id table
	async fn native_metadata(&self) -> Result<(String, u32), BlockChainError> {
		let chain_id = self.get_chain_id().await?;

		match self.chains.resolve_chain_id(chain_id) {
			Some(entry) => Ok((entry.symbol.clone(), entry.decimals)),
			None if self.policy.is_strict() => Err(BlockChainError::metadata_not_found(format!(
				"chain id {} is not in the chain table",
				chain_id
			))),
			None => {
				debug!(chain_id, "Chain id not in the chain table, using fallback symbol");
				Ok((UNKNOWN_SYMBOL.to_string(), NATIVE_DECIMALS))
			}
		}
	}

	async fn token_symbol(&self, contract: &str) -> Result<String, BlockChainError> {
		let symbol = match self
			.call_contract(contract, IERC20::symbolCall {}.abi_encode())
			.await
		{
			Ok(data) => IERC20::symbolCall::abi_decode_returns(&data).map_err(BlockChainError::from),
			Err(e) => Err(e),
		};

		match symbol {
			Ok(symbol) => Ok(symbol),
			Err(e) if self.policy.is_strict() => Err(e),
			Err(_) => Ok(UNKNOWN_SYMBOL.to_string()),
		}
	}
}

/// Extended functionality specific to EVM-compatible chains
#[async_trait]
pub trait EvmClientTrait: BalanceClient {
	/// Reads the native balance of `address`
	///
	/// # Returns
	/// * `Result<BalanceObservation, BlockChainError>` - Balance in display units
	///   with the symbol from the chain-id table
	async fn fetch_native_balance(&self, address: &str)
		-> Result<BalanceObservation, BlockChainError>;

	/// Reads an ERC-20 balance of `address`
	///
	/// # Arguments
	/// * `address` - Holder address
	/// * `contract` - Token contract address
	///
	/// # Returns
	/// * `Result<BalanceObservation, BlockChainError>` - Balance scaled by the
	///   contract's own decimals
	async fn fetch_token_balance(
		&self,
		address: &str,
		contract: &str,
	) -> Result<BalanceObservation, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> EvmClientTrait for EvmClient<T> {
	#[instrument(skip(self))]
	async fn fetch_native_balance(
		&self,
		address: &str,
	) -> Result<BalanceObservation, BlockChainError> {
		let response = self
			.http_client
			.send_raw_request("eth_getBalance", Some(json!([address, "latest"])))
			.await?;
		let wei = parse_quantity(result_str(&response, "eth_getBalance")?)?;
		let (symbol, decimals) = self.native_metadata().await?;

		Ok(BalanceObservation::native(
			u256_to_decimal(wei, decimals)?,
			symbol,
		))
	}

	#[instrument(skip(self))]
	async fn fetch_token_balance(
		&self,
		address: &str,
		contract: &str,
	) -> Result<BalanceObservation, BlockChainError> {
		let account = parse_address(address)?;

		let data = self
			.call_contract(contract, IERC20::balanceOfCall { account }.abi_encode())
			.await?;
		let raw = IERC20::balanceOfCall::abi_decode_returns(&data)?;

		let data = self
			.call_contract(contract, IERC20::decimalsCall {}.abi_encode())
			.await?;
		let decimals = IERC20::decimalsCall::abi_decode_returns(&data)?;

		let symbol = self.token_symbol(contract).await?;

		Ok(BalanceObservation::fungible(
			u256_to_decimal(raw, u32::from(decimals))?,
			symbol,
		))
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BalanceClient for EvmClient<T> {
	#[instrument(skip_all, fields(address = %wallet.address))]
	async fn fetch_balance(
		&self,
		wallet: &Wallet,
		_entry: Option<&ChainRegistryEntry>,
	) -> Result<Vec<BalanceObservation>, BlockChainError> {
		let mut observations = vec![self.fetch_native_balance(&wallet.address).await?];

		if let Some(contract) = wallet.contract_address.as_deref() {
			observations.push(self.fetch_token_balance(&wallet.address, contract).await?);
		}

		Ok(observations)
	}
}
