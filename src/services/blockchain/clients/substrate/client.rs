//! Substrate relay-chain client implementation.
//!
//! Free balances are read from `System.Account` storage through subxt; token
//! decimals and symbol come from `system_properties` on every query. The
//! connection is opened lazily and dropped after a failure so that the next
//! query reconnects.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::{str::FromStr, sync::Arc};
use subxt::{
	backend::{legacy::LegacyRpcMethods, rpc::RpcClient},
	dynamic::Value as DynamicValue,
	ext::scale_value::At,
	utils::AccountId32,
	OnlineClient, PolkadotConfig,
};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, MissingMetadataPolicy, Wallet},
	services::blockchain::{
		client::BalanceClient,
		transports::{endpoint_host, CallStatus, CallTracker},
		BlockChainError,
	},
	utils::parsing::scale_integer,
};

/// Symbol used when the chain does not advertise `tokenSymbol`
pub const DEFAULT_SYMBOL: &str = "UNIT";

/// Decimals used when the chain does not advertise `tokenDecimals`
pub const DEFAULT_DECIMALS: u32 = 0;

#[derive(Clone)]
struct Connection {
	api: OnlineClient<PolkadotConfig>,
	rpc: LegacyRpcMethods<PolkadotConfig>,
}

/// Properties may be advertised as a scalar or as a list, first entry wins
fn first_value(value: &Value) -> Option<&Value> {
	match value {
		Value::Array(items) => items.first(),
		other => Some(other),
	}
}

/// Extracts the native symbol and decimals from `system_properties`
///
/// # Arguments
/// * `properties` - Map returned by `system_properties`
/// * `policy` - Whether absent properties fall back to defaults or fail
///
/// # Returns
/// * `Result<(String, u32), BlockChainError>` - Symbol and decimals
pub fn token_metadata(
	properties: &Map<String, Value>,
	policy: MissingMetadataPolicy,
) -> Result<(String, u32), BlockChainError> {
	let decimals = properties
		.get("tokenDecimals")
		.and_then(first_value)
		.and_then(Value::as_u64)
		.and_then(|decimals| u32::try_from(decimals).ok());
	let symbol = properties
		.get("tokenSymbol")
		.and_then(first_value)
		.and_then(Value::as_str);

	match (symbol, decimals) {
		(Some(symbol), Some(decimals)) => Ok((symbol.to_string(), decimals)),
		_ if policy.is_strict() => Err(BlockChainError::metadata_not_found(
			"chain does not advertise tokenSymbol and tokenDecimals",
		)),
		(symbol, decimals) => Ok((
			symbol.unwrap_or(DEFAULT_SYMBOL).to_string(),
			decimals.unwrap_or(DEFAULT_DECIMALS),
		)),
	}
}

/// Client implementation for Substrate relay chains
pub struct SubstrateClient {
	/// Node endpoint
	url: String,
	/// Tracker label for the endpoint
	host: String,
	/// Receives the outcome of every storage query
	tracker: Arc<dyn CallTracker>,
	/// Handling of absent token properties
	policy: MissingMetadataPolicy,
	/// Lazily opened connection
	connection: Mutex<Option<Connection>>,
}

impl SubstrateClient {
	/// Creates a new Substrate client, no connection is made until the first query
	///
	/// # Arguments
	/// * `url` - Node endpoint
	/// * `tracker` - Receives call outcomes
	/// * `policy` - What to do when token properties are absent
	pub fn new(url: &str, tracker: Arc<dyn CallTracker>, policy: MissingMetadataPolicy) -> Self {
		Self {
			url: url.to_string(),
			host: endpoint_host(url),
			tracker,
			policy,
			connection: Mutex::new(None),
		}
	}

	/// Endpoint host calls are tracked under
	pub fn host(&self) -> &str {
		&self.host
	}

	async fn connect(&self) -> Result<Connection, BlockChainError> {
		let mut guard = self.connection.lock().await;
		if let Some(connection) = guard.as_ref() {
			return Ok(connection.clone());
		}

		debug!(url = %self.url, "Connecting to substrate node");
		let rpc_client = RpcClient::from_insecure_url(&self.url).await.map_err(|e| {
			BlockChainError::connection_error(format!("{}: {}", self.url, e))
		})?;
		let api = OnlineClient::<PolkadotConfig>::from_rpc_client(rpc_client.clone()).await?;
		let connection = Connection {
			api,
			rpc: LegacyRpcMethods::new(rpc_client),
		};

		*guard = Some(connection.clone());
		Ok(connection)
	}

	/// Reads the free balance (in planck) and the chain properties
	async fn query_account(
		&self,
		account: &AccountId32,
	) -> Result<(u128, Map<String, Value>), BlockChainError> {
		let connection = self.connect().await?;

		let query = subxt::dynamic::storage(
			"System",
			"Account",
			vec![DynamicValue::from_bytes(account.0)],
		);
		let stored = connection
			.api
			.storage()
			.at_latest()
			.await?
			.fetch(&query)
			.await?;

		let free = match stored {
			Some(thunk) => {
				let value = thunk.to_value().map_err(subxt::Error::from)?;
				value
					.at("data")
					.at("free")
					.and_then(|free| free.as_u128())
					.ok_or_else(|| {
						BlockChainError::decode_error("System.Account has no data.free field")
					})?
			}
			// Accounts that never received funds have no storage entry
			None => 0,
		};

		let properties = connection.rpc.system_properties().await.map_err(subxt::Error::from)?;

		Ok((free, properties))
	}
}

#[async_trait]
impl BalanceClient for SubstrateClient {
	#[instrument(skip_all, fields(address = %wallet.address))]
	async fn fetch_balance(
		&self,
		wallet: &Wallet,
		_entry: Option<&ChainRegistryEntry>,
	) -> Result<Vec<BalanceObservation>, BlockChainError> {
		let account = AccountId32::from_str(wallet.address.trim()).map_err(|e| {
			BlockChainError::request_error(format!("Invalid address '{}': {}", wallet.address, e))
		})?;

		let result = self.query_account(&account).await;
		self.tracker
			.record(&self.host, CallStatus::from_result(&result));
		if result.is_err() {
			*self.connection.lock().await = None;
		}

		let (free, properties) = result?;
		let (symbol, decimals) = token_metadata(&properties, self.policy)?;
		let value = scale_integer(free, decimals).map_err(BlockChainError::decode_error)?;

		Ok(vec![BalanceObservation::native(value, symbol)])
	}
}
