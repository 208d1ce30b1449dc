//! Sui client implementation.
//!
//! Balances are read with `suix_getAllBalances`. SUI itself is reported in
//! display units; other coin types are reported as returned by the node.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, Wallet},
	services::blockchain::{
		client::BalanceClient,
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
	utils::parsing::{parse_decimal_amount, scale_decimal},
};

/// Coin type of the native asset
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Symbol of the native asset
pub const SUI_SYMBOL: &str = "SUI";

/// MIST per SUI, as a decimal exponent
pub const SUI_DECIMALS: u32 = 9;

/// Symbol used when a coin type has no `::` separated name
const UNKNOWN_COIN_SYMBOL: &str = "UNKNOWN";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinBalance {
	coin_type: String,
	total_balance: Value,
}

/// Balance amounts are strings on current nodes, numbers on older ones
fn parse_balance(value: &Value) -> Result<Decimal, BlockChainError> {
	let amount = match value {
		Value::String(amount) => amount.clone(),
		Value::Number(amount) => amount.to_string(),
		other => {
			return Err(BlockChainError::decode_error(format!(
				"Invalid totalBalance: {}",
				other
			)))
		}
	};
	parse_decimal_amount(&amount).map_err(BlockChainError::decode_error)
}

/// Display symbol for a coin type: the segment after the last `::`
fn coin_symbol(coin_type: &str) -> &str {
	match coin_type.rsplit_once("::") {
		Some((_, name)) if !name.is_empty() => name,
		_ => UNKNOWN_COIN_SYMBOL,
	}
}

fn to_observation(balance: &CoinBalance) -> Result<BalanceObservation, BlockChainError> {
	let raw = parse_balance(&balance.total_balance)?;

	if balance.coin_type == SUI_COIN_TYPE {
		let value = scale_decimal(raw, SUI_DECIMALS).map_err(BlockChainError::decode_error)?;
		Ok(BalanceObservation::native(value, SUI_SYMBOL))
	} else {
		Ok(BalanceObservation::fungible(
			raw,
			coin_symbol(&balance.coin_type),
		))
	}
}

fn take_result(response: Value, method: &str) -> Result<Value, BlockChainError> {
	match response {
		Value::Object(mut body) => body.remove("result").ok_or_else(|| {
			BlockChainError::request_error(format!("Invalid response from Sui RPC ({})", method))
		}),
		_ => Err(BlockChainError::request_error(format!(
			"Invalid response from Sui RPC ({})",
			method
		))),
	}
}

/// Client implementation for Sui
#[derive(Clone)]
pub struct SuiClient<T: Send + Sync + Clone> {
	/// The underlying transport for JSON-RPC communication
	http_client: T,
}

impl<T: Send + Sync + Clone> SuiClient<T> {
	/// Creates a new Sui client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}
}

impl SuiClient<HttpTransportClient> {
	/// Endpoint host calls are tracked under
	pub fn host(&self) -> &str {
		self.http_client.host()
	}
}

/// Extended functionality specific to Sui
#[async_trait]
pub trait SuiClientTrait: BalanceClient {
	/// Reads only the SUI balance of `address` with `suix_getBalance`
	async fn fetch_native_balance(&self, address: &str)
		-> Result<BalanceObservation, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> SuiClientTrait for SuiClient<T> {
	#[instrument(skip(self))]
	async fn fetch_native_balance(
		&self,
		address: &str,
	) -> Result<BalanceObservation, BlockChainError> {
		let response = self
			.http_client
			.send_raw_request("suix_getBalance", Some(json!([address, SUI_COIN_TYPE])))
			.await?;
		let result = take_result(response, "suix_getBalance")?;
		let balance: CoinBalance = serde_json::from_value(result).map_err(|e| {
			BlockChainError::decode_error(format!("Unexpected suix_getBalance result: {}", e))
		})?;

		to_observation(&balance)
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BalanceClient for SuiClient<T> {
	#[instrument(skip_all, fields(address = %wallet.address))]
	async fn fetch_balance(
		&self,
		wallet: &Wallet,
		_entry: Option<&ChainRegistryEntry>,
	) -> Result<Vec<BalanceObservation>, BlockChainError> {
		let response = self
			.http_client
			.send_raw_request("suix_getAllBalances", Some(json!([wallet.address])))
			.await?;
		let result = take_result(response, "suix_getAllBalances")?;
		let balances: Vec<CoinBalance> = serde_json::from_value(result).map_err(|e| {
			BlockChainError::decode_error(format!("Unexpected suix_getAllBalances result: {}", e))
		})?;

		if balances.is_empty() {
			return Ok(vec![BalanceObservation::zero(SUI_SYMBOL)]);
		}

		balances.iter().map(to_observation).collect()
	}
}
