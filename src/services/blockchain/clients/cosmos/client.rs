//! Cosmos SDK client implementation.
//!
//! Reads bank balances, staking positions and distribution rewards through a
//! chain's REST gateway. Bank balance, delegation and unbonding listings are
//! paginated with `pagination.key` until the gateway stops returning a `next_key`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, Wallet},
	services::blockchain::{
		client::BalanceClient,
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
	utils::parsing::{parse_decimal_amount, scale_decimal},
};

#[derive(Debug, Deserialize)]
struct Coin {
	denom: String,
	amount: String,
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
	#[serde(default)]
	next_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalancesPage {
	#[serde(default)]
	balances: Vec<Coin>,
	#[serde(default)]
	pagination: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct DelegationsPage {
	delegation_responses: Vec<DelegationEntry>,
	#[serde(default)]
	pagination: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct DelegationEntry {
	balance: Coin,
}

#[derive(Debug, Deserialize)]
struct UnbondingPage {
	unbonding_responses: Vec<UnbondingDelegation>,
	#[serde(default)]
	pagination: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct UnbondingDelegation {
	entries: Vec<UnbondingEntry>,
}

#[derive(Debug, Deserialize)]
struct UnbondingEntry {
	balance: String,
}

#[derive(Debug, Deserialize)]
struct RewardsResponse {
	#[serde(default)]
	total: Vec<Coin>,
}

/// A page of a paginated cosmos listing
trait Page: DeserializeOwned + Send {
	fn next_key(&self) -> Option<&str>;
}

impl Page for BalancesPage {
	fn next_key(&self) -> Option<&str> {
		self.pagination.as_ref().and_then(|p| p.next_key.as_deref())
	}
}

impl Page for DelegationsPage {
	fn next_key(&self) -> Option<&str> {
		self.pagination.as_ref().and_then(|p| p.next_key.as_deref())
	}
}

impl Page for UnbondingPage {
	fn next_key(&self) -> Option<&str> {
		self.pagination.as_ref().and_then(|p| p.next_key.as_deref())
	}
}

fn decode<P: DeserializeOwned>(value: Value, path: &str) -> Result<P, BlockChainError> {
	serde_json::from_value(value).map_err(|e| {
		BlockChainError::decode_error(format!("Unexpected response from {}: {}", path, e))
	})
}

fn parse_amount(amount: &str) -> Result<Decimal, BlockChainError> {
	parse_decimal_amount(amount).map_err(BlockChainError::decode_error)
}

fn adjust(raw: Decimal, entry: &ChainRegistryEntry) -> Result<Decimal, BlockChainError> {
	scale_decimal(raw, entry.decimals).map_err(BlockChainError::decode_error)
}

/// Picks the coin matching `denom` and converts it to display units
fn select_denom(coins: &[Coin], entry: &ChainRegistryEntry) -> Result<Decimal, BlockChainError> {
	match coins.iter().find(|coin| coin.denom == entry.denom) {
		Some(coin) => adjust(parse_amount(&coin.amount)?, entry),
		None => Ok(Decimal::ZERO),
	}
}

/// Client implementation for Cosmos SDK chains
///
/// Talks to the REST gateway configured as the network's `api` endpoint.
#[derive(Clone)]
pub struct CosmosClient<T: Send + Sync + Clone> {
	/// The underlying HTTP transport for REST calls
	http_client: T,
}

impl<T: Send + Sync + Clone> CosmosClient<T> {
	/// Creates a new Cosmos client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}
}

impl CosmosClient<HttpTransportClient> {
	/// Endpoint host calls are tracked under
	pub fn host(&self) -> &str {
		self.http_client.host()
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> CosmosClient<T> {
	/// Walks every page of a paginated listing
	async fn fetch_pages<P: Page>(&self, path: &str) -> Result<Vec<P>, BlockChainError> {
		let mut pages = Vec::new();
		let mut next_key: Option<String> = None;

		loop {
			let response = match next_key.as_deref() {
				Some(key) => {
					self.http_client
						.get_json(path, &[("pagination.key", key)])
						.await?
				}
				None => self.http_client.get_json(path, &[]).await?,
			};
			let page: P = decode(response, path)?;

			next_key = page
				.next_key()
				.filter(|key| !key.is_empty())
				.map(str::to_string);
			pages.push(page);

			if next_key.is_none() {
				break;
			}
			debug!(path, pages = pages.len(), "Fetching next page");
		}

		Ok(pages)
	}

	async fn fetch_bank_balances(&self, address: &str) -> Result<Vec<Coin>, BlockChainError> {
		let path = format!("/cosmos/bank/v1beta1/balances/{}", address);
		let pages: Vec<BalancesPage> = self.fetch_pages(&path).await?;
		Ok(pages.into_iter().flat_map(|page| page.balances).collect())
	}
}

/// Staking and distribution queries specific to Cosmos SDK chains
#[async_trait]
pub trait CosmosClientTrait: BalanceClient {
	/// Sums every delegation of `address` held in the registry denom
	///
	/// # Arguments
	/// * `address` - Delegator address
	/// * `entry` - Registry metadata for the chain
	///
	/// # Returns
	/// * `Result<BalanceObservation, BlockChainError>` - Total delegated amount
	async fn fetch_delegations(
		&self,
		address: &str,
		entry: &ChainRegistryEntry,
	) -> Result<BalanceObservation, BlockChainError>;

	/// Sums every unbonding entry of `address`
	async fn fetch_unbonding_delegations(
		&self,
		address: &str,
		entry: &ChainRegistryEntry,
	) -> Result<BalanceObservation, BlockChainError>;

	/// Reads pending distribution rewards of `address` in the registry denom
	async fn fetch_rewards(
		&self,
		address: &str,
		entry: &ChainRegistryEntry,
	) -> Result<BalanceObservation, BlockChainError>;

	/// Reads every bank balance of `address` in smallest units, keyed by denom
	async fn fetch_all_balances(
		&self,
		address: &str,
	) -> Result<HashMap<String, Decimal>, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BalanceClient for CosmosClient<T> {
	#[instrument(skip_all, fields(address = %wallet.address))]
	async fn fetch_balance(
		&self,
		wallet: &Wallet,
		entry: Option<&ChainRegistryEntry>,
	) -> Result<Vec<BalanceObservation>, BlockChainError> {
		let entry = entry.ok_or_else(|| {
			BlockChainError::metadata_not_found("cosmos balance requires a registry entry")
		})?;

		let balances = self.fetch_bank_balances(&wallet.address).await?;
		let value = select_denom(&balances, entry)?;

		Ok(vec![BalanceObservation::native(value, &entry.symbol)])
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> CosmosClientTrait for CosmosClient<T> {
	#[instrument(skip(self, entry))]
	async fn fetch_delegations(
		&self,
		address: &str,
		entry: &ChainRegistryEntry,
	) -> Result<BalanceObservation, BlockChainError> {
		let path = format!("/cosmos/staking/v1beta1/delegations/{}", address);
		let pages: Vec<DelegationsPage> = self.fetch_pages(&path).await?;

		let mut total = Decimal::ZERO;
		for delegation in pages.iter().flat_map(|page| &page.delegation_responses) {
			if delegation.balance.denom == entry.denom {
				total += parse_amount(&delegation.balance.amount)?;
			}
		}

		Ok(BalanceObservation::native(adjust(total, entry)?, &entry.symbol))
	}

	#[instrument(skip(self, entry))]
	async fn fetch_unbonding_delegations(
		&self,
		address: &str,
		entry: &ChainRegistryEntry,
	) -> Result<BalanceObservation, BlockChainError> {
		let path = format!(
			"/cosmos/staking/v1beta1/delegators/{}/unbonding_delegations",
			address
		);
		let pages: Vec<UnbondingPage> = self.fetch_pages(&path).await?;

		let mut total = Decimal::ZERO;
		for unbonding in pages.iter().flat_map(|page| &page.unbonding_responses) {
			for unbonding_entry in &unbonding.entries {
				total += parse_amount(&unbonding_entry.balance)?;
			}
		}

		Ok(BalanceObservation::native(adjust(total, entry)?, &entry.symbol))
	}

	#[instrument(skip(self, entry))]
	async fn fetch_rewards(
		&self,
		address: &str,
		entry: &ChainRegistryEntry,
	) -> Result<BalanceObservation, BlockChainError> {
		let path = format!("/cosmos/distribution/v1beta1/delegators/{}/rewards", address);
		let response = self.http_client.get_json(&path, &[]).await?;
		let rewards: RewardsResponse = decode(response, &path)?;

		Ok(BalanceObservation::native(
			select_denom(&rewards.total, entry)?,
			&entry.symbol,
		))
	}

	#[instrument(skip(self))]
	async fn fetch_all_balances(
		&self,
		address: &str,
	) -> Result<HashMap<String, Decimal>, BlockChainError> {
		let mut balances = HashMap::new();
		for coin in self.fetch_bank_balances(address).await? {
			let amount = parse_amount(&coin.amount)?;
			*balances.entry(coin.denom).or_insert(Decimal::ZERO) += amount;
		}
		Ok(balances)
	}
}
