//! Berachain client implementation.
//!
//! Bera networks are EVM chains whose BGT governance token carries boost
//! bookkeeping. Balances are read through the EVM client; the four boost
//! positions are read from the configured BGT contract.

use alloy::{primitives::U256, sol, sol_types::SolCall};
use async_trait::async_trait;
use tracing::instrument;

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, Wallet},
	services::blockchain::{
		client::BalanceClient,
		clients::evm::client::{parse_address, u256_to_decimal, EvmClient},
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
};

/// Symbol reported for every boost position
pub const BGT_SYMBOL: &str = "BGT";

/// Decimals of the BGT token
pub const BGT_DECIMALS: u32 = 18;

sol! {
	interface IBGT {
		function boosts(address account) external view returns (uint256);
		function boostees(address account) external view returns (uint256);
		function unboostedBalanceOf(address account) external view returns (uint256);
		function queuedBoost(address account) external view returns (uint256);
	}
}

/// Client implementation for Berachain networks
#[derive(Clone)]
pub struct BeraClient<T: Send + Sync + Clone> {
	/// EVM client used for native balances and raw contract calls
	evm: EvmClient<T>,
	/// BGT contract address
	bgt_address: String,
}

impl<T: Send + Sync + Clone> BeraClient<T> {
	/// Creates a new Bera client on top of an EVM client
	///
	/// # Arguments
	/// * `evm` - EVM client bound to the network endpoint
	/// * `bgt_address` - Address of the BGT contract
	pub fn new(evm: EvmClient<T>, bgt_address: impl Into<String>) -> Self {
		Self {
			evm,
			bgt_address: bgt_address.into(),
		}
	}
}

impl BeraClient<HttpTransportClient> {
	/// Endpoint host calls are tracked under
	pub fn host(&self) -> &str {
		self.evm.host()
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> BeraClient<T> {
	async fn read_position<C>(&self, call: C) -> Result<BalanceObservation, BlockChainError>
	where
		C: SolCall<Return = U256> + Send,
	{
		let data = self
			.evm
			.call_contract(&self.bgt_address, call.abi_encode())
			.await?;
		let raw = C::abi_decode_returns(&data)?;

		Ok(BalanceObservation::fungible(
			u256_to_decimal(raw, BGT_DECIMALS)?,
			BGT_SYMBOL,
		))
	}
}

/// Boost positions held on the BGT contract
#[async_trait]
pub trait BeraClientTrait: BalanceClient {
	/// BGT boosting validators on behalf of `address`
	async fn fetch_boosts(&self, address: &str) -> Result<BalanceObservation, BlockChainError>;

	/// BGT boost attributed to `address` as a validator
	async fn fetch_boostees(&self, address: &str) -> Result<BalanceObservation, BlockChainError>;

	/// BGT held by `address` that is not committed to any boost
	async fn fetch_unboosted(&self, address: &str)
		-> Result<BalanceObservation, BlockChainError>;

	/// BGT queued for boosting but not yet activated
	async fn fetch_queued_boost(
		&self,
		address: &str,
	) -> Result<BalanceObservation, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BeraClientTrait for BeraClient<T> {
	#[instrument(skip(self))]
	async fn fetch_boosts(&self, address: &str) -> Result<BalanceObservation, BlockChainError> {
		let account = parse_address(address)?;
		self.read_position(IBGT::boostsCall { account }).await
	}

	#[instrument(skip(self))]
	async fn fetch_boostees(&self, address: &str) -> Result<BalanceObservation, BlockChainError> {
		let account = parse_address(address)?;
		self.read_position(IBGT::boosteesCall { account }).await
	}

	#[instrument(skip(self))]
	async fn fetch_unboosted(
		&self,
		address: &str,
	) -> Result<BalanceObservation, BlockChainError> {
		let account = parse_address(address)?;
		self.read_position(IBGT::unboostedBalanceOfCall { account })
			.await
	}

	#[instrument(skip(self))]
	async fn fetch_queued_boost(
		&self,
		address: &str,
	) -> Result<BalanceObservation, BlockChainError> {
		let account = parse_address(address)?;
		self.read_position(IBGT::queuedBoostCall { account }).await
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BalanceClient for BeraClient<T> {
	async fn fetch_balance(
		&self,
		wallet: &Wallet,
		entry: Option<&ChainRegistryEntry>,
	) -> Result<Vec<BalanceObservation>, BlockChainError> {
		self.evm.fetch_balance(wallet, entry).await
	}
}
