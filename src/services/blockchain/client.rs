//! Core chain client interface.
//!
//! Every chain family implements [`BalanceClient`]; families with extra
//! positions (cosmos staking, bera boosts) expose them through their own
//! traits next to the client.

use async_trait::async_trait;

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, Wallet},
	services::blockchain::BlockChainError,
};

/// Defines the balance query every chain client supports
#[async_trait]
pub trait BalanceClient: Send + Sync {
	/// Reads the balances held by a wallet
	///
	/// # Arguments
	/// * `wallet` - Wallet to query, including its optional token contract
	/// * `entry` - Registry metadata for the network, when the family needs it
	///
	/// # Returns
	/// * `Result<Vec<BalanceObservation>, BlockChainError>` - One observation per
	///   asset found, already decimal-adjusted
	async fn fetch_balance(
		&self,
		wallet: &Wallet,
		entry: Option<&ChainRegistryEntry>,
	) -> Result<Vec<BalanceObservation>, BlockChainError>;
}
