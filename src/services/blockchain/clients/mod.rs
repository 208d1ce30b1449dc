//! Chain client implementations.
//!
//! Contains one client per supported chain family:
//! - Cosmos client for Cosmos SDK REST gateways
//! - EVM client for Ethereum-compatible chains
//! - Bera client for EVM chains with the BGT staking extension
//! - Substrate client for relay chains
//! - Solana and Sui clients for their JSON-RPC APIs
//!
//! Provides a closed enum over the clients, resolved once per network.

mod bera {
	pub mod client;
}
mod cosmos {
	pub mod client;
}
mod evm {
	pub mod client;
}
mod solana {
	pub mod client;
}
mod substrate {
	pub mod client;
}
mod sui {
	pub mod client;
}

use async_trait::async_trait;

pub use bera::client::{BeraClient, BeraClientTrait, BGT_SYMBOL};
pub use cosmos::client::{CosmosClient, CosmosClientTrait};
pub use evm::client::{EvmClient, EvmClientTrait};
pub use solana::client::{decode_token_amount, SolanaClient, SolanaClientTrait};
pub use substrate::client::{token_metadata, SubstrateClient};
pub use sui::client::{SuiClient, SuiClientTrait, SUI_COIN_TYPE};

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, Wallet},
	services::blockchain::{client::BalanceClient, transports::HttpTransportClient, BlockChainError},
};

/// Enum wrapper for the chain client of a network
///
/// Built once per configured network. Variants other than `Unsupported` own
/// a client bound to the network endpoint.
pub enum ChainAdapter {
	/// Cosmos SDK chain
	Cosmos(CosmosClient<HttpTransportClient>),
	/// EVM-compatible chain
	Evm(EvmClient<HttpTransportClient>),
	/// EVM chain with the BGT staking extension
	Bera(BeraClient<HttpTransportClient>),
	/// Substrate relay chain
	Substrate(SubstrateClient),
	/// Solana
	Solana(SolanaClient<HttpTransportClient>),
	/// Sui
	Sui(SuiClient<HttpTransportClient>),
	/// Network type the exporter cannot query, reports a zero balance
	Unsupported {
		/// Configured native symbol
		symbol: String,
	},
}

impl ChainAdapter {
	/// Cosmos staking capabilities, when the network has them
	pub fn as_cosmos(&self) -> Option<&dyn CosmosClientTrait> {
		match self {
			Self::Cosmos(client) => Some(client),
			_ => None,
		}
	}

	/// BGT boost capabilities, when the network has them
	pub fn as_bera(&self) -> Option<&dyn BeraClientTrait> {
		match self {
			Self::Bera(client) => Some(client),
			_ => None,
		}
	}

	/// Endpoint host the adapter's calls are tracked under
	pub fn host(&self) -> Option<&str> {
		match self {
			Self::Cosmos(client) => Some(client.host()),
			Self::Evm(client) => Some(client.host()),
			Self::Bera(client) => Some(client.host()),
			Self::Substrate(client) => Some(client.host()),
			Self::Solana(client) => Some(client.host()),
			Self::Sui(client) => Some(client.host()),
			Self::Unsupported { .. } => None,
		}
	}
}

#[async_trait]
impl BalanceClient for ChainAdapter {
	/// Delegates the balance request to the specific client implementation
	async fn fetch_balance(
		&self,
		wallet: &Wallet,
		entry: Option<&ChainRegistryEntry>,
	) -> Result<Vec<BalanceObservation>, BlockChainError> {
		match self {
			Self::Cosmos(client) => client.fetch_balance(wallet, entry).await,
			Self::Evm(client) => client.fetch_balance(wallet, entry).await,
			Self::Bera(client) => client.fetch_balance(wallet, entry).await,
			Self::Substrate(client) => client.fetch_balance(wallet, entry).await,
			Self::Solana(client) => client.fetch_balance(wallet, entry).await,
			Self::Sui(client) => client.fetch_balance(wallet, entry).await,
			Self::Unsupported { symbol } => Ok(vec![BalanceObservation::zero(symbol)]),
		}
	}
}
