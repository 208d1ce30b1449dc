use serde::{Deserialize, Serialize};

use crate::models::NetworkType;

/// Configuration for a single network and the wallets watched on it
///
/// Networks are loaded once from the exporter configuration file and stay
/// read-only for the lifetime of the process.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Network {
	/// Display name, unique within a run and used as the `network` label
	pub name: String,

	/// Chain family, selects the adapter
	#[serde(rename = "type")]
	pub network_type: NetworkType,

	/// REST gateway or JSON-RPC endpoint used by most adapters
	pub api: String,

	/// RPC endpoint (used by Solana and Sui)
	pub rpc: String,

	/// Display symbol of the native asset
	pub symbol: String,

	/// Fixed decimal exponent, pairs with `denom` to bypass the remote registry
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub decimals: Option<u32>,

	/// Native denomination on cosmos chains
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub denom: Option<String>,

	/// BGT contract address on bera networks
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bgt_address: Option<String>,

	/// Wallets to export
	pub wallets: Vec<Wallet>,
}

/// A watched wallet
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Wallet {
	/// Display name, exported as the `name` label
	pub name: String,

	/// On-chain address, passed through to the chain unvalidated
	pub address: String,

	/// Fungible token contract to read alongside the native balance (EVM families)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub contract_address: Option<String>,
}

impl Network {
	/// Endpoint the adapter for this network talks to
	pub fn endpoint(&self) -> &str {
		match self.network_type {
			NetworkType::Solana | NetworkType::Sui => &self.rpc,
			_ => &self.api,
		}
	}
}
