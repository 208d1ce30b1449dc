//! Chain metadata registry.
//!
//! Two tables are loaded once at startup: cosmos chains indexed by name and
//! EVM chains indexed by chain id. Neither is ever refreshed. A table whose
//! fetch failed stays empty for the lifetime of the process.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::{
	models::{ChainRegistryEntry, Network, NetworkType},
	services::{blockchain::BlockchainTransport, registry::RegistryError},
};

#[derive(Debug, Deserialize)]
struct CosmosDirectory {
	chains: Vec<CosmosChain>,
}

#[derive(Debug, Deserialize)]
struct CosmosChain {
	name: String,
	#[serde(default)]
	symbol: Option<String>,
	#[serde(default)]
	decimals: Option<u32>,
	#[serde(default)]
	denom: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvmChain {
	chain_id: u64,
	#[serde(default)]
	native_currency: Option<NativeCurrency>,
}

#[derive(Debug, Deserialize)]
struct NativeCurrency {
	#[serde(default)]
	name: Option<String>,
	symbol: String,
	decimals: u32,
}

/// Read-only lookup of chain metadata
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
	cosmos: HashMap<String, ChainRegistryEntry>,
	evm: HashMap<u64, ChainRegistryEntry>,
}

impl ChainRegistry {
	/// Creates a registry from already loaded tables
	pub fn new(
		cosmos: HashMap<String, ChainRegistryEntry>,
		evm: HashMap<u64, ChainRegistryEntry>,
	) -> Self {
		Self { cosmos, evm }
	}

	/// Looks up a cosmos chain by network name
	pub fn resolve(&self, name: &str) -> Option<&ChainRegistryEntry> {
		self.cosmos.get(name)
	}

	/// Looks up an EVM chain by chain id
	pub fn resolve_chain_id(&self, chain_id: u64) -> Option<&ChainRegistryEntry> {
		self.evm.get(&chain_id)
	}

	/// Number of cosmos chains known
	pub fn cosmos_len(&self) -> usize {
		self.cosmos.len()
	}

	/// Number of EVM chains known
	pub fn evm_len(&self) -> usize {
		self.evm.len()
	}

	/// Parses the cosmos chain directory (`{"chains": [{name, symbol, decimals, denom}]}`)
	///
	/// Chains missing any of symbol, decimals or denom are left out.
	pub fn parse_cosmos_directory(
		document: Value,
	) -> Result<HashMap<String, ChainRegistryEntry>, RegistryError> {
		let directory: CosmosDirectory = serde_json::from_value(document)
			.map_err(|e| RegistryError::FormatError(format!("cosmos directory: {}", e)))?;

		Ok(directory
			.chains
			.into_iter()
			.filter_map(|chain| match (chain.symbol, chain.decimals, chain.denom) {
				(Some(symbol), Some(decimals), Some(denom)) => {
					Some((chain.name, ChainRegistryEntry::new(symbol, decimals, denom)))
				}
				_ => None,
			})
			.collect())
	}

	/// Parses the EVM chain list (`[{chainId, nativeCurrency: {name, symbol, decimals}}]`)
	pub fn parse_evm_chains(
		document: Value,
	) -> Result<HashMap<u64, ChainRegistryEntry>, RegistryError> {
		let chains: Vec<EvmChain> = serde_json::from_value(document)
			.map_err(|e| RegistryError::FormatError(format!("EVM chain list: {}", e)))?;

		Ok(chains
			.into_iter()
			.filter_map(|chain| {
				let currency = chain.native_currency?;
				let denom = currency.name.unwrap_or_else(|| currency.symbol.clone());
				Some((
					chain.chain_id,
					ChainRegistryEntry::new(currency.symbol, currency.decimals, denom),
				))
			})
			.collect())
	}

	/// Fetches and parses the cosmos directory
	pub async fn fetch_cosmos<T: BlockchainTransport>(
		transport: &T,
	) -> Result<HashMap<String, ChainRegistryEntry>, RegistryError> {
		let document = transport.get_json("", &[]).await?;
		Self::parse_cosmos_directory(document)
	}

	/// Fetches and parses the EVM chain list
	pub async fn fetch_evm<T: BlockchainTransport>(
		transport: &T,
	) -> Result<HashMap<u64, ChainRegistryEntry>, RegistryError> {
		let document = transport.get_json("", &[]).await?;
		Self::parse_evm_chains(document)
	}

	/// Loads the tables the configured networks need
	///
	/// Failures are logged and leave the affected table empty.
	///
	/// # Arguments
	/// * `cosmos` - Transport bound to the cosmos directory, `None` to skip it
	/// * `evm` - Transport bound to the EVM chain list, `None` to skip it
	///
	/// # Returns
	/// * `Self` - Registry holding whatever could be loaded
	pub async fn load<T: BlockchainTransport>(cosmos: Option<&T>, evm: Option<&T>) -> Self {
		let mut registry = Self::default();

		if let Some(transport) = cosmos {
			match Self::fetch_cosmos(transport).await {
				Ok(table) => {
					info!(chains = table.len(), "Loaded cosmos chain registry");
					registry.cosmos = table;
				}
				Err(e) => error!(error = %e, "Failed to load cosmos chain registry"),
			}
		}

		if let Some(transport) = evm {
			match Self::fetch_evm(transport).await {
				Ok(table) => {
					info!(chains = table.len(), "Loaded EVM chain registry");
					registry.evm = table;
				}
				Err(e) => error!(error = %e, "Failed to load EVM chain registry"),
			}
		}

		registry
	}

	/// Adds the entries cosmos networks declare in configuration
	///
	/// A network declaring both `denom` and `decimals` takes precedence over
	/// the remote table.
	pub fn with_static_entries(mut self, networks: &[Network]) -> Self {
		for network in networks {
			if network.network_type != NetworkType::Cosmos {
				continue;
			}
			if let (Some(denom), Some(decimals)) = (&network.denom, network.decimals) {
				if self.cosmos.contains_key(&network.name) {
					warn!(
						network = %network.name,
						"Configured denom and decimals override the remote registry"
					);
				}
				self.cosmos.insert(
					network.name.clone(),
					ChainRegistryEntry::new(&network.symbol, decimals, denom),
				);
			}
		}
		self
	}
}
