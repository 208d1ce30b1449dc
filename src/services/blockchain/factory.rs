//! Chain adapter factory implementation.
//!
//! This module builds the adapter for a configured network based on its
//! type. Adapters share one HTTP client, one call tracker and the registry
//! resolved at startup.

use reqwest::{Client, ClientBuilder};
use std::{sync::Arc, time::Duration};

use crate::{
	models::{MissingMetadataPolicy, Network, NetworkType},
	services::{
		blockchain::{
			clients::{
				BeraClient, ChainAdapter, CosmosClient, EvmClient, SolanaClient, SubstrateClient,
				SuiClient,
			},
			transports::{CallTracker, HttpTransportClient},
			BlockChainError,
		},
		registry::ChainRegistry,
	},
};

/// Shared dependencies handed to every adapter
#[derive(Clone)]
pub struct AdapterContext {
	/// HTTP client carrying the request timeout
	pub client: Client,
	/// Receives the outcome of every outbound call
	pub tracker: Arc<dyn CallTracker>,
	/// Registry resolved at startup
	pub registry: Arc<ChainRegistry>,
	/// Handling of absent symbol/decimals
	pub policy: MissingMetadataPolicy,
}

impl AdapterContext {
	/// Creates a context with a fresh HTTP client
	///
	/// # Arguments
	/// * `timeout` - Per-request timeout
	/// * `tracker` - Receives call outcomes
	/// * `registry` - Registry resolved at startup
	/// * `policy` - Handling of absent symbol/decimals
	pub fn new(
		timeout: Duration,
		tracker: Arc<dyn CallTracker>,
		registry: Arc<ChainRegistry>,
		policy: MissingMetadataPolicy,
	) -> Result<Self, BlockChainError> {
		let client = ClientBuilder::new().timeout(timeout).build().map_err(|e| {
			BlockChainError::internal_error(format!("Failed to build HTTP client: {}", e))
		})?;

		Ok(Self {
			client,
			tracker,
			registry,
			policy,
		})
	}

	fn transport(&self, url: &str) -> HttpTransportClient {
		HttpTransportClient::with_client(self.client.clone(), url, self.tracker.clone())
	}
}

/// Creates the adapter for a network based on its type
///
/// # Arguments
/// * `network` - Network configuration containing the type and endpoints
/// * `context` - Shared dependencies
///
/// # Returns
/// * `Result<ChainAdapter, BlockChainError>` - Adapter bound to the network endpoint
pub fn create_chain_adapter(
	network: &Network,
	context: &AdapterContext,
) -> Result<ChainAdapter, BlockChainError> {
	let endpoint = network.endpoint();

	match network.network_type {
		NetworkType::Cosmos => Ok(ChainAdapter::Cosmos(CosmosClient::new_with_transport(
			context.transport(endpoint),
		))),
		NetworkType::Evm => Ok(ChainAdapter::Evm(EvmClient::new_with_transport(
			context.transport(endpoint),
			context.registry.clone(),
			context.policy,
		))),
		NetworkType::Bera => {
			let bgt_address = network.bgt_address.as_deref().ok_or_else(|| {
				BlockChainError::internal_error(format!(
					"bera network {} has no bgt_address",
					network.name
				))
			})?;
			let evm = EvmClient::new_with_transport(
				context.transport(endpoint),
				context.registry.clone(),
				context.policy,
			);
			Ok(ChainAdapter::Bera(BeraClient::new(evm, bgt_address)))
		}
		NetworkType::Substrate => Ok(ChainAdapter::Substrate(SubstrateClient::new(
			endpoint,
			context.tracker.clone(),
			context.policy,
		))),
		NetworkType::Solana => Ok(ChainAdapter::Solana(SolanaClient::new_with_transport(
			context.transport(endpoint),
		))),
		NetworkType::Sui => Ok(ChainAdapter::Sui(SuiClient::new_with_transport(
			context.transport(endpoint),
		))),
		NetworkType::Unsupported => Ok(ChainAdapter::Unsupported {
			symbol: network.symbol.clone(),
		}),
	}
}
