//! Bootstrap module for initializing the exporter.
//!
//! This module turns a validated configuration and the runtime settings into a
//! ready-to-run [`ExporterService`]: it loads the chain registry tables the
//! configured networks need, builds one adapter per network and wires the
//! metrics sink in.
//!
//! # Steps
//! - `load_registry`: Fetches the remote registry tables and merges static entries
//! - `build_targets`: Creates the adapter of every configured network
//! - `initialize_exporter`: Composes both into the exporter service

use std::{error::Error, sync::Arc};
use tracing::{error, info, instrument};

use crate::{
	models::{ExporterConfig, ExporterSettings, Network, NetworkType},
	services::{
		blockchain::{create_chain_adapter, AdapterContext, CallTracker, HttpTransportClient},
		exporter::{ExporterService, MetricsSink, NetworkTarget},
		registry::ChainRegistry,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Loads the registry tables required by `networks`
///
/// The cosmos directory is only fetched when a cosmos network is configured,
/// the EVM chain list only when an evm or bera network is. Fetch failures are
/// logged and leave the affected table empty.
///
/// # Arguments
/// * `networks` - Configured networks
/// * `settings` - Registry URLs and HTTP timeout
/// * `tracker` - Receives the outcome of the registry calls
///
/// # Returns
/// * `Result<ChainRegistry>` - Registry, or an error if a transport could not be built
#[instrument(skip_all)]
pub async fn load_registry(
	networks: &[Network],
	settings: &ExporterSettings,
	tracker: Arc<dyn CallTracker>,
) -> Result<ChainRegistry> {
	let needs_cosmos = networks
		.iter()
		.any(|network| network.network_type.uses_cosmos_registry());
	let needs_evm = networks
		.iter()
		.any(|network| network.network_type.uses_chain_id_registry());

	let cosmos = if needs_cosmos {
		Some(HttpTransportClient::new(
			&settings.cosmos_registry_url,
			settings.http_timeout,
			tracker.clone(),
		)?)
	} else {
		None
	};
	let evm = if needs_evm {
		Some(HttpTransportClient::new(
			&settings.evm_chains_url,
			settings.http_timeout,
			tracker,
		)?)
	} else {
		None
	};

	let registry = ChainRegistry::load(cosmos.as_ref(), evm.as_ref())
		.await
		.with_static_entries(networks);

	info!(
		cosmos_chains = registry.cosmos_len(),
		evm_chains = registry.evm_len(),
		"Chain registry ready"
	);
	Ok(registry)
}

/// Creates the adapter of every network
///
/// A network whose adapter cannot be built is logged and left out.
///
/// # Arguments
/// * `networks` - Configured networks, in configuration order
/// * `context` - Shared adapter dependencies
///
/// # Returns
/// * `Vec<NetworkTarget>` - Networks paired with their adapters
pub fn build_targets(networks: Vec<Network>, context: &AdapterContext) -> Vec<NetworkTarget> {
	networks
		.into_iter()
		.filter_map(|network| match create_chain_adapter(&network, context) {
			Ok(adapter) => Some(NetworkTarget::new(network, adapter)),
			Err(e) => {
				error!(
					network = %network.name,
					error = %e,
					"Failed to create adapter, network skipped"
				);
				None
			}
		})
		.collect()
}

/// Initializes the exporter service
///
/// # Arguments
/// * `config` - Validated configuration
/// * `settings` - Runtime settings
/// * `sink` - Destination of the metric records
/// * `tracker` - Receives the outcome of every outbound call
///
/// # Returns
/// * `Result<ExporterService>` - Service ready to run
///
/// # Errors
/// Returns an error if the HTTP client cannot be built
pub async fn initialize_exporter(
	config: ExporterConfig,
	settings: &ExporterSettings,
	sink: Arc<dyn MetricsSink>,
	tracker: Arc<dyn CallTracker>,
) -> Result<ExporterService> {
	let registry = Arc::new(load_registry(&config.networks, settings, tracker.clone()).await?);

	let context = AdapterContext::new(
		settings.http_timeout,
		tracker,
		registry.clone(),
		settings.missing_metadata_policy,
	)?;

	let targets = build_targets(config.networks, &context);
	let unsupported = targets
		.iter()
		.filter(|target| target.network.network_type == NetworkType::Unsupported)
		.count();
	info!(
		networks = targets.len(),
		unsupported,
		"Exporter initialized"
	);

	Ok(ExporterService::new(
		targets,
		registry,
		sink,
		settings.polling_interval,
	))
}
