//! Balance aggregation loop.
//!
//! On every tick of the polling interval the service walks every configured
//! network and wallet in order, asks the network's adapter for each metric
//! kind and publishes what comes back. Failures are logged per wallet and
//! metric kind; the affected series keeps its previous value.

use std::{future::Future, sync::Arc, time::Duration};
use tokio::{
	sync::watch,
	time::{interval, Instant, MissedTickBehavior},
};
use tracing::{error, info, instrument, warn};

use crate::{
	models::{BalanceObservation, ChainRegistryEntry, MetricKind, MetricRecord, Network, Wallet},
	services::{
		blockchain::{BalanceClient, BlockChainError, ChainAdapter},
		exporter::MetricsSink,
		registry::ChainRegistry,
	},
};

/// A configured network together with its adapter
pub struct NetworkTarget {
	pub network: Network,
	pub adapter: ChainAdapter,
}

impl NetworkTarget {
	pub fn new(network: Network, adapter: ChainAdapter) -> Self {
		Self { network, adapter }
	}
}

/// Outcome counts of one polling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
	/// Records handed to the sink
	pub published: usize,
	/// Metric kinds that failed for a wallet
	pub failed: usize,
	/// Networks skipped because their registry entry is missing
	pub skipped_networks: usize,
}

impl CycleSummary {
	fn merge(&mut self, other: CycleSummary) {
		self.published += other.published;
		self.failed += other.failed;
		self.skipped_networks += other.skipped_networks;
	}
}

/// Drives the polling loop over every configured network
pub struct ExporterService {
	targets: Vec<NetworkTarget>,
	registry: Arc<ChainRegistry>,
	sink: Arc<dyn MetricsSink>,
	polling_interval: Duration,
}

impl ExporterService {
	/// Creates a new exporter service
	///
	/// # Arguments
	/// * `targets` - Networks to poll, in configuration order
	/// * `registry` - Registry resolved at startup
	/// * `sink` - Destination of the metric records
	/// * `polling_interval` - Time between the start of two passes
	pub fn new(
		targets: Vec<NetworkTarget>,
		registry: Arc<ChainRegistry>,
		sink: Arc<dyn MetricsSink>,
		polling_interval: Duration,
	) -> Self {
		Self {
			targets,
			registry,
			sink,
			polling_interval,
		}
	}

	/// Runs passes until `shutdown` flips to `true`
	///
	/// The first pass starts immediately. A pass that outlasts the polling
	/// interval delays the next one instead of triggering a burst.
	pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
		let mut ticker = interval(self.polling_interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		info!(
			networks = self.targets.len(),
			interval_secs = self.polling_interval.as_secs(),
			"Exporter loop started"
		);

		loop {
			tokio::select! {
				_ = ticker.tick() => {
					self.run_pass(shutdown.changed()).await;
				}
				_ = shutdown.changed() => {
					info!("Exporter loop stopped");
					return;
				}
			}

			if *shutdown.borrow() {
				info!("Exporter loop stopped");
				return;
			}
		}
	}

	/// Runs one pass, abandoning it when `cancelled` resolves
	async fn run_pass<F: Future>(&self, cancelled: F) {
		tokio::select! {
			_ = self.fetch_all() => {}
			_ = cancelled => {
				warn!("Pass interrupted by shutdown");
			}
		}
	}

	/// Runs one full pass over every network and wallet
	///
	/// # Returns
	/// * `CycleSummary` - What was published, what failed and what was skipped
	#[instrument(skip_all)]
	pub async fn fetch_all(&self) -> CycleSummary {
		let started = Instant::now();
		let mut summary = CycleSummary::default();

		for target in &self.targets {
			summary.merge(self.fetch_network(target).await);
		}

		info!(
			published = summary.published,
			failed = summary.failed,
			skipped_networks = summary.skipped_networks,
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Pass complete"
		);
		summary
	}

	#[instrument(skip_all, fields(network = %target.network.name))]
	async fn fetch_network(&self, target: &NetworkTarget) -> CycleSummary {
		let network = &target.network;

		let entry = if network.network_type.uses_cosmos_registry() {
			match self.registry.resolve(&network.name) {
				Some(entry) => Some(entry),
				None => {
					error!("Cannot find chain {} in cosmos registry", network.name);
					return CycleSummary {
						skipped_networks: 1,
						..CycleSummary::default()
					};
				}
			}
		} else {
			None
		};

		let mut summary = CycleSummary::default();
		for wallet in &network.wallets {
			summary.merge(self.fetch_wallet(target, wallet, entry).await);
		}
		summary
	}

	/// Collects every metric kind for one wallet, each independently
	async fn fetch_wallet(
		&self,
		target: &NetworkTarget,
		wallet: &Wallet,
		entry: Option<&ChainRegistryEntry>,
	) -> CycleSummary {
		let network = &target.network;
		let address = wallet.address.as_str();
		let mut summary = CycleSummary::default();

		let balance = target.adapter.fetch_balance(wallet, entry).await;
		self.publish(network, wallet, MetricKind::Balance, balance, &mut summary);

		if let (Some(cosmos), Some(entry)) = (target.adapter.as_cosmos(), entry) {
			let delegations = cosmos.fetch_delegations(address, entry).await;
			self.publish_one(network, wallet, MetricKind::Delegations, delegations, &mut summary);

			let unbonding = cosmos.fetch_unbonding_delegations(address, entry).await;
			self.publish_one(
				network,
				wallet,
				MetricKind::UnbondingDelegations,
				unbonding,
				&mut summary,
			);

			let rewards = cosmos.fetch_rewards(address, entry).await;
			self.publish_one(network, wallet, MetricKind::Rewards, rewards, &mut summary);
		}

		if let Some(bera) = target.adapter.as_bera() {
			let boosts = bera.fetch_boosts(address).await;
			self.publish_one(network, wallet, MetricKind::Boosts, boosts, &mut summary);

			let boostees = bera.fetch_boostees(address).await;
			self.publish_one(network, wallet, MetricKind::Boostees, boostees, &mut summary);

			let unboosted = bera.fetch_unboosted(address).await;
			self.publish_one(network, wallet, MetricKind::Unboosted, unboosted, &mut summary);

			let queued = bera.fetch_queued_boost(address).await;
			self.publish_one(network, wallet, MetricKind::QueuedBoost, queued, &mut summary);
		}

		summary
	}

	fn publish_one(
		&self,
		network: &Network,
		wallet: &Wallet,
		kind: MetricKind,
		result: Result<BalanceObservation, BlockChainError>,
		summary: &mut CycleSummary,
	) {
		self.publish(network, wallet, kind, result.map(|o| vec![o]), summary);
	}

	fn publish(
		&self,
		network: &Network,
		wallet: &Wallet,
		kind: MetricKind,
		result: Result<Vec<BalanceObservation>, BlockChainError>,
		summary: &mut CycleSummary,
	) {
		match result {
			Ok(observations) => {
				for observation in &observations {
					let record = MetricRecord::new(network, wallet, kind, observation);
					self.sink.publish(&record);
					summary.published += 1;
				}
			}
			Err(e) => {
				error!(
					network = %network.name,
					wallet = %wallet.name,
					address = %wallet.address,
					metric = %kind,
					error = %e,
					"Failed to fetch {} for {}",
					kind,
					wallet.address
				);
				summary.failed += 1;
			}
		}
	}
}
