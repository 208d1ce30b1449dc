use rust_decimal::prelude::ToPrimitive;
use std::fmt;

use crate::models::{BalanceObservation, Network, TokenType, Wallet};

/// The kind of position a metric record describes, exported as the `type` label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
	Balance,
	Delegations,
	UnbondingDelegations,
	Rewards,
	Boosts,
	Boostees,
	Unboosted,
	QueuedBoost,
}

impl MetricKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Balance => "balance",
			Self::Delegations => "delegations",
			Self::UnbondingDelegations => "unbonding_delegations",
			Self::Rewards => "rewards",
			Self::Boosts => "boosts",
			Self::Boostees => "boostees",
			Self::Unboosted => "unboosted",
			Self::QueuedBoost => "queued_boost",
		}
	}
}

impl fmt::Display for MetricKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Normalized metric ready to be published
///
/// Records are built right before publishing, one per successful observation,
/// and are not kept afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
	pub address: String,
	pub name: String,
	pub network: String,
	pub kind: MetricKind,
	pub token: String,
	pub token_type: TokenType,
	pub value: f64,
}

impl MetricRecord {
	/// Builds the record for an observation made for `wallet` on `network`
	///
	/// # Arguments
	/// * `network` - Network the observation was made on
	/// * `wallet` - Wallet the observation belongs to
	/// * `kind` - Metric kind being published
	/// * `observation` - Decimal-adjusted observation returned by the adapter
	pub fn new(
		network: &Network,
		wallet: &Wallet,
		kind: MetricKind,
		observation: &BalanceObservation,
	) -> Self {
		Self {
			address: wallet.address.clone(),
			name: wallet.name.clone(),
			network: network.name.clone(),
			kind,
			token: observation.symbol.clone(),
			token_type: observation.token_type,
			value: observation.value.to_f64().unwrap_or_default(),
		}
	}

	/// Label values in exported order: address, name, network, type, token, token_type
	pub fn labels(&self) -> [&str; 6] {
		[
			&self.address,
			&self.name,
			&self.network,
			self.kind.as_str(),
			&self.token,
			self.token_type.as_str(),
		]
	}
}
