use serde::{Deserialize, Serialize};

/// Per-chain metadata resolved once at startup
///
/// Cosmos networks are looked up by name, EVM networks by numeric chain id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainRegistryEntry {
	/// Display symbol of the native asset (e.g. "ATOM", "ETH")
	pub symbol: String,
	/// Decimal exponent between the smallest unit and the display unit
	pub decimals: u32,
	/// On-chain denomination of the native asset (e.g. "uatom")
	pub denom: String,
}

impl ChainRegistryEntry {
	pub fn new(symbol: impl Into<String>, decimals: u32, denom: impl Into<String>) -> Self {
		Self {
			symbol: symbol.into(),
			decimals,
			denom: denom.into(),
		}
	}
}
