//! Chain-family model definitions.
//!
//! This module contains the network families the exporter knows how to query,
//! the normalized observation every chain adapter returns, and the metadata
//! entries resolved once at startup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

mod registry;

pub use registry::ChainRegistryEntry;

/// Supported network families
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
	/// Cosmos SDK chains queried over their REST gateway
	Cosmos,
	/// Ethereum Virtual Machine based chains
	Evm,
	/// EVM-compatible chains with the BGT staking extension
	Bera,
	/// Substrate relay chains
	Substrate,
	/// Solana
	Solana,
	/// Sui
	Sui,
	/// Any type string the exporter does not recognize
	#[serde(other)]
	Unsupported,
}

impl NetworkType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Cosmos => "cosmos",
			Self::Evm => "evm",
			Self::Bera => "bera",
			Self::Substrate => "substrate",
			Self::Solana => "solana",
			Self::Sui => "sui",
			Self::Unsupported => "unsupported",
		}
	}

	/// Whether networks of this family resolve metadata from the cosmos registry table
	pub fn uses_cosmos_registry(&self) -> bool {
		matches!(self, Self::Cosmos)
	}

	/// Whether networks of this family resolve their native symbol by chain id
	pub fn uses_chain_id_registry(&self) -> bool {
		matches!(self, Self::Evm | Self::Bera)
	}
}

impl fmt::Display for NetworkType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind of token an observation refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TokenType {
	/// The chain's native asset
	#[serde(rename = "native")]
	Native,
	/// A contract or coin-type token living on top of the chain
	#[serde(rename = "erc20")]
	Fungible,
}

impl TokenType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Native => "native",
			Self::Fungible => "erc20",
		}
	}
}

impl fmt::Display for TokenType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What to do when a chain does not expose the symbol or decimals an adapter needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingMetadataPolicy {
	/// Substitute placeholders ("Unknown" symbol, 0 decimals) and keep going
	#[default]
	Fallback,
	/// Treat absent metadata as an adapter error
	Strict,
}

impl MissingMetadataPolicy {
	pub fn is_strict(&self) -> bool {
		matches!(self, Self::Strict)
	}
}

impl std::str::FromStr for MissingMetadataPolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"fallback" => Ok(Self::Fallback),
			"strict" => Ok(Self::Strict),
			other => Err(format!(
				"unknown missing metadata policy '{}', expected 'fallback' or 'strict'",
				other
			)),
		}
	}
}

/// A single balance-like value read from a chain, already decimal-adjusted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceObservation {
	pub value: Decimal,
	pub symbol: String,
	pub token_type: TokenType,
}

impl BalanceObservation {
	pub fn native(value: Decimal, symbol: impl Into<String>) -> Self {
		Self {
			value,
			symbol: symbol.into(),
			token_type: TokenType::Native,
		}
	}

	pub fn fungible(value: Decimal, symbol: impl Into<String>) -> Self {
		Self {
			value,
			symbol: symbol.into(),
			token_type: TokenType::Fungible,
		}
	}

	/// Zero-valued native observation, used when the chain holds nothing to report
	pub fn zero(symbol: impl Into<String>) -> Self {
		Self::native(Decimal::ZERO, symbol)
	}
}
