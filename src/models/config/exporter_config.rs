use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::HashSet, path::Path};
use tracing::warn;

use crate::models::{ConfigLoader, Network, NetworkType};

use super::error::ConfigError;

const REQUIRED_NETWORK_KEYS: [&str; 5] = ["name", "rpc", "api", "symbol", "type"];
const REQUIRED_WALLET_KEYS: [&str; 2] = ["name", "address"];

/// Root of the exporter configuration file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExporterConfig {
	pub networks: Vec<Network>,
}

impl ExporterConfig {
	/// Builds a configuration from an already parsed document
	///
	/// The raw document is checked first so that a missing key is reported by
	/// name together with the network it belongs to, then the typed
	/// configuration is validated.
	///
	/// # Arguments
	/// * `document` - Parsed YAML or JSON document
	///
	/// # Returns
	/// * `Result<Self, ConfigError>` - The validated configuration
	pub fn from_document(document: Value) -> Result<Self, ConfigError> {
		validate_document(&document).map_err(ConfigError::validation_error)?;

		let config: Self = serde_json::from_value(document)?;
		config.validate().map_err(ConfigError::validation_error)?;

		for network in &config.networks {
			if network.network_type == NetworkType::Unsupported {
				warn!(
					network = %network.name,
					"Unsupported network type, only a zero balance will be exported"
				);
			}
		}

		Ok(config)
	}

	/// Parses a YAML document
	pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
		let document: Value = serde_yaml::from_str(contents)?;
		Self::from_document(document)
	}

	/// Parses a JSON document
	pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
		let document: Value = serde_json::from_str(contents)?;
		Self::from_document(document)
	}

	/// Total number of wallets across all networks
	pub fn wallet_count(&self) -> usize {
		self.networks.iter().map(|network| network.wallets.len()).sum()
	}
}

impl ConfigLoader for ExporterConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let contents =
			std::fs::read_to_string(path).map_err(|e| ConfigError::file_error(path, e))?;

		if Self::is_json_file(path) {
			Self::from_json_str(&contents)
		} else {
			Self::from_yaml_str(&contents)
		}
	}

	fn validate(&self) -> Result<(), String> {
		let mut names = HashSet::new();
		for network in &self.networks {
			if !names.insert(network.name.as_str()) {
				return Err(format!("network \"{}\" is declared more than once", network.name));
			}

			if network.network_type == NetworkType::Bera && network.bgt_address.is_none() {
				return Err(format!("no \"bgt_address\" in {}", network.name));
			}

			if network.network_type == NetworkType::Cosmos
				&& network.denom.is_some() != network.decimals.is_some()
			{
				return Err(format!(
					"\"denom\" and \"decimals\" must be declared together in {}",
					network.name
				));
			}
		}

		Ok(())
	}
}

/// Structural checks on the raw document, before typed deserialization
fn validate_document(document: &Value) -> Result<(), String> {
	let networks = match document.get("networks") {
		None | Some(Value::Null) => return Err("no \"networks\" in config".to_string()),
		Some(Value::Array(networks)) => networks,
		Some(_) => return Err("\"networks\" is not a list".to_string()),
	};

	for (index, network) in networks.iter().enumerate() {
		let label = network
			.get("name")
			.and_then(Value::as_str)
			.map(str::to_string)
			.unwrap_or_else(|| format!("network #{}", index));

		if !network.is_object() {
			return Err(format!("{} is not a mapping", label));
		}

		for key in REQUIRED_NETWORK_KEYS {
			if network.get(key).is_none_or(Value::is_null) {
				return Err(format!("no \"{}\" in {}", key, label));
			}
		}

		if network.get("type").and_then(Value::as_str) == Some("") {
			return Err(format!("empty \"type\" in {}", label));
		}

		let wallets = match network.get("wallets") {
			None | Some(Value::Null) => return Err(format!("no \"wallets\" in {}", label)),
			Some(Value::Array(wallets)) => wallets,
			Some(_) => return Err(format!("\"wallets\" in {} is not a list", label)),
		};

		if wallets.is_empty() {
			return Err(format!("\"wallets\" in {} is empty", label));
		}

		for (position, wallet) in wallets.iter().enumerate() {
			for key in REQUIRED_WALLET_KEYS {
				if wallet.get(key).is_none_or(Value::is_null) {
					return Err(format!("no \"{}\" in wallet #{} of {}", key, position, label));
				}
			}
		}
	}

	Ok(())
}
