use std::{fmt::Display, str::FromStr, time::Duration};

use crate::{
	models::MissingMetadataPolicy,
	utils::constants::{
		DEFAULT_COSMOS_REGISTRY_URL, DEFAULT_EVM_CHAINS_URL, DEFAULT_EXPORTER_PORT,
		DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_POLLING_INTERVAL_SECONDS,
	},
};

use super::error::ConfigError;

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterSettings {
	/// Time between the start of two polling passes (`POLLING_INTERVAL_SECONDS`)
	pub polling_interval: Duration,
	/// Metrics server port (`EXPORTER_PORT`)
	pub exporter_port: u16,
	/// Cosmos chain table (`COSMOS_REGISTRY_URL`)
	pub cosmos_registry_url: String,
	/// EVM chain-id table (`EVM_CHAINS_URL`)
	pub evm_chains_url: String,
	/// Handling of absent symbol/decimals (`MISSING_METADATA_POLICY`)
	pub missing_metadata_policy: MissingMetadataPolicy,
	/// Per-request HTTP timeout (`HTTP_TIMEOUT_SECONDS`)
	pub http_timeout: Duration,
}

impl Default for ExporterSettings {
	fn default() -> Self {
		Self {
			polling_interval: Duration::from_secs(DEFAULT_POLLING_INTERVAL_SECONDS),
			exporter_port: DEFAULT_EXPORTER_PORT,
			cosmos_registry_url: DEFAULT_COSMOS_REGISTRY_URL.to_string(),
			evm_chains_url: DEFAULT_EVM_CHAINS_URL.to_string(),
			missing_metadata_policy: MissingMetadataPolicy::default(),
			http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
		}
	}
}

impl ExporterSettings {
	/// Reads settings from the process environment
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads settings through `lookup`, falling back to defaults for unset keys
	///
	/// # Arguments
	/// * `lookup` - Returns the value for an environment key, if set
	///
	/// # Returns
	/// * `Result<Self, ConfigError>` - Parsed settings or the first parse error
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let defaults = Self::default();

		let polling_seconds: u64 = parse_var(
			&lookup,
			"POLLING_INTERVAL_SECONDS",
			DEFAULT_POLLING_INTERVAL_SECONDS,
		)?;
		if polling_seconds == 0 {
			return Err(ConfigError::parse_error(
				"POLLING_INTERVAL_SECONDS must be greater than zero",
			));
		}

		let timeout_seconds: u64 =
			parse_var(&lookup, "HTTP_TIMEOUT_SECONDS", DEFAULT_HTTP_TIMEOUT_SECONDS)?;

		Ok(Self {
			polling_interval: Duration::from_secs(polling_seconds),
			exporter_port: parse_var(&lookup, "EXPORTER_PORT", DEFAULT_EXPORTER_PORT)?,
			cosmos_registry_url: lookup("COSMOS_REGISTRY_URL")
				.unwrap_or(defaults.cosmos_registry_url),
			evm_chains_url: lookup("EVM_CHAINS_URL").unwrap_or(defaults.evm_chains_url),
			missing_metadata_policy: parse_var(
				&lookup,
				"MISSING_METADATA_POLICY",
				defaults.missing_metadata_policy,
			)?,
			http_timeout: Duration::from_secs(timeout_seconds),
		})
	}
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: Display,
	F: Fn(&str) -> Option<String>,
{
	match lookup(key) {
		None => Ok(default),
		Some(raw) if raw.trim().is_empty() => Ok(default),
		Some(raw) => raw
			.trim()
			.parse()
			.map_err(|e| ConfigError::invalid_setting(key, &raw, e)),
	}
}
