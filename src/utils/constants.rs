//! Default values shared across the exporter.

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Seconds between the start of two polling passes
pub const DEFAULT_POLLING_INTERVAL_SECONDS: u64 = 60;

/// Port the metrics server listens on
pub const DEFAULT_EXPORTER_PORT: u16 = 9877;

/// Per-request timeout applied to every outbound HTTP call
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Name-indexed table of cosmos chains (symbol, decimals, denom)
pub const DEFAULT_COSMOS_REGISTRY_URL: &str = "https://chains.cosmos.directory/";

/// Chain-id indexed table of EVM chains and their native currencies
pub const DEFAULT_EVM_CHAINS_URL: &str = "https://chainid.network/chains.json";

/// Symbol used when a chain does not expose one and the fallback policy is active
pub const UNKNOWN_SYMBOL: &str = "Unknown";
