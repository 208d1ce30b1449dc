use std::{
	collections::HashMap,
	io::Write,
	sync::{Mutex, OnceLock},
};
use tempfile::NamedTempFile;

use wallets_exporter::models::{
	ConfigError, ConfigLoader, ExporterConfig, ExporterSettings, MissingMetadataPolicy,
	NetworkType,
};

const FULL_CONFIG: &str = r#"
networks:
  - name: cosmoshub
    type: cosmos
    api: https://rest.cosmos.directory/cosmoshub
    rpc: https://rpc.cosmos.directory/cosmoshub
    symbol: ATOM
    wallets:
      - name: validator
        address: cosmos1abc
  - name: localnet
    type: cosmos
    api: http://localhost:1317
    rpc: http://localhost:26657
    symbol: XYZ
    denom: uxyz
    decimals: 6
    wallets:
      - name: faucet
        address: xyz1faucet
  - name: ethereum
    type: evm
    api: https://eth.llamarpc.com
    rpc: https://eth.llamarpc.com
    symbol: ETH
    wallets:
      - name: treasury
        address: "0x1111111111111111111111111111111111111111"
        contract_address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
  - name: berachain
    type: bera
    api: https://rpc.berachain.com
    rpc: https://rpc.berachain.com
    symbol: BERA
    bgt_address: "0x656b95E550C07a9ffe548bd4085c72418Ceb1dba"
    wallets:
      - name: operator
        address: "0x2222222222222222222222222222222222222222"
  - name: polkadot
    type: substrate
    api: wss://rpc.polkadot.io
    rpc: wss://rpc.polkadot.io
    symbol: DOT
    wallets:
      - name: stash
        address: 5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY
  - name: solana
    type: solana
    api: https://api.mainnet-beta.solana.com
    rpc: https://api.mainnet-beta.solana.com
    symbol: SOL
    wallets:
      - name: vote
        address: Vote111111111111111111111111111111111111111
  - name: sui
    type: sui
    api: https://fullnode.mainnet.sui.io
    rpc: https://fullnode.mainnet.sui.io
    symbol: SUI
    wallets:
      - name: ops
        address: "0xabc"
  - name: tron
    type: tron
    api: https://api.trongrid.io
    rpc: https://api.trongrid.io
    symbol: TRX
    wallets:
      - name: cold
        address: TXYZ
"#;

/// Keeps every `log` record emitted by the crate under test
struct CapturingLogger {
	messages: Mutex<Vec<String>>,
}

impl log::Log for CapturingLogger {
	fn enabled(&self, _metadata: &log::Metadata) -> bool {
		true
	}

	fn log(&self, record: &log::Record) {
		self.messages.lock().unwrap().push(record.args().to_string());
	}

	fn flush(&self) {}
}

fn captured_logs() -> &'static CapturingLogger {
	static LOGGER: OnceLock<CapturingLogger> = OnceLock::new();
	let logger = LOGGER.get_or_init(|| CapturingLogger {
		messages: Mutex::new(Vec::new()),
	});
	if log::set_logger(logger).is_ok() {
		log::set_max_level(log::LevelFilter::Trace);
	}
	logger
}

fn write_config(contents: &str, suffix: &str) -> NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
	file.write_all(contents.as_bytes()).unwrap();
	file
}

#[test]
fn test_load_every_network_family() {
	let file = write_config(FULL_CONFIG, ".yaml");

	let config = ExporterConfig::load_from_path(file.path()).unwrap();

	let types: Vec<NetworkType> = config.networks.iter().map(|n| n.network_type).collect();
	assert_eq!(
		types,
		vec![
			NetworkType::Cosmos,
			NetworkType::Cosmos,
			NetworkType::Evm,
			NetworkType::Bera,
			NetworkType::Substrate,
			NetworkType::Solana,
			NetworkType::Sui,
			NetworkType::Unsupported,
		]
	);
	assert_eq!(config.wallet_count(), 8);
	assert_eq!(config.networks[1].denom.as_deref(), Some("uxyz"));
	assert_eq!(config.networks[1].decimals, Some(6));
	assert_eq!(
		config.networks[2].wallets[0].contract_address.as_deref(),
		Some("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
	);
}

#[test]
fn test_json_and_yaml_are_equivalent() {
	let yaml = ExporterConfig::from_yaml_str(FULL_CONFIG).unwrap();
	let json = serde_json::to_string(&yaml).unwrap();
	let file = write_config(&json, ".json");

	let loaded = ExporterConfig::load_from_path(file.path()).unwrap();

	assert_eq!(loaded, yaml);
}

#[test]
fn test_missing_rpc_names_the_network() {
	let file = write_config(
		r#"
networks:
  - name: osmosis
    type: cosmos
    api: https://rest.cosmos.directory/osmosis
    symbol: OSMO
    wallets:
      - name: hot
        address: osmo1abc
"#,
		".yml",
	);

	match ExporterConfig::load_from_path(file.path()) {
		Err(ConfigError::ValidationError(message)) => {
			assert!(message.contains("no \"rpc\" in osmosis"), "{}", message)
		}
		other => panic!("unexpected result: {:?}", other),
	}
}

#[test]
fn test_validation_error_is_logged_once() {
	let logs = captured_logs();
	let file = write_config(
		r#"
networks:
  - name: junonet-single-report
    type: cosmos
    rpc: https://rpc.juno.example
    symbol: JUNO
    wallets:
      - name: hot
        address: juno1abc
"#,
		".yaml",
	);

	assert!(ExporterConfig::load_from_path(file.path()).is_err());

	let reports = logs
		.messages
		.lock()
		.unwrap()
		.iter()
		.filter(|message| message.contains("junonet-single-report"))
		.count();
	assert_eq!(reports, 1);
}

#[test]
fn test_malformed_yaml() {
	let file = write_config("networks: [unterminated", ".yaml");

	assert!(matches!(
		ExporterConfig::load_from_path(file.path()),
		Err(ConfigError::ParseError(_))
	));
}

#[test]
fn test_settings_from_lookup() {
	let env = HashMap::from([
		("POLLING_INTERVAL_SECONDS", "15"),
		("EXPORTER_PORT", "9100"),
		("MISSING_METADATA_POLICY", "strict"),
	]);

	let settings =
		ExporterSettings::from_lookup(|key| env.get(key).map(|value| value.to_string())).unwrap();

	assert_eq!(settings.polling_interval.as_secs(), 15);
	assert_eq!(settings.exporter_port, 9100);
	assert_eq!(settings.missing_metadata_policy, MissingMetadataPolicy::Strict);
	assert_eq!(
		settings.cosmos_registry_url,
		"https://chains.cosmos.directory/"
	);
	assert_eq!(settings.http_timeout.as_secs(), 30);
}

#[test]
fn test_settings_reject_zero_interval() {
	let result = ExporterSettings::from_lookup(|key| {
		(key == "POLLING_INTERVAL_SECONDS").then(|| "0".to_string())
	});

	assert!(matches!(result, Err(ConfigError::ParseError(_))));
}
