use mockito::Server;
use serde_json::json;
use std::sync::Arc;

use crate::integration::mocks::{
	create_test_network, create_test_wallet, RecordingSink, RecordingTracker,
};
use wallets_exporter::{
	bootstrap::{initialize_exporter, load_registry},
	models::{ExporterConfig, ExporterSettings, MetricKind, NetworkType},
	services::blockchain::CallStatus,
};

fn settings(server_url: &str) -> ExporterSettings {
	ExporterSettings {
		cosmos_registry_url: format!("{}/cosmos", server_url),
		evm_chains_url: format!("{}/chains.json", server_url),
		..ExporterSettings::default()
	}
}

#[tokio::test]
async fn test_only_needed_tables_are_fetched() {
	let mut server = Server::new_async().await;
	let cosmos = server
		.mock("GET", "/cosmos")
		.with_body(json!({ "chains": [] }).to_string())
		.expect(0)
		.create_async()
		.await;
	let evm = server
		.mock("GET", "/chains.json")
		.with_body(json!([]).to_string())
		.expect(1)
		.create_async()
		.await;

	let networks = vec![create_test_network(
		"ethereum",
		NetworkType::Evm,
		"http://127.0.0.1:1",
		vec![],
	)];
	let tracker = Arc::new(RecordingTracker::default());

	let registry = load_registry(&networks, &settings(&server.url()), tracker.clone())
		.await
		.unwrap();

	assert_eq!(registry.evm_len(), 0);
	assert_eq!(tracker.count(&server.url(), CallStatus::Success), 1);
	cosmos.assert();
	evm.assert();
}

#[tokio::test]
async fn test_initialize_exporter_end_to_end() {
	let mut server = Server::new_async().await;
	let _directory = server
		.mock("GET", "/cosmos")
		.with_body(
			json!({
				"chains": [
					{ "name": "X", "symbol": "XYZ", "decimals": 6, "denom": "uxyz" }
				]
			})
			.to_string(),
		)
		.create_async()
		.await;
	let _balances = server
		.mock("GET", "/cosmos/bank/v1beta1/balances/xyz1wallet")
		.with_body(json!({ "balances": [ { "denom": "uxyz", "amount": "1500000" } ] }).to_string())
		.create_async()
		.await;
	let _delegations = server
		.mock("GET", "/cosmos/staking/v1beta1/delegations/xyz1wallet")
		.with_body(json!({ "delegation_responses": [], "pagination": { "next_key": null } }).to_string())
		.create_async()
		.await;
	let _unbonding = server
		.mock(
			"GET",
			"/cosmos/staking/v1beta1/delegators/xyz1wallet/unbonding_delegations",
		)
		.with_body(json!({ "unbonding_responses": [] }).to_string())
		.create_async()
		.await;
	let _rewards = server
		.mock(
			"GET",
			"/cosmos/distribution/v1beta1/delegators/xyz1wallet/rewards",
		)
		.with_body(json!({ "rewards": [], "total": [] }).to_string())
		.create_async()
		.await;

	let mut bera = create_test_network(
		"berachain",
		NetworkType::Bera,
		"http://127.0.0.1:1",
		vec![create_test_wallet("validator", "0x2222222222222222222222222222222222222222")],
	);
	bera.bgt_address = None;
	let config = ExporterConfig {
		networks: vec![
			create_test_network(
				"X",
				NetworkType::Cosmos,
				&server.url(),
				vec![create_test_wallet("hot", "xyz1wallet")],
			),
			bera,
		],
	};
	let sink = Arc::new(RecordingSink::default());

	let exporter = initialize_exporter(
		config,
		&settings(&server.url()),
		sink.clone(),
		Arc::new(RecordingTracker::default()),
	)
	.await
	.unwrap();

	let summary = exporter.fetch_all().await;

	// bera without bgt_address has no adapter, so its unreachable endpoint is never called
	assert_eq!(summary.failed, 0);
	assert_eq!(summary.published, 4);
	assert_eq!(sink.of_kind(MetricKind::Balance)[0].value, 1.5);
	assert_eq!(sink.of_kind(MetricKind::Rewards)[0].value, 0.0);
}
