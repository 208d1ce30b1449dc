use mockito::{Matcher, Server};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

use crate::integration::mocks::{create_cosmos_entry, create_test_transport, create_test_wallet};
use wallets_exporter::{
	models::{ChainRegistryEntry, TokenType},
	services::blockchain::{BalanceClient, BlockChainError, CallStatus, CosmosClient, CosmosClientTrait},
};

const ADDRESS: &str = "cosmos1wallet";

#[tokio::test]
async fn test_fetch_balance_scales_registry_denom() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/cosmos/bank/v1beta1/balances/cosmos1wallet")
		.with_header("content-type", "application/json")
		.with_body(
			json!({
				"balances": [
					{ "denom": "ibc/27394FB092D2ECCD", "amount": "42" },
					{ "denom": "uxyz", "amount": "1500000" }
				]
			})
			.to_string(),
		)
		.create_async()
		.await;

	let (transport, tracker) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);
	let entry = ChainRegistryEntry::new("XYZ", 6, "uxyz");

	let observations = client
		.fetch_balance(&create_test_wallet("hot", ADDRESS), Some(&entry))
		.await
		.unwrap();

	assert_eq!(observations.len(), 1);
	assert_eq!(observations[0].value, Decimal::from_str("1.5").unwrap());
	assert_eq!(observations[0].symbol, "XYZ");
	assert_eq!(observations[0].token_type, TokenType::Native);
	assert_eq!(tracker.count(&server.url(), CallStatus::Success), 1);
	mock.assert();
}

#[tokio::test]
async fn test_fetch_balance_missing_denom_is_zero() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/cosmos/bank/v1beta1/balances/cosmos1wallet")
		.with_body(json!({ "balances": [] }).to_string())
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);

	let observations = client
		.fetch_balance(&create_test_wallet("hot", ADDRESS), Some(&create_cosmos_entry()))
		.await
		.unwrap();

	assert_eq!(observations[0].value, Decimal::ZERO);
	assert_eq!(observations[0].symbol, "ATOM");
	mock.assert();
}

#[tokio::test]
async fn test_fetch_balance_without_entry() {
	let server = Server::new_async().await;
	let (transport, tracker) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);

	let result = client
		.fetch_balance(&create_test_wallet("hot", ADDRESS), None)
		.await;

	assert!(matches!(result, Err(BlockChainError::MetadataNotFound(_))));
	assert_eq!(tracker.total(), 0);
}

#[tokio::test]
async fn test_fetch_delegations_follows_pagination() {
	let mut server = Server::new_async().await;
	let path = "/cosmos/staking/v1beta1/delegations/cosmos1wallet";

	let first = server
		.mock("GET", path)
		.match_query(Matcher::Missing)
		.with_body(
			json!({
				"delegation_responses": [
					{ "balance": { "denom": "uatom", "amount": "1000000" } },
					{ "balance": { "denom": "uother", "amount": "999" } }
				],
				"pagination": { "next_key": "cGFnZTI=", "total": "3" }
			})
			.to_string(),
		)
		.expect(1)
		.create_async()
		.await;
	let second = server
		.mock("GET", path)
		.match_query(Matcher::UrlEncoded(
			"pagination.key".into(),
			"cGFnZTI=".into(),
		))
		.with_body(
			json!({
				"delegation_responses": [
					{ "balance": { "denom": "uatom", "amount": "250000" } }
				],
				"pagination": { "next_key": null, "total": "3" }
			})
			.to_string(),
		)
		.expect(1)
		.create_async()
		.await;

	let (transport, tracker) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);

	let delegations = client
		.fetch_delegations(ADDRESS, &create_cosmos_entry())
		.await
		.unwrap();

	assert_eq!(delegations.value, Decimal::from_str("1.25").unwrap());
	assert_eq!(tracker.count(&server.url(), CallStatus::Success), 2);
	first.assert();
	second.assert();
}

#[tokio::test]
async fn test_fetch_unbonding_sums_every_entry() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock(
			"GET",
			"/cosmos/staking/v1beta1/delegators/cosmos1wallet/unbonding_delegations",
		)
		.with_body(
			json!({
				"unbonding_responses": [
					{ "entries": [ { "balance": "100000" }, { "balance": "200000" } ] },
					{ "entries": [ { "balance": "700000" } ] }
				],
				"pagination": { "next_key": null }
			})
			.to_string(),
		)
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);

	let unbonding = client
		.fetch_unbonding_delegations(ADDRESS, &create_cosmos_entry())
		.await
		.unwrap();

	assert_eq!(unbonding.value, Decimal::ONE);
	mock.assert();
}

#[tokio::test]
async fn test_fetch_rewards_reads_total() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock(
			"GET",
			"/cosmos/distribution/v1beta1/delegators/cosmos1wallet/rewards",
		)
		.with_body(
			json!({
				"rewards": [],
				"total": [
					{ "denom": "uatom", "amount": "2500000.123000000000000000" }
				]
			})
			.to_string(),
		)
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);

	let rewards = client
		.fetch_rewards(ADDRESS, &create_cosmos_entry())
		.await
		.unwrap();

	assert_eq!(rewards.value, Decimal::from_str("2.500000123").unwrap());
	mock.assert();
}

#[tokio::test]
async fn test_fetch_all_balances() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/cosmos/bank/v1beta1/balances/cosmos1wallet")
		.with_body(
			json!({
				"balances": [
					{ "denom": "uatom", "amount": "10" },
					{ "denom": "uosmo", "amount": "20" }
				]
			})
			.to_string(),
		)
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);

	let balances = client.fetch_all_balances(ADDRESS).await.unwrap();

	assert_eq!(balances.len(), 2);
	assert_eq!(balances["uatom"], Decimal::from(10));
	assert_eq!(balances["uosmo"], Decimal::from(20));
	mock.assert();
}

#[tokio::test]
async fn test_gateway_error_is_tracked_as_failure() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/cosmos/bank/v1beta1/balances/cosmos1wallet")
		.with_status(500)
		.with_body("internal error")
		.create_async()
		.await;

	let (transport, tracker) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);

	let result = client
		.fetch_balance(&create_test_wallet("hot", ADDRESS), Some(&create_cosmos_entry()))
		.await;

	assert!(matches!(result, Err(BlockChainError::RequestError(_))));
	assert_eq!(tracker.count(&server.url(), CallStatus::Failure), 1);
	assert_eq!(tracker.count(&server.url(), CallStatus::Success), 0);
	mock.assert();
}

#[tokio::test]
async fn test_fetch_balance_finds_denom_on_later_page() {
	let mut server = Server::new_async().await;
	let path = "/cosmos/bank/v1beta1/balances/cosmos1wallet";

	let first = server
		.mock("GET", path)
		.match_query(Matcher::Missing)
		.with_body(
			json!({
				"balances": [
					{ "denom": "ibc/0025F8A87464A471", "amount": "5" },
					{ "denom": "ibc/27394FB092D2ECCD", "amount": "42" }
				],
				"pagination": { "next_key": "aWJjLzI4", "total": "3" }
			})
			.to_string(),
		)
		.expect(1)
		.create_async()
		.await;
	let second = server
		.mock("GET", path)
		.match_query(Matcher::UrlEncoded(
			"pagination.key".into(),
			"aWJjLzI4".into(),
		))
		.with_body(
			json!({
				"balances": [ { "denom": "uatom", "amount": "3000000" } ],
				"pagination": { "next_key": null, "total": "3" }
			})
			.to_string(),
		)
		.expect(1)
		.create_async()
		.await;

	let (transport, tracker) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);

	let observations = client
		.fetch_balance(&create_test_wallet("hot", ADDRESS), Some(&create_cosmos_entry()))
		.await
		.unwrap();

	assert_eq!(observations.len(), 1);
	assert_eq!(observations[0].value, Decimal::from(3));
	assert_eq!(tracker.count(&server.url(), CallStatus::Success), 2);
	first.assert();
	second.assert();
}

#[tokio::test]
async fn test_fetch_rewards_with_full_precision_dec_coin() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock(
			"GET",
			"/cosmos/distribution/v1beta1/delegators/cosmos1wallet/rewards",
		)
		.with_body(
			json!({
				"rewards": [],
				"total": [
					{ "denom": "inj", "amount": "1200000000000000.123456789012345678" }
				]
			})
			.to_string(),
		)
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let client = CosmosClient::new_with_transport(transport);
	let entry = ChainRegistryEntry::new("INJ", 18, "inj");

	let rewards = client.fetch_rewards(ADDRESS, &entry).await.unwrap();

	assert_eq!(rewards.symbol, "INJ");
	assert_eq!(rewards.value.round_dp(18), Decimal::from_str("0.0012").unwrap());
	assert_eq!(
		rewards.value,
		Decimal::from_str("0.001200000000000000123456789").unwrap()
	);
	mock.assert();
}
