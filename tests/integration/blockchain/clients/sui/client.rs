use mockito::{Matcher, Server};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

use crate::integration::mocks::{create_test_transport, create_test_wallet, rpc_result};
use wallets_exporter::{
	models::TokenType,
	services::blockchain::{
		BalanceClient, BlockChainError, CallStatus, SuiClient, SuiClientTrait, SUI_COIN_TYPE,
	},
};

const OWNER: &str = "0x7d20dcdb2bca4f508ea9613994683eb4e76e9c4ed371169677c1be02aaf0b58e";

#[tokio::test]
async fn test_empty_result_yields_zero_sui() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "suix_getAllBalances",
			"params": [OWNER]
		})))
		.with_body(rpc_result(json!([])))
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let client = SuiClient::new_with_transport(transport);

	let observations = client
		.fetch_balance(&create_test_wallet("ops", OWNER), None)
		.await
		.unwrap();

	assert_eq!(observations.len(), 1);
	assert_eq!(observations[0].value, Decimal::ZERO);
	assert_eq!(observations[0].symbol, "SUI");
	assert_eq!(observations[0].token_type, TokenType::Native);
	mock.assert();
}

#[tokio::test]
async fn test_every_coin_is_reported() {
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/")
		.with_body(rpc_result(json!([
			{
				"coinType": SUI_COIN_TYPE,
				"coinObjectCount": 3,
				"totalBalance": "1500000000",
				"lockedBalance": {}
			},
			{
				"coinType": "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC",
				"coinObjectCount": 1,
				"totalBalance": "2500000",
				"lockedBalance": {}
			}
		])))
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let client = SuiClient::new_with_transport(transport);

	let observations = client
		.fetch_balance(&create_test_wallet("ops", OWNER), None)
		.await
		.unwrap();

	assert_eq!(observations.len(), 2);
	assert_eq!(observations[0].value, Decimal::from_str("1.5").unwrap());
	assert_eq!(observations[0].symbol, "SUI");
	assert_eq!(observations[1].value, Decimal::from(2_500_000));
	assert_eq!(observations[1].symbol, "USDC");
	assert_eq!(observations[1].token_type, TokenType::Fungible);
}

#[tokio::test]
async fn test_missing_result_is_an_error() {
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/")
		.with_body(json!({ "jsonrpc": "2.0", "id": 1 }).to_string())
		.create_async()
		.await;

	let (transport, tracker) = create_test_transport(&server.url());
	let client = SuiClient::new_with_transport(transport);

	let result = client
		.fetch_balance(&create_test_wallet("ops", OWNER), None)
		.await;

	match result {
		Err(BlockChainError::RequestError(message)) => {
			assert!(message.contains("Invalid response from Sui RPC"))
		}
		other => panic!("unexpected result: {:?}", other),
	}
	// The HTTP exchange itself succeeded
	assert_eq!(tracker.count(&server.url(), CallStatus::Success), 1);
}

#[tokio::test]
async fn test_fetch_native_balance() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "suix_getBalance",
			"params": [OWNER, SUI_COIN_TYPE]
		})))
		.with_body(rpc_result(json!({
			"coinType": SUI_COIN_TYPE,
			"coinObjectCount": 1,
			"totalBalance": "999000000000",
			"lockedBalance": {}
		})))
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let client = SuiClient::new_with_transport(transport);

	let observation = client.fetch_native_balance(OWNER).await.unwrap();

	assert_eq!(observation.value, Decimal::from(999));
	assert_eq!(observation.symbol, "SUI");
	mock.assert();
}
