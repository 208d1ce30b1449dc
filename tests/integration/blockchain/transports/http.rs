use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::{io::Write, sync::Arc, time::Duration};

use crate::integration::mocks::{create_test_transport, MockCallTracker};
use mockall::predicate;
use wallets_exporter::services::blockchain::{
	BlockChainError, BlockchainTransport, CallStatus, HttpTransportClient,
};

#[tokio::test]
async fn test_json_rpc_envelope() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::Json(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "getBalance",
			"params": ["owner"]
		})))
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":{"value":5}}"#)
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	let response = transport
		.send_raw_request("getBalance", Some(json!(["owner"])))
		.await
		.unwrap();

	assert_eq!(response["result"]["value"], 5);
	mock.assert();
}

#[tokio::test]
async fn test_query_string_is_forwarded() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/listing")
		.match_query(Matcher::UrlEncoded("pagination.key".into(), "a+b/c=".into()))
		.with_body("{}")
		.create_async()
		.await;

	let (transport, _) = create_test_transport(&server.url());
	assert!(transport
		.get_json("listing", &[("pagination.key", "a+b/c=")])
		.await
		.is_ok());
	mock.assert();
}

#[tokio::test]
async fn test_invalid_json_is_failure() {
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("GET", "/broken")
		.with_body("<html>gateway</html>")
		.create_async()
		.await;

	let (transport, tracker) = create_test_transport(&server.url());
	let result = transport.get_json("/broken", &[]).await;

	assert!(matches!(result, Err(BlockChainError::DecodeError(_))));
	assert_eq!(tracker.count(&server.url(), CallStatus::Failure), 1);
	assert_eq!(tracker.total(), 1);
}

#[tokio::test]
async fn test_null_error_member_is_success() {
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/")
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x1","error":null}"#)
		.create_async()
		.await;

	let (transport, tracker) = create_test_transport(&server.url());
	let response = transport
		.send_raw_request::<Value>("eth_chainId", None)
		.await
		.unwrap();

	assert_eq!(response["result"], "0x1");
	assert_eq!(tracker.count(&server.url(), CallStatus::Success), 1);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_failure() {
	let mut tracker = MockCallTracker::new();
	tracker
		.expect_record()
		.with(
			predicate::eq("http://127.0.0.1:1"),
			predicate::eq(CallStatus::Failure),
		)
		.times(1)
		.return_const(());

	let transport =
		HttpTransportClient::new("http://127.0.0.1:1/rpc", Duration::from_secs(2), Arc::new(tracker))
			.unwrap();

	let result = transport.send_raw_request::<Value>("eth_chainId", None).await;

	assert!(matches!(result, Err(BlockChainError::ConnectionError(_))));
}

#[tokio::test]
async fn test_timeout_is_failure() {
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("GET", "/slow")
		.with_chunked_body(|writer| {
			std::thread::sleep(Duration::from_millis(500));
			writer.write_all(b"{}")
		})
		.create_async()
		.await;

	let tracker = Arc::new(crate::integration::mocks::RecordingTracker::default());
	let transport =
		HttpTransportClient::new(&server.url(), Duration::from_millis(100), tracker.clone()).unwrap();

	let result = transport.get_json("/slow", &[]).await;

	assert!(result.is_err());
	assert_eq!(tracker.count(&server.url(), CallStatus::Failure), 1);
}
