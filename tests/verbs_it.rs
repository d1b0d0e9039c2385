// crates.io
use httpmock::prelude::*;
// self
use onesource::{
	auth::BearerToken,
	error::Error,
	http::{ApiClient, PostOutcome},
};

const ENVELOPE_CREATED: &str =
	"{\"timestamp\":\"2024-01-01T00:00:00Z\",\"status\":201,\"message\":\"Created\",\"path\":\"/loans\"}";
const ENVELOPE_CANCELED: &str =
	"{\"timestamp\":\"2024-01-01T00:00:00Z\",\"status\":200,\"message\":\"Loan canceled\",\"path\":\"/loans/L123/cancel\"}";

fn build_client() -> ApiClient {
	ApiClient::new(BearerToken::new("test-token")).expect("API client should build.")
}

#[tokio::test]
async fn get_collection_forwards_the_body_verbatim_with_auth_headers() {
	let server = MockServer::start_async().await;
	let body = "[{\"loanId\":\"L1\"},{\"loanId\":\"L2\"}]";
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/loans")
				.header("authorization", "Bearer test-token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await;
	let forwarded = build_client()
		.get_collection(&server.url("/loans"))
		.await
		.expect("Collection GET should succeed.");

	assert_eq!(forwarded, body);

	mock.assert_async().await;
}

#[tokio::test]
async fn get_by_id_targets_the_id_path() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/loans/L123").header("authorization", "Bearer test-token");
			then.status(200).body("{\"loanId\":\"L123\"}");
		})
		.await;
	let body = build_client()
		.get_by_id(&server.url("/loans"), "L123")
		.await
		.expect("GET by id should succeed.");

	assert_eq!(body, "{\"loanId\":\"L123\"}");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_forwards_the_body_even_on_an_error_status() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/parties");
			then.status(500).body("upstream exploded");
		})
		.await;
	let body = build_client()
		.get_collection(&server.url("/parties"))
		.await
		.expect("A non-200 GET should still forward the body.");

	assert_eq!(body, "upstream exploded");

	mock.assert_async().await;
}

#[tokio::test]
async fn propose_posts_the_payload_and_surfaces_the_envelope_message() {
	let server = MockServer::start_async().await;
	let payload = "{\"trade\":{\"quantity\":15000}}";
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/loans")
				.header("authorization", "Bearer test-token")
				.header("content-type", "application/x-www-form-urlencoded")
				.body(payload);
			then.status(201).header("content-type", "application/json").body(ENVELOPE_CREATED);
		})
		.await;
	let outcome = build_client()
		.propose_loan(&server.url("/loans"), payload.as_bytes().to_vec())
		.await
		.expect("Proposal POST should succeed.");

	assert_eq!(outcome, PostOutcome::Accepted("Created".into()));

	mock.assert_async().await;
}

#[tokio::test]
async fn propose_reports_an_unexpected_status_without_an_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/loans");
			then.status(500).body("{\"message\":\"boom\"}");
		})
		.await;
	let outcome = build_client()
		.propose_loan(&server.url("/loans"), b"{}".to_vec())
		.await
		.expect("A status mismatch should not be an error.");

	assert_eq!(outcome, PostOutcome::UnexpectedStatus(reqwest::StatusCode::INTERNAL_SERVER_ERROR));

	mock.assert_async().await;
}

#[tokio::test]
async fn cancel_posts_an_empty_body_and_expects_200() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/loans/L123/cancel").body("");
			then.status(200).header("content-type", "application/json").body(ENVELOPE_CANCELED);
		})
		.await;
	let outcome = build_client()
		.cancel_loan(&server.url("/loans/L123/cancel"))
		.await
		.expect("Cancel POST should succeed.");

	assert_eq!(outcome, PostOutcome::Accepted("Loan canceled".into()));

	mock.assert_async().await;
}

#[tokio::test]
async fn decline_reports_a_201_as_unexpected() {
	// The decline contract is exactly 200; even another success code counts
	// as a mismatch.
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/loans/L123/decline");
			then.status(201).body(ENVELOPE_CREATED);
		})
		.await;
	let outcome = build_client()
		.decline_loan(&server.url("/loans/L123/decline"))
		.await
		.expect("A status mismatch should not be an error.");

	assert_eq!(outcome, PostOutcome::UnexpectedStatus(reqwest::StatusCode::CREATED));

	mock.assert_async().await;
}

#[tokio::test]
async fn cancel_with_an_unparseable_envelope_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/loans/L123/cancel");
			then.status(200).body("not an envelope");
		})
		.await;
	let err = build_client()
		.cancel_loan(&server.url("/loans/L123/cancel"))
		.await
		.expect_err("An unparseable envelope should surface as a decode error.");

	assert!(matches!(err, Error::Decode(_)));

	mock.assert_async().await;
}
