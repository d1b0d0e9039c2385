//! Authenticated HTTP verb operations against configured API endpoints.
//!
//! Every request carries the bearer credential plus the form content type the
//! upstream API expects even for JSON payloads. A fixed 15-second timeout is
//! built into the client, and response bodies are read to completion on every
//! path so the connection is always released. Only request construction and
//! transport faults become errors; an unexpected status is reported, not
//! thrown.

// std
use std::time::Duration;
// crates.io
use reqwest::{
	Client, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	error::{ConfigError, TransportError},
	model,
};

/// Fixed per-request timeout applied to every API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// The upstream API expects the form content type even for JSON bodies.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Outcome of a mutating call, keeping status mismatches distinct from
/// acknowledged successes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostOutcome {
	/// Server accepted the mutation; carries the envelope's message.
	Accepted(String),
	/// Server answered with a status other than the expected one.
	UnexpectedStatus(StatusCode),
}

/// Authenticated client dispatching verb operations for one invocation.
pub struct ApiClient {
	client: Client,
	bearer: BearerToken,
}
impl ApiClient {
	/// Builds the client with the fixed request timeout.
	pub fn new(bearer: BearerToken) -> Result<Self> {
		let client = Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self { client, bearer })
	}

	/// GET on a base endpoint, forwarding the body as opaque text.
	///
	/// A non-200 status is logged and the body, when present, is still
	/// forwarded; only transport faults become errors.
	pub async fn get_collection(&self, endpoint: &str) -> Result<String> {
		self.get(endpoint).await
	}

	/// GET on `endpoint/id`, forwarding the body as opaque text.
	pub async fn get_by_id(&self, endpoint: &str, id: &str) -> Result<String> {
		self.get(&format!("{endpoint}/{id}")).await
	}

	async fn get(&self, endpoint: &str) -> Result<String> {
		tracing::info!(endpoint, "calling API endpoint");

		let response = self
			.request(Method::GET, endpoint)
			.send()
			.await
			.map_err(|source| TransportError::network(endpoint, source))?;
		let status = response.status();
		let body =
			response.text().await.map_err(|source| TransportError::network(endpoint, source))?;

		if status != StatusCode::OK {
			tracing::warn!(endpoint, %status, "unexpected status for GET");
		}

		Ok(body)
	}

	/// POST of a caller-supplied JSON payload; the server acknowledges a
	/// proposal with 201 Created.
	pub async fn propose_loan(&self, endpoint: &str, payload: Vec<u8>) -> Result<PostOutcome> {
		self.post(endpoint, Some(payload), StatusCode::CREATED).await
	}

	/// Empty-bodied POST to a cancel endpoint; acknowledged with 200.
	pub async fn cancel_loan(&self, endpoint: &str) -> Result<PostOutcome> {
		self.post(endpoint, None, StatusCode::OK).await
	}

	/// Empty-bodied POST to a decline endpoint; acknowledged with 200.
	pub async fn decline_loan(&self, endpoint: &str) -> Result<PostOutcome> {
		self.post(endpoint, None, StatusCode::OK).await
	}

	async fn post(
		&self,
		endpoint: &str,
		payload: Option<Vec<u8>>,
		expected: StatusCode,
	) -> Result<PostOutcome> {
		tracing::info!(endpoint, "calling API endpoint");

		let mut request = self.request(Method::POST, endpoint);

		if let Some(payload) = payload {
			request = request.body(payload);
		}

		let response =
			request.send().await.map_err(|source| TransportError::network(endpoint, source))?;
		let status = response.status();
		// Read on every path so the connection is released even on a mismatch.
		let body =
			response.text().await.map_err(|source| TransportError::network(endpoint, source))?;

		if status != expected {
			tracing::warn!(endpoint, %status, %expected, "unexpected status for POST");

			return Ok(PostOutcome::UnexpectedStatus(status));
		}

		let envelope = model::decode_envelope(&body)?;

		Ok(PostOutcome::Accepted(envelope.message))
	}

	fn request(&self, method: Method, endpoint: &str) -> reqwest::RequestBuilder {
		self.client
			.request(method, endpoint)
			.header(AUTHORIZATION, format!("Bearer {}", self.bearer.expose()))
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
	}
}
