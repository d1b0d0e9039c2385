//! OAuth 2.0 credential exchange against the configured OIDC realm.
//!
//! The token endpoint is derived from the configured authority
//! (`{auth_url}/realms/{realm}/protocol/openid-connect/token`) and the grant
//! is selected by the configuration. Token requests never follow redirects,
//! matching OAuth 2.0 guidance that token endpoints return results directly
//! instead of delegating to another URI.

// std
use std::time::Duration;
// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, HttpClientError, RequestTokenError, ResourceOwnerPassword,
	ResourceOwnerUsername, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse},
};
use reqwest::redirect::Policy;
// self
use crate::{
	_prelude::*,
	config::{AppConfig, GRANT_CLIENT_CREDENTIALS, GRANT_PASSWORD},
	error::{AuthError, ConfigError},
};

const TOKEN_TIMEOUT: Duration = Duration::from_secs(15);

/// Bearer credential attached to every API request.
///
/// The wrapper keeps the secret out of `Debug` output; callers read it through
/// [`BearerToken::expose`] at the single point where the header is built.
#[derive(Clone)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a raw access-token string.
	pub fn new(secret: impl Into<String>) -> Self {
		Self(secret.into())
	}

	/// Returns the raw token for header construction.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("BearerToken(<redacted>)")
	}
}

/// Exchanges the configured credentials for a bearer token.
///
/// Any failure here is fatal to the invocation; no API call is issued without
/// a token.
pub async fn authenticate(config: &AppConfig) -> Result<BearerToken> {
	let token_url = token_endpoint(config)?;
	let auth = &config.authentication;
	// The realm expects client credentials in the form body, not basic auth.
	let client = BasicClient::new(ClientId::new(auth.client_id.clone()))
		.set_token_uri(token_url)
		.set_auth_type(AuthType::RequestBody);
	let client = if auth.client_secret.is_empty() {
		client
	} else {
		client.set_client_secret(ClientSecret::new(auth.client_secret.clone()))
	};
	let http_client = reqwest::Client::builder()
		.redirect(Policy::none())
		.timeout(TOKEN_TIMEOUT)
		.build()
		.map_err(ConfigError::http_client_build)?;

	tracing::info!(grant = %auth.grant_type, "requesting bearer token");

	let response = match auth.grant_type.as_str() {
		GRANT_PASSWORD => {
			let username = ResourceOwnerUsername::new(auth.username.clone());
			let password = ResourceOwnerPassword::new(auth.password.clone());

			client
				.exchange_password(&username, &password)
				.request_async(&http_client)
				.await
				.map_err(map_token_error)?
		},
		GRANT_CLIENT_CREDENTIALS => client
			.exchange_client_credentials()
			.request_async(&http_client)
			.await
			.map_err(map_token_error)?,
		other => return Err(ConfigError::UnsupportedGrant { grant: other.to_owned() }.into()),
	};

	tracing::info!("bearer token acquired");

	Ok(BearerToken::new(response.access_token().secret().clone()))
}

/// Derives the realm token endpoint from the configured authority.
pub fn token_endpoint(config: &AppConfig) -> Result<TokenUrl> {
	let raw = format!(
		"{}/realms/{}/protocol/openid-connect/token",
		config.general.auth_url.trim_end_matches('/'),
		config.general.realm_name,
	);
	let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidAuthUrl { source })?;

	Ok(TokenUrl::from_url(url))
}

fn map_token_error(
	error: RequestTokenError<HttpClientError<reqwest::Error>, BasicErrorResponse>,
) -> Error {
	match error {
		RequestTokenError::ServerResponse(response) =>
			AuthError::Rejected { reason: response.to_string() }.into(),
		RequestTokenError::Request(source) => AuthError::transport(source).into(),
		RequestTokenError::Parse(source, _) => AuthError::malformed(source).into(),
		RequestTokenError::Other(reason) => AuthError::Rejected { reason }.into(),
	}
}
