//! Application configuration loaded from the TOML file named on the command
//! line.
//!
//! The structure mirrors the file's sections: `[general]` carries the OIDC
//! authority, `[endpoints]` maps each resource kind to an absolute base URL,
//! and `[authentication]` carries the grant parameters. The configuration is
//! immutable after load and threaded by reference through the dispatcher,
//! never held as ambient state.

// std
use std::{fs, path::Path};
// crates.io
use clap::ValueEnum;
// self
use crate::{_prelude::*, error::ConfigError};

/// Grant label selecting the resource-owner-password exchange.
pub const GRANT_PASSWORD: &str = "password";
/// Grant label selecting the client-credentials exchange.
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Top-level application configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// OIDC authority settings.
	pub general: General,
	/// Resource endpoints keyed by kind.
	pub endpoints: Endpoints,
	/// Credential material for the token exchange.
	pub authentication: Authentication,
}
impl AppConfig {
	/// Reads and validates the configuration TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
		let config = toml::from_str::<Self>(&raw)
			.map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

		config.validate()?;

		tracing::info!(path = %path.display(), "configuration loaded");

		Ok(config)
	}

	/// Validates the authority URL, every populated endpoint, and the
	/// grant-specific credential fields.
	///
	/// Blank endpoints are allowed here; they fail later, and only when a
	/// command actually needs them.
	pub fn validate(&self) -> Result<()> {
		Url::parse(&self.general.auth_url)
			.map_err(|source| ConfigError::InvalidAuthUrl { source })?;

		for kind in EntityKind::ALL {
			let endpoint = self.endpoints.raw(kind);

			if endpoint.is_empty() {
				continue;
			}

			Url::parse(endpoint)
				.map_err(|source| ConfigError::InvalidEndpoint { kind, source })?;
		}

		self.authentication.validate()?;

		Ok(())
	}
}

/// OIDC authority settings from the `[general]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct General {
	/// Base URL of the authentication server.
	pub auth_url: String,
	/// Realm under which the client is registered.
	pub realm_name: String,
}

/// Resource endpoint table from the `[endpoints]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
	/// API base URL; informational, individual kinds carry their own URLs.
	pub base: String,
	/// Parties endpoint.
	pub parties: String,
	/// Events endpoint.
	pub events: String,
	/// Trade agreements endpoint.
	pub agreements: String,
	/// Loans endpoint.
	pub loans: String,
	/// Rerates endpoint.
	pub rerates: String,
	/// Returns endpoint.
	pub returns: String,
	/// Recalls endpoint.
	pub recalls: String,
	/// Buyins endpoint.
	pub buyins: String,
}
impl Endpoints {
	/// Returns the configured base URL for a kind, or a configuration error
	/// when the entry is blank.
	pub fn url_for(&self, kind: EntityKind) -> Result<&str, ConfigError> {
		let endpoint = self.raw(kind);

		if endpoint.is_empty() {
			return Err(ConfigError::MissingEndpoint { kind });
		}

		Ok(endpoint)
	}

	fn raw(&self, kind: EntityKind) -> &str {
		match kind {
			EntityKind::Parties => &self.parties,
			EntityKind::Events => &self.events,
			EntityKind::Agreements => &self.agreements,
			EntityKind::Loans => &self.loans,
			EntityKind::Rerates => &self.rerates,
			EntityKind::Returns => &self.returns,
			EntityKind::Recalls => &self.recalls,
			EntityKind::Buyins => &self.buyins,
		}
	}
}

/// Credential material from the `[authentication]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authentication {
	/// Authentication scheme label; informational.
	pub auth_type: String,
	/// OAuth 2.0 grant selecting the exchange flow.
	pub grant_type: String,
	/// Client identifier registered with the realm.
	pub client_id: String,
	/// Resource-owner username, required by the password grant.
	pub username: String,
	/// Resource-owner password, required by the password grant.
	pub password: String,
	/// Confidential client secret, required by the client-credentials grant.
	pub client_secret: String,
}
impl Authentication {
	fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingCredential { field: "client_id" });
		}

		match self.grant_type.as_str() {
			GRANT_PASSWORD => {
				if self.username.is_empty() {
					return Err(ConfigError::MissingCredential { field: "username" });
				}
				if self.password.is_empty() {
					return Err(ConfigError::MissingCredential { field: "password" });
				}
			},
			GRANT_CLIENT_CREDENTIALS =>
				if self.client_secret.is_empty() {
					return Err(ConfigError::MissingCredential { field: "client_secret" });
				},
			other => return Err(ConfigError::UnsupportedGrant { grant: other.to_owned() }),
		}

		Ok(())
	}
}

/// Resource kinds exposed by the API, each with its own configured endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	/// Counterparties registered with the service.
	Parties,
	/// Lifecycle events recorded against resources.
	Events,
	/// Trade agreements.
	Agreements,
	/// Loan contracts.
	Loans,
	/// Rate renegotiations.
	Rerates,
	/// Loan returns.
	Returns,
	/// Loan recalls.
	Recalls,
	/// Buy-in executions.
	Buyins,
}
impl EntityKind {
	/// Every kind, in configuration-file order.
	pub const ALL: [Self; 8] = [
		Self::Parties,
		Self::Events,
		Self::Agreements,
		Self::Loans,
		Self::Rerates,
		Self::Returns,
		Self::Recalls,
		Self::Buyins,
	];

	/// Returns the stable lowercase label for the kind.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Parties => "parties",
			Self::Events => "events",
			Self::Agreements => "agreements",
			Self::Loans => "loans",
			Self::Rerates => "rerates",
			Self::Returns => "returns",
			Self::Recalls => "recalls",
			Self::Buyins => "buyins",
		}
	}

	/// Returns the console heading used when listing this kind.
	pub const fn collection_label(self) -> &'static str {
		match self {
			Self::Parties => "1Source Parties",
			Self::Events => "1Source Events",
			Self::Agreements => "1Source Trade Agreements",
			Self::Loans => "1Source Loans",
			Self::Rerates => "1Source Rerates",
			Self::Returns => "1Source Returns",
			Self::Recalls => "1Source Recalls",
			Self::Buyins => "1Source Buyins",
		}
	}

	/// Returns the console heading used for a single record of this kind.
	pub const fn singular_label(self) -> &'static str {
		match self {
			Self::Parties => "1Source Party",
			Self::Events => "1Source Event",
			Self::Agreements => "1Source Trade Agreement",
			Self::Loans => "1Source Loan",
			Self::Rerates => "1Source Rerate",
			Self::Returns => "1Source Return",
			Self::Recalls => "1Source Recall",
			Self::Buyins => "1Source Buyin",
		}
	}
}
impl Display for EntityKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const SAMPLE: &str = r#"
		[general]
		auth_url = "https://stageauth.example.com"
		realm_name = "1Source"

		[endpoints]
		base = "https://stageapi.example.com/api/v1"
		parties = "https://stageapi.example.com/api/v1/parties"
		events = "https://stageapi.example.com/api/v1/events"
		agreements = "https://stageapi.example.com/api/v1/agreements"
		loans = "https://stageapi.example.com/api/v1/loans"
		rerates = "https://stageapi.example.com/api/v1/rerates"
		returns = "https://stageapi.example.com/api/v1/returns"
		recalls = "https://stageapi.example.com/api/v1/recalls"
		buyins = "https://stageapi.example.com/api/v1/buyins"

		[authentication]
		auth_type = "oauth2"
		grant_type = "password"
		client_id = "onesource-cli"
		username = "trader"
		password = "hunter2"
		client_secret = ""
	"#;

	fn sample() -> AppConfig {
		toml::from_str(SAMPLE).expect("Sample configuration should parse.")
	}

	#[test]
	fn sample_config_parses_and_validates() {
		let config = sample();

		config.validate().expect("Sample configuration should validate.");

		assert_eq!(config.general.realm_name, "1Source");
		assert_eq!(
			config.endpoints.url_for(EntityKind::Loans).expect("Loans endpoint should be set."),
			"https://stageapi.example.com/api/v1/loans",
		);
	}

	#[test]
	fn blank_endpoint_is_missing_for_its_kind_only() {
		let mut config = sample();

		config.endpoints.rerates = String::new();

		assert!(matches!(
			config.endpoints.url_for(EntityKind::Rerates),
			Err(ConfigError::MissingEndpoint { kind: EntityKind::Rerates }),
		));
		assert!(config.endpoints.url_for(EntityKind::Loans).is_ok());
		// A blank endpoint is not a validation failure until it is needed.
		config.validate().expect("Blank endpoints should pass validation.");
	}

	#[test]
	fn invalid_endpoint_url_is_rejected() {
		let mut config = sample();

		config.endpoints.events = "not a url".into();

		assert!(matches!(
			config.validate(),
			Err(Error::Config(ConfigError::InvalidEndpoint { kind: EntityKind::Events, .. })),
		));
	}

	#[test]
	fn unsupported_grant_is_rejected_before_any_network_call() {
		let mut config = sample();

		config.authentication.grant_type = "implicit".into();

		assert!(matches!(
			config.validate(),
			Err(Error::Config(ConfigError::UnsupportedGrant { .. })),
		));
	}

	#[test]
	fn password_grant_requires_username_and_password() {
		let mut config = sample();

		config.authentication.password = String::new();

		assert!(matches!(
			config.validate(),
			Err(Error::Config(ConfigError::MissingCredential { field: "password" })),
		));
	}

	#[test]
	fn client_credentials_grant_requires_a_secret() {
		let mut config = sample();

		config.authentication.grant_type = GRANT_CLIENT_CREDENTIALS.into();

		assert!(matches!(
			config.validate(),
			Err(Error::Config(ConfigError::MissingCredential { field: "client_secret" })),
		));
	}

	#[test]
	fn missing_sections_default_to_empty_and_fail_validation() {
		let config = toml::from_str::<AppConfig>("").expect("Empty configuration should parse.");

		assert!(matches!(
			config.validate(),
			Err(Error::Config(ConfigError::InvalidAuthUrl { .. })),
		));
	}
}
