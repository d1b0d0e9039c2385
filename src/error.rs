//! Crate-level error types shared across configuration, authentication,
//! transport, and decoding.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, config::EntityKind};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Protocol mismatches and failed state preconditions are deliberately absent:
/// both are represented as tagged outcomes, not errors.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential exchange failure.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body failed to decode into its typed shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Loan proposal payload could not be read from disk.
	#[error("Failed to read the proposal payload from `{path}`.")]
	Payload {
		/// Path supplied on the command line.
		path: PathBuf,
		/// Underlying filesystem failure.
		#[source]
		source: std::io::Error,
	},
}

/// Configuration and validation failures detected before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration file could not be read.
	#[error("Failed to read the configuration file `{path}`.")]
	Read {
		/// Path supplied on the command line.
		path: PathBuf,
		/// Underlying filesystem failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration file is not valid TOML for the expected shape.
	#[error("Failed to parse the configuration file `{path}`.")]
	Parse {
		/// Path supplied on the command line.
		path: PathBuf,
		/// Underlying parsing failure.
		#[source]
		source: toml::de::Error,
	},
	/// No endpoint is configured for the requested resource kind.
	#[error("No `{kind}` endpoint is configured.")]
	MissingEndpoint {
		/// Resource kind whose endpoint entry is blank.
		kind: EntityKind,
	},
	/// Configured endpoint is not a valid URL.
	#[error("Configured `{kind}` endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Resource kind whose endpoint entry is malformed.
		kind: EntityKind,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token endpoint could not be derived from the configured auth URL.
	#[error("Token endpoint could not be derived from the configured auth URL.")]
	InvalidAuthUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Authentication section is missing a required field.
	#[error("Authentication field `{field}` is missing.")]
	MissingCredential {
		/// Name of the blank configuration field.
		field: &'static str,
	},
	/// Configured grant type is not supported.
	#[error("Grant type `{grant}` is not supported.")]
	UnsupportedGrant {
		/// Grant label taken from the configuration.
		grant: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Log file could not be opened for appending.
	#[error("Failed to open the log file `{path}`.")]
	LogFile {
		/// Path of the log file.
		path: PathBuf,
		/// Underlying filesystem failure.
		#[source]
		source: std::io::Error,
	},
}
impl ConfigError {
	/// Wraps a transport builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Failures raised while exchanging credentials for a bearer token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint rejected the configured credentials.
	#[error("Token endpoint rejected the credential exchange: {reason}.")]
	Rejected {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Transport failure while calling the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token endpoint returned a response that could not be parsed.
	#[error("Token endpoint returned a malformed response.")]
	Malformed {
		/// Underlying parsing failure.
		#[source]
		source: BoxError,
	},
}
impl AuthError {
	/// Wraps a transport-specific failure raised during the token exchange.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Wraps a parse failure raised while reading the token response.
	pub fn malformed(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Malformed { source: Box::new(src) }
	}
}

/// Transport-level failures while calling the API.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{endpoint}`.")]
	Network {
		/// Endpoint the request was addressed to.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific failure for the named endpoint.
	pub fn network(
		endpoint: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint: endpoint.into(), source: Box::new(src) }
	}
}

/// Failures decoding a response body into its typed shape.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Mutation acknowledgment was not a valid response envelope.
	#[error("Response envelope could not be decoded.")]
	Envelope {
		/// Structured parsing failure naming the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Loan body could not be decoded for the state check.
	#[error("Loan record could not be decoded.")]
	Loan {
		/// Structured parsing failure naming the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
