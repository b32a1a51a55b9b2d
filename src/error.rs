//! Strategy-level error types shared across flows, providers, and stores.

// self
use crate::_prelude::*;

/// Strategy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Request-token storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Response body could not be deserialized.
	#[error("Failed to parse user profile{}.", scope_suffix(.scope))]
	Deserialize {
		/// Scope whose response failed to parse, when known.
		scope: Option<String>,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The identity provider answered with an error payload.
	#[error("Identity provider returned an error: {message}.")]
	Provider {
		/// Message extracted from the provider's `<error>` element (or the raw body).
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint answered without a required field.
	#[error("Token endpoint response is missing `{field}`.")]
	MalformedTokenResponse {
		/// Missing form field.
		field: &'static str,
	},
	/// A profile-fetch stage failure wrapping the original cause.
	#[error("Failed to fetch user profile: {message}")]
	ProfileFetch {
		/// Message of the original failure.
		message: String,
		/// Original failure.
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	/// Wraps any failure raised while fetching or normalizing profile data.
	pub fn profile_fetch(source: Error) -> Self {
		Self::ProfileFetch { message: source.to_string(), source: Box::new(source) }
	}
}

/// Configuration and validation failures raised by the strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Identifier or scope failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Endpoint URL could not be assembled.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Callback URL is required to start the handshake.
	#[error("A callback URL is required to obtain a request token.")]
	MissingCallback,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

fn scope_suffix(scope: &Option<String>) -> String {
	scope.as_deref().map(|s| format!(" for scope `{s}`")).unwrap_or_default()
}
