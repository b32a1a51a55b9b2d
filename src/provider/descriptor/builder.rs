// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ProviderId, ScopeList},
	provider::{PROVIDER_NAME, ProfileQuirks, ProviderDescriptor, ProviderEndpoints},
};

/// Default request-token endpoint.
pub const DEFAULT_REQUEST_TOKEN_URL: &str = "http://identity.ua.pt/oauth/request_token";
/// Default access-token endpoint.
pub const DEFAULT_ACCESS_TOKEN_URL: &str = "http://identity.ua.pt/oauth/access_token";
/// Default user authorization endpoint.
pub const DEFAULT_USER_AUTHORIZATION_URL: &str = "http://identity.ua.pt/oauth/authorize";
/// Default scoped profile endpoint.
pub const DEFAULT_USER_PROFILE_URL: &str = "http://identity.ua.pt/oauth/get_data";

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Descriptor identifier is invalid.
	#[error(transparent)]
	InvalidId(#[from] IdentifierError),
	/// Endpoint URL could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTP(S).
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
///
/// Every endpoint left unset falls back to the public identity.ua.pt URL.
#[derive(Debug, Default)]
pub struct ProviderDescriptorBuilder {
	/// Optional identifier override (defaults to `identityua`).
	pub id: Option<ProviderId>,
	/// Request-token endpoint override.
	pub request_token_endpoint: Option<Url>,
	/// Access-token endpoint override.
	pub access_token_endpoint: Option<Url>,
	/// User authorization endpoint override.
	pub user_authorization_endpoint: Option<Url>,
	/// Profile endpoint override.
	pub user_profile_endpoint: Option<Url>,
	/// Scopes to request, in order.
	pub scopes: ScopeList,
	/// Provider-specific quirks.
	pub quirks: ProfileQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder with no overrides.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the descriptor identifier.
	pub fn id(mut self, id: ProviderId) -> Self {
		self.id = Some(id);

		self
	}

	/// Sets the request-token endpoint.
	pub fn request_token_endpoint(mut self, url: Url) -> Self {
		self.request_token_endpoint = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Sets the user authorization endpoint.
	pub fn user_authorization_endpoint(mut self, url: Url) -> Self {
		self.user_authorization_endpoint = Some(url);

		self
	}

	/// Sets the scoped profile endpoint.
	pub fn user_profile_endpoint(mut self, url: Url) -> Self {
		self.user_profile_endpoint = Some(url);

		self
	}

	/// Sets every endpoint relative to a base URL using the stock `/oauth/*` paths.
	pub fn base_url(self, base: &Url) -> Result<Self, ProviderDescriptorError> {
		let join = |endpoint: &'static str, path: &str| {
			base.join(path).map_err(|source| ProviderDescriptorError::InvalidEndpoint {
				endpoint,
				source,
			})
		};

		Ok(self
			.request_token_endpoint(join("request_token", "/oauth/request_token")?)
			.access_token_endpoint(join("access_token", "/oauth/access_token")?)
			.user_authorization_endpoint(join("user_authorization", "/oauth/authorize")?)
			.user_profile_endpoint(join("user_profile", "/oauth/get_data")?))
	}

	/// Replaces the requested scopes.
	pub fn scopes(mut self, scopes: ScopeList) -> Self {
		self.scopes = scopes;

		self
	}

	/// Overrides the quirk set.
	pub fn quirks(mut self, quirks: ProfileQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let id = match self.id {
			Some(id) => id,
			None => ProviderId::new(PROVIDER_NAME)?,
		};
		let endpoints = ProviderEndpoints {
			request_token: resolve(
				"request_token",
				self.request_token_endpoint,
				DEFAULT_REQUEST_TOKEN_URL,
			)?,
			access_token: resolve(
				"access_token",
				self.access_token_endpoint,
				DEFAULT_ACCESS_TOKEN_URL,
			)?,
			user_authorization: resolve(
				"user_authorization",
				self.user_authorization_endpoint,
				DEFAULT_USER_AUTHORIZATION_URL,
			)?,
			user_profile: resolve(
				"user_profile",
				self.user_profile_endpoint,
				DEFAULT_USER_PROFILE_URL,
			)?,
		};

		Ok(ProviderDescriptor { id, endpoints, scopes: self.scopes, quirks: self.quirks })
	}
}

fn resolve(
	endpoint: &'static str,
	configured: Option<Url>,
	fallback: &str,
) -> Result<Url, ProviderDescriptorError> {
	let url = match configured {
		Some(url) => url,
		None => Url::parse(fallback)
			.map_err(|source| ProviderDescriptorError::InvalidEndpoint { endpoint, source })?,
	};

	if !matches!(url.scheme(), "http" | "https") {
		return Err(ProviderDescriptorError::UnsupportedScheme { endpoint, url: url.to_string() });
	}

	Ok(url)
}
