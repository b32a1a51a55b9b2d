//! Provider descriptor data structures and helpers shared by all flows.
//!
//! The module exposes validated metadata and supporting builder utilities so the
//! Identity UA endpoints can be overridden (staging deployments, mocks) without
//! touching the flows.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ScopeList},
};

/// Provider name reported on every normalized profile.
pub const PROVIDER_NAME: &str = "identityua";

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Request-token endpoint (first handshake leg).
	pub request_token: Url,
	/// Access-token endpoint (second handshake leg).
	pub access_token: Url,
	/// User authorization page the end user is redirected to.
	pub user_authorization: Url,
	/// Scoped profile data endpoint.
	pub user_profile: Url,
}

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Profile scopes requested after the handshake, in request order.
	///
	/// An empty list means the default `uu` scope; see [`ProviderDescriptor::effective_scopes`].
	pub scopes: ScopeList,
	/// Provider-specific quirks.
	pub quirks: ProfileQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder seeded with the Identity UA defaults.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new()
	}

	/// Builds the stock Identity UA descriptor.
	pub fn identity_ua() -> Result<Self, ProviderDescriptorError> {
		Self::builder().build()
	}

	/// Scopes that will actually be fetched (configured scopes or the `uu` default).
	pub fn effective_scopes(&self) -> ScopeList {
		self.scopes.effective()
	}

	/// Builds the profile URL for a single scope (`format=json&scope=<scope>`).
	pub fn profile_url(&self, scope: &str) -> Url {
		let mut url = self.endpoints.user_profile.clone();

		url.query_pairs_mut().append_pair("format", "json").append_pair("scope", scope);

		url
	}

	/// Builds the authorization URL the end user is redirected to for a request token.
	pub fn authorization_url(&self, request_token: &str) -> Url {
		let mut url = self.endpoints.user_authorization.clone();

		url.query_pairs_mut().append_pair("oauth_token", request_token);

		url
	}
}
