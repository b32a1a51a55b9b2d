//! OAuth 1.0a token pairs issued during the handshake.

pub mod secret;

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Temporary credentials obtained from the request-token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
	/// Public `oauth_token` value sent to the authorization endpoint.
	pub token: String,
	/// Matching `oauth_token_secret`; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Whether the provider echoed `oauth_callback_confirmed=true`.
	pub callback_confirmed: bool,
}
impl RequestToken {
	/// Creates a request token pair.
	pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { token: token.into(), secret: TokenSecret::new(secret), callback_confirmed: false }
	}

	/// Marks whether the provider confirmed the callback URL.
	pub fn with_callback_confirmed(mut self, confirmed: bool) -> Self {
		self.callback_confirmed = confirmed;

		self
	}
}

/// Token credentials obtained from the access-token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Access `oauth_token` value.
	pub token: String,
	/// Matching `oauth_token_secret`; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Additional parameters returned alongside the token pair.
	pub params: BTreeMap<String, String>,
}
impl AccessToken {
	/// Creates an access token pair without extra parameters.
	pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { token: token.into(), secret: TokenSecret::new(secret), params: BTreeMap::new() }
	}

	/// Attaches the extra response parameters.
	pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
		self.params = params;

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_secrets() {
		let token = AccessToken::new("public-token", "very-secret");
		let rendered = format!("{token:?}");

		assert!(rendered.contains("public-token"));
		assert!(!rendered.contains("very-secret"));

		let request = RequestToken::new("request", "request-secret").with_callback_confirmed(true);

		assert!(request.callback_confirmed);
		assert!(!format!("{request:?}").contains("request-secret"));
	}
}
