//! Redacting wrapper for OAuth 1.0a shared secrets.

// self
use crate::_prelude::*;

/// Shared secret (`oauth_token_secret` or consumer secret) that never prints its value.
///
/// Both halves of the HMAC-SHA1 signing key are held in this type; only
/// [`TokenSecret::expose`] yields the raw string.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a secret.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw secret for signing. Never log the result.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// True for an empty secret.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		if self.is_empty() {
			f.write_str("TokenSecret(<empty>)")
		} else {
			f.write_str("TokenSecret(<redacted>)")
		}
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
