//! Storage contracts and the built-in store for pending request tokens.
//!
//! The OAuth 1.0a handshake spans two HTTP requests: the redirect leg obtains a request
//! token, and the callback leg needs that token's secret to sign the access-token exchange.
//! A [`RequestTokenStore`] carries the secret across the two legs.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::RequestToken};

/// Boxed future returned by [`RequestTokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for request tokens awaiting the callback leg.
pub trait RequestTokenStore
where
	Self: Send + Sync,
{
	/// Persists a request token keyed by its public `oauth_token` value.
	fn save(&self, token: RequestToken) -> StoreFuture<'_, ()>;

	/// Removes and returns the request token for `oauth_token`, if present and not expired.
	///
	/// Request tokens are single use, so a successful lookup consumes the entry.
	fn take<'a>(&'a self, oauth_token: &'a str) -> StoreFuture<'a, Option<RequestToken>>;
}

/// Error type produced by [`RequestTokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "session backend unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("session backend unreachable"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
