//! Identity UA OAuth 1.0a authentication strategy: delegate token handshakes to a pluggable
//! OAuth1 client and fold the provider's scoped profile responses into one canonical profile.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod profile;
pub mod provider;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::AccessToken,
		flows::{AuthStrategy, Verifier, VerifyFuture},
		http::{ConsumerCredentials, ReqwestOAuth1Client},
		profile::NormalizedProfile,
		provider::ProviderDescriptor,
		store::MemoryStore,
	};

	/// Strategy type alias used by reqwest-backed integration tests.
	pub type ReqwestTestStrategy = AuthStrategy<ReqwestOAuth1Client, ProfileEchoVerifier>;

	/// Verifier that accepts every profile and hands it back as the authenticated user.
	#[derive(Clone, Debug, Default)]
	pub struct ProfileEchoVerifier;
	impl Verifier for ProfileEchoVerifier {
		type User = Option<NormalizedProfile>;

		fn verify<'a>(
			&'a self,
			_token: &'a AccessToken,
			profile: Option<NormalizedProfile>,
		) -> VerifyFuture<'a, Self::User> {
			Box::pin(async move { Ok(Some(profile)) })
		}
	}

	/// Builds a reqwest-backed OAuth1 client using fixed consumer credentials.
	pub fn test_reqwest_oauth1_client() -> ReqwestOAuth1Client {
		ReqwestOAuth1Client::new(ConsumerCredentials::new("consumer-key", "consumer-secret"))
	}

	/// Constructs an [`AuthStrategy`] backed by an in-memory request-token store, the echo verifier,
	/// and the reqwest transport used across integration tests.
	pub fn build_reqwest_test_strategy(
		descriptor: ProviderDescriptor,
	) -> (ReqwestTestStrategy, Arc<MemoryStore>) {
		let store = Arc::new(MemoryStore::default());
		let strategy = ReqwestTestStrategy::new(
			descriptor,
			test_reqwest_oauth1_client(),
			ProfileEchoVerifier,
			store.clone(),
		);

		(strategy, store)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
