//! Authentication flow orchestration for Identity UA.
//!
//! [`AuthStrategy`] represents one configured connection to the provider. It owns the
//! OAuth1 client, request-token store, provider descriptor, and the application's
//! [`Verifier`], and drives a single authentication attempt per
//! [`AuthStrategy::authenticate`] call:
//!
//! 1. a `denied` callback fails the attempt immediately;
//! 2. without an `oauth_token`, a request token is obtained and the caller is redirected;
//! 3. with an `oauth_token`, the token is exchanged, the scoped profile is fetched
//!    ([`AuthStrategy::user_profile`]) and handed to the verifier.

mod authenticate;
mod user_profile;

pub use authenticate::*;

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	http::OAuth1Client,
	profile::NormalizedProfile,
	provider::{DefaultProviderStrategy, ProviderDescriptor, ProviderStrategy},
	store::RequestTokenStore,
};

/// Boxed future returned by [`Verifier::verify`].
pub type VerifyFuture<'a, U> = Pin<Box<dyn Future<Output = Result<Option<U>>> + 'a + Send>>;

/// Application hook that maps provider credentials + profile to an application user.
///
/// Returning `Ok(None)` rejects the credentials (an authentication failure, not an error);
/// returning `Err` aborts the attempt with that error.
pub trait Verifier
where
	Self: Send + Sync,
{
	/// Application user type produced on success.
	type User: Send;

	/// Verifies the access token and (unless skipped) the normalized profile.
	fn verify<'a>(
		&'a self,
		token: &'a AccessToken,
		profile: Option<NormalizedProfile>,
	) -> VerifyFuture<'a, Self::User>;
}

/// Drives authentication attempts against a single Identity UA deployment.
#[derive(Clone)]
pub struct AuthStrategy<C, V>
where
	C: ?Sized + OAuth1Client,
	V: ?Sized + Verifier,
{
	/// OAuth1 client that performs the handshake and signed fetches.
	pub client: Arc<C>,
	/// Application verification hook.
	pub verifier: Arc<V>,
	/// Store carrying request tokens between the redirect and callback legs.
	pub store: Arc<dyn RequestTokenStore>,
	/// Provider descriptor that defines endpoints, scopes, and quirks.
	pub descriptor: ProviderDescriptor,
	/// Strategy used to interpret provider error payloads.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// Callback URL registered when obtaining request tokens.
	pub callback_url: Option<Url>,
	/// Skips the profile fetch; the verifier then receives `None`.
	pub skip_user_profile: bool,
}
impl<C, V> AuthStrategy<C, V>
where
	C: ?Sized + OAuth1Client,
	V: ?Sized + Verifier,
{
	/// Creates a strategy from its collaborators.
	pub fn new(
		descriptor: ProviderDescriptor,
		client: impl Into<Arc<C>>,
		verifier: impl Into<Arc<V>>,
		store: Arc<dyn RequestTokenStore>,
	) -> Self {
		Self {
			client: client.into(),
			verifier: verifier.into(),
			store,
			descriptor,
			strategy: Arc::new(DefaultProviderStrategy),
			callback_url: None,
			skip_user_profile: false,
		}
	}

	/// Sets the `oauth_callback` URL used when starting the handshake.
	pub fn with_callback_url(mut self, url: Url) -> Self {
		self.callback_url = Some(url);

		self
	}

	/// Enables or disables the profile fetch after the token exchange.
	pub fn with_skip_user_profile(mut self, skip: bool) -> Self {
		self.skip_user_profile = skip;

		self
	}

	/// Replaces the provider strategy.
	pub fn with_provider_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}

	/// Strategy name used by hosting frameworks to register it.
	///
	/// Taken from the descriptor id, which defaults to `identityua`.
	pub fn name(&self) -> &str {
		&self.descriptor.id
	}

	/// Converts a provider error body (XML with an `<error>` element) into an [`Error`].
	pub fn parse_error_response(&self, body: &str, status: Option<u16>) -> Error {
		self.strategy.parse_error_response(body, status)
	}
}
impl<C, V> Debug for AuthStrategy<C, V>
where
	C: ?Sized + OAuth1Client,
	V: ?Sized + Verifier,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthStrategy")
			.field("descriptor", &self.descriptor)
			.field("callback_url", &self.callback_url)
			.field("skip_user_profile", &self.skip_user_profile)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::{_preludet::*, flows::AuthRequest};

	#[tokio::test]
	async fn echo_strategy_completes_both_legs() {
		let server = MockServer::start_async().await;
		let base = Url::parse(&server.base_url()).expect("Mock server URL should parse.");
		let descriptor = ProviderDescriptor::builder()
			.base_url(&base)
			.expect("Mock endpoints should join onto the base URL.")
			.build()
			.expect("Descriptor should build for the mock server.");
		let (strategy, store) = build_reqwest_test_strategy(descriptor);
		let strategy = strategy.with_callback_url(
			Url::parse("https://app.example.com/callback").expect("Callback URL should parse."),
		);

		assert_eq!(strategy.name(), "identityua");

		server
			.mock_async(|when, then| {
				when.method(POST).path("/oauth/request_token");
				then.status(200).body("oauth_token=rt&oauth_token_secret=rs");
			})
			.await;
		server
			.mock_async(|when, then| {
				when.method(POST).path("/oauth/access_token");
				then.status(200).body("oauth_token=at&oauth_token_secret=as");
			})
			.await;
		server
			.mock_async(|when, then| {
				when.method(GET).path("/oauth/get_data").query_param("scope", "uu");
				then.status(200).body(r#"{"iupi":"X9","name":"Bea"}"#);
			})
			.await;

		let redirect = strategy
			.authenticate(&AuthRequest::new())
			.await
			.expect("Redirect leg should succeed.");

		assert!(matches!(redirect, AuthOutcome::Redirect(_)));
		assert_eq!(store.len(), 1);

		let user = strategy
			.authenticate(&AuthRequest::from_query("oauth_token=rt&oauth_verifier=v"))
			.await
			.expect("Callback leg should succeed.")
			.into_user()
			.flatten()
			.expect("The echo verifier should return the profile.");

		assert_eq!(user.id_string().as_deref(), Some("X9"));
		assert!(store.is_empty());
	}
}
