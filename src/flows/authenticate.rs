//! Redirect and callback legs of the OAuth 1.0a handshake.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, RequestToken},
	error::ConfigError,
	flows::{AuthStrategy, Verifier},
	http::OAuth1Client,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Query parameter set by the provider when the user refuses authorization.
pub const DENIED_PARAM: &str = "denied";
/// Query parameter carrying the request token on the callback.
pub const OAUTH_TOKEN_PARAM: &str = "oauth_token";
/// Query parameter carrying the verifier on the callback.
pub const OAUTH_VERIFIER_PARAM: &str = "oauth_verifier";

/// Incoming request as seen by [`AuthStrategy::authenticate`].
///
/// Only the query string matters to the strategy; a request without any parameters starts a
/// new handshake.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
	/// Decoded query parameters. Repeated keys keep the first value.
	pub query: BTreeMap<String, String>,
}
impl AuthRequest {
	/// Creates an empty request (the redirect leg).
	pub fn new() -> Self {
		Self::default()
	}

	/// Collects the query parameters of `url`.
	pub fn from_url(url: &Url) -> Self {
		Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
	}

	/// Parses a raw `application/x-www-form-urlencoded` query string.
	pub fn from_query(query: &str) -> Self {
		Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
	}

	/// Builds a request from decoded key/value pairs.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut query = BTreeMap::new();

		for (key, value) in pairs {
			query.entry(key.into()).or_insert_with(|| value.into());
		}

		Self { query }
	}

	/// Adds or replaces a single parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());

		self
	}

	/// Returns the value of `name`, if present.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.query.get(name).map(String::as_str)
	}

	/// True when the provider signalled that the user denied access.
	///
	/// An empty `denied=` value does not count.
	pub fn is_denied(&self) -> bool {
		self.param(DENIED_PARAM).is_some_and(|value| !value.is_empty())
	}
}

/// Result of a single [`AuthStrategy::authenticate`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome<U> {
	/// The caller must redirect the user agent to this authorization URL.
	Redirect(Url),
	/// The verifier accepted the credentials.
	Success(U),
	/// Authentication failed without an error.
	Fail(FailureReason),
}
impl<U> AuthOutcome<U> {
	/// Returns the user on success.
	pub fn into_user(self) -> Option<U> {
		match self {
			Self::Success(user) => Some(user),
			_ => None,
		}
	}
}

/// Why an attempt failed without raising an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureReason {
	/// The user refused authorization at the provider.
	Denied,
	/// The verifier declined the credentials.
	Rejected,
	/// The callback referenced a request token that is unknown, consumed, or expired.
	UnknownRequestToken,
	/// The callback carried an `oauth_token` without an `oauth_verifier`.
	MissingVerifier,
}
impl FailureReason {
	/// Returns a stable, human-readable message.
	pub const fn message(self) -> &'static str {
		match self {
			Self::Denied => "User denied access.",
			Self::Rejected => "Credentials were rejected.",
			Self::UnknownRequestToken => "Unable to verify authorization request token.",
			Self::MissingVerifier => "Authorization callback is missing `oauth_verifier`.",
		}
	}
}
impl Display for FailureReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.message())
	}
}

impl<C, V> AuthStrategy<C, V>
where
	C: ?Sized + OAuth1Client,
	V: ?Sized + Verifier,
{
	/// Runs one authentication attempt for `request`.
	///
	/// A `denied` callback yields [`AuthOutcome::Fail`] with [`FailureReason::Denied`] before
	/// any collaborator is touched. Otherwise the presence of `oauth_token` selects the
	/// callback leg; its absence starts a new handshake and yields [`AuthOutcome::Redirect`].
	pub async fn authenticate(&self, request: &AuthRequest) -> Result<AuthOutcome<V::User>> {
		if request.is_denied() {
			obs::record_flow_outcome(FlowKind::Callback, FlowOutcome::Rejected);

			return Ok(AuthOutcome::Fail(FailureReason::Denied));
		}

		match request.param(OAUTH_TOKEN_PARAM) {
			Some(oauth_token) =>
				self.complete_authorization(oauth_token, request.param(OAUTH_VERIFIER_PARAM)).await,
			None => self.start_authorization().await.map(AuthOutcome::Redirect),
		}
	}

	/// Obtains a request token, stores it, and returns the provider authorization URL.
	pub async fn start_authorization(&self) -> Result<Url> {
		const KIND: FlowKind = FlowKind::Authorize;

		let span = FlowSpan::new(KIND, "start_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let callback = self.callback_url.as_ref().ok_or(ConfigError::MissingCallback)?;
				let token = self
					.client
					.request_token(&self.descriptor.endpoints.request_token, callback)
					.await
					.inspect_err(|e| obs::trace_failure(KIND, "request_token", e))?;
				let url = self.descriptor.authorization_url(&token.token);

				self.store.save(token).await?;

				Ok(url)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn complete_authorization(
		&self,
		oauth_token: &str,
		oauth_verifier: Option<&str>,
	) -> Result<AuthOutcome<V::User>> {
		const KIND: FlowKind = FlowKind::Callback;

		let span = FlowSpan::new(KIND, "complete_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let Some(oauth_verifier) = oauth_verifier else {
					return Ok(AuthOutcome::Fail(FailureReason::MissingVerifier));
				};
				let Some(request_token) = self.store.take(oauth_token).await? else {
					return Ok(AuthOutcome::Fail(FailureReason::UnknownRequestToken));
				};
				let access_token = self.exchange(&request_token, oauth_verifier).await?;
				let profile = if self.skip_user_profile {
					None
				} else {
					Some(self.user_profile(&access_token).await?)
				};

				Ok(match self.verifier.verify(&access_token, profile).await? {
					Some(user) => AuthOutcome::Success(user),
					None => AuthOutcome::Fail(FailureReason::Rejected),
				})
			})
			.await;

		match &result {
			Ok(AuthOutcome::Fail(_)) => obs::record_flow_outcome(KIND, FlowOutcome::Rejected),
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn exchange(&self, request_token: &RequestToken, verifier: &str) -> Result<AccessToken> {
		self.client
			.access_token(&self.descriptor.endpoints.access_token, request_token, verifier)
			.await
			.inspect_err(|e| obs::trace_failure(FlowKind::Callback, "access_token", e))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_from_url_reads_query() {
		let url = Url::parse("https://app.example/auth/callback?oauth_token=rt&oauth_verifier=v1")
			.expect("Callback URL should parse.");
		let request = AuthRequest::from_url(&url);

		assert_eq!(request.param(OAUTH_TOKEN_PARAM), Some("rt"));
		assert_eq!(request.param(OAUTH_VERIFIER_PARAM), Some("v1"));
		assert!(!request.is_denied());
	}

	#[test]
	fn first_value_wins_for_repeated_keys() {
		let request = AuthRequest::from_query("oauth_token=a&oauth_token=b");

		assert_eq!(request.param(OAUTH_TOKEN_PARAM), Some("a"));
	}

	#[test]
	fn denied_requires_a_value() {
		assert!(AuthRequest::from_query("denied=rt").is_denied());
		assert!(!AuthRequest::from_query("denied=").is_denied());
		assert!(!AuthRequest::new().is_denied());
	}

	#[test]
	fn outcome_exposes_user_only_on_success() {
		assert_eq!(AuthOutcome::Success(7).into_user(), Some(7));
		assert_eq!(AuthOutcome::<u8>::Fail(FailureReason::Denied).into_user(), None);
		assert_eq!(FailureReason::Denied.to_string(), "User denied access.");
	}
}
