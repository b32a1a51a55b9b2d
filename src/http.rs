//! Transport primitives for the OAuth 1.0a handshake and signed profile fetches.
//!
//! The module exposes [`OAuth1Client`], the strategy's only dependency on an HTTP stack
//! and on OAuth 1.0a signing. Downstream crates can bring their own client (an existing
//! signing SDK, a recording fake in tests) while the default [`ReqwestOAuth1Client`]
//! signs requests with HMAC-SHA1 (via `oauth1-request`) over reqwest.

// crates.io
#[cfg(feature = "reqwest")]
use oauth1_request::{Builder, Credentials, request::ParameterList, signature_method::HmacSha1};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, RequestToken, TokenSecret},
};
#[cfg(feature = "reqwest")]
use crate::{
	error::{ConfigError, TransportError},
	provider::{DefaultProviderStrategy, ProviderStrategy},
};

/// Boxed future returned by [`OAuth1Client`] operations.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Abstraction over OAuth 1.0a clients capable of running the token handshake and issuing
/// signed GET requests.
///
/// Implementations own nonce generation, signature computation, and HTTP execution. They
/// must be `Send + Sync + 'static` so a single client can back many concurrent
/// authentication attempts, and the futures they return must be `Send`.
pub trait OAuth1Client
where
	Self: 'static + Send + Sync,
{
	/// Obtains temporary credentials from `endpoint`, registering `callback` as the
	/// `oauth_callback`.
	fn request_token<'a>(
		&'a self,
		endpoint: &'a Url,
		callback: &'a Url,
	) -> ClientFuture<'a, RequestToken>;

	/// Exchanges an authorized request token plus `oauth_verifier` for token credentials.
	fn access_token<'a>(
		&'a self,
		endpoint: &'a Url,
		request_token: &'a RequestToken,
		verifier: &'a str,
	) -> ClientFuture<'a, AccessToken>;

	/// Performs a signed GET request using the provided token credentials.
	///
	/// Transport failures are reported as errors; any HTTP response (success or not) is
	/// returned as a [`FetchResponse`] so callers can interpret provider error payloads.
	fn get<'a>(&'a self, url: &'a Url, token: &'a AccessToken) -> ClientFuture<'a, FetchResponse>;
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}
impl FetchResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Consumer key and secret identifying the application to the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerCredentials {
	/// Public consumer key.
	pub key: String,
	/// Consumer secret; callers must avoid logging it.
	pub secret: TokenSecret,
}
impl ConsumerCredentials {
	/// Creates consumer credentials.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { key: key.into(), secret: TokenSecret::new(secret) }
	}
}

/// Reqwest-backed [`OAuth1Client`] that signs every request with HMAC-SHA1.
///
/// Token endpoints are called with `POST` and must answer with form-encoded bodies;
/// non-success token responses are interpreted by the configured [`ProviderStrategy`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestOAuth1Client {
	client: ReqwestClient,
	consumer: ConsumerCredentials,
	strategy: Arc<dyn ProviderStrategy>,
}
#[cfg(feature = "reqwest")]
impl ReqwestOAuth1Client {
	/// Creates a client with a default reqwest handle.
	pub fn new(consumer: ConsumerCredentials) -> Self {
		Self::with_client(ReqwestClient::new(), consumer)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, consumer: ConsumerCredentials) -> Self {
		Self { client, consumer, strategy: Arc::new(DefaultProviderStrategy) }
	}

	/// Builds a client from a reqwest builder, surfacing build failures as config errors.
	pub fn from_builder(
		builder: reqwest::ClientBuilder,
		consumer: ConsumerCredentials,
	) -> Result<Self> {
		let client = builder.build().map_err(ConfigError::http_client_build)?;

		Ok(Self::with_client(client, consumer))
	}

	/// Replaces the strategy used to interpret token endpoint errors.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}

	/// Consumer credentials used for signing.
	pub fn consumer(&self) -> &ConsumerCredentials {
		&self.consumer
	}

	/// Builds the `Authorization: OAuth ...` header value for one request.
	///
	/// Query parameters of `url` are signed together with the protocol parameters.
	fn authorization(&self, method: &str, url: &Url, params: &OAuthParams<'_>) -> String {
		let mut builder = Builder::new(
			Credentials::new(self.consumer.key.as_str(), self.consumer.secret.expose()),
			HmacSha1::new(),
		);

		if let Some((token, secret)) = params.token {
			builder.token(Credentials::new(token, secret));
		}

		builder.callback(params.callback).verifier(params.verifier);

		let mut base = url.clone();
		let mut query = url.query_pairs().into_owned().collect::<Vec<_>>();

		base.set_query(None);
		base.set_fragment(None);
		query.sort();

		builder.authorize(method, base.as_str(), &ParameterList::new(query))
	}

	async fn execute(
		&self,
		method: reqwest::Method,
		url: &Url,
		params: OAuthParams<'_>,
	) -> Result<FetchResponse> {
		let authorization = self.authorization(method.as_str(), url, &params);
		let response = self
			.client
			.request(method, url.clone())
			.header(reqwest::header::AUTHORIZATION, authorization)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let body = response.text().await.map_err(TransportError::from)?;

		Ok(FetchResponse { status, body })
	}

	async fn token_request(
		&self,
		endpoint: &Url,
		params: OAuthParams<'_>,
	) -> Result<BTreeMap<String, String>> {
		let response = self.execute(reqwest::Method::POST, endpoint, params).await?;

		if !response.is_success() {
			return Err(self.strategy.parse_error_response(&response.body, Some(response.status)));
		}

		Ok(url::form_urlencoded::parse(response.body.as_bytes()).into_owned().collect())
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestOAuth1Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestOAuth1Client").field("consumer", &self.consumer).finish()
	}
}
#[cfg(feature = "reqwest")]
impl OAuth1Client for ReqwestOAuth1Client {
	fn request_token<'a>(
		&'a self,
		endpoint: &'a Url,
		callback: &'a Url,
	) -> ClientFuture<'a, RequestToken> {
		Box::pin(async move {
			let params = OAuthParams { callback: Some(callback.as_str()), ..Default::default() };
			let mut form = self.token_request(endpoint, params).await?;
			let token = take_field(&mut form, "oauth_token")?;
			let secret = take_field(&mut form, "oauth_token_secret")?;
			let confirmed =
				form.get("oauth_callback_confirmed").is_some_and(|value| value == "true");

			Ok(RequestToken::new(token, secret).with_callback_confirmed(confirmed))
		})
	}

	fn access_token<'a>(
		&'a self,
		endpoint: &'a Url,
		request_token: &'a RequestToken,
		verifier: &'a str,
	) -> ClientFuture<'a, AccessToken> {
		Box::pin(async move {
			let params = OAuthParams {
				token: Some((&request_token.token, request_token.secret.expose())),
				verifier: Some(verifier),
				..Default::default()
			};
			let mut form = self.token_request(endpoint, params).await?;
			let token = take_field(&mut form, "oauth_token")?;
			let secret = take_field(&mut form, "oauth_token_secret")?;

			Ok(AccessToken::new(token, secret).with_params(form))
		})
	}

	fn get<'a>(&'a self, url: &'a Url, token: &'a AccessToken) -> ClientFuture<'a, FetchResponse> {
		Box::pin(async move {
			let params = OAuthParams {
				token: Some((&token.token, token.secret.expose())),
				..Default::default()
			};

			self.execute(reqwest::Method::GET, url, params).await
		})
	}
}

/// OAuth protocol parameters that vary per request.
#[cfg(feature = "reqwest")]
#[derive(Default)]
struct OAuthParams<'a> {
	token: Option<(&'a str, &'a str)>,
	callback: Option<&'a str>,
	verifier: Option<&'a str>,
}

#[cfg(feature = "reqwest")]
fn take_field(form: &mut BTreeMap<String, String>, field: &'static str) -> Result<String> {
	form.remove(field)
		.filter(|value| !value.is_empty())
		.ok_or(Error::MalformedTokenResponse { field })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn fetch_response_success_range() {
		assert!(FetchResponse::new(200, "{}").is_success());
		assert!(FetchResponse::new(204, "").is_success());
		assert!(!FetchResponse::new(302, "").is_success());
		assert!(!FetchResponse::new(401, "<error/>").is_success());
	}

	#[test]
	fn consumer_credentials_redact_secret() {
		let consumer = ConsumerCredentials::new("key", "hush");

		assert!(!format!("{consumer:?}").contains("hush"));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn take_field_rejects_missing_and_empty_values() {
		let mut form = BTreeMap::from([
			("oauth_token".to_owned(), "abc".to_owned()),
			("oauth_token_secret".to_owned(), String::new()),
		]);

		assert_eq!(take_field(&mut form, "oauth_token").ok().as_deref(), Some("abc"));
		assert!(matches!(
			take_field(&mut form, "oauth_token_secret"),
			Err(Error::MalformedTokenResponse { field: "oauth_token_secret" })
		));
		assert!(take_field(&mut form, "oauth_token").is_err());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn authorization_header_carries_protocol_parameters() {
		let client =
			ReqwestOAuth1Client::new(ConsumerCredentials::new("consumer-key", "consumer-secret"));
		let url = Url::parse("http://identity.ua.pt/oauth/get_data?format=json&scope=uu")
			.expect("Test URL should parse.");
		let header = client.authorization(
			"GET",
			&url,
			&OAuthParams { token: Some(("at-1", "at-secret")), ..Default::default() },
		);

		assert!(header.starts_with("OAuth "));
		assert!(header.contains("oauth_consumer_key=\"consumer-key\""));
		assert!(header.contains("oauth_token=\"at-1\""));
		assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
		assert!(header.contains("oauth_signature="));
		assert!(!header.contains("consumer-secret"));
		assert!(!header.contains("at-secret"));

		let callback = Url::parse("https://app.example.com/cb").expect("Test URL should parse.");
		let params = OAuthParams {
			callback: Some(callback.as_str()),
			verifier: Some("v-1"),
			..Default::default()
		};
		let header = client.authorization("POST", &url, &params);

		assert!(header.contains("oauth_callback=\"https%3A%2F%2Fapp.example.com%2Fcb\""));
		assert!(header.contains("oauth_verifier=\"v-1\""));
		assert!(!header.contains("oauth_token="));
	}
}
