//! Concurrent scoped profile retrieval.
//!
//! Identity UA serves each scope from its own request, so [`AuthStrategy::user_profile`]
//! issues one signed GET per effective scope, all in flight at once, and folds the
//! responses (in configured scope order) into a [`NormalizedProfile`]. The first fetch to fail
//! decides the error; fetches still in flight run to completion and their results are discarded.

// crates.io
use futures::stream::{FuturesUnordered, StreamExt};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeList, ScopeName},
	flows::{AuthStrategy, Verifier},
	http::OAuth1Client,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	profile::{self, NormalizedProfile, ScopeResponse},
};

const KIND: FlowKind = FlowKind::UserProfile;

impl<C, V> AuthStrategy<C, V>
where
	C: ?Sized + OAuth1Client,
	V: ?Sized + Verifier,
{
	/// Fetches and normalizes the user's profile across the configured scopes.
	///
	/// An empty scope list falls back to `uu`. Every failure is reported as
	/// [`Error::ProfileFetch`] wrapping the original cause.
	pub async fn user_profile(&self, token: &AccessToken) -> Result<NormalizedProfile> {
		let span = FlowSpan::new(KIND, "user_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let scopes = self.descriptor.effective_scopes();
				let responses = self.fetch_all(&scopes, token).await.map_err(Error::profile_fetch)?;

				Ok(profile::parse_with(responses, self.descriptor.quirks))
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Polls every scope fetch to completion and returns the responses in scope order, or the
	/// error of the fetch that failed first.
	async fn fetch_all(
		&self,
		scopes: &ScopeList,
		token: &AccessToken,
	) -> Result<Vec<ScopeResponse>> {
		let mut pending = scopes
			.iter()
			.enumerate()
			.map(|(idx, scope)| async move { (idx, self.fetch_scope(scope, token).await) })
			.collect::<FuturesUnordered<_>>();
		let mut slots = Vec::new();
		let mut first_error = None;

		slots.resize_with(scopes.len(), || None);

		while let Some((idx, result)) = pending.next().await {
			match result {
				Ok(response) => slots[idx] = Some(response),
				Err(e) if first_error.is_none() => first_error = Some(e),
				Err(_) => {},
			}
		}

		match first_error {
			Some(e) => Err(e),
			None => Ok(slots.into_iter().flatten().collect()),
		}
	}

	async fn fetch_scope(&self, scope: &ScopeName, token: &AccessToken) -> Result<ScopeResponse> {
		let result = FlowSpan::scope(scope)
			.instrument(async {
				let url = self.descriptor.profile_url(scope);
				let response = self
					.client
					.get(&url, token)
					.await
					.inspect_err(|e| obs::trace_failure(KIND, "fetch_scope", e))?;

				if !response.is_success() {
					let e =
						self.strategy.parse_error_response(&response.body, Some(response.status));

					obs::trace_failure(KIND, "fetch_scope", &e);

					return Err(e);
				}

				ScopeResponse::from_body(scope.to_string(), response.body)
					.inspect_err(|e| obs::trace_failure(KIND, "parse_scope", e))
			})
			.await;

		obs::record_scope_fetch(scope, result.is_ok());

		result
	}
}
