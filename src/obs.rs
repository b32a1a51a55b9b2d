//! Optional observability helpers for authentication flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `identityua_auth.flow` with the `flow`
//!   and `stage` (call site) fields, nested `identityua_auth.scope` spans per profile fetch,
//!   and `warn` events where a fetch or parse fails.
//! - Enable `metrics` to increment `identityua_auth_flow_total` (labeled by `flow` +
//!   `outcome`) for every attempt and `identityua_auth_scope_fetch_total` (labeled by
//!   `scope` + `outcome`) for every scoped fetch.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Redirect leg: request token + authorization redirect.
	Authorize,
	/// Callback leg: access token exchange + verification.
	Callback,
	/// Scoped profile fetch and normalization.
	UserProfile,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::Callback => "callback",
			FlowKind::UserProfile => "user_profile",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a strategy operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Authentication failure (denied, rejected) that is not an error.
	Rejected,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Rejected => "rejected",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::UserProfile.to_string(), "user_profile");
		assert_eq!(FlowKind::Callback.as_str(), "callback");
		assert_eq!(FlowOutcome::Rejected.to_string(), "rejected");
	}
}
