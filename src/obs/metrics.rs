// self
use crate::obs::{FlowKind, FlowOutcome};

/// Increments `identityua_auth_flow_total{flow, outcome}` (when metrics are enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"identityua_auth_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Increments `identityua_auth_scope_fetch_total{scope, outcome}` for one profile fetch.
///
/// The `scope` label takes values from the configured scope list only.
pub fn record_scope_fetch(scope: &str, succeeded: bool) {
	#[cfg(feature = "metrics")]
	{
		let outcome = if succeeded { FlowOutcome::Success } else { FlowOutcome::Failure };

		metrics::counter!(
			"identityua_auth_scope_fetch_total",
			"scope" => scope.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (scope, succeeded);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_callable_without_a_global_recorder() {
		record_flow_outcome(FlowKind::Callback, FlowOutcome::Rejected);
		record_scope_fetch("student_courses", false);
	}
}
