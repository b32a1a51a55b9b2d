// self
use crate::_prelude::*;

/// Provider-specific quirks that influence how profiles are normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileQuirks {
	/// Keys the `_json`/`_raw` aggregates by scope even when only one scope was fetched.
	///
	/// Disabled by default so single-scope profiles keep exposing the bare response.
	pub always_key_raw_by_scope: bool,
}
