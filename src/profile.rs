//! Profile normalization for Identity UA scope responses.
//!
//! The provider exposes user data one scope at a time (`uu`, `personal`, `student_courses`,
//! …). Each fetch yields a [`ScopeResponse`]; [`parse`] folds an ordered batch of them into a
//! single [`NormalizedProfile`]:
//!
//! - scope data is flattened into one field map, later scopes overriding earlier ones on key
//!   collisions;
//! - the `uu` scope's `iupi` field is renamed to `id` before merging;
//! - the parsed (`_json`) and unparsed (`_raw`) bodies are kept per scope, collapsing to the
//!   bare value when exactly one scope was fetched (see [`RawAggregate`]).
//!
//! Normalization is pure: no I/O, no shared state.

// crates.io
use indexmap::IndexMap;
use serde::{Serializer, ser::SerializeMap};
// self
use crate::{
	_prelude::*,
	auth::DEFAULT_SCOPE,
	provider::{PROVIDER_NAME, ProfileQuirks},
};

/// Field renamed to `id` within the `uu` scope.
pub const SUBJECT_FIELD: &str = "iupi";

const ID_FIELD: &str = "id";
const PROVIDER_FIELD: &str = "provider";
const RAW_JSON_FIELD: &str = "_json";
const RAW_BODY_FIELD: &str = "_raw";

/// One fetch result for a single requested scope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScopeResponse {
	/// Scope identifier (e.g. `uu`).
	pub scope: String,
	/// Key/value data returned for the scope.
	pub data: JsonMap<String, JsonValue>,
	/// Parsed response retained verbatim.
	#[serde(rename = "_json")]
	pub raw_json: JsonValue,
	/// Original unparsed response text.
	#[serde(rename = "_raw")]
	pub raw_body: String,
}
impl ScopeResponse {
	/// Parses a profile response body for `scope`.
	///
	/// The body must be a JSON object; anything else is reported as [`Error::Deserialize`].
	pub fn from_body(scope: impl Into<String>, body: impl Into<String>) -> Result<Self> {
		let scope = scope.into();
		let raw_body = body.into();
		let mut de = serde_json::Deserializer::from_str(&raw_body);
		let data: JsonMap<String, JsonValue> = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Deserialize { scope: Some(scope.clone()), source })?;
		let raw_json = JsonValue::Object(data.clone());

		Ok(Self { scope, data, raw_json, raw_body })
	}
}

/// Input accepted by [`parse`]: one bare record or an ordered batch.
///
/// Text blobs are accepted through [`FromStr`] and must deserialize to either shape.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProfileInput {
	/// Ordered batch of scope responses.
	Many(Vec<ScopeResponse>),
	/// Single bare scope response.
	Single(ScopeResponse),
}
impl ProfileInput {
	fn into_responses(self) -> Vec<ScopeResponse> {
		match self {
			Self::Many(responses) => responses,
			Self::Single(response) => vec![response],
		}
	}
}
impl From<ScopeResponse> for ProfileInput {
	fn from(value: ScopeResponse) -> Self {
		Self::Single(value)
	}
}
impl From<Vec<ScopeResponse>> for ProfileInput {
	fn from(value: Vec<ScopeResponse>) -> Self {
		Self::Many(value)
	}
}
impl FromStr for ProfileInput {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut de = serde_json::Deserializer::from_str(s);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Deserialize { scope: None, source })
	}
}

/// Per-scope raw payloads.
///
/// With exactly one scope the payload is exposed bare ([`RawAggregate::Single`]); otherwise it
/// is keyed by scope name in request order. A repeated scope keeps its first position and
/// its last payload. Callers that prefer a uniform shape enable
/// [`ProfileQuirks::always_key_raw_by_scope`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawAggregate<T> {
	/// Payload of the only fetched scope.
	Single(T),
	/// Payloads keyed by scope name.
	ByScope(IndexMap<String, T>),
}
impl<T> RawAggregate<T> {
	/// Returns the bare payload when exactly one scope was fetched.
	pub fn single(&self) -> Option<&T> {
		match self {
			Self::Single(value) => Some(value),
			Self::ByScope(_) => None,
		}
	}

	/// Returns the keyed payloads when the aggregate is keyed by scope.
	pub fn by_scope(&self) -> Option<&IndexMap<String, T>> {
		match self {
			Self::Single(_) => None,
			Self::ByScope(map) => Some(map),
		}
	}

	/// Looks up the payload for `scope` in a keyed aggregate.
	pub fn get(&self, scope: &str) -> Option<&T> {
		self.by_scope().and_then(|map| map.get(scope))
	}

	/// Returns true when no payload is held.
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::ByScope(map) if map.is_empty())
	}

	fn to_json(&self) -> JsonValue
	where
		T: Clone + Into<JsonValue>,
	{
		match self {
			Self::Single(value) => value.clone().into(),
			Self::ByScope(map) => JsonValue::Object(
				map.iter().map(|(scope, value)| (scope.clone(), value.clone().into())).collect(),
			),
		}
	}
}

/// Canonical user profile produced from one or more scope responses.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedProfile {
	/// Provider name; always [`PROVIDER_NAME`].
	pub provider: &'static str,
	/// Flattened scope data (includes `id` when the `uu` scope carried `iupi`).
	pub fields: JsonMap<String, JsonValue>,
	/// Parsed bodies (`_json`).
	pub raw_json: RawAggregate<JsonValue>,
	/// Unparsed bodies (`_raw`).
	pub raw_body: RawAggregate<String>,
}
impl NormalizedProfile {
	/// Subject identifier sourced from the `uu` scope's `iupi` field.
	pub fn id(&self) -> Option<&JsonValue> {
		self.fields.get(ID_FIELD)
	}

	/// Subject identifier rendered as a string (numbers are formatted).
	pub fn id_string(&self) -> Option<String> {
		match self.id()? {
			JsonValue::String(value) => Some(value.clone()),
			JsonValue::Number(value) => Some(value.to_string()),
			_ => None,
		}
	}

	/// Returns a flattened field.
	pub fn get(&self, field: &str) -> Option<&JsonValue> {
		self.fields.get(field)
	}

	/// Renders the profile as a single JSON object
	/// (`provider`, flattened fields, `_json`, `_raw`).
	pub fn to_json(&self) -> JsonValue {
		let mut object = JsonMap::with_capacity(self.fields.len() + 3);

		object.insert(PROVIDER_FIELD.to_owned(), self.provider.into());
		object.extend(self.fields.clone());
		object.insert(RAW_JSON_FIELD.to_owned(), self.raw_json.to_json());
		object.insert(RAW_BODY_FIELD.to_owned(), self.raw_body.to_json());

		JsonValue::Object(object)
	}
}
impl Serialize for NormalizedProfile {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;

		map.serialize_entry(PROVIDER_FIELD, self.provider)?;

		for (key, value) in &self.fields {
			map.serialize_entry(key, value)?;
		}

		map.serialize_entry(RAW_JSON_FIELD, &self.raw_json)?;
		map.serialize_entry(RAW_BODY_FIELD, &self.raw_body)?;
		map.end()
	}
}

/// Normalizes scope responses with the default quirks.
pub fn parse(input: impl Into<ProfileInput>) -> NormalizedProfile {
	parse_with(input, ProfileQuirks::default())
}

/// Deserializes a text blob (one record or an array of records) and normalizes it.
pub fn parse_str(input: &str) -> Result<NormalizedProfile> {
	Ok(parse(input.parse::<ProfileInput>()?))
}

/// Normalizes scope responses using the provided quirks.
pub fn parse_with(input: impl Into<ProfileInput>, quirks: ProfileQuirks) -> NormalizedProfile {
	let responses = input.into().into_responses();
	let keyed = responses.len() != 1 || quirks.always_key_raw_by_scope;
	let (raw_json, raw_body) = aggregate_raw(&responses, keyed);
	let fields = flatten(responses);

	NormalizedProfile { provider: PROVIDER_NAME, fields, raw_json, raw_body }
}

fn aggregate_raw(
	responses: &[ScopeResponse],
	keyed: bool,
) -> (RawAggregate<JsonValue>, RawAggregate<String>) {
	if let ([only], false) = (responses, keyed) {
		return (
			RawAggregate::Single(only.raw_json.clone()),
			RawAggregate::Single(only.raw_body.clone()),
		);
	}

	let mut json = IndexMap::new();
	let mut body = IndexMap::new();

	for response in responses {
		json.insert(response.scope.clone(), response.raw_json.clone());
		body.insert(response.scope.clone(), response.raw_body.clone());
	}

	(RawAggregate::ByScope(json), RawAggregate::ByScope(body))
}

fn flatten(responses: Vec<ScopeResponse>) -> JsonMap<String, JsonValue> {
	let mut fields = JsonMap::new();

	for ScopeResponse { scope, mut data, .. } in responses {
		if scope == DEFAULT_SCOPE
			&& let Some(subject) = data.shift_remove(SUBJECT_FIELD)
		{
			data.insert(ID_FIELD.to_owned(), subject);
		}

		fields.extend(data);
	}

	// Reserved keys are always overwritten by the assembled profile.
	for reserved in [PROVIDER_FIELD, RAW_JSON_FIELD, RAW_BODY_FIELD] {
		fields.shift_remove(reserved);
	}

	fields
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn response(scope: &str, data: JsonValue) -> ScopeResponse {
		let body = data.to_string();

		ScopeResponse::from_body(scope, body).expect("Scope response fixture should parse.")
	}

	#[test]
	fn single_scope_exposes_bare_raw_payloads() {
		let uu = response("uu", json!({ "iupi": "X123", "name": "Alice" }));
		let profile = parse(uu.clone());

		assert_eq!(profile.provider, "identityua");
		assert_eq!(profile.raw_json, RawAggregate::Single(uu.raw_json.clone()));
		assert_eq!(profile.raw_body, RawAggregate::Single(uu.raw_body.clone()));
		assert_eq!(profile.id(), Some(&json!("X123")));
		assert_eq!(profile.get("name"), Some(&json!("Alice")));
		assert!(profile.get("iupi").is_none());
	}

	#[test]
	fn single_element_batch_behaves_like_bare_record() {
		let uu = response("uu", json!({ "iupi": "X123" }));

		assert_eq!(parse(vec![uu.clone()]), parse(uu));
	}

	#[test]
	fn multiple_scopes_key_raw_payloads_and_later_scopes_win() {
		let uu = response("uu", json!({ "iupi": "7", "dept": "CS" }));
		let personal = response("personal", json!({ "dept": "Eng", "email": "a@b.com" }));
		let profile = parse(vec![uu.clone(), personal.clone()]);

		assert_eq!(profile.id_string().as_deref(), Some("7"));
		assert_eq!(profile.get("dept"), Some(&json!("Eng")));
		assert_eq!(profile.get("email"), Some(&json!("a@b.com")));
		assert_eq!(profile.raw_json.get("uu"), Some(&uu.raw_json));
		assert_eq!(profile.raw_json.get("personal"), Some(&personal.raw_json));
		assert_eq!(profile.raw_body.get("personal"), Some(&personal.raw_body));
		assert!(profile.raw_json.single().is_none());
		assert_eq!(
			profile.to_json(),
			json!({
				"provider": "identityua",
				"id": "7",
				"dept": "Eng",
				"email": "a@b.com",
				"_json": { "uu": { "iupi": "7", "dept": "CS" }, "personal": { "dept": "Eng", "email": "a@b.com" } },
				"_raw": { "uu": uu.raw_body, "personal": personal.raw_body },
			})
		);
	}

	#[test]
	fn merge_order_follows_request_order() {
		let personal = response("personal", json!({ "dept": "Eng" }));
		let uu = response("uu", json!({ "iupi": "7", "dept": "CS" }));
		let profile = parse(vec![personal, uu]);

		assert_eq!(profile.get("dept"), Some(&json!("CS")));
	}

	#[test]
	fn fields_and_raw_keys_keep_request_order() {
		let personal = response("personal", json!({ "zeta": 1, "alpha": 2 }));
		let uu = response("uu", json!({ "iupi": "7", "dept": "CS" }));
		let profile = parse(vec![personal, uu]);
		let fields = profile.fields.keys().map(String::as_str).collect::<Vec<_>>();
		let scopes = profile
			.raw_json
			.by_scope()
			.map(|map| map.keys().map(String::as_str).collect::<Vec<_>>());

		assert_eq!(fields, ["zeta", "alpha", "dept", "id"]);
		assert_eq!(scopes, Some(vec!["personal", "uu"]));
		assert!(
			profile
				.to_json()
				.to_string()
				.starts_with(r#"{"provider":"identityua","zeta":1,"alpha":2,"dept":"CS","id":"7","_json":{"personal""#)
		);
	}

	#[test]
	fn repeated_scope_is_keyed_once_with_the_last_payload() {
		let first = response("uu", json!({ "iupi": "1", "name": "Old" }));
		let second = response("uu", json!({ "iupi": "1", "name": "New" }));
		let profile = parse(vec![first, second.clone()]);

		assert!(profile.raw_json.single().is_none());
		assert_eq!(profile.raw_json.by_scope().map(|map| map.len()), Some(1));
		assert_eq!(profile.raw_json.get("uu"), Some(&second.raw_json));
		assert_eq!(profile.get("name"), Some(&json!("New")));
	}

	#[test]
	fn no_uu_scope_means_no_rename() {
		let personal = response("personal", json!({ "iupi": "kept", "email": "a@b.com" }));
		let profile = parse(personal);

		assert!(profile.id().is_none());
		assert_eq!(profile.get("iupi"), Some(&json!("kept")));
	}

	#[test]
	fn uu_without_iupi_does_not_synthesize_id() {
		let profile = parse(response("uu", json!({ "name": "Alice" })));

		assert!(profile.id().is_none());
		assert_eq!(profile.get("name"), Some(&json!("Alice")));
	}

	#[test]
	fn empty_batch_yields_provider_and_empty_aggregates() {
		let profile = parse(Vec::<ScopeResponse>::new());

		assert!(profile.fields.is_empty());
		assert!(profile.raw_json.is_empty());
		assert!(profile.raw_body.is_empty());
		assert!(profile.id().is_none());
		assert_eq!(profile.to_json(), json!({ "provider": "identityua", "_json": {}, "_raw": {} }));
	}

	#[test]
	fn reserved_keys_are_overridden() {
		let profile = parse(response(
			"personal",
			json!({ "provider": "spoofed", "_json": "x", "_raw": "y", "name": "Bob" }),
		));
		let rendered = profile.to_json();

		assert_eq!(rendered["provider"], json!("identityua"));
		assert_eq!(rendered["_raw"], json!(profile.raw_body.single().cloned()));
		assert_eq!(rendered["name"], json!("Bob"));
	}

	#[test]
	fn always_keyed_quirk_wraps_single_scope() {
		let uu = response("uu", json!({ "iupi": "1" }));
		let quirks = ProfileQuirks { always_key_raw_by_scope: true };
		let profile = parse_with(uu.clone(), quirks);

		assert_eq!(profile.raw_json.get("uu"), Some(&uu.raw_json));
		assert!(profile.raw_body.single().is_none());
	}

	#[test]
	fn text_blobs_are_deserialized_before_normalizing() {
		let blob = json!([
			{ "scope": "uu", "data": { "iupi": "9" }, "_json": { "iupi": "9" }, "_raw": "{\"iupi\":\"9\"}" },
			{ "scope": "personal", "data": { "email": "c@d.pt" }, "_json": { "email": "c@d.pt" }, "_raw": "{\"email\":\"c@d.pt\"}" },
		])
		.to_string();
		let profile = parse_str(&blob).expect("Array blob should parse.");

		assert_eq!(profile.id_string().as_deref(), Some("9"));
		assert_eq!(profile.get("email"), Some(&json!("c@d.pt")));

		let single = json!({ "scope": "uu", "data": { "iupi": "9" }, "_json": { "iupi": "9" }, "_raw": "{}" })
			.to_string();
		let profile = parse_str(&single).expect("Single record blob should parse.");

		assert_eq!(profile.raw_body, RawAggregate::Single("{}".to_owned()));
	}

	#[test]
	fn invalid_text_blob_is_a_deserialization_error() {
		let err = parse_str("{not json").expect_err("Malformed blob must be rejected.");

		assert!(matches!(err, Error::Deserialize { scope: None, .. }));
	}

	#[test]
	fn non_object_body_is_rejected() {
		let err = ScopeResponse::from_body("uu", "[1,2,3]")
			.expect_err("Array bodies cannot be merged into a profile.");

		assert!(matches!(err, Error::Deserialize { scope: Some(ref scope), .. } if scope == "uu"));
	}
}
