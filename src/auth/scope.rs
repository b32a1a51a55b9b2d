//! Ordered profile scope lists.
//!
//! Unlike OAuth 2.0 scope sets, Identity UA scopes are fetched one request at a time and the
//! order they were requested in decides which scope wins a field collision during profile
//! normalization. [`ScopeList`] therefore keeps insertion order, repeated entries included:
//! each entry is one fetch, and the entry count decides the raw payload shape.

// std
use std::slice::Iter;
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ScopeName},
};

/// Scope requested when a descriptor does not configure any.
pub const DEFAULT_SCOPE: &str = "uu";

/// Ordered list of profile scopes, one entry per fetch.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ScopeList(Vec<ScopeName>);
impl ScopeList {
	/// Creates a scope list from any iterator, preserving order and repeated entries.
	pub fn new<I, S>(scopes: I) -> Result<Self, IdentifierError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		scopes.into_iter().map(ScopeName::new).collect::<Result<Vec<_>, _>>().map(Self)
	}

	/// Returns the list holding only [`DEFAULT_SCOPE`].
	pub fn default_scope() -> Self {
		Self(vec![ScopeName::default_scope()])
	}

	/// Returns `self` when non-empty, otherwise the [`DEFAULT_SCOPE`] list.
	pub fn effective(&self) -> Self {
		if self.is_empty() { Self::default_scope() } else { self.clone() }
	}

	/// Number of entries, repeated scopes counted each time.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate.as_ref() == scope)
	}

	/// Iterator over scopes in request order.
	pub fn iter(&self) -> Iter<'_, ScopeName> {
		self.0.iter()
	}

	/// Returns the underlying slice of scopes.
	pub fn as_slice(&self) -> &[ScopeName] {
		&self.0
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for (idx, scope) in self.0.iter().enumerate() {
			if idx > 0 {
				f.write_str(",")?;
			}

			f.write_str(scope)?;
		}

		Ok(())
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = Iter<'a, ScopeName>;
	type Item = &'a ScopeName;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
impl TryFrom<Vec<String>> for ScopeList {
	type Error = IdentifierError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<ScopeList> for Vec<String> {
	fn from(value: ScopeList) -> Self {
		value.0.into_iter().map(String::from).collect()
	}
}
impl FromStr for ScopeList {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s.split(',').map(str::trim).filter(|scope| !scope.is_empty()))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keeps_request_order_and_repeated_entries() {
		let scopes = ScopeList::new(["uu", "personal", "uu", "student_courses"])
			.expect("Scope list fixture should be valid.");
		let names = scopes.iter().map(|scope| scope.as_ref()).collect::<Vec<_>>();

		assert_eq!(names, ["uu", "personal", "uu", "student_courses"]);
		assert_eq!(scopes.len(), 4);
		assert_eq!(scopes.to_string(), "uu,personal,uu,student_courses");
	}

	#[test]
	fn empty_list_falls_back_to_default_scope() {
		let empty = ScopeList::default();

		assert!(empty.is_empty());
		assert_eq!(empty.effective(), ScopeList::default_scope());
		assert!(empty.effective().contains(DEFAULT_SCOPE));

		let configured = ScopeList::new(["personal"]).expect("Scope list fixture should be valid.");

		assert_eq!(configured.effective(), configured);
	}

	#[test]
	fn rejects_invalid_entries() {
		assert!(ScopeList::new(["uu", ""]).is_err());
		assert!(ScopeList::new(["bad scope"]).is_err());
	}

	#[test]
	fn parses_comma_separated_values() {
		let scopes: ScopeList =
			"uu, personal,,".parse().expect("Comma separated scopes should parse.");

		assert_eq!(scopes.len(), 2);
		assert!(scopes.contains("personal"));
	}

	#[test]
	fn serde_preserves_order() {
		let scopes: ScopeList = serde_json::from_str("[\"personal\",\"uu\"]")
			.expect("Scope list should deserialize from a JSON array.");

		assert_eq!(
			serde_json::to_string(&scopes).expect("Scope list should serialize."),
			"[\"personal\",\"uu\"]"
		);
	}
}
