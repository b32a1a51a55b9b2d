//! Folds two scope responses into one normalized Identity UA profile and prints it.

// crates.io
use color_eyre::Result;
// self
use identityua_auth::{
	profile::{self, ScopeResponse},
	provider::ProfileQuirks,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let uu = ScopeResponse::from_body("uu", r#"{"iupi":"1f0a-77","email":"alice@ua.pt"}"#)?;
	let courses = ScopeResponse::from_body(
		"student_courses",
		r#"{"course":"MIECT","email":"alice@student.ua.pt"}"#,
	)?;
	let merged = profile::parse(vec![uu.clone(), courses]);

	println!("Subject: {}.", merged.id_string().unwrap_or_default());
	println!("{}", serde_json::to_string_pretty(&merged)?);

	// A lone scope keeps its bare `_json`/`_raw` unless the uniform shape is requested.
	let keyed = profile::parse_with(uu, ProfileQuirks { always_key_raw_by_scope: true });

	println!("{}", serde_json::to_string_pretty(&keyed.to_json())?);

	Ok(())
}
