//! Provider strategy hooks that interpret error payloads.
//!
//! Identity UA reports failures as small XML documents (`<response><error>…</error></response>`).
//! Implementations turn such bodies into crate errors without tying flows to any particular
//! HTTP client.

// crates.io
use quick_xml::{Reader, events::Event};
// self
use crate::_prelude::*;

/// Strategy hook that allows providers to interpret error responses.
///
/// Implementors are required to be `Send + Sync`; the default method delegates to
/// [`parse_error_response`], which is what Identity UA needs.
pub trait ProviderStrategy: Send + Sync {
	/// Converts a non-success response body into an [`Error`].
	fn parse_error_response(&self, body: &str, status: Option<u16>) -> Error {
		parse_error_response(body, status)
	}
}

/// Default strategy for the stock Identity UA deployment.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("identityua-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {}

/// Extracts the `<error>` element text from an XML body, falling back to the raw body.
pub fn parse_error_response(body: &str, status: Option<u16>) -> Error {
	let message = extract_error_text(body).unwrap_or_else(|| body.to_owned());

	Error::Provider { message, status }
}

fn extract_error_text(body: &str) -> Option<String> {
	let mut reader = Reader::from_str(body);

	reader.config_mut().trim_text(true);

	let mut depth = 0_usize;
	let mut text = String::new();

	loop {
		match reader.read_event().ok()? {
			Event::Start(e) if depth == 0 && e.local_name().as_ref() == b"error" => depth = 1,
			Event::Start(_) if depth > 0 => depth += 1,
			Event::End(_) if depth > 0 => {
				depth -= 1;

				if depth == 0 {
					break;
				}
			},
			Event::Text(t) if depth > 0 => text.push_str(&t.unescape().ok()?),
			Event::CData(c) if depth > 0 => text.push_str(&String::from_utf8_lossy(&c)),
			Event::Eof => break,
			_ => {},
		}
	}

	let text = text.trim();

	if text.is_empty() { None } else { Some(text.to_owned()) }
}
