//! Listing-resource parsing.
//!
//! A listing resource is newline-separated provider names. `#` starts a
//! comment running to end of line; surrounding whitespace is trimmed; empty
//! lines are skipped. Names must be dot-qualified identifier chains. Within
//! one resource a repeated name is silently dropped; otherwise names come out
//! in first-seen order.
//!
//! Any syntax or IO fault aborts the whole resource's contribution: the
//! caller gets the error and no names. Other resources and registry-based
//! discovery are unaffected.

use rustc_hash::FxHashSet;

use crate::core::ListingSource;
use crate::error::{LoadError, SyntaxFault};

/// Reads and parses `source`, returning provider names in first-seen order.
pub fn parse_listing(source: &dyn ListingSource) -> Result<Vec<Box<str>>, LoadError> {
	let text = source.read().map_err(|err| LoadError::ResourceIo {
		resource: source.location().into(),
		message: err.to_string().into(),
	})?;
	parse_listing_text(source.location(), &text)
}

/// Parses already-read listing text. `location` only feeds diagnostics.
pub fn parse_listing_text(location: &str, text: &str) -> Result<Vec<Box<str>>, LoadError> {
	let mut names: Vec<Box<str>> = Vec::new();
	let mut seen: FxHashSet<Box<str>> = FxHashSet::default();

	for (index, raw) in text.lines().enumerate() {
		let line = match raw.find('#') {
			Some(at) => &raw[..at],
			None => raw,
		};
		let name = line.trim();
		if name.is_empty() {
			continue;
		}
		if let Err(fault) = validate_name(name) {
			tracing::debug!(resource = location, line = index + 1, %fault, "listing rejected");
			return Err(LoadError::Syntax {
				resource: location.into(),
				line: (index + 1) as u32,
				fault,
			});
		}
		if seen.insert(name.into()) {
			names.push(name.into());
		} else {
			tracing::trace!(resource = location, provider = name, "duplicate listing entry dropped");
		}
	}

	Ok(names)
}

/// Checks the provider-name grammar: identifier-start first, then
/// identifier-continue or `.`. `_` and `$` count as identifier characters,
/// matching qualified names emitted by managed-runtime compilers.
fn validate_name(name: &str) -> Result<(), SyntaxFault> {
	let mut chars = name.chars();
	let first = chars.next().ok_or(SyntaxFault::BadIdentifierStart)?;
	if !is_ident_start(first) {
		return Err(SyntaxFault::BadIdentifierStart);
	}
	for ch in chars {
		if ch == ' ' || ch == '\t' {
			return Err(SyntaxFault::EmbeddedWhitespace);
		}
		if !is_ident_part(ch) {
			return Err(SyntaxFault::BadIdentifierPart);
		}
	}
	Ok(())
}

fn is_ident_start(ch: char) -> bool {
	unicode_ident::is_xid_start(ch) || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
	unicode_ident::is_xid_continue(ch) || ch == '_' || ch == '$' || ch == '.'
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::error::{LoadError, SyntaxFault};

	fn parse(text: &str) -> Result<Vec<Box<str>>, LoadError> {
		parse_listing_text("providers/test", text)
	}

	fn names(text: &str) -> Vec<String> {
		parse(text).unwrap().into_iter().map(String::from).collect()
	}

	#[test]
	fn plain_names_in_order() {
		assert_eq!(names("com.example.Foo\ncom.example.Bar\n"), ["com.example.Foo", "com.example.Bar"]);
	}

	#[test]
	fn comments_and_blank_lines_skipped() {
		let text = "# header\n\n  \ncom.example.Foo # tail comment\n#com.example.Bar\n";
		assert_eq!(names(text), ["com.example.Foo"]);
	}

	#[test]
	fn whitespace_trimmed() {
		assert_eq!(names("  com.example.Foo  \n\tcom.example.Bar\t\n"), ["com.example.Foo", "com.example.Bar"]);
	}

	#[test]
	fn duplicates_dropped_silently() {
		assert_eq!(names("a.Foo\na.Bar\na.Foo\n"), ["a.Foo", "a.Bar"]);
	}

	#[test]
	fn embedded_space_aborts_resource() {
		let err = parse("a.Foo\nbad name\na.Bar\n").unwrap_err();
		assert_eq!(
			err,
			LoadError::Syntax {
				resource: "providers/test".into(),
				line: 2,
				fault: SyntaxFault::EmbeddedWhitespace,
			}
		);
	}

	#[test]
	fn embedded_tab_aborts_resource() {
		let err = parse("a\tb\n").unwrap_err();
		assert!(matches!(err, LoadError::Syntax { fault: SyntaxFault::EmbeddedWhitespace, .. }));
	}

	#[test]
	fn bad_identifier_start() {
		let err = parse("1com.example.Foo\n").unwrap_err();
		assert!(matches!(err, LoadError::Syntax { line: 1, fault: SyntaxFault::BadIdentifierStart, .. }));
	}

	#[test]
	fn bad_identifier_part() {
		let err = parse("com.exa-mple.Foo\n").unwrap_err();
		assert!(matches!(err, LoadError::Syntax { fault: SyntaxFault::BadIdentifierPart, .. }));
	}

	#[test]
	fn underscore_dollar_and_unicode_accepted() {
		assert_eq!(names("_internal.$Impl\ncom.exämple.Füü\n"), ["_internal.$Impl", "com.exämple.Füü"]);
	}

	#[test]
	fn comment_glued_to_name() {
		assert_eq!(names("a.Foo#rest\n"), ["a.Foo"]);
	}

	#[test]
	fn crlf_lines_handled() {
		assert_eq!(names("a.Foo\r\na.Bar\r\n"), ["a.Foo", "a.Bar"]);
	}
}
