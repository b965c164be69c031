//! Game strings are raw bytes. Each byte maps to the char with the same code point so that any
//! byte sequence survives a decode/encode cycle.

use std::{fmt, ops::Deref};

pub fn decode(bytes: &[u8]) -> String {
	bytes.iter().map(|&b| b as char).collect()
}

/// Chars above U+00FF have no byte form and are written as `?`.
pub fn encode(text: &str) -> Vec<u8> {
	text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect()
}

/// A string stored in a fixed byte budget.
///
/// Decoded strings keep the whole budget as read, so whatever follows the terminator (pad bytes,
/// leftovers of an older name) is written back while `text` still matches it. New or edited
/// strings are written zero-terminated and filled with the caller's pad byte.
///
/// Equality and hashing look at `text` only.
#[derive(Clone, Default)]
pub struct FixedString {
	pub text: String,
	stored: Option<Box<[u8]>>,
}

impl FixedString {
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into(), stored: None }
	}

	pub(crate) fn from_stored(stored: Box<[u8]>) -> Self {
		let end = stored.iter().position(|&b| b == 0).unwrap_or(stored.len());
		Self { text: decode(&stored[..end]), stored: Some(stored) }
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}

	/// The bytes this string was decoded from, if they are still valid for `len` bytes of the
	/// current text.
	pub fn stored_bytes(&self, len: usize) -> Option<&[u8]> {
		let stored = self.stored.as_deref().filter(|stored| stored.len() == len)?;
		let end = stored.iter().position(|&b| b == 0).unwrap_or(len);
		(stored[..end] == *encode(&self.text)).then_some(stored)
	}
}

impl Deref for FixedString {
	type Target = str;

	fn deref(&self) -> &str {
		&self.text
	}
}

impl From<&str> for FixedString {
	fn from(text: &str) -> Self {
		Self::new(text)
	}
}

impl From<String> for FixedString {
	fn from(text: String) -> Self {
		Self::new(text)
	}
}

impl PartialEq for FixedString {
	fn eq(&self, other: &Self) -> bool {
		self.text == other.text
	}
}

impl Eq for FixedString {}

impl std::hash::Hash for FixedString {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.text.hash(state);
	}
}

impl PartialEq<str> for FixedString {
	fn eq(&self, other: &str) -> bool {
		self.text == other
	}
}

impl PartialEq<&str> for FixedString {
	fn eq(&self, other: &&str) -> bool {
		self.text == *other
	}
}

impl fmt::Debug for FixedString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.text, f)
	}
}

impl fmt::Display for FixedString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn high_bytes_survive() {
		let bytes = [b'a', 0xCD, 0xFF, 0x80];
		assert_eq!(encode(&decode(&bytes)), bytes);
	}

	#[test]
	fn unmappable_chars_become_question_marks() {
		assert_eq!(encode("a\u{263A}b"), b"a?b");
	}

	#[test]
	fn stored_bytes_follow_the_text() {
		let mut name = FixedString::from_stored(Box::new(*b"eye\0old\xCD"));
		assert_eq!(name, "eye");
		assert_eq!(name.stored_bytes(8), Some(&b"eye\0old\xCD"[..]));
		assert_eq!(name.stored_bytes(16), None);
		name.text.push('s');
		assert_eq!(name.stored_bytes(8), None);
		name.text.pop();
		assert!(name.stored_bytes(8).is_some());
		assert_eq!(FixedString::new("eye").stored_bytes(8), None);
		assert_eq!(FixedString::new("eye"), name);
	}

	#[test]
	fn unterminated_budget_is_all_text() {
		let name = FixedString::from_stored(Box::new(*b"full"));
		assert_eq!(name.as_str(), "full");
		assert_eq!(name.stored_bytes(4), Some(&b"full"[..]));
	}
}
