use regex::Regex;

use crate::error::Result;

/// Words and apostrophes, punctuation dropped. Suits order-1 chains.
pub const WORD_PATTERN: &str = r"[\w']+";

/// A word plus the single character following it (space, comma, period...).
///
/// Tokens keep their own trailing separator, which is what lets the
/// sentence-count policy concatenate them directly.
pub const WORD_WITH_TRAILER_PATTERN: &str = r"\w+.";

/// Whitespace-separated chunks, punctuation kept attached.
pub const WHITESPACE_PATTERN: &str = r"\S+";

/// Extracts ordered token sequences from raw text with a regular expression.
#[derive(Clone, Debug)]
pub struct Tokenizer {
	pattern: Regex,
}

impl Default for Tokenizer {
	fn default() -> Self {
		// Constant pattern, always compiles
		Self { pattern: Regex::new(WORD_PATTERN).expect("word pattern is valid") }
	}
}

impl Tokenizer {
	/// Compiles `pattern` into a tokenizer.
	///
	/// # Errors
	/// Returns `InvalidPattern` if the expression does not compile.
	pub fn new(pattern: &str) -> Result<Self> {
		Ok(Self { pattern: Regex::new(pattern)? })
	}

	pub fn pattern(&self) -> &str {
		self.pattern.as_str()
	}

	/// Returns every non-overlapping match of the pattern, in text order.
	pub fn tokenize(&self, contents: &str) -> Vec<String> {
		self.pattern
			.find_iter(contents)
			.map(|m| m.as_str().to_owned())
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_word_pattern_drops_punctuation() {
		let tokens = Tokenizer::default().tokenize("Don't stop, Cats eat fish.");
		assert_eq!(tokens, vec!["Don't", "stop", "Cats", "eat", "fish"]);
	}

	#[test]
	fn test_trailer_pattern_keeps_separators() {
		let tokenizer = Tokenizer::new(WORD_WITH_TRAILER_PATTERN).unwrap();
		let tokens = tokenizer.tokenize("Hello, world. Bye!");
		assert_eq!(tokens, vec!["Hello,", "world.", "Bye!"]);
		assert_eq!(tokenizer.tokenize("Cats eat fish."), vec!["Cats ", "eat ", "fish."]);
	}

	#[test]
	fn test_whitespace_pattern() {
		let tokenizer = Tokenizer::new(WHITESPACE_PATTERN).unwrap();
		assert_eq!(
			tokenizer.tokenize("Cats eat fish.\nCats  eat mice."),
			vec!["Cats", "eat", "fish.", "Cats", "eat", "mice."]
		);
	}

	#[test]
	fn test_invalid_pattern() {
		assert!(Tokenizer::new("[unclosed").is_err());
	}

	#[test]
	fn test_empty_text() {
		assert!(Tokenizer::default().tokenize("").is_empty());
	}
}
