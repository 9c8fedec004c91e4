use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Continuation unit predicted from a single token.
///
/// Holds exactly one token for an order-1 chain, or `group_size`
/// consecutive tokens for the look-ahead variant. The length is fixed
/// model-wide at training time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SuccessorGroup<T>(Vec<T>);

impl<T> SuccessorGroup<T> {
	pub fn new(tokens: Vec<T>) -> Self {
		Self(tokens)
	}
}

impl<T: Clone> From<&[T]> for SuccessorGroup<T> {
	fn from(tokens: &[T]) -> Self {
		Self(tokens.to_vec())
	}
}

// Hashes exactly like the slice, so maps keyed by groups accept `&[T]` lookups.
impl<T> Borrow<[T]> for SuccessorGroup<T> {
	fn borrow(&self) -> &[T] {
		&self.0
	}
}

impl<T> Deref for SuccessorGroup<T> {
	type Target = [T];

	fn deref(&self) -> &[T] {
		&self.0
	}
}

/// A single-token group prints as the token, a larger one as `(a, b, c)`.
///
/// This is a plain diagnostic form: tokens are printed unquoted (trailing
/// spaces included) and a one-token group never gets tuple parentheses.
impl<T: fmt::Display> fmt::Display for SuccessorGroup<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let [single] = self.0.as_slice() {
			return write!(f, "{}", single);
		}
		write!(f, "(")?;
		for (i, token) in self.0.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{}", token)?;
		}
		write!(f, ")")
	}
}
