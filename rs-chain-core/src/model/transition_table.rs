use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};
use super::state::State;
use super::successor::SuccessorGroup;

/// Learned mapping from a token to the weighted groups that followed it.
///
/// # Invariants
/// - `group_size` is always >= 1 and every stored group has that length
/// - Each token owns at most one `State`
/// - States are kept in first-seen order (observable through the readable dump)
/// - The table is only mutated by training; sampling never changes it
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TransitionTable<T> {
	/// Number of tokens predicted as one continuation unit.
	group_size: usize,

	/// Per-token distributions in first-seen order.
	states: Vec<State<T>>,

	/// Position of each token inside `states`. Rebuilt after loading.
	#[serde(skip, default = "HashMap::new")]
	index: HashMap<T, usize>,
}

impl<T: Clone + Eq + Hash> TransitionTable<T> {
	/// Creates an empty table predicting groups of `group_size` tokens.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `group_size` is 0.
	pub fn new(group_size: usize) -> Result<Self> {
		if group_size == 0 {
			return Err(ChainError::InvalidConfig("group size must be >= 1".to_owned()));
		}
		Ok(Self { group_size, states: Vec::new(), index: HashMap::new() })
	}

	pub fn group_size(&self) -> usize {
		self.group_size
	}

	/// Number of tokens with at least one transition.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Iterates over states in table order.
	pub fn states(&self) -> impl Iterator<Item = &State<T>> {
		self.states.iter()
	}

	/// Returns the distribution of `token`, if it was ever followed by a full group.
	pub fn get<Q>(&self, token: &Q) -> Option<&State<T>>
	where
		T: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.index.get(token).map(|&position| &self.states[position])
	}

	/// Draws a successor group for `token` proportionally to observed counts.
	///
	/// Returns `None` when `token` has no transitions.
	pub fn sample_next<Q, R>(&self, token: &Q, rng: &mut R) -> Option<&SuccessorGroup<T>>
	where
		T: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
		R: Rng + ?Sized,
	{
		self.get(token)?.predict(rng)
	}

	/// Counts one occurrence of `group` following `token`.
	pub(crate) fn observe(&mut self, token: &T, group: &[T]) {
		let position = match self.index.get(token) {
			Some(&position) => position,
			None => {
				self.index.insert(token.clone(), self.states.len());
				self.states.push(State::new(token.clone()));
				self.states.len() - 1
			}
		};
		self.states[position].add_transition(group);
	}

	/// Rebuilds the token and group indexes after deserialization.
	///
	/// # Errors
	/// Returns a description of the first broken invariant.
	pub(crate) fn rebuild_index(&mut self) -> std::result::Result<(), String> {
		if self.group_size == 0 {
			return Err("group size of 0".to_owned());
		}
		self.index.clear();
		for (position, state) in self.states.iter_mut().enumerate() {
			state.rebuild_positions(self.group_size)?;
			if self.index.insert(state.key().clone(), position).is_some() {
				return Err("duplicate token state".to_owned());
			}
		}
		Ok(())
	}
}

/// Readable dump: one line per token in table order,
/// `<token> : <group> (<count>) <group> (<count>) `.
impl<T: fmt::Display + Clone + Eq + Hash> fmt::Display for TransitionTable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for state in &self.states {
			write!(f, "{} : ", state.key())?;
			for transition in state.transitions() {
				write!(f, "{} ({}) ", transition.group, transition.occurrences)?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn test_zero_group_size_is_rejected() {
		assert!(matches!(
			TransitionTable::<String>::new(0),
			Err(ChainError::InvalidConfig(_))
		));
	}

	#[test]
	fn test_states_keep_first_seen_order() {
		let mut table = TransitionTable::new(1).unwrap();
		table.observe(&"b", &["x"]);
		table.observe(&"a", &["y"]);
		table.observe(&"b", &["z"]);
		let keys: Vec<&str> = table.states().map(|s| *s.key()).collect();
		assert_eq!(keys, vec!["b", "a"]);
		assert_eq!(table.get(&"b").unwrap().total(), 2);
	}

	#[test]
	fn test_borrowed_lookup_on_owned_tokens() {
		let mut table = TransitionTable::new(1).unwrap();
		table.observe(&"eat".to_owned(), &["fish.".to_owned()]);
		assert!(table.get("eat").is_some());
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(table.sample_next("eat", &mut rng).unwrap()[0], "fish.");
	}

	#[test]
	fn test_unknown_token_is_not_found() {
		let table: TransitionTable<String> = TransitionTable::new(1).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		assert!(table.sample_next("nobody", &mut rng).is_none());
	}

	#[test]
	fn test_display_lists_entries_in_order() {
		let mut table = TransitionTable::new(1).unwrap();
		table.observe(&"eat", &["fish."]);
		table.observe(&"Cats", &["eat"]);
		table.observe(&"eat", &["mice."]);
		table.observe(&"eat", &["fish."]);
		assert_eq!(table.to_string(), "eat : fish. (2) mice. (1) \nCats : eat (1) \n");

		let empty: TransitionTable<String> = TransitionTable::new(2).unwrap();
		assert_eq!(empty.to_string(), "");
	}

	#[test]
	fn test_rebuild_index_detects_duplicate_tokens() {
		let mut table = TransitionTable::new(1).unwrap();
		table.observe(&"a", &["x"]);
		let duplicate = table.states[0].clone();
		table.states.push(duplicate);
		assert!(table.rebuild_index().is_err());
	}
}
