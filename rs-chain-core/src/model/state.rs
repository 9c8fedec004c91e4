use std::collections::HashMap;
use std::hash::Hash;

use rand::Rng;

use serde::{Deserialize, Serialize};

use super::successor::SuccessorGroup;

/// One distribution entry: a successor group and how often it followed the key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transition<T> {
	pub group: SuccessorGroup<T>,
	pub occurrences: usize,
}

/// Represents a state of the chain.
///
/// A `State` corresponds to a single token (`key`) and stores all observed
/// transitions from this token to the successor groups that followed it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Predict the next successor group using weighted random sampling
///
/// ## Invariants
/// - Transitions are kept in first-seen order; sampling scans them in that order
/// - Each successor group appears in exactly one transition
/// - Each transition occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct State<T> {
	/// Token this state describes.
	key: T,
	/// Outgoing transitions in insertion order.
	transitions: Vec<Transition<T>>,
	/// Position of each group inside `transitions`. Rebuilt after loading.
	#[serde(skip, default = "HashMap::new")]
	positions: HashMap<SuccessorGroup<T>, usize>,
}

impl<T: Clone + Eq + Hash> State<T> {
	/// Creates a new empty state for the given token.
	pub fn new(key: T) -> Self {
		Self {
			key,
			transitions: Vec::new(),
			positions: HashMap::new(),
		}
	}

	pub fn key(&self) -> &T {
		&self.key
	}

	/// Transitions in insertion order.
	pub fn transitions(&self) -> &[Transition<T>] {
		&self.transitions
	}

	/// Sum of every transition's occurrence count.
	pub fn total(&self) -> usize {
		self.transitions.iter().map(|t| t.occurrences).sum()
	}

	/// Records an occurrence of a transition toward `group`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is appended with an initial count of 1.
	pub fn add_transition(&mut self, group: &[T]) {
		if let Some(&position) = self.positions.get(group) {
			self.transitions[position].occurrences += 1;
			return;
		}
		let group = SuccessorGroup::from(group);
		self.positions.insert(group.clone(), self.transitions.len());
		self.transitions.push(Transition { group, occurrences: 1 });
	}

	/// Predicts the next successor group using weighted random sampling.
	///
	/// Draws `r` in `[1, total]` and walks the transitions in insertion order,
	/// subtracting each count until `r` is exhausted. Every group therefore
	/// gets exactly `occurrences / total` of the probability mass.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&SuccessorGroup<T>> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(1..=total);
		for transition in &self.transitions {
			if r <= transition.occurrences {
				return Some(&transition.group);
			}
			r -= transition.occurrences;
		}

		// Unreachable while counts sum to `total`
		None
	}

	/// Rebuilds the group index after deserialization and checks invariants.
	///
	/// # Errors
	/// Returns a description of the first broken invariant.
	pub(crate) fn rebuild_positions(&mut self, group_size: usize) -> Result<(), String> {
		self.positions.clear();
		for (position, transition) in self.transitions.iter().enumerate() {
			if transition.occurrences == 0 {
				return Err("transition with a zero count".to_owned());
			}
			if transition.group.len() != group_size {
				return Err(format!(
					"successor group of length {}, expected {}",
					transition.group.len(),
					group_size
				));
			}
			if self.positions.insert(transition.group.clone(), position).is_some() {
				return Err("duplicate successor group".to_owned());
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn state_of(key: &'static str, groups: &[&'static str]) -> State<&'static str> {
		let mut state = State::new(key);
		for group in groups {
			state.add_transition(&[*group]);
		}
		state
	}

	#[test]
	fn test_counts_and_insertion_order() {
		let state = state_of("eat", &["fish.", "mice.", "fish.", "bread"]);
		let seen: Vec<(&str, usize)> = state
			.transitions()
			.iter()
			.map(|t| (t.group[0], t.occurrences))
			.collect();
		assert_eq!(seen, vec![("fish.", 2), ("mice.", 1), ("bread", 1)]);
		assert_eq!(state.total(), 4);
	}

	#[test]
	fn test_empty_state_predicts_nothing() {
		let state: State<&str> = State::new("alone");
		let mut rng = StdRng::seed_from_u64(1);
		assert!(state.predict(&mut rng).is_none());
	}

	#[test]
	fn test_single_transition_is_certain() {
		let state = state_of("Cats", &["eat", "eat"]);
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..50 {
			assert_eq!(state.predict(&mut rng).unwrap()[0], "eat");
		}
	}

	#[test]
	fn test_sampling_follows_counts() {
		let state = state_of("x", &["a", "b", "b", "b"]);
		let mut rng = StdRng::seed_from_u64(42);
		let draws = 20_000;
		let hits = (0..draws)
			.filter(|_| state.predict(&mut rng).unwrap()[0] == "b")
			.count();
		let frequency = hits as f64 / draws as f64;
		assert!((frequency - 0.75).abs() < 0.02, "frequency was {}", frequency);
	}

	#[test]
	fn test_same_seed_same_draws() {
		let state = state_of("x", &["a", "b", "c", "a"]);
		let mut first = StdRng::seed_from_u64(3);
		let mut second = StdRng::seed_from_u64(3);
		for _ in 0..100 {
			assert_eq!(state.predict(&mut first), state.predict(&mut second));
		}
	}

	#[test]
	fn test_rebuild_rejects_duplicates() {
		let mut state = state_of("x", &["a", "b"]);
		state.transitions[1].group = SuccessorGroup::new(vec!["a"]);
		assert!(state.rebuild_positions(1).is_err());
	}

	#[test]
	fn test_rebuild_rejects_zero_count_and_bad_length() {
		let mut state = state_of("x", &["a"]);
		state.transitions[0].occurrences = 0;
		assert!(state.rebuild_positions(1).is_err());

		let mut state = state_of("x", &["a"]);
		assert!(state.rebuild_positions(2).is_err());
	}
}
