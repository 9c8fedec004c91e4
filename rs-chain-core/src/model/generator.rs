use std::hash::Hash;

use log::{debug, warn};
use rand::Rng;

use crate::error::{ChainError, Result};
use super::generation_input::{GenerationInput, LookupKey, StopPolicy};
use super::transition_table::TransitionTable;

/// Characters closing a sentence.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Characters after which the sentence policy inserts a space.
pub const CLAUSE_SEPARATORS: [char; 3] = [':', ';', ','];

fn starts_uppercase(token: &str) -> bool {
	token.chars().next().is_some_and(char::is_uppercase)
}

fn ends_with_any(text: &str, chars: &[char]) -> bool {
	text.chars().last().is_some_and(|c| chars.contains(&c))
}

/// Picks a random corpus token whose first character is uppercase.
///
/// Draws up to `max_attempts` uniform positions first. If none qualifies,
/// picks uniformly among all qualifying positions, which keeps the same
/// distribution as unbounded rejection sampling.
///
/// # Errors
/// - `EmptyCorpus` if `corpus` is empty
/// - `NoStartToken` if no token starts with an uppercase character
pub fn select_start_token<'a, T, R>(corpus: &'a [T], max_attempts: usize, rng: &mut R) -> Result<&'a T>
where
	T: AsRef<str>,
	R: Rng + ?Sized,
{
	if corpus.is_empty() {
		return Err(ChainError::EmptyCorpus);
	}

	for _ in 0..max_attempts {
		let token = &corpus[rng.random_range(0..corpus.len())];
		if starts_uppercase(token.as_ref()) {
			return Ok(token);
		}
	}

	let candidates: Vec<&T> = corpus.iter().filter(|t| starts_uppercase(t.as_ref())).collect();
	if candidates.is_empty() {
		return Err(ChainError::NoStartToken { tokens: corpus.len() });
	}
	warn!(
		"No start token after {} draws, picking among {} candidates",
		max_attempts,
		candidates.len()
	);
	Ok(candidates[rng.random_range(0..candidates.len())])
}

/// Picks a random uppercase-leading token among the keys of `table`.
///
/// # Errors
/// Returns `NoStartToken` if no key starts with an uppercase character.
pub fn select_start_key<'a, T, R>(table: &'a TransitionTable<T>, rng: &mut R) -> Result<&'a T>
where
	T: AsRef<str> + Clone + Eq + Hash,
	R: Rng + ?Sized,
{
	let candidates: Vec<&T> = table
		.states()
		.map(|state| state.key())
		.filter(|key| starts_uppercase(key.as_ref()))
		.collect();
	if candidates.is_empty() {
		return Err(ChainError::NoStartToken { tokens: table.len() });
	}
	Ok(candidates[rng.random_range(0..candidates.len())])
}

/// Walks the chain from `start`, appending at most `length` tokens.
///
/// Each appended token is separated by a single space and becomes the
/// current token. The walk stops early, without error, on a token that has
/// no transitions.
pub fn generate_fixed_length<T, R>(
	table: &TransitionTable<T>,
	start: &T,
	length: usize,
	rng: &mut R,
) -> String
where
	T: AsRef<str> + Clone + Eq + Hash,
	R: Rng + ?Sized,
{
	let mut output = start.as_ref().to_owned();
	let mut current = start;
	let mut appended = 0;

	'walk: while appended < length {
		let Some(group) = table.sample_next(current, rng) else {
			debug!("No transition after {} tokens", appended);
			break;
		};
		for token in group.iter() {
			if appended == length {
				break 'walk;
			}
			output.push(' ');
			output.push_str(token.as_ref());
			appended += 1;
			current = token;
		}
	}
	output
}

/// Walks the chain from `start` until `sentence_count` sentences are produced.
///
/// For each token of a sampled group:
/// - after a sentence terminator, the terminator is counted; once the count
///   reaches `sentence_count` the walk ends, otherwise a space and the token
///   are appended
/// - after `:`, `;` or `,`, a space and the token are appended
/// - otherwise the token is concatenated directly; tokens are expected to
///   carry their own trailing separator (see `WORD_WITH_TRAILER_PATTERN`)
///
/// The walk also ends on a token without transitions, or after `max_steps`
/// sampling steps when set.
pub fn generate_sentences<T, R>(
	table: &TransitionTable<T>,
	start: &T,
	sentence_count: usize,
	lookup: LookupKey,
	max_steps: Option<usize>,
	rng: &mut R,
) -> String
where
	T: AsRef<str> + Clone + Eq + Hash,
	R: Rng + ?Sized,
{
	let mut output = start.as_ref().to_owned();
	let mut key = start;
	let mut terminators = 0;
	let mut steps = 0;

	'walk: while terminators < sentence_count || !ends_with_any(&output, &SENTENCE_TERMINATORS) {
		if max_steps.is_some_and(|max| steps >= max) {
			debug!("Stopped after {} steps", steps);
			break;
		}
		steps += 1;

		let Some(group) = table.sample_next(key, rng) else {
			debug!("No transition after {} steps", steps);
			break;
		};
		for token in group.iter() {
			if ends_with_any(&output, &SENTENCE_TERMINATORS) {
				terminators += 1;
				if terminators >= sentence_count {
					break 'walk;
				}
				output.push(' ');
			} else if ends_with_any(&output, &CLAUSE_SEPARATORS) {
				output.push(' ');
			}
			output.push_str(token.as_ref());

			if lookup == LookupKey::LastToken {
				key = token;
			}
		}
	}
	output
}

/// Runs the stop policy of `input` from `start`.
pub fn generate<T, R>(table: &TransitionTable<T>, start: &T, input: &GenerationInput, rng: &mut R) -> String
where
	T: AsRef<str> + Clone + Eq + Hash,
	R: Rng + ?Sized,
{
	match input.policy {
		StopPolicy::FixedLength(length) => generate_fixed_length(table, start, length, rng),
		StopPolicy::SentenceCount(count) => {
			generate_sentences(table, start, count, input.lookup, input.max_steps(), rng)
		}
	}
}
