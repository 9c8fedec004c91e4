use crate::error::{ChainError, Result};

/// Default number of random corpus draws before falling back to a filtered pick.
pub const DEFAULT_START_ATTEMPTS: usize = 1000;

/// Strategy used to select the starting token of a generation.
///
/// # Variants
/// - `Corpus`: draw random corpus tokens until one starts with an uppercase character.
/// - `TableKeys`: pick a random uppercase-leading token among the table keys
///   (useful when the table was loaded without its corpus).
/// - `Custom(String)`: use the provided token as is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartToken {
	Corpus,
	TableKeys,
	Custom(String),
}

/// Stopping rule of a generation.
///
/// # Variants
/// - `FixedLength(n)`: append at most `n` tokens, space separated.
/// - `SentenceCount(n)`: stop once `n` sentence terminators (`. ! ?`) were seen
///   and the output ends with one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopPolicy {
	FixedLength(usize),
	SentenceCount(usize),
}

/// Token used to look up the next group in the sentence-count policy.
///
/// # Variants
/// - `LastToken`: advance to the last token appended (a regular Markov walk).
/// - `Seed`: keep sampling from the start token for every step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LookupKey {
	#[default]
	LastToken,
	Seed,
}

/// Input parameters of a single generation call.
///
/// # Responsibilities
/// - Select the stop policy, start source and lookup key
/// - Bound the random start-token draws and, optionally, the sampling steps
#[derive(Clone, Debug)]
pub struct GenerationInput {
	/// Stopping rule.
	pub policy: StopPolicy,

	/// Where the first token comes from.
	pub start_token: StartToken,

	/// Lookup key of the sentence-count policy (ignored by `FixedLength`).
	pub lookup: LookupKey,

	/// Random draws attempted before falling back to the filtered candidates.
	pub max_start_attempts: usize,

	/// Optional cap on sampling steps for the sentence-count policy.
	max_steps: Option<usize>,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			policy: StopPolicy::FixedLength(50),
			start_token: StartToken::Corpus,
			lookup: LookupKey::LastToken,
			max_start_attempts: DEFAULT_START_ATTEMPTS,
			max_steps: None,
		}
	}
}

impl GenerationInput {
	/// Input producing up to `length` tokens after a corpus start token.
	pub fn fixed_length(length: usize) -> Self {
		Self { policy: StopPolicy::FixedLength(length), ..Self::default() }
	}

	/// Input producing `sentence_count` sentences after a corpus start token.
	pub fn sentences(sentence_count: usize) -> Self {
		Self { policy: StopPolicy::SentenceCount(sentence_count), ..Self::default() }
	}

	pub fn max_steps(&self) -> Option<usize> {
		self.max_steps
	}

	/// Caps the number of sampling steps of the sentence-count policy.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `max_steps` is `Some(0)`.
	pub fn set_max_steps(&mut self, max_steps: Option<usize>) -> Result<()> {
		if max_steps == Some(0) {
			return Err(ChainError::InvalidConfig("max steps must be >= 1".to_owned()));
		}
		self.max_steps = max_steps;
		Ok(())
	}
}
