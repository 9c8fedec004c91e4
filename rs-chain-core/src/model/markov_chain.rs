use std::fmt::Display;
use std::hash::Hash;
use std::path::Path;

use log::info;
use rand::Rng;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ChainError, Result};
use crate::io::read_file;
use super::generation_input::{GenerationInput, StartToken};
use super::generator::{generate, select_start_key, select_start_token};
use super::persistence::{load_file, save_file};
use super::successor::SuccessorGroup;
use super::tokenizer::Tokenizer;
use super::trainer::{Trainer, TrainingConfig};
use super::transition_table::TransitionTable;

/// A Markov chain instance: the corpus token sequence and its transition table.
///
/// # Responsibilities
/// - Import the corpus (replace, append, concatenate, or tokenize raw text)
/// - Train the transition table in one pass, or load a persisted one
/// - Save the table, optionally with a readable dump
/// - Sample successors and generate text
///
/// # Notes
/// - The corpus is kept after training: start tokens are drawn from it.
/// - Training replaces the whole table; there is no incremental update.
#[derive(Clone, Debug)]
pub struct MarkovChain<T> {
	tokens: Vec<T>,
	table: TransitionTable<T>,
}

impl<T: Clone + Eq + Hash> MarkovChain<T> {
	/// Creates an empty, untrained order-1 chain.
	pub fn new() -> Self {
		Self {
			tokens: Vec::new(),
			// Impossible to fail, group size is >= 1
			table: TransitionTable::new(1).expect("group size 1 is valid"),
		}
	}

	/// Corpus token sequence.
	pub fn tokens(&self) -> &[T] {
		&self.tokens
	}

	pub fn table(&self) -> &TransitionTable<T> {
		&self.table
	}

	/// Replaces the corpus with `tokens`.
	pub fn import_tokens(&mut self, tokens: Vec<T>) {
		info!("Importing {} tokens", tokens.len());
		self.tokens = tokens;
	}

	/// Appends every list to the corpus, in argument order.
	pub fn import_token_lists<I>(&mut self, lists: I)
	where
		I: IntoIterator,
		I::Item: IntoIterator<Item = T>,
	{
		let mut count = 0;
		for list in lists {
			self.tokens.extend(list);
			count += 1;
		}
		info!("Imported {} token lists ({} tokens in corpus)", count, self.tokens.len());
	}

	/// Appends a single token to the corpus.
	pub fn append_token(&mut self, token: T) {
		self.tokens.push(token);
	}

	/// Rebuilds the transition table from the current corpus.
	///
	/// # Errors
	/// Returns `ProgressTemplate` if progress reporting cannot be set up.
	pub fn train(&mut self, config: &TrainingConfig) -> Result<()> {
		self.table = Trainer::new(config.clone()).train(&self.tokens)?;
		Ok(())
	}

	/// Draws a successor group for `token`, or `None` if it has no transitions.
	pub fn sample_next<R: Rng + ?Sized>(&self, token: &T, rng: &mut R) -> Option<&SuccessorGroup<T>> {
		self.table.sample_next(token, rng)
	}
}

impl<T: Clone + Eq + Hash> Default for MarkovChain<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> MarkovChain<T>
where
	T: Serialize + DeserializeOwned + Display + Clone + Eq + Hash,
{
	/// Saves the transition table to `path`, plus `readable_<file name>` when `readable` is set.
	///
	/// # Errors
	/// Returns `Io` or `Encode` on failure.
	pub fn save<P: AsRef<Path>>(&self, path: P, readable: bool) -> Result<()> {
		save_file(&self.table, path, readable)
	}

	/// Replaces the transition table with the one stored at `path`.
	///
	/// The corpus is left untouched. On error the current table is kept.
	///
	/// # Errors
	/// Returns `Io`, `UnknownFormat` or `CorruptModel` on failure.
	pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
		self.table = load_file(path)?;
		Ok(())
	}
}

impl MarkovChain<String> {
	/// Replaces the corpus with the tokens `tokenizer` extracts from `contents`.
	pub fn import_text(&mut self, contents: &str, tokenizer: &Tokenizer) {
		self.import_tokens(tokenizer.tokenize(contents));
	}

	/// Replaces the corpus with the tokens of a UTF-8 text file.
	///
	/// # Errors
	/// Returns `Io` if the file cannot be read.
	pub fn import_file<P: AsRef<Path>>(&mut self, path: P, tokenizer: &Tokenizer) -> Result<()> {
		let path = path.as_ref();
		info!("Importing {}", path.display());
		let contents = read_file(path)?;
		self.import_text(&contents, tokenizer);
		Ok(())
	}

	/// Builds a chain from a corpus file, reusing a binary model when one exists.
	///
	/// - Tokenizes `corpus_path` (start tokens are drawn from the corpus).
	/// - Loads `model_path` if it exists; its group size must match `config`.
	/// - Otherwise trains with `config` and saves the table to `model_path`.
	///
	/// # Errors
	/// Returns `InvalidConfig` when the cached model was trained with another
	/// group size, otherwise any import, load, training or save error.
	pub fn load_or_train<PC, PM>(
		corpus_path: PC,
		model_path: PM,
		tokenizer: &Tokenizer,
		config: &TrainingConfig,
		readable: bool,
	) -> Result<Self>
	where
		PC: AsRef<Path>,
		PM: AsRef<Path>,
	{
		let model_path = model_path.as_ref();
		let mut chain = Self::new();
		chain.import_file(corpus_path, tokenizer)?;

		if model_path.exists() {
			info!("Reusing model {}", model_path.display());
			chain.load(model_path)?;
			if chain.table.group_size() != config.group_size() {
				return Err(ChainError::InvalidConfig(format!(
					"model {} has group size {}, requested {}",
					model_path.display(),
					chain.table.group_size(),
					config.group_size()
				)));
			}
		} else {
			chain.train(config)?;
			chain.save(model_path, readable)?;
		}
		Ok(chain)
	}

	/// Selects a start token according to `start` and returns it.
	///
	/// # Errors
	/// Returns `EmptyCorpus` or `NoStartToken` when no start token qualifies.
	pub fn start_token<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String> {
		match &input.start_token {
			StartToken::Corpus => {
				select_start_token(&self.tokens, input.max_start_attempts, rng).cloned()
			}
			StartToken::TableKeys => select_start_key(&self.table, rng).cloned(),
			StartToken::Custom(token) => Ok(token.clone()),
		}
	}

	/// Generates text: selects a start token, then runs the stop policy of `input`.
	///
	/// # Errors
	/// Returns `EmptyCorpus` or `NoStartToken` when no start token qualifies.
	pub fn generate<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String> {
		let start = self.start_token(input, rng)?;
		Ok(generate(&self.table, &start, input, rng))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::tokenizer::WHITESPACE_PATTERN;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn strings(text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	#[test]
	fn test_import_operations() {
		let mut chain = MarkovChain::new();
		chain.import_tokens(strings("a b"));
		chain.import_token_lists(vec![strings("c"), strings("d e")]);
		chain.append_token("f".to_owned());
		assert_eq!(chain.tokens(), strings("a b c d e f").as_slice());

		chain.import_tokens(strings("x"));
		assert_eq!(chain.tokens(), strings("x").as_slice());
	}

	#[test]
	fn test_import_text() {
		let mut chain = MarkovChain::new();
		chain.import_text("Cats eat fish.", &Tokenizer::new(WHITESPACE_PATTERN).unwrap());
		assert_eq!(chain.tokens(), strings("Cats eat fish.").as_slice());
	}

	#[test]
	fn test_untrained_chain_samples_nothing() {
		let mut chain = MarkovChain::new();
		chain.import_tokens(strings("Cats eat fish."));
		let mut rng = StdRng::seed_from_u64(0);
		assert!(chain.sample_next(&"Cats".to_owned(), &mut rng).is_none());
	}

	#[test]
	fn test_generate_with_custom_start() {
		let mut chain = MarkovChain::new();
		chain.import_tokens(strings("cats eat fish."));
		chain.train(&TrainingConfig::default()).unwrap();

		let mut input = GenerationInput::fixed_length(5);
		input.start_token = StartToken::Custom("cats".to_owned());
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(chain.generate(&input, &mut rng).unwrap(), "cats eat fish.");
	}

	#[test]
	fn test_generate_from_table_keys() {
		let mut chain = MarkovChain::new();
		chain.import_tokens(strings("Cats eat fish."));
		chain.train(&TrainingConfig::default()).unwrap();
		chain.import_tokens(Vec::new());

		let mut input = GenerationInput::fixed_length(5);
		input.start_token = StartToken::TableKeys;
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(chain.generate(&input, &mut rng).unwrap(), "Cats eat fish.");
	}
}
