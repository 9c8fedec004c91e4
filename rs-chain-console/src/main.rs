use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_chain_core::model::generation_input::{GenerationInput, LookupKey};
use rs_chain_core::model::markov_chain::MarkovChain;
use rs_chain_core::model::tokenizer::{Tokenizer, WORD_PATTERN, WORD_WITH_TRAILER_PATTERN};
use rs_chain_core::model::trainer::TrainingConfig;

const SEPARATOR: &str = "_________________________________";

/// Trains a word chain on a corpus and answers every line with generated text.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Corpus text file
	#[arg(long)]
	corpus: PathBuf,

	/// Token pattern (defaults depend on --dimensions)
	#[arg(long)]
	pattern: Option<String>,

	/// Number of tokens predicted as one continuation unit
	#[arg(long, default_value_t = 1)]
	dimensions: usize,

	/// Binary model file, reused when it already exists
	#[arg(long)]
	model: Option<PathBuf>,

	/// Also write a readable dump next to the model file
	#[arg(long)]
	readable: bool,

	/// Tokens per answer (order-1 chains)
	#[arg(long, default_value_t = 50)]
	length: usize,

	/// Sentences per answer (used when --dimensions > 1)
	#[arg(long, default_value_t = 4)]
	sentences: usize,

	/// Keep sampling from the start token instead of advancing the walk
	#[arg(long)]
	seed_lookup: bool,

	/// Random seed for reproducible answers
	#[arg(long)]
	seed: Option<u64>,

	/// Draw a progress bar while training
	#[arg(long)]
	progress: bool,

	/// Line that ends the conversation
	#[arg(long, default_value = "exit")]
	exit_word: String,
}

impl Args {
	fn tokenizer(&self) -> Result<Tokenizer, Box<dyn std::error::Error>> {
		let pattern = match &self.pattern {
			Some(pattern) => pattern.as_str(),
			None if self.dimensions > 1 => WORD_WITH_TRAILER_PATTERN,
			None => WORD_PATTERN,
		};
		Ok(Tokenizer::new(pattern)?)
	}

	fn training_config(&self) -> Result<TrainingConfig, Box<dyn std::error::Error>> {
		let mut config = TrainingConfig::new(self.dimensions)?;
		config.report_progress = self.progress;
		Ok(config)
	}

	fn generation_input(&self) -> GenerationInput {
		let mut input = if self.dimensions > 1 {
			GenerationInput::sentences(self.sentences)
		} else {
			GenerationInput::fixed_length(self.length)
		};
		if self.seed_lookup {
			input.lookup = LookupKey::Seed;
		}
		input
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let args = Args::parse();

	let tokenizer = args.tokenizer()?;
	let config = args.training_config()?;

	// Reuse the binary model when one is given, otherwise train in memory
	let chain = match &args.model {
		Some(model) => MarkovChain::load_or_train(&args.corpus, model, &tokenizer, &config, args.readable)?,
		None => {
			let mut chain = MarkovChain::new();
			chain.import_file(&args.corpus, &tokenizer)?;
			chain.train(&config)?;
			chain
		}
	};
	info!("Chain ready: {} tokens, {} states", chain.tokens().len(), chain.table().len());

	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	let input = args.generation_input();

	println!("Lets have a conversation :3");
	println!("{}", SEPARATOR);

	let stdin = io::stdin();
	let mut lines = stdin.lock().lines();
	loop {
		print!(">> ");
		io::stdout().flush()?;

		let Some(line) = lines.next() else { break };
		if line?.trim() == args.exit_word {
			break;
		}

		println!();
		match chain.generate(&input, &mut rng) {
			Ok(text) => println!("{}", text),
			Err(e) => error!("Generation failed: {}", e),
		}
		println!("{}", SEPARATOR);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rs_chain_core::model::generation_input::StopPolicy;

	#[test]
	fn test_order_one_defaults() {
		let args = Args::parse_from(["rs-chain-console", "--corpus", "transcript.txt"]);
		assert_eq!(args.tokenizer().unwrap().pattern(), WORD_PATTERN);
		assert_eq!(args.generation_input().policy, StopPolicy::FixedLength(50));
		assert_eq!(args.training_config().unwrap().group_size(), 1);
	}

	#[test]
	fn test_dimensions_switch_to_sentences() {
		let args = Args::parse_from([
			"rs-chain-console", "--corpus", "c.txt", "--dimensions", "10", "--seed-lookup",
		]);
		assert_eq!(args.tokenizer().unwrap().pattern(), WORD_WITH_TRAILER_PATTERN);
		let input = args.generation_input();
		assert_eq!(input.policy, StopPolicy::SentenceCount(4));
		assert_eq!(input.lookup, LookupKey::Seed);
	}

	#[test]
	fn test_zero_dimensions_rejected() {
		let args = Args::parse_from(["rs-chain-console", "--corpus", "c.txt", "--dimensions", "0"]);
		assert!(args.training_config().is_err());
	}
}
