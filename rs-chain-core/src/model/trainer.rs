use std::hash::Hash;

use log::info;

use crate::error::{ChainError, Result};
use super::progress::TrainingProgress;
use super::transition_table::TransitionTable;

/// Training parameters.
///
/// # Invariants
/// - `group_size` >= 1
/// - `progress_interval` >= 1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingConfig {
	/// Number of tokens predicted as one continuation unit (1 = classic chain).
	group_size: usize,

	/// Whether to draw a progress bar on the terminal while training.
	pub report_progress: bool,

	/// Number of processed positions between two progress redraws.
	progress_interval: usize,
}

impl Default for TrainingConfig {
	fn default() -> Self {
		Self { group_size: 1, report_progress: false, progress_interval: 100 }
	}
}

impl TrainingConfig {
	/// Creates a configuration predicting groups of `group_size` tokens.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `group_size` is 0.
	pub fn new(group_size: usize) -> Result<Self> {
		let mut config = Self::default();
		config.set_group_size(group_size)?;
		Ok(config)
	}

	pub fn group_size(&self) -> usize {
		self.group_size
	}

	pub fn progress_interval(&self) -> usize {
		self.progress_interval
	}

	/// Sets the look-ahead group size.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `group_size` is 0.
	pub fn set_group_size(&mut self, group_size: usize) -> Result<()> {
		if group_size == 0 {
			return Err(ChainError::InvalidConfig("group size must be >= 1".to_owned()));
		}
		self.group_size = group_size;
		Ok(())
	}

	/// Sets how many positions pass between two progress redraws.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `interval` is 0.
	pub fn set_progress_interval(&mut self, interval: usize) -> Result<()> {
		if interval == 0 {
			return Err(ChainError::InvalidConfig("progress interval must be >= 1".to_owned()));
		}
		self.progress_interval = interval;
		Ok(())
	}
}

/// Builds transition tables from token sequences in a single forward pass.
#[derive(Clone, Debug, Default)]
pub struct Trainer {
	config: TrainingConfig,
}

impl Trainer {
	pub fn new(config: TrainingConfig) -> Self {
		Self { config }
	}

	/// Trains a table from `tokens`.
	///
	/// For every position `i` followed by a full group, the group
	/// `tokens[i + 1 ..= i + group_size]` is counted against `tokens[i]`.
	/// A sequence shorter than `group_size + 1` yields an empty table.
	///
	/// # Errors
	/// Returns `ProgressTemplate` if progress reporting cannot be set up.
	pub fn train<T: Clone + Eq + Hash>(&self, tokens: &[T]) -> Result<TransitionTable<T>> {
		let group_size = self.config.group_size;
		let mut table = TransitionTable::new(group_size)?;

		let positions = tokens.len().saturating_sub(group_size);
		info!("Training on {} tokens (group size {})", tokens.len(), group_size);

		let progress = TrainingProgress::new(
			positions,
			self.config.progress_interval,
			self.config.report_progress,
		)?;

		for i in 0..positions {
			progress.update(i);
			table.observe(&tokens[i], &tokens[i + 1..=i + group_size]);
		}
		progress.finish();

		info!("Trained {} states from {} positions", table.len(), positions);
		Ok(table)
	}
}
