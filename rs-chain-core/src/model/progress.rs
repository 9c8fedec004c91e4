use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::error::Result;

const TEMPLATE: &str = "Training | {bar:50} | Line {pos} / {len}";

/// Bounded-width training progress bar.
///
/// Redraws only every `interval` positions and at completion. When
/// reporting is disabled the bar is hidden and every call is a no-op.
pub(crate) struct TrainingProgress {
	bar: ProgressBar,
	interval: usize,
	total: usize,
}

impl TrainingProgress {
	/// Creates a progress bar for `total` positions.
	///
	/// # Errors
	/// Returns `ProgressTemplate` if the bar template fails to parse.
	pub(crate) fn new(total: usize, interval: usize, visible: bool) -> Result<Self> {
		let bar = ProgressBar::new(total as u64);
		if visible {
			bar.set_style(ProgressStyle::with_template(TEMPLATE)?.progress_chars("= "));
		} else {
			bar.set_draw_target(ProgressDrawTarget::hidden());
		}
		Ok(Self { bar, interval: interval.max(1), total })
	}

	/// Reports that `current` positions have been processed.
	pub(crate) fn update(&self, current: usize) {
		if current % self.interval == 0 || current == self.total {
			self.bar.set_position(current as u64);
		}
	}

	pub(crate) fn finish(&self) {
		self.bar.set_position(self.total as u64);
		self.bar.finish();
	}
}
