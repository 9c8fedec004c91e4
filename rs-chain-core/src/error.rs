use thiserror::Error;

/// Errors surfaced by the chain engine.
///
/// A token without transitions is not an error: sampling returns `None`
/// and generation simply stops early.
#[derive(Debug, Error)]
pub enum ChainError {
	/// No token of the corpus starts with an uppercase character.
	#[error("no valid start token among {tokens} corpus tokens")]
	NoStartToken { tokens: usize },

	/// Start-token selection was asked to draw from an empty corpus.
	#[error("the corpus token sequence is empty")]
	EmptyCorpus,

	/// The blob does not start with the model format tag.
	#[error("not a model file (missing format tag)")]
	UnknownFormat,

	/// The blob carries the tag but its content cannot be trusted.
	#[error("corrupt model data: {0}")]
	CorruptModel(String),

	#[error("failed to encode model: {0}")]
	Encode(#[source] postcard::Error),

	#[error("invalid token pattern: {0}")]
	InvalidPattern(#[from] regex::Error),

	#[error("invalid progress bar template: {0}")]
	ProgressTemplate(#[from] indicatif::style::TemplateError),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChainError>;
