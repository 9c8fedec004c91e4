//! Word-level Markov chain text generation library.
//!
//! This crate provides a small Markov chain engine including:
//! - Regex-based corpus tokenization
//! - Transition-table training over single successors or look-ahead groups
//! - Weighted random sampling with an injected random source
//! - Fixed-length and sentence-count generation policies
//! - Binary persistence of trained tables plus a readable dump

/// Core chain model, training, sampling and generation logic.
pub mod model;

/// Error type shared by every fallible operation.
pub mod error;

/// I/O utilities (corpus loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{ChainError, Result};
